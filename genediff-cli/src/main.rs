use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{App, Arg, ArgMatches};
use genediff::{Catalog, CatalogSources, QueryInput, ReportExporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn app<'a, 'b>() -> clap::App<'a, 'b> {
    App::new("genediff")
        .about("Compares two gene lists against reference annotation and interaction tables")
        .arg(Arg::with_name("genes")
            .long("genes")
            .help("Gene table with ensembl_gene_id and gene_symbol columns")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("annotations")
            .long("annotations")
            .help("Gene to term table with ensembl_gene_id and go_id columns")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("terms")
            .long("terms")
            .help("Term dictionary, a GO_ID/GO_Term table or an .obo file")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("interactions")
            .long("interactions")
            .help("Interaction table with Official Symbol Interactor A/B columns")
            .takes_value(true))
        .arg(Arg::with_name("system_type")
            .long("system-type")
            .help("Only keep interactions of this Experimental System Type")
            .requires("interactions")
            .takes_value(true))
        .arg(Arg::with_name("up")
            .long("up")
            .help("File with the up-regulated gene ids")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("down")
            .long("down")
            .help("File with the down-regulated gene ids")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("output")
            .long("output")
            .short("o")
            .required(true)
            .takes_value(true))
        .arg(Arg::with_name("format")
            .long("format")
            .possible_values(&["json", "tsv"])
            .default_value("json")
            .takes_value(true))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = app().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.value_of(name).with_context(|| format!("missing argument {}", name))
}

/// Splits a gene list file on newlines, commas, tabs and spaces.
fn parse_id_list(contents: &str) -> Vec<&str> {
    contents
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|id| !id.is_empty())
        .collect()
}

fn read_id_list(path: &str) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read gene list {}", path))?;
    Ok(parse_id_list(&contents).into_iter().map(String::from).collect())
}

fn run(args: &ArgMatches) -> Result<()> {
    let sources = CatalogSources {
        genes: PathBuf::from(required(args, "genes")?),
        annotations: PathBuf::from(required(args, "annotations")?),
        terms: PathBuf::from(required(args, "terms")?),
        interactions: args.value_of("interactions").map(PathBuf::from),
        system_type: args.value_of("system_type").map(String::from),
    };
    let up_regulated = read_id_list(required(args, "up")?)?;
    let down_regulated = read_id_list(required(args, "down")?)?;
    let out_path = required(args, "output")?;
    let format = args.value_of("format").unwrap_or("json");

    let input = QueryInput::new(&up_regulated, &down_regulated);
    input.validate()?;

    let catalog = Catalog::load(&sources)
        .context("failed to load reference catalog")?;
    let report = input.execute(&catalog);

    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create output file {}", out_path))?;
    let mut writer = BufWriter::new(out_file);
    match format {
        "tsv" => ReportExporter::new(&report).write_all(&mut writer)?,
        _ => serde_json::to_writer_pretty(&mut writer, &report)?,
    }
    writer.flush()?;

    info!(
        output = out_path,
        up_regulated_mapped = report.summary.up_regulated_mapped_count,
        down_regulated_mapped = report.summary.down_regulated_mapped_count,
        "wrote comparison report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn fixture(dir: &TempDir) -> Vec<String> {
        let genes = write(dir, "genes.tsv", "ensembl_gene_id\tgene_symbol\nG1\tSYM1\nG2\tSYM2\n");
        let annotations = write(dir, "ensembl_to_go.tsv", "ensembl_gene_id\tgo_id\nG1\tT1\nG2\tT2\n");
        let terms = write(dir, "go-basic.obo", "[Term]\nid: T1\nname: first\n\n[Term]\nid: T2\nname: second\n");
        let interactions = write(
            dir,
            "biogrid.tsv",
            "Official Symbol Interactor A\tOfficial Symbol Interactor B\tExperimental System Type\n\
             SYM1\tSYM2\tphysical\n\
             SYM2\tSYM1\tgenetic\n",
        );
        vec![
            "genediff".to_string(),
            "--genes".to_string(), genes,
            "--annotations".to_string(), annotations,
            "--terms".to_string(), terms,
            "--interactions".to_string(), interactions,
            "--system-type".to_string(), "physical".to_string(),
        ]
    }

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("G1\nG2, g3\tG4\r\n\n  G5 ,,");
        assert_eq!(ids, vec!["G1", "G2", "g3", "G4", "G5"]);
    }

    #[test]
    fn test_run_json() {
        let dir = TempDir::new().unwrap();
        let mut argv = fixture(&dir);
        let up = write(&dir, "up.txt", "g1\nZZZZ\n");
        let down = write(&dir, "down.txt", "G2\n");
        let output = dir.path().join("report.json");
        argv.extend(vec![
            "--up".to_string(), up,
            "--down".to_string(), down,
            "--output".to_string(), output.to_str().unwrap().to_string(),
        ]);

        let matches = app().get_matches_from_safe(argv).unwrap();
        run(&matches).unwrap();

        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["summary"]["up_regulated_submitted_count"], 2);
        assert_eq!(report["summary"]["up_regulated_mapped_count"], 1);
        assert_eq!(report["go_comparison"]["unique_to_up_regulated"][0]["term"], "first");
        assert_eq!(report["ppi_analysis"]["cross_talk"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_run_tsv() {
        let dir = TempDir::new().unwrap();
        let mut argv = fixture(&dir);
        let up = write(&dir, "up.txt", "G1");
        let down = write(&dir, "down.txt", "G2");
        let output = dir.path().join("report.tsv");
        argv.extend(vec![
            "--up".to_string(), up,
            "--down".to_string(), down,
            "--output".to_string(), output.to_str().unwrap().to_string(),
            "--format".to_string(), "tsv".to_string(),
        ]);

        let matches = app().get_matches_from_safe(argv).unwrap();
        run(&matches).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with("!up_regulated_submitted_count: 1\n"));
        assert!(contents.contains("ppi\tcross_talk\tSYM1\tSYM2\n"));
    }

    #[test]
    fn test_run_rejects_empty_lists() {
        let dir = TempDir::new().unwrap();
        let mut argv = fixture(&dir);
        let up = write(&dir, "up.txt", "\n  \n");
        let down = write(&dir, "down.txt", "");
        let output = dir.path().join("report.json");
        argv.extend(vec![
            "--up".to_string(), up,
            "--down".to_string(), down,
            "--output".to_string(), output.to_str().unwrap().to_string(),
        ]);

        let matches = app().get_matches_from_safe(argv).unwrap();
        let error = run(&matches).unwrap_err();
        assert_eq!(error.downcast_ref::<genediff::InputError>(), Some(&genediff::InputError::BothEmpty));
        assert!(!output.exists());
    }
}
