use std::fs;

use genediff::CatalogSources;
use tempfile::TempDir;

pub(crate) const GENES: &str = "ensembl_gene_id\tgene_symbol
G1\tSYM1
G2\tSYM2
G3\tSYM3
";

pub(crate) const ANNOTATIONS: &str = "ensembl_gene_id\tgo_id
G1\tGO:0000001
G1\tGO:0000003
G2\tGO:0000002
G2\tGO:0000003
G3\tGO:0000004
";

pub(crate) const TERMS: &str = "GO_ID\tGO_Term
GO:0000001\tterm one
GO:0000002\tterm two
GO:0000003\tterm three
";

pub(crate) const INTERACTIONS: &str = "Official Symbol Interactor A\tOfficial Symbol Interactor B
SYM1\tSYM2
SYM1\tSYM1
SYM2\tSYM3
";

/// Reference tables written to a temporary directory. The directory is
/// removed when this is dropped.
pub(crate) struct Fixture {
    _dir: TempDir,
    pub sources: CatalogSources,
}

pub(crate) fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let write = |name: &str, contents: &str| {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    };

    let sources = CatalogSources {
        genes: write("genes.tsv", GENES),
        annotations: write("ensembl_to_go.tsv", ANNOTATIONS),
        terms: write("go_terms.tsv", TERMS),
        interactions: Some(write("biogrid_ppi.tsv", INTERACTIONS)),
        system_type: None,
    };
    Fixture { _dir: dir, sources }
}
