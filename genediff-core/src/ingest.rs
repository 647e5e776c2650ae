use std::io::{Read, BufRead, BufReader, Cursor, Error};
use tracing::debug;

use crate::error::{LoadError, Table};
use crate::models::{AnnotationEdge, AnnotationTerm, GeneRecord, InteractionEdge};
use crate::normalize::canonical;

pub const GENE_ID_COLUMN: &str = "ensembl_gene_id";
pub const GENE_SYMBOL_COLUMN: &str = "gene_symbol";
pub const ENTREZ_ID_COLUMN: &str = "entrezgene_id";
pub const TERM_ID_COLUMN: &str = "go_id";
pub const DICTIONARY_ID_COLUMN: &str = "GO_ID";
pub const DICTIONARY_LABEL_COLUMN: &str = "GO_Term";
pub const INTERACTOR_A_COLUMN: &str = "Official Symbol Interactor A";
pub const INTERACTOR_B_COLUMN: &str = "Official Symbol Interactor B";
pub const SYSTEM_TYPE_COLUMN: &str = "Experimental System Type";

/// Strips the metadata preamble (blank lines and `!` comments) in front of
/// the header row of a table.
///
/// The header row itself is passed through to the inner reader, and is
/// also kept aside so that it can be inspected after reading.
pub struct MetadataReader<B> {
    reader: B,
    metadata: String,
    header: String,
    metadata_finished: bool,
    buffer: Cursor<String>,
}

impl<B: BufRead> MetadataReader<B> {
    pub fn new(reader: B) -> MetadataReader<B> {
        MetadataReader {
            reader,
            metadata: String::new(),
            header: String::new(),
            metadata_finished: false,
            buffer: Cursor::new(String::new()),
        }
    }

    pub fn metadata(&self) -> Option<&str> {
        if !self.metadata_finished { return None; }
        Some(&self.metadata)
    }

    pub fn header(&self) -> Option<&str> {
        if !self.metadata_finished { return None; }
        Some(&self.header)
    }
}

impl<B: BufRead> Read for MetadataReader<B> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let len = self.buffer.read(buf)?;
        if len != 0 { return Ok(len); }

        if self.metadata_finished {
            return self.reader.read(buf);
        }

        loop {
            self.buffer.get_mut().clear();
            self.buffer.set_position(0);

            let len = self.reader.read_line(self.buffer.get_mut())?;
            if len == 0 {
                self.metadata_finished = true;
                return Ok(0);
            }

            let (blank, comment) = {
                let line = self.buffer.get_ref().trim_start();
                (line.is_empty(), line.starts_with('!'))
            };

            if blank {
                self.metadata.push('\n');
            } else if comment {
                self.metadata.push_str(self.buffer.get_ref());
            } else {
                // First line with content is the header, hand it on.
                self.metadata_finished = true;
                self.header.push_str(self.buffer.get_ref());
                return self.buffer.read(buf);
            }
        }
    }
}

type TableReader<R> = csv::Reader<MetadataReader<BufReader<R>>>;

/// Positions of named columns in a table header.
struct Columns {
    table: Table,
    headers: csv::StringRecord,
}

impl Columns {
    fn optional(&self, name: &str) -> Option<usize> {
        self.headers.iter()
            .position(|header| header.trim().trim_start_matches('#') == name)
    }

    fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.optional(name).ok_or_else(|| LoadError::MissingColumn {
            table: self.table,
            column: name.to_string(),
        })
    }
}

fn open_table<R: Read>(reader: R, table: Table) -> Result<(TableReader<R>, Columns), LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(MetadataReader::new(BufReader::new(reader)));

    let headers = csv_reader.headers()
        .map_err(|source| LoadError::Csv { table, source })?
        .clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(LoadError::EmptyHeader { table });
    }

    if let Some(metadata) = csv_reader.get_ref().metadata() {
        let lines = metadata.lines().filter(|line| line.starts_with('!')).count();
        if lines > 0 {
            debug!(%table, lines, "skipped metadata preamble");
        }
    }

    Ok((csv_reader, Columns { table, headers }))
}

fn for_each_row<R, F>(csv_reader: &mut TableReader<R>, table: Table, mut f: F) -> Result<(), LoadError>
    where R: Read,
          F: FnMut(&csv::StringRecord),
{
    let mut row = csv::StringRecord::new();
    while csv_reader.read_record(&mut row).map_err(|source| LoadError::Csv { table, source })? {
        f(&row);
    }
    Ok(())
}

fn field<'r>(row: &'r csv::StringRecord, column: usize) -> &'r str {
    row.get(column).unwrap_or("")
}

/// Coerces an Entrez gene id. Anything that is not a non-negative integer
/// (including pandas-style `7157.0`) that fits in a `u32` becomes `None`.
fn parse_entrez_id(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u32>() {
        return Some(id);
    }
    let float = raw.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX) {
        Some(float as u32)
    } else {
        None
    }
}

impl GeneRecord {
    pub fn parse_from<R: Read>(reader: R) -> Result<Vec<Self>, LoadError> {
        let table = Table::Genes;
        let (mut csv_reader, columns) = open_table(reader, table)?;
        let id_column = columns.require(GENE_ID_COLUMN)?;
        let symbol_column = columns.require(GENE_SYMBOL_COLUMN)?;
        let entrez_column = columns.optional(ENTREZ_ID_COLUMN);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for_each_row(&mut csv_reader, table, |row| {
            let gene_id = match canonical(field(row, id_column)) {
                Some(gene_id) => gene_id,
                None => {
                    skipped += 1;
                    return;
                }
            };
            records.push(GeneRecord {
                gene_id,
                symbol: canonical(field(row, symbol_column)).unwrap_or_default(),
                entrez_id: entrez_column.and_then(|column| parse_entrez_id(field(row, column))),
            });
        })?;

        if skipped > 0 {
            debug!(%table, skipped, "dropped rows without a gene id");
        }
        Ok(records)
    }
}

impl AnnotationEdge {
    pub fn parse_from<R: Read>(reader: R) -> Result<Vec<Self>, LoadError> {
        let table = Table::Annotations;
        let (mut csv_reader, columns) = open_table(reader, table)?;
        let gene_column = columns.require(GENE_ID_COLUMN)?;
        let term_column = columns.require(TERM_ID_COLUMN)?;

        let mut edges = Vec::new();
        let mut skipped = 0usize;
        for_each_row(&mut csv_reader, table, |row| {
            let gene_id = canonical(field(row, gene_column));
            let term_id = field(row, term_column).trim();
            match gene_id {
                Some(gene_id) if !term_id.is_empty() => {
                    edges.push(AnnotationEdge { gene_id, term_id: term_id.to_string() });
                }
                _ => skipped += 1,
            }
        })?;

        if skipped > 0 {
            debug!(%table, skipped, "dropped rows without a gene id or term id");
        }
        Ok(edges)
    }
}

impl AnnotationTerm {
    /// Reads a tab-separated term dictionary with `GO_ID` and `GO_Term` columns.
    pub fn parse_from<R: Read>(reader: R) -> Result<Vec<Self>, LoadError> {
        let table = Table::Terms;
        let (mut csv_reader, columns) = open_table(reader, table)?;
        let id_column = columns.require(DICTIONARY_ID_COLUMN)?;
        let label_column = columns.require(DICTIONARY_LABEL_COLUMN)?;

        let mut terms = Vec::new();
        for_each_row(&mut csv_reader, table, |row| {
            let term_id = field(row, id_column).trim();
            if term_id.is_empty() { return; }
            terms.push(AnnotationTerm {
                term_id: term_id.to_string(),
                label: field(row, label_column).trim().to_string(),
            });
        })?;

        Ok(terms)
    }

    /// Reads the `[Term]` stanzas of an OBO flat file.
    ///
    /// Stanzas without an `id` are skipped and a missing `name` gives an
    /// empty label. Every other stanza kind is ignored.
    pub fn parse_obo<R: BufRead>(reader: R) -> Result<Vec<Self>, LoadError> {
        let mut terms = Vec::new();
        let mut in_term = false;
        let mut id: Option<String> = None;
        let mut name: Option<String> = None;

        let mut flush = |id: &mut Option<String>, name: &mut Option<String>| {
            if let Some(term_id) = id.take() {
                terms.push(AnnotationTerm {
                    term_id,
                    label: name.take().unwrap_or_default(),
                });
            }
            *name = None;
        };

        for line in reader.lines() {
            let line = line.map_err(|source| LoadError::Read { table: Table::Terms, source })?;
            let line = line.trim();

            if line.starts_with('[') && line.ends_with(']') {
                if in_term { flush(&mut id, &mut name); }
                in_term = line == "[Term]";
                continue;
            }
            if !in_term { continue; }

            if let Some((key, value)) = line.split_once(':') {
                match key.trim() {
                    "id" if id.is_none() => id = Some(value.trim().to_string()),
                    "name" if name.is_none() => name = Some(value.trim().to_string()),
                    _ => (),
                }
            }
        }
        if in_term { flush(&mut id, &mut name); }

        Ok(terms)
    }
}

impl InteractionEdge {
    /// Reads interaction rows, keeping only the requested experimental
    /// system type when `system_type` is given (compared case-insensitively).
    pub fn parse_from<R: Read>(reader: R, system_type: Option<&str>) -> Result<Vec<Self>, LoadError> {
        let table = Table::Interactions;
        let (mut csv_reader, columns) = open_table(reader, table)?;
        let a_column = columns.require(INTERACTOR_A_COLUMN)?;
        let b_column = columns.require(INTERACTOR_B_COLUMN)?;
        let filter = match system_type {
            Some(wanted) => Some((columns.require(SYSTEM_TYPE_COLUMN)?, wanted.trim())),
            None => None,
        };

        let mut edges = Vec::new();
        let mut filtered = 0usize;
        let mut skipped = 0usize;
        for_each_row(&mut csv_reader, table, |row| {
            if let Some((column, wanted)) = filter {
                if !field(row, column).trim().eq_ignore_ascii_case(wanted) {
                    filtered += 1;
                    return;
                }
            }
            match (canonical(field(row, a_column)), canonical(field(row, b_column))) {
                (Some(symbol_a), Some(symbol_b)) => edges.push(InteractionEdge { symbol_a, symbol_b }),
                _ => skipped += 1,
            }
        })?;

        if filtered > 0 {
            debug!(%table, filtered, "dropped rows of another experimental system type");
        }
        if skipped > 0 {
            debug!(%table, skipped, "dropped rows without both interactor symbols");
        }
        Ok(edges)
    }
}
