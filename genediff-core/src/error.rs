use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The reference tables that make up a catalog.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Table {
    Genes,
    Annotations,
    Terms,
    Interactions,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::Genes => "genes",
            Table::Annotations => "annotations",
            Table::Terms => "terms",
            Table::Interactions => "interactions",
        };
        f.write_str(name)
    }
}

/// Failure to build a catalog out of the reference tables.
///
/// A catalog is never constructed when one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {table} file {path:?}: {source}")]
    Io {
        table: Table,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {table} table: {source}")]
    Read {
        table: Table,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table: {source}")]
    Csv {
        table: Table,
        #[source]
        source: csv::Error,
    },

    #[error("{table} table is missing required column {column:?}")]
    MissingColumn { table: Table, column: String },

    #[error("{table} table has no header row")]
    EmptyHeader { table: Table },
}

/// Rejection of a comparison request before it reaches the comparator.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum InputError {
    #[error("both gene lists are empty")]
    BothEmpty,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write record: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
