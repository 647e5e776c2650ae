#[cfg(test)]
#[macro_use]
extern crate lazy_static;

mod error;
mod ingest;
mod models;
mod normalize;
mod catalog;
mod compare;
mod interactions;
mod report;
mod export;

#[cfg(test)]
mod test_support;

pub use error::{ExportError, InputError, LoadError, Table};
pub use ingest::MetadataReader;
pub use models::{AnnotationEdge, AnnotationTerm, GeneRecord, InteractionEdge};
pub use normalize::{canonical, normalize};
pub use catalog::{Catalog, CatalogSources, CatalogStats};
pub use compare::{QueryInput, SetComparison, TermPartition};
pub use interactions::InteractionPartition;
pub use report::{ComparisonReport, GoComparison, PpiAnalysis, Summary};
pub use export::{ReportExporter, ReportRow, REPORT_HEADER};
