use std::io::Write;
use serde::Serialize;

use crate::error::ExportError;
use crate::report::ComparisonReport;

pub const REPORT_HEADER: &str = "section\tbucket\tfirst\tsecond\n";

/// One line of a report in long format.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ReportRow {
    pub section: &'static str,
    pub bucket: &'static str,
    pub first: String,
    pub second: String,
}

/// Writes a comparison report as tab-separated text.
///
/// The summary counts go into a `!`-prefixed metadata preamble, followed by
/// a header line and one row per labelled term or interaction edge.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    metadata: String,
    header: String,
    rows: Vec<ReportRow>,
}

impl ReportExporter {
    pub fn new(report: &ComparisonReport<'_>) -> ReportExporter {
        let summary = &report.summary;
        let metadata = format!(
            "!up_regulated_submitted_count: {}\n\
             !down_regulated_submitted_count: {}\n\
             !up_regulated_mapped_count: {}\n\
             !down_regulated_mapped_count: {}\n",
            summary.up_regulated_submitted_count,
            summary.down_regulated_submitted_count,
            summary.up_regulated_mapped_count,
            summary.down_regulated_mapped_count,
        );

        let go = &report.go_comparison;
        let term_buckets = [
            ("unique_to_up_regulated", &go.unique_to_up_regulated),
            ("unique_to_down_regulated", &go.unique_to_down_regulated),
            ("shared", &go.shared),
        ];
        let mut rows: Vec<ReportRow> = term_buckets.iter()
            .flat_map(|&(bucket, terms)| terms.iter().map(move |term| ReportRow {
                section: "go",
                bucket,
                first: term.term_id.clone(),
                second: term.label.clone(),
            }))
            .collect();

        if let Some(ppi) = &report.ppi_analysis {
            let edge_buckets = [
                ("internal_up_regulated", &ppi.internal_up_regulated),
                ("internal_down_regulated", &ppi.internal_down_regulated),
                ("cross_talk", &ppi.cross_talk),
            ];
            rows.extend(edge_buckets.iter()
                .flat_map(|&(bucket, edges)| edges.iter().map(move |edge| ReportRow {
                    section: "ppi",
                    bucket,
                    first: edge.symbol_a.clone(),
                    second: edge.symbol_b.clone(),
                })));
        }

        ReportExporter { metadata, header: REPORT_HEADER.to_string(), rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn write_all<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        write!(&mut writer, "{}", self.metadata)?;
        write!(&mut writer, "{}", self.header)?;

        let mut csv_writer = row_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Streams the preamble and header as one chunk, then one chunk per row.
    #[cfg(feature = "async")]
    pub fn into_stream(self) -> impl futures::Stream<Item=Result<bytes::Bytes, ExportError>> {
        let preamble = bytes::Bytes::from(format!("{}{}", self.metadata, self.header));
        let rows = self.rows.into_iter()
            .map(|row| serialize_row(&row).map(bytes::Bytes::from));
        futures::stream::iter(std::iter::once(Ok(preamble)).chain(rows))
    }
}

fn row_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_writer(writer)
}

#[cfg(feature = "async")]
fn serialize_row(row: &ReportRow) -> Result<Vec<u8>, ExportError> {
    let mut csv_writer = row_writer(Vec::new());
    csv_writer.serialize(row)?;
    csv_writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryInput;
    use crate::ingest::MetadataReader;
    use crate::test_support::CATALOG;
    use std::io::{Cursor, Read};

    const EXPECTED: &str = "!up_regulated_submitted_count: 1
!down_regulated_submitted_count: 1
!up_regulated_mapped_count: 1
!down_regulated_mapped_count: 1
section\tbucket\tfirst\tsecond
go\tunique_to_up_regulated\tGO:0000001\tterm one
go\tunique_to_down_regulated\tGO:0000002\tterm two
go\tshared\tGO:0000003\tterm three
ppi\tinternal_up_regulated\tSYM1\tSYM1
ppi\tcross_talk\tSYM1\tSYM2
ppi\tcross_talk\tSYM2\tSYM1
";

    #[test]
    fn test_write_report() {
        let report = QueryInput::new(vec!["G1"], vec!["G2"]).execute(&CATALOG);
        let mut output = Vec::new();
        ReportExporter::new(&report).write_all(&mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), EXPECTED);
    }

    #[test]
    fn test_preamble_is_metadata() {
        let report = QueryInput::new(vec!["G1"], vec!["G2"]).execute(&CATALOG);
        let mut output = Vec::new();
        ReportExporter::new(&report).write_all(&mut output).unwrap();

        let mut reader = MetadataReader::new(Cursor::new(output));
        let mut body = String::new();
        reader.read_to_string(&mut body).unwrap();
        assert_eq!(reader.header().unwrap(), REPORT_HEADER);
        assert_eq!(reader.metadata().unwrap().lines().count(), 4);
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_stream_report() {
        use futures::StreamExt;

        let report = QueryInput::new(vec!["G1"], vec!["G2"]).execute(&CATALOG);
        let exporter = ReportExporter::new(&report);
        assert_eq!(exporter.rows().len(), 6);

        let chunks: Vec<_> = futures::executor::block_on(exporter.into_stream().collect::<Vec<_>>());
        assert_eq!(chunks.len(), 7);

        let mut streamed = Vec::new();
        for chunk in chunks {
            streamed.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(String::from_utf8(streamed).unwrap(), EXPECTED);
    }
}
