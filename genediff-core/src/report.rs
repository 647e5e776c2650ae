use serde::Serialize;

use crate::{AnnotationTerm, Catalog, InteractionEdge, InteractionPartition, QueryInput, SetComparison};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub up_regulated_submitted_count: usize,
    pub down_regulated_submitted_count: usize,
    pub up_regulated_mapped_count: usize,
    pub down_regulated_mapped_count: usize,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GoComparison<'a> {
    pub unique_to_up_regulated: Vec<&'a AnnotationTerm>,
    pub unique_to_down_regulated: Vec<&'a AnnotationTerm>,
    pub shared: Vec<&'a AnnotationTerm>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct PpiAnalysis<'a> {
    pub internal_up_regulated: Vec<&'a InteractionEdge>,
    pub internal_down_regulated: Vec<&'a InteractionEdge>,
    pub cross_talk: Vec<&'a InteractionEdge>,
}

/// The complete answer to one comparison request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ComparisonReport<'a> {
    pub summary: Summary,
    pub go_comparison: GoComparison<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppi_analysis: Option<PpiAnalysis<'a>>,
}

impl<'a> ComparisonReport<'a> {
    /// Moves already computed results into a report. Nothing is derived
    /// here except the submitted counts, which are the input set sizes.
    pub fn assemble(
        input: &QueryInput,
        comparison: SetComparison<'a>,
        interactions: Option<InteractionPartition<'a>>,
    ) -> ComparisonReport<'a> {
        let summary = Summary {
            up_regulated_submitted_count: input.up_regulated.len(),
            down_regulated_submitted_count: input.down_regulated.len(),
            up_regulated_mapped_count: comparison.mapped_up,
            down_regulated_mapped_count: comparison.mapped_down,
        };

        let labels = comparison.labels;
        let go_comparison = GoComparison {
            unique_to_up_regulated: labels.unique_up,
            unique_to_down_regulated: labels.unique_down,
            shared: labels.shared,
        };

        let ppi_analysis = interactions.map(|partition| PpiAnalysis {
            internal_up_regulated: partition.internal_up,
            internal_down_regulated: partition.internal_down,
            cross_talk: partition.cross_talk,
        });

        ComparisonReport { summary, go_comparison, ppi_analysis }
    }
}

impl QueryInput {
    /// Runs both comparisons against one catalog snapshot.
    ///
    /// The input is not validated here; empty sets just give an empty report.
    pub fn execute<'a>(&self, catalog: &'a Catalog) -> ComparisonReport<'a> {
        let comparison = SetComparison::compute(catalog, self);
        let interactions = InteractionPartition::compute(catalog, self);
        ComparisonReport::assemble(self, comparison, interactions)
    }
}
