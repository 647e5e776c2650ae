use std::collections::HashSet;
use tracing::debug;

use crate::{Catalog, InteractionEdge, QueryInput};

/// Interaction edges grouped by how they relate the two gene sets.
///
/// Every edge is tested against each bucket on its own. When a symbol is
/// in both sets an edge can appear in several buckets at once; this is
/// intended and is not deduplicated.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct InteractionPartition<'a> {
    pub internal_up: Vec<&'a InteractionEdge>,
    pub internal_down: Vec<&'a InteractionEdge>,
    pub cross_talk: Vec<&'a InteractionEdge>,
}

impl<'a> InteractionPartition<'a> {
    /// Returns `None` when the catalog was built without interaction data.
    pub fn compute(catalog: &'a Catalog, input: &QueryInput) -> Option<InteractionPartition<'a>> {
        let edges = catalog.interaction_edges()?;
        let symbols_up = catalog.resolve_symbols(&input.up_regulated);
        let symbols_down = catalog.resolve_symbols(&input.down_regulated);

        let partition = InteractionPartition::partition(edges, &symbols_up, &symbols_down);
        debug!(
            symbols_up = symbols_up.len(),
            symbols_down = symbols_down.len(),
            internal_up = partition.internal_up.len(),
            internal_down = partition.internal_down.len(),
            cross_talk = partition.cross_talk.len(),
            "partitioned interactions"
        );
        Some(partition)
    }

    /// Splits `edges` by symbol membership, keeping the order of `edges`
    /// inside each bucket.
    ///
    /// Edges are stored in one orientation only, so cross-talk checks both
    /// `(up, down)` and `(down, up)`.
    pub fn partition(
        edges: &'a [InteractionEdge],
        symbols_up: &HashSet<&str>,
        symbols_down: &HashSet<&str>,
    ) -> InteractionPartition<'a> {
        let mut partition = InteractionPartition::default();

        for edge in edges {
            let a = edge.symbol_a.as_str();
            let b = edge.symbol_b.as_str();
            let a_up = symbols_up.contains(a);
            let b_up = symbols_up.contains(b);
            let a_down = symbols_down.contains(a);
            let b_down = symbols_down.contains(b);

            if a_up && b_up {
                partition.internal_up.push(edge);
            }
            if a_down && b_down {
                partition.internal_down.push(edge);
            }
            if (a_up && b_down) || (a_down && b_up) {
                partition.cross_talk.push(edge);
            }
        }

        partition
    }
}
