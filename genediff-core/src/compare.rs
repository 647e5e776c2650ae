use std::collections::HashSet;
use tracing::debug;

use crate::{AnnotationTerm, Catalog};
use crate::error::InputError;
use crate::normalize::normalize;

/// The two canonical gene sets submitted for one comparison.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct QueryInput {
    pub up_regulated: HashSet<String>,
    pub down_regulated: HashSet<String>,
}

impl QueryInput {
    pub fn new<I, J, S, T>(up_regulated: I, down_regulated: J) -> QueryInput
        where I: IntoIterator<Item=S>,
              J: IntoIterator<Item=T>,
              S: AsRef<str>,
              T: AsRef<str>,
    {
        QueryInput {
            up_regulated: normalize(up_regulated),
            down_regulated: normalize(down_regulated),
        }
    }

    /// A request with nothing left in either list after normalization is
    /// rejected before any comparison runs.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.up_regulated.is_empty() && self.down_regulated.is_empty() {
            return Err(InputError::BothEmpty);
        }
        Ok(())
    }

    pub fn swapped(&self) -> QueryInput {
        QueryInput {
            up_regulated: self.down_regulated.clone(),
            down_regulated: self.up_regulated.clone(),
        }
    }
}

/// A three-way split of annotation terms between the two gene sets.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TermPartition<T> {
    pub unique_up: T,
    pub unique_down: T,
    pub shared: T,
}

/// Mapped counts and annotation-term differences of two gene sets.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SetComparison<'a> {
    pub mapped_up: usize,
    pub mapped_down: usize,
    pub terms: TermPartition<HashSet<&'a str>>,
    /// Dictionary entries for `terms`. Terms without an entry are missing
    /// here, so each list may be shorter than the matching id set.
    pub labels: TermPartition<Vec<&'a AnnotationTerm>>,
}

impl<'a> SetComparison<'a> {
    pub fn compute(catalog: &'a Catalog, input: &QueryInput) -> SetComparison<'a> {
        let mapped_up = catalog.resolve_mapped_ids(&input.up_regulated).len();
        let mapped_down = catalog.resolve_mapped_ids(&input.down_regulated).len();

        // Unknown ids have no annotation edges, so there is no need to
        // restrict these lookups to the mapped subsets.
        let terms_up = catalog.annotations_for(&input.up_regulated);
        let terms_down = catalog.annotations_for(&input.down_regulated);

        let terms: TermPartition<HashSet<&'a str>> = TermPartition {
            unique_up: terms_up.difference(&terms_down).copied().collect(),
            unique_down: terms_down.difference(&terms_up).copied().collect(),
            shared: terms_up.intersection(&terms_down).copied().collect(),
        };

        let labels = TermPartition {
            unique_up: catalog.labels_for(&terms.unique_up),
            unique_down: catalog.labels_for(&terms.unique_down),
            shared: catalog.labels_for(&terms.shared),
        };

        debug!(
            mapped_up,
            mapped_down,
            unique_up = terms.unique_up.len(),
            unique_down = terms.unique_down.len(),
            shared = terms.shared.len(),
            "compared annotation terms"
        );

        SetComparison { mapped_up, mapped_down, terms, labels }
    }
}
