use serde::{Deserialize, Serialize};

/// A row of the gene table.
///
/// `gene_id` and `symbol` are canonical (trimmed, uppercase). A gene with no
/// known symbol carries an empty `symbol`.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct GeneRecord {
    pub gene_id: String,
    pub symbol: String,
    pub entrez_id: Option<u32>,
}

impl GeneRecord {
    #[inline(always)]
    pub fn has_symbol(&self) -> bool {
        !self.symbol.is_empty()
    }
}

/// Association of a gene with one annotation term.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct AnnotationEdge {
    pub gene_id: String,
    pub term_id: String,
}

/// An entry of the term dictionary, e.g. a GO term and its name.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnnotationTerm {
    #[serde(rename = "id")]
    pub term_id: String,
    #[serde(rename = "term")]
    pub label: String,
}

/// A physical interaction between two gene products, identified by symbol.
///
/// The orientation is the one found in the source table. `(A, B)` and
/// `(B, A)` are different rows and are never merged.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct InteractionEdge {
    pub symbol_a: String,
    pub symbol_b: String,
}

impl InteractionEdge {
    pub fn new<A: Into<String>, B: Into<String>>(symbol_a: A, symbol_b: B) -> InteractionEdge {
        InteractionEdge { symbol_a: symbol_a.into(), symbol_b: symbol_b.into() }
    }
}
