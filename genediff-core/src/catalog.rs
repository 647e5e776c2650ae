use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LoadError, Table};
use crate::models::{AnnotationEdge, AnnotationTerm, GeneRecord, InteractionEdge};
use crate::normalize::canonical;

#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct GeneKey(usize);

#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct TermKey(usize);

pub type GeneIndex = HashMap<String, GeneKey>;
pub type TermIndex = HashMap<String, TermKey>;
pub type AnnoIndex = HashMap<String, HashSet<String>>;

/// Where to find the reference tables of a catalog.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CatalogSources {
    pub genes: PathBuf,
    pub annotations: PathBuf,
    /// Either a `GO_ID`/`GO_Term` table or an `.obo` file.
    pub terms: PathBuf,
    pub interactions: Option<PathBuf>,
    /// Only keep interactions of this experimental system type, e.g. "physical".
    pub system_type: Option<String>,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct CatalogStats {
    pub genes: usize,
    pub annotations: usize,
    pub terms: usize,
    pub interactions: Option<usize>,
}

/// An immutable snapshot of the reference tables.
///
/// All identifier and symbol keys are canonical, so every lookup below is an
/// exact string match against normalized input. Lookups never fail: unknown
/// identifiers and terms simply contribute nothing.
#[derive(Debug)]
pub struct Catalog {
    genes: Vec<GeneRecord>,
    terms: Vec<AnnotationTerm>,
    interactions: Option<Vec<InteractionEdge>>,
    gene_index: GeneIndex,
    term_index: TermIndex,
    anno_index: AnnoIndex,
    annotation_count: usize,
}

impl Catalog {
    pub fn new(
        genes: Vec<GeneRecord>,
        annotations: Vec<AnnotationEdge>,
        terms: Vec<AnnotationTerm>,
        interactions: Option<Vec<InteractionEdge>>,
    ) -> Catalog {
        let mut gene_index: GeneIndex = HashMap::with_capacity(genes.len());
        let mut kept_genes = Vec::with_capacity(genes.len());
        let mut duplicate_genes = 0usize;

        // Each id maps to at most one symbol, the first row wins.
        for gene in genes {
            let gene_id = match canonical(&gene.gene_id) {
                Some(gene_id) => gene_id,
                None => continue,
            };
            match gene_index.entry(gene_id) {
                Entry::Occupied(_) => duplicate_genes += 1,
                Entry::Vacant(entry) => {
                    let record = GeneRecord {
                        gene_id: entry.key().clone(),
                        symbol: canonical(&gene.symbol).unwrap_or_default(),
                        entrez_id: gene.entrez_id,
                    };
                    entry.insert(GeneKey(kept_genes.len()));
                    kept_genes.push(record);
                }
            }
        }

        // Annotations are indexed independently of the gene table, an edge
        // for an id without a gene row still counts.
        let mut anno_index: AnnoIndex = HashMap::new();
        let mut annotation_count = 0usize;
        for edge in annotations {
            let gene_id = match canonical(&edge.gene_id) {
                Some(gene_id) => gene_id,
                None => continue,
            };
            let term_id = edge.term_id.trim();
            if term_id.is_empty() { continue; }

            let inserted = anno_index
                .entry(gene_id)
                .or_insert_with(HashSet::new)
                .insert(term_id.to_string());
            if inserted { annotation_count += 1; }
        }

        let mut term_index: TermIndex = HashMap::with_capacity(terms.len());
        let mut kept_terms = Vec::with_capacity(terms.len());
        for term in terms {
            let term_id = term.term_id.trim();
            if term_id.is_empty() || term_index.contains_key(term_id) { continue; }
            term_index.insert(term_id.to_string(), TermKey(kept_terms.len()));
            kept_terms.push(AnnotationTerm {
                term_id: term_id.to_string(),
                label: term.label,
            });
        }

        let interactions = interactions.map(|edges| {
            edges.into_iter()
                .filter_map(|edge| {
                    let symbol_a = canonical(&edge.symbol_a)?;
                    let symbol_b = canonical(&edge.symbol_b)?;
                    Some(InteractionEdge { symbol_a, symbol_b })
                })
                .collect::<Vec<_>>()
        });

        if duplicate_genes > 0 {
            debug!(duplicate_genes, "ignored repeated gene ids");
        }

        Catalog {
            genes: kept_genes,
            terms: kept_terms,
            interactions,
            gene_index,
            term_index,
            anno_index,
            annotation_count,
        }
    }

    /// Reads every reference table and builds a catalog out of them.
    ///
    /// Nothing is returned unless every table loads successfully.
    pub fn load(sources: &CatalogSources) -> Result<Catalog, LoadError> {
        let genes = GeneRecord::parse_from(open(Table::Genes, &sources.genes)?)?;
        info!(rows = genes.len(), path = ?sources.genes, "read gene table");

        let annotations = AnnotationEdge::parse_from(open(Table::Annotations, &sources.annotations)?)?;
        info!(rows = annotations.len(), path = ?sources.annotations, "read annotation table");

        let terms_file = open(Table::Terms, &sources.terms)?;
        let terms = if is_obo(&sources.terms) {
            AnnotationTerm::parse_obo(BufReader::new(terms_file))?
        } else {
            AnnotationTerm::parse_from(terms_file)?
        };
        info!(rows = terms.len(), path = ?sources.terms, "read term dictionary");

        let interactions = match &sources.interactions {
            Some(path) => {
                let file = open(Table::Interactions, path)?;
                let edges = InteractionEdge::parse_from(file, sources.system_type.as_deref())?;
                info!(rows = edges.len(), path = ?path, "read interaction table");
                Some(edges)
            }
            None => None,
        };

        let catalog = Catalog::new(genes, annotations, terms, interactions);
        let stats = catalog.stats();
        info!(
            genes = stats.genes,
            annotations = stats.annotations,
            terms = stats.terms,
            interactions = ?stats.interactions,
            "catalog ready"
        );
        Ok(catalog)
    }

    /// Returns the submitted identifiers that are known genes.
    pub fn resolve_mapped_ids<'q>(&self, ids: &'q HashSet<String>) -> HashSet<&'q str> {
        ids.iter()
            .filter(|id| self.gene_index.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Returns the symbols of the given genes. Unknown genes and genes
    /// without a symbol contribute nothing.
    pub fn resolve_symbols(&self, ids: &HashSet<String>) -> HashSet<&str> {
        ids.iter()
            .filter_map(|id| self.get_gene(id))
            .filter(|gene| gene.has_symbol())
            .map(|gene| gene.symbol.as_str())
            .collect()
    }

    /// Returns every term annotated to at least one of the given genes.
    pub fn annotations_for(&self, ids: &HashSet<String>) -> HashSet<&str> {
        ids.iter()
            .filter_map(|id| self.anno_index.get(id))
            .flat_map(|terms| terms.iter().map(String::as_str))
            .collect()
    }

    /// Looks up dictionary entries for the given term ids.
    ///
    /// Ids missing from the dictionary are left out. Entries come back in
    /// dictionary order so repeated lookups give identical sequences.
    pub fn labels_for<I, S>(&self, term_ids: I) -> Vec<&AnnotationTerm>
        where I: IntoIterator<Item=S>,
              S: AsRef<str>,
    {
        term_ids.into_iter()
            .filter_map(|id| self.term_index.get(id.as_ref()).copied())
            .sorted_unstable()
            .dedup()
            .filter_map(|key: TermKey| self.terms.get(key.0))
            .collect()
    }

    /// All interaction edges in table order, or `None` if the catalog was
    /// built without an interaction table.
    pub fn interaction_edges(&self) -> Option<&[InteractionEdge]> {
        self.interactions.as_deref()
    }

    pub fn get_gene(&self, gene_id: &str) -> Option<&GeneRecord> {
        self.gene_index.get(gene_id).and_then(|key| self.genes.get(key.0))
    }

    pub fn get_term(&self, term_id: &str) -> Option<&AnnotationTerm> {
        self.term_index.get(term_id).and_then(|key| self.terms.get(key.0))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            genes: self.genes.len(),
            annotations: self.annotation_count,
            terms: self.terms.len(),
            interactions: self.interactions.as_ref().map(Vec::len),
        }
    }
}

fn open(table: Table, path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })
}

fn is_obo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("obo"))
        .unwrap_or(false)
}
