use std::io::Cursor;

use crate::{AnnotationEdge, AnnotationTerm, Catalog, GeneRecord, InteractionEdge};

pub const GENES: &str = "ensembl_gene_id\tgene_symbol
G1\tSYM1
G2\tSYM2
G3\tSYM3
G4\t
g5\tsym1
";

// GO:0000004 has no dictionary entry, G9 has no gene row.
pub const ANNOTATIONS: &str = "ensembl_gene_id\tgo_id
G1\tGO:0000001
G1\tGO:0000003
G2\tGO:0000002
G2\tGO:0000003
G3\tGO:0000004
G4\tGO:0000001
G9\tGO:0000005
G1\tGO:0000001
";

pub const TERMS: &str = "GO_ID\tGO_Term
GO:0000005\tterm five
GO:0000003\tterm three
GO:0000002\tterm two
GO:0000001\tterm one
";

pub const INTERACTIONS: &str = "Official Symbol Interactor A\tOfficial Symbol Interactor B
SYM1\tSYM2
SYM2\tSYM1
SYM1\tSYM1
SYM2\tSYM3
SYM3\tSYM9
SYM1\tSYM3
";

pub fn catalog_from_tables(interactions: Option<&str>) -> Catalog {
    let genes = GeneRecord::parse_from(Cursor::new(GENES)).unwrap();
    let annotations = AnnotationEdge::parse_from(Cursor::new(ANNOTATIONS)).unwrap();
    let terms = AnnotationTerm::parse_from(Cursor::new(TERMS)).unwrap();
    let interactions = interactions
        .map(|table| InteractionEdge::parse_from(Cursor::new(table), None).unwrap());
    Catalog::new(genes, annotations, terms, interactions)
}

lazy_static! {
    pub static ref CATALOG: Catalog = catalog_from_tables(Some(INTERACTIONS));
}
