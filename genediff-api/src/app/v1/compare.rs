use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use genediff::{QueryInput, ReportExporter};
use crate::app::{ApiError, AppData};

#[derive(Debug, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "tsv")]
    Tsv,
}

impl Default for Format {
    fn default() -> Self {
        Format::Json
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    format: Format,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneLists {
    up_regulated: Vec<String>,
    down_regulated: Vec<String>,
}

pub async fn compare(
    state: web::Data<AppData>,
    query: web::Query<CompareQuery>,
    json: web::Json<GeneLists>,
) -> Result<HttpResponse, ApiError> {
    let lists = json.into_inner();
    let input = QueryInput::new(&lists.up_regulated, &lists.down_regulated);
    input.validate()?;

    let catalog = state.snapshot()?;
    let report = input.execute(&catalog);
    debug!(
        up_regulated = input.up_regulated.len(),
        down_regulated = input.down_regulated.len(),
        "compared gene lists"
    );

    match query.into_inner().format {
        Format::Json => Ok(HttpResponse::Ok().json(&report)),
        Format::Tsv => {
            let stream = ReportExporter::new(&report).into_stream();
            Ok(HttpResponse::Ok()
                .content_type("text/tab-separated-values; charset=utf-8")
                .streaming(stream))
        }
    }
}
