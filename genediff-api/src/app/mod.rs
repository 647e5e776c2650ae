use std::env::VarError;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpResponse, HttpServer, web};
use arc_swap::ArcSwapOption;
use genediff::{Catalog, CatalogSources, CatalogStats, LoadError};
use thiserror::Error;
use tracing::{error, info};

pub mod error;
pub mod v1;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
/// Request bodies up to 64 MiB, enough for two whole-genome gene lists.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
    #[error("environment variable {0} is not a valid number of bytes")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub genes_file: String,
    pub annotations_file: String,
    pub terms_file: String,
    pub interactions_file: Option<String>,
    pub interaction_system_type: Option<String>,
    pub bind_address: String,
    pub max_payload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
        where F: Fn(&str) -> Result<String, VarError>
    {
        let optional = |key: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                Ok(value) if !value.trim().is_empty() => Ok(Some(value.trim().to_string())),
                Ok(_) | Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
            }
        };
        let required = |key: &'static str| -> Result<String, ConfigError> {
            optional(key)?.ok_or(ConfigError::Missing(key))
        };

        Ok(Config {
            genes_file: required("GENES_FILE")?,
            annotations_file: required("ANNOTATIONS_FILE")?,
            terms_file: required("TERMS_FILE")?,
            interactions_file: optional("INTERACTIONS_FILE")?,
            interaction_system_type: optional("INTERACTION_SYSTEM_TYPE")?,
            bind_address: optional("BIND_ADDRESS")?
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            max_payload_bytes: match optional("MAX_PAYLOAD_BYTES")? {
                Some(value) => value.parse::<usize>().map_err(|_| ConfigError::Invalid("MAX_PAYLOAD_BYTES"))?,
                None => DEFAULT_PAYLOAD_LIMIT,
            },
        })
    }

    pub fn sources(&self) -> CatalogSources {
        CatalogSources {
            genes: PathBuf::from(&self.genes_file),
            annotations: PathBuf::from(&self.annotations_file),
            terms: PathBuf::from(&self.terms_file),
            interactions: self.interactions_file.as_ref().map(PathBuf::from),
            system_type: self.interaction_system_type.clone(),
        }
    }
}

/// Shared server state.
///
/// The catalog is published as a whole through an atomic pointer swap.
/// Requests hold on to the snapshot they started with, and a reload never
/// changes a catalog that is already visible.
pub struct AppData {
    pub sources: CatalogSources,
    catalog: ArcSwapOption<Catalog>,
}

impl AppData {
    pub fn new(sources: CatalogSources) -> AppData {
        AppData { sources, catalog: ArcSwapOption::empty() }
    }

    /// The current catalog, or `Unavailable` while the first load is running.
    pub fn snapshot(&self) -> Result<Arc<Catalog>, ApiError> {
        self.catalog.load_full().ok_or(ApiError::Unavailable)
    }

    pub fn publish(&self, catalog: Catalog) {
        self.catalog.store(Some(Arc::new(catalog)));
    }

    /// Loads a new catalog from `sources` and publishes it. On failure the
    /// previously published catalog, if any, stays in place.
    pub fn reload(&self) -> Result<CatalogStats, LoadError> {
        let catalog = Catalog::load(&self.sources)?;
        let stats = catalog.stats();
        self.publish(catalog);
        Ok(stats)
    }
}

/// Runs `AppData::reload` on the blocking thread pool.
pub async fn load_catalog(data: web::Data<AppData>) -> Result<CatalogStats, ApiError> {
    let result = web::block(move || data.reload())
        .await
        .map_err(|_| ApiError::Blocking)?;

    match result {
        Ok(stats) => {
            info!(genes = stats.genes, terms = stats.terms, "published catalog snapshot");
            Ok(stats)
        }
        Err(e) => {
            error!(error = %e, "failed to load catalog");
            Err(ApiError::Load(e))
        }
    }
}

pub fn server(data: web::Data<AppData>, bind_address: &str, payload_limit: usize) -> std::io::Result<Server> {
    let server = HttpServer::new(move || App::new()
        .app_data(data.clone())
        .configure(routes(payload_limit)))
        .bind(bind_address)?
        .run();
    Ok(server)
}

/// Registers every route. JSON bodies are accepted up to `payload_limit` bytes.
pub fn routes(payload_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |app: &mut web::ServiceConfig| {
        app.app_data(json_config(payload_limit))
            .app_data(query_config())
            .service(v1::routes(web::scope("/api/v1")))
            .service(web::resource("/compare")
                .route(web::post().to(v1::compare::compare)));
    }
}

// Malformed bodies and query strings get the same JSON error shape as the
// rest of the API.

fn json_config(payload_limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(payload_limit)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(error::ErrorBody {
                error: err.to_string(),
            });
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(error::ErrorBody {
            error: err.to_string(),
        });
        actix_web::error::InternalError::from_response(err, response).into()
    })
}
