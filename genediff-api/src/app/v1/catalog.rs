use actix_web::{HttpResponse, web};
use serde::Serialize;

use genediff::CatalogStats;
use crate::app::{load_catalog, ApiError, AppData};

#[derive(Debug, Serialize)]
struct CatalogStatus {
    ready: bool,
    stats: Option<CatalogStats>,
}

pub async fn status(state: web::Data<AppData>) -> HttpResponse {
    let stats = state.snapshot().ok().map(|catalog| catalog.stats());
    HttpResponse::Ok().json(CatalogStatus { ready: stats.is_some(), stats })
}

/// Loads the reference tables again and swaps in the new catalog. Requests
/// already running finish against the snapshot they started with.
pub async fn reload(state: web::Data<AppData>) -> Result<HttpResponse, ApiError> {
    let stats = load_catalog(state).await?;
    Ok(HttpResponse::Ok().json(CatalogStatus { ready: true, stats: Some(stats) }))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{json, Value};

    use crate::app::{routes, AppData, DEFAULT_PAYLOAD_LIMIT};
    use crate::app::test_support::fixture;

    #[actix_web::test]
    async fn test_status_before_load() {
        let fixture = fixture();
        let data = web::Data::new(AppData::new(fixture.sources.clone()));
        let app = test::init_service(App::new().app_data(data).configure(routes(DEFAULT_PAYLOAD_LIMIT))).await;

        let req = test::TestRequest::get().uri("/api/v1/catalog").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"ready": false, "stats": null}));
    }

    #[actix_web::test]
    async fn test_reload_publishes_catalog() {
        let fixture = fixture();
        let data = web::Data::new(AppData::new(fixture.sources.clone()));
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes(DEFAULT_PAYLOAD_LIMIT))).await;

        let req = test::TestRequest::post().uri("/api/v1/catalog/reload").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["stats"]["genes"], 3);
        assert_eq!(body["stats"]["annotations"], 5);
        assert_eq!(body["stats"]["terms"], 3);
        assert_eq!(body["stats"]["interactions"], 3);

        let req = test::TestRequest::post()
            .uri("/api/v1/compare")
            .set_json(json!({"up_regulated": ["G1"], "down_regulated": ["G2"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_failed_reload_keeps_previous_catalog() {
        let fixture = fixture();
        let data = web::Data::new(AppData::new(fixture.sources.clone()));
        data.reload().unwrap();
        let before = data.snapshot().unwrap();

        fs::write(&fixture.sources.genes, "ensembl_gene_id\thgnc_symbol\nG1\tSYM1\n").unwrap();

        let app = test::init_service(App::new().app_data(data.clone()).configure(routes(DEFAULT_PAYLOAD_LIMIT))).await;
        let req = test::TestRequest::post().uri("/api/v1/catalog/reload").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("gene_symbol"));

        let after = data.snapshot().unwrap();
        assert!(std::sync::Arc::ptr_eq(&before, &after));
    }
}
