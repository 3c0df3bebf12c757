use crate::handle::IndexHandle;
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Deserialize)]
struct RecommendationRequest {
    #[serde(alias = "song")]
    query: String,
}

#[derive(Serialize)]
struct HealthInfo {
    title: &'static str,
    version: &'static str,
    items: usize,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(handle: Arc<IndexHandle>, host: &str, port: u16) -> std::io::Result<()> {
        let handle = web::Data::from(handle);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(handle.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register all routes. The app must provide `web::Data<IndexHandle>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string()
        }));
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/recommendation", web::post().to(recommend))
        .route("/admin/reload", web::post().to(reload));
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the recommendation API!"
    })))
}

async fn health(handle: web::Data<IndexHandle>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthInfo {
        title: "likewise",
        version: env!("CARGO_PKG_VERSION"),
        items: handle.snapshot().len(),
    }))
}

async fn recommend(
    handle: web::Data<IndexHandle>,
    req: web::Json<RecommendationRequest>,
) -> ActixResult<HttpResponse> {
    let query = req.into_inner().query;
    let index = handle.snapshot();

    let result = web::block(move || index.recommend(&query)).await?;
    if !result.is_found() {
        debug!("Recommendation query did not match any item");
    }
    Ok(HttpResponse::Ok().json(result))
}

async fn reload(handle: web::Data<IndexHandle>) -> ActixResult<HttpResponse> {
    let handle = handle.into_inner();
    let outcome = web::block(move || handle.reload()).await?;

    match outcome {
        Ok(Some(items)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": true,
            "items": items
        }))),
        Ok(None) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No catalog source configured"
        }))),
        Err(e) => {
            error!("Reload failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use likewise_core::{Catalog, CatalogItem, RecommendationIndex, RecommenderConfig};

    fn beatles_handle() -> web::Data<IndexHandle> {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Yesterday", "The Beatles", "yesterday all my troubles seemed so far away", "link1"),
            CatalogItem::new("Let It Be", "The Beatles", "when I find myself in times of trouble", "link2"),
            CatalogItem::new("Help", "The Beatles", "help I need somebody", "link3"),
        ]);
        let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
        web::Data::new(IndexHandle::new(index))
    }

    #[actix_web::test]
    async fn test_root_and_health() {
        let app = test::init_service(App::new().app_data(beatles_handle()).configure(configure)).await;

        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp["message"], "Welcome to the recommendation API!");

        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp["items"], 3);
        assert_eq!(resp["title"], "likewise");
    }

    #[actix_web::test]
    async fn test_recommendation_found() {
        let app = test::init_service(App::new().app_data(beatles_handle()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_json(serde_json::json!({"query": "yesterday"}))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["matched_name"], "Yesterday");
        let recs = resp["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r["name"] != "Yesterday"));
        assert_eq!(recs[0].as_object().unwrap().len(), 2);
        assert!(recs[0]["payload"].is_string());
    }

    #[actix_web::test]
    async fn test_song_alias_and_not_found() {
        let app = test::init_service(App::new().app_data(beatles_handle()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_json(serde_json::json!({"song": "zzzxyqq_not_a_song"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"error": "not found"}));
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test::init_service(App::new().app_data(beatles_handle()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_json(serde_json::json!({"query": 42}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_reload_without_source() {
        let app = test::init_service(App::new().app_data(beatles_handle()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/admin/reload").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
