use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use serde_json::Value;
use starsift_core::{search_json, similarity_values, CatalogFormat, Error, Rgb, SearchCriteria};
use tracing::{debug, info};

/// Largest accepted request body; catalogs are uploaded whole
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Deserialize)]
struct SearchRequest {
    catalog: Value,
    #[serde(default)]
    criteria: SearchCriteria,
    top_k_per_group: Option<usize>,
    #[serde(default)]
    format: CatalogFormat,
}

#[derive(Deserialize)]
struct SimilarityRequest {
    a: Value,
    b: Value,
}

#[derive(Deserialize)]
struct MeanColorRequest {
    pixels: Vec<[u8; 3]>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(port: u16) -> std::io::Result<()> {
        info!("REST API listening on 0.0.0.0:{}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new().wrap(cors).configure(Self::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register every route; no state is shared between requests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().limit(MAX_BODY_BYTES))
            .route("/", web::get().to(health))
            .route("/search", web::post().to(search))
            .route("/colors/similarity", web::post().to(color_similarity))
            .route("/colors/mean", web::post().to(mean_color));
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "name": "starsift",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn search(req: web::Json<SearchRequest>) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    if let Err(e) = req.criteria.validate() {
        return Ok(bad_request(&e));
    }

    match search_json(&req.catalog, req.format, &req.criteria, req.top_k_per_group) {
        Ok(results) => {
            debug!(
                groups = results.len(),
                matches = results.total_matches(),
                "search request served"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "result": {
                    "total": results.total_matches(),
                    "groups": results,
                }
            })))
        }
        Err(e) => Ok(bad_request(&e)),
    }
}

async fn color_similarity(req: web::Json<SimilarityRequest>) -> ActixResult<HttpResponse> {
    let similarity = similarity_values(&req.a, &req.b);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": { "similarity": similarity }
    })))
}

async fn mean_color(req: web::Json<MeanColorRequest>) -> ActixResult<HttpResponse> {
    match Rgb::mean(&req.pixels) {
        Some(color) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": {
                "color": color,
                "hex": color.to_hex(),
            }
        }))),
        None => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "'pixels' must not be empty"
        }))),
    }
}

fn bad_request(e: &Error) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string()
    }))
}
