//! REST API for the packing service.
//!
//! Provides the single HTTP endpoint used to run a pack and its OpenAPI
//! documentation. Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::Json;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::collections::HashMap;
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::engine::{self, PackResult};
use crate::model::{CargoSpec, Container, Placement, Unplaced, ValidationError};
use crate::statistics::PackStats;

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>crate-packer API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request body for `POST /pack`.
///
/// `container_type` selects one of the three fixed presets (`40HC`, `40GP`,
/// `20GP`). `support_ratio` is a percentage in `[0, 100]`.
#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "container_type": "40HC",
        "support_ratio": 75.0,
        "enable_aggregation": true,
        "items": [
            {
                "name": "carton",
                "length": 60.0,
                "height": 40.0,
                "width": 40.0,
                "weight": 12.0,
                "quantity": 200,
                "stack_limit": 8,
                "allow_rotate": true
            }
        ]
    })
)]
pub struct PackRequest {
    #[serde(default = "default_container_type")]
    pub container_type: String,
    #[serde(default = "default_support_ratio")]
    pub support_ratio: f64,
    #[serde(default = "default_enable_aggregation")]
    pub enable_aggregation: bool,
    pub items: Vec<CargoSpec>,
}

fn default_container_type() -> String {
    "40HC".to_string()
}

fn default_support_ratio() -> f64 {
    75.0
}

fn default_enable_aggregation() -> bool {
    true
}

/// Response body for `POST /pack`.
#[derive(Serialize, ToSchema)]
pub struct PackResponse {
    pub container: Container,
    pub packed_items: Vec<PackedItem>,
    pub unplaced_items: Vec<UnplacedItem>,
    pub packed_summary: HashMap<String, u32>,
    pub unpacked_summary: HashMap<String, u32>,
    pub stats: PackStats,
}

/// One placed item in the response, shorn of internal bookkeeping fields.
#[derive(Serialize, ToSchema)]
pub struct PackedItem {
    pub name: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub is_agg: bool,
    pub agg_count: u32,
    pub stack_layer: u32,
    pub stack_limit: u32,
    pub orig_length: f64,
    pub orig_height: f64,
    pub orig_width: f64,
}

impl From<Placement> for PackedItem {
    fn from(p: Placement) -> Self {
        PackedItem {
            name: p.name,
            length: p.length,
            height: p.height,
            width: p.width,
            weight: p.weight,
            x: p.x,
            y: p.y,
            z: p.z,
            is_agg: p.is_agg,
            agg_count: p.agg_count,
            stack_layer: p.stack_layer,
            stack_limit: p.stack_limit,
            orig_length: p.orig_length,
            orig_height: p.orig_height,
            orig_width: p.orig_width,
        }
    }
}

/// One item that could not be placed in the response, with its reason.
#[derive(Serialize, ToSchema)]
pub struct UnplacedItem {
    pub name: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub weight: f64,
    pub agg_count: u32,
    pub reason_code: String,
    pub reason: String,
}

impl From<Unplaced> for UnplacedItem {
    fn from(u: Unplaced) -> Self {
        UnplacedItem {
            name: u.item.name,
            length: u.item.orig_length,
            height: u.item.orig_height,
            width: u.item.orig_width,
            weight: u.item.weight,
            agg_count: u.item.agg_count,
            reason_code: u.reason.code().to_string(),
            reason: u.reason.to_string(),
        }
    }
}

impl From<PackResult> for PackResponse {
    fn from(result: PackResult) -> Self {
        PackResponse {
            container: result.container,
            packed_items: result.placements.into_iter().map(PackedItem::from).collect(),
            unplaced_items: result.unplaced.into_iter().map(UnplacedItem::from).collect(),
            packed_summary: result.packed_summary,
            unpacked_summary: result.unpacked_summary,
            stats: result.stats,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

/// Cargo or request data failed validation: unknown container type, empty
/// item list, or a malformed `CargoSpec`. Always `422`, matching the
/// convention the service follows for every request-validation failure.
fn validation_error(details: impl Into<String>) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid input data", details)
}

fn container_config_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid container configuration",
        details,
    )
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid JSON data", err.to_string())
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack),
    components(schemas(
        PackRequest,
        PackResponse,
        PackedItem,
        UnplacedItem,
        ErrorResponse,
        CargoSpec,
        Container,
        PackStats
    ))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests. Blocks until the server is
/// terminated.
pub async fn start_api_server(config: ApiConfig) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/pack", post(handle_pack))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - POST /pack");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for `POST /pack`: packs the submitted cargo into the named
/// container and returns the placements and statistics.
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Successfully packed cargo", body = PackResponse),
        (status = 422, description = "Unknown container type, empty item list, or invalid cargo data", body = ErrorResponse)
    ),
    tag = "packing"
)]
async fn handle_pack(payload: Result<Json<PackRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(err) => return json_deserialize_error(err),
    };

    let container = match Container::preset(&request.container_type) {
        Some(container) => container,
        None => {
            return container_config_error(format!(
                "Unknown container type: {}",
                request.container_type
            ));
        }
    };

    if request.items.is_empty() {
        return validation_error("No items provided");
    }

    println!(
        "📥 New pack request: container={}, item groups={}",
        request.container_type,
        request.items.len()
    );

    match engine::pack(
        &request.items,
        container,
        request.support_ratio,
        request.enable_aggregation,
    ) {
        Ok(result) => {
            println!(
                "📦 Result: {} packed, {} unpacked",
                result.stats.packed_count, result.stats.unpacked_count
            );
            (StatusCode::OK, Json(PackResponse::from(result))).into_response()
        }
        Err(ValidationError::EmptyCargo) => validation_error("No items provided"),
        Err(ValidationError::InvalidDimension(msg)) => validation_error(msg),
        Err(ValidationError::InvalidWeight(msg)) => validation_error(msg),
        Err(ValidationError::InvalidQuantity(msg)) => validation_error(msg),
    }
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
