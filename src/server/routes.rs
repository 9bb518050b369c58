//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::analysis::service::{AnalysisRequest, AnalysisResponse};
use crate::coord::NamedLocation;
use crate::error::Error;
use crate::geo::lookup;
use crate::server::state::AppState;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/geocode", get(geocode_handler))
        .route("/api/status", get(status_handler))
        .fallback_service(ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Static files live in `static/` next to the working directory or the binary
fn static_dir() -> String {
    if std::path::Path::new("static").exists() {
        return "static".to_string();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|| "static".to_string())
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        ApiError {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Analyze a location
///
/// POST /api/analyze
///
/// Every outcome uses the analysis response shape: 400 for a bad request,
/// 500 for anything that went wrong further down.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> (StatusCode, Json<AnalysisResponse>) {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());

    async move {
        let outcome = match payload {
            Ok(Json(request)) => state.analysis.analyze_request(&request).await,
            Err(rejection) => Err(Error::InvalidRequest(rejection.body_text())),
        };

        match outcome {
            Ok(result) => (StatusCode::OK, Json(AnalysisResponse::from(result))),
            Err(e) => {
                warn!("Analysis request failed: {}", e);
                let status = if e.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, Json(AnalysisResponse::failure(&e)))
            }
        }
    }
    .instrument(span)
    .await
}

/// Geocode query parameters
#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    pub q: Option<String>,
}

/// Look up a place name
///
/// GET /api/geocode?q=...
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<NamedLocation>, (StatusCode, Json<ApiError>)> {
    let query = params.q.unwrap_or_default();

    lookup(&state.geocoder, &query).await.map(Json).map_err(|e| {
        let status = match &e {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        if status == StatusCode::BAD_GATEWAY {
            warn!("Geocoding '{}' failed: {}", query, e);
        }
        (status, Json(ApiError::from(&e)))
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Whether a Gemini key was found at startup
    pub ai_configured: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_configured: state.analysis.is_configured(),
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisService, CoordinateCheck};
    use crate::config::Config;
    use crate::geo::nominatim::NominatimBackend;
    use crate::retry::RetryPolicy;
    use crate::test_support::{spawn_nominatim, zeroed_suggestion_reply, CannedGenerator};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    fn geocoder(base_url: &str) -> NominatimBackend {
        let policy = RetryPolicy::new(Duration::from_secs(5), 0, Duration::ZERO);
        NominatimBackend::new(base_url, "loc-explore-tests", policy).unwrap()
    }

    fn create_test_state(geocoder_url: &str, analysis: AnalysisService) -> Arc<AppState> {
        Arc::new(AppState::with_parts(Config::default(), geocoder(geocoder_url), analysis))
    }

    fn canned(reply: &str) -> AnalysisService {
        AnalysisService::new(Arc::new(CannedGenerator::new(reply)), CoordinateCheck::Falsy)
    }

    fn analyze_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn full_request() -> String {
        serde_json::json!({
            "location": {"lat": 43.725092, "lng": -79.402195},
            "locationName": "Yonge & Lawrence",
            "analysisType": "tourism"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned(&zeroed_suggestion_reply())));

        let response = app.oneshot(analyze_request(full_request())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["analysis"], "A lively neighbourhood with plenty to see.");
        assert_eq!(json["suggestedLocations"][0]["name"], "Lawrence Park");
        assert_eq!(json["suggestedLocations"][0]["attractionType"], "Park");
        let lat = json["suggestedLocations"][0]["lat"].as_f64().unwrap();
        assert!((lat - 43.727092).abs() < 1e-9);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_analyze_missing_location() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned(&zeroed_suggestion_reply())));

        let body = serde_json::json!({
            "locationName": "Yonge & Lawrence",
            "analysisType": "tourism"
        });
        let response = app.oneshot(analyze_request(body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = read_json(response).await;
        assert_eq!(json["suggestedLocations"], serde_json::json!([]));
        assert_eq!(json["analysis"], "");
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_unreadable_body() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned(&zeroed_suggestion_reply())));

        let response = app.oneshot(analyze_request("{not json".to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = read_json(response).await;
        assert_eq!(json["suggestedLocations"], serde_json::json!([]));
        assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_analyze_malformed_model_reply() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned("I'd rather not.")));

        let response = app.oneshot(analyze_request(full_request())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = read_json(response).await;
        assert_eq!(json["suggestedLocations"], serde_json::json!([]));
        assert!(json["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_analyze_without_api_key() {
        let state = create_test_state("http://127.0.0.1:9", AnalysisService::unconfigured(CoordinateCheck::Falsy));
        let app = create_router(state);

        let response = app.oneshot(analyze_request(full_request())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = read_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_geocode_endpoint() {
        let base = spawn_nominatim().await;
        let app = create_router(create_test_state(&base, canned("")));

        let response = app
            .oneshot(Request::builder().uri("/api/geocode?q=Toronto").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let location: NamedLocation = serde_json::from_slice(&body).unwrap();
        assert!(location.display_name.starts_with("Toronto"));
        assert!((location.lat - 43.6534817).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geocode_not_found() {
        let base = spawn_nominatim().await;
        let app = create_router(create_test_state(&base, canned("")));

        let response = app
            .oneshot(Request::builder().uri("/api/geocode?q=Atlantis").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_geocode_blank_query() {
        let base = spawn_nominatim().await;
        let app = create_router(create_test_state(&base, canned("")));

        let response = app
            .oneshot(Request::builder().uri("/api/geocode?q=%20").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_geocode_upstream_down() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned("")));

        let response = app
            .oneshot(Request::builder().uri("/api/geocode?q=Toronto").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "NETWORK_ERROR");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state("http://127.0.0.1:9", canned("")));

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();

        assert!(status.running);
        assert!(status.ai_configured);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }
}
