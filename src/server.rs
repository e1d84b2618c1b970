use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::api::types::{AnalyzeRequest, ErrorBody, ListQuery};
use crate::api::analyze;
use crate::config::{ServerConfig, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::error::{AnalyzeError, StoreError};
use crate::providers::PageFetcher;
use crate::store::{ReportStore, StoredReport};

pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub fetcher: Arc<dyn PageFetcher>,
}

/// Everything a handler can fail with, mapped onto a status code and a
/// JSON `ErrorBody`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Analyze(AnalyzeError),
    Store(StoreError),
    NotFound,
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        ApiError::Analyze(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: message.clone(),
                    kind: Some("validation".to_string()),
                },
            ),
            ApiError::Analyze(err @ AnalyzeError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, ErrorBody::from(err))
            }
            ApiError::Analyze(err @ AnalyzeError::Fetch(_)) => {
                (StatusCode::BAD_GATEWAY, ErrorBody::from(err))
            }
            ApiError::Store(err) => {
                error!(error = %err, "report store failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new("Internal server error"))
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::new("Report not found")),
        };

        (status, Json(body)).into_response()
    }
}

pub async fn create_report_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<StoredReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected request body");
        ApiError::BadRequest(rejection.body_text())
    })?;
    info!(url = %request.url, "received analysis request");

    let report = analyze(&request.url, state.fetcher.as_ref()).await?;
    let stored = state.store.create(report).await?;

    Ok(Json(stored))
}

pub async fn list_reports_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StoredReport>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    Ok(Json(state.store.list(limit).await?))
}

pub async fn get_report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredReport>, ApiError> {
    let id: u64 = id.parse().map_err(|_| ApiError::NotFound)?;
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/reports", get(list_reports_handler).post(create_report_handler))
        .route("/api/reports/:id", get(get_report_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ReportStore>,
) -> std::io::Result<()> {
    let state = Arc::new(AppState { store, fetcher });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::providers::mocks::MockFetcher;
    use crate::store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app(fetcher: MockFetcher) -> (Router, Arc<MockFetcher>) {
        let fetcher = Arc::new(fetcher);
        let state = Arc::new(AppState {
            store: Arc::new(MemoryStore::new()),
            fetcher: fetcher.clone(),
        });
        (router(state), fetcher)
    }

    fn post_report(url: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/reports")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "url": url }).to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_fetch_report() {
        let (app, _) = test_app(MockFetcher::new("test").with_html(
            "https://example.com/",
            "<title>Example</title>",
            &[],
            100,
        ));

        let response = app.clone().oneshot(post_report("https://example.com/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        assert_eq!(created["url"], "https://example.com/");
        assert_eq!(created["id"], 1);
        assert!(created["createdAt"].is_string());
        assert!(created["details"]["social"]["checks"].is_array());

        let response = app.clone().oneshot(get_request("/api/reports/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);

        let response = app.oneshot(get_request("/api/reports?limit=5")).await.unwrap();
        let listed = json_body(response).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_validation_error_is_400_without_fetch() {
        let (app, fetcher) = test_app(MockFetcher::new("test"));

        let response = app.oneshot(post_report("http://localhost:3000/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "validation");
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_error_is_502() {
        let (app, _) = test_app(
            MockFetcher::new("test")
                .with_error("https://slow.test/", FetchError::Timeout(Duration::from_secs(15))),
        );

        let response = app.oneshot(post_report("https://slow.test/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "fetch");
        assert!(body["message"].as_str().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (app, _) = test_app(MockFetcher::new("test"));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/reports")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"address": "nope"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_report_is_404() {
        let (app, _) = test_app(MockFetcher::new("test"));

        for uri in ["/api/reports/42", "/api/reports/not-a-number"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(json_body(response).await["message"], "Report not found");
        }
    }
}
