//! HTTP query API over the built corpus index.
//!
//! Two endpoints: `GET /single/{hash}` for one verdict and `POST /bulk`
//! for a `#`-joined batch. Both run against the same immutable index
//! handle, so any number of requests can be answered concurrently.

use std::sync::Arc;

use axum::extract::{Form, Path as UrlPath, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::index::CorpusIndex;
use crate::report::LookupResult;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct ApiState {
    /// The fully built index. Handlers only read it.
    pub index: Arc<CorpusIndex>,
}

/// Errors surfaced to HTTP clients.
///
/// A membership miss is not an error; it comes back as `exists: false`
/// in a 200 response.
#[derive(Debug)]
pub enum ApiError {
    /// The response body could not be encoded. Logged server-side and
    /// answered with an empty 500 body; the service keeps running.
    Encoding(serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Encoding(e) => {
                error!("response encoding failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response()
            }
        }
    }
}

/// Serialize a response body up front so an encoding fault maps to the
/// empty-500 contract instead of a framework default page.
fn json_response<T: Serialize>(value: &T) -> std::result::Result<Response, ApiError> {
    let body = serde_json::to_string(value).map_err(ApiError::Encoding)?;
    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response())
}

/// `GET /single/{hash}`: one membership verdict. The response echoes the
/// hash exactly as the caller sent it.
pub async fn lookup_single(
    State(state): State<ApiState>,
    UrlPath(hash): UrlPath<String>,
) -> std::result::Result<Response, ApiError> {
    let exists = state.index.lookup(&hash);
    json_response(&LookupResult { hash, exists })
}

/// Form payload for `POST /bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    /// `#`-joined hash tokens.
    pub hashes: String,
}

/// `POST /bulk`: verdicts for every token of the `hashes` form field.
/// The response array matches the request tokens in order and count,
/// empty tokens included.
pub async fn lookup_bulk(
    State(state): State<ApiState>,
    Form(query): Form<BulkQuery>,
) -> std::result::Result<Response, ApiError> {
    let results: Vec<LookupResult> = query
        .hashes
        .split('#')
        .map(|token| LookupResult {
            hash: token.to_string(),
            exists: state.index.lookup(token),
        })
        .collect();
    json_response(&results)
}

/// One log line per handled request. Layered in only when the config
/// asks for it.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request"
    );
    response
}

/// Build the router over a finished index.
pub fn router(index: Arc<CorpusIndex>, show_requests: bool) -> Router {
    let state = ApiState { index };

    let mut router = Router::new()
        .route("/single/{hash}", get(lookup_single))
        .route("/bulk", post(lookup_bulk));

    if show_requests {
        router = router.layer(middleware::from_fn(log_request));
    }

    router.with_state(state)
}

/// Serve the query API until SIGINT or SIGTERM arrives.
///
/// Callers pass a fully built index; nothing is served while the import
/// is still running.
pub async fn serve(config: &Config, index: Arc<CorpusIndex>) -> Result<()> {
    let addr = config.bind_addr()?;
    let app = router(index, config.show_requests);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::router;
    use crate::index::{CorpusIndex, NormalizedHash};

    fn corpus_router(keys: &[&str], show_requests: bool) -> axum::Router {
        let mut index = CorpusIndex::new();
        for key in keys {
            index.insert(NormalizedHash::new(key));
        }
        router(Arc::new(index), show_requests)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_single_route_decodes_path_parameter() {
        let app = corpus_router(&["DEADBEEF"], false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/single/deadbeef")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"hash":"deadbeef","exists":true}"#
        );
    }

    #[tokio::test]
    async fn test_bulk_route_decodes_urlencoded_form_body() {
        let app = corpus_router(&["BBBB"], false);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bulk")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("hashes=aaaa%23bbbb%23cccc"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            concat!(
                r#"[{"hash":"aaaa","exists":false},"#,
                r#"{"hash":"bbbb","exists":true},"#,
                r#"{"hash":"cccc","exists":false}]"#
            )
        );
    }

    #[tokio::test]
    async fn test_request_logging_layer_passes_responses_through() {
        let app = corpus_router(&["DEADBEEF"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/single/DEADBEEF")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"hash":"DEADBEEF","exists":true}"#
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = corpus_router(&["DEADBEEF"], false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
