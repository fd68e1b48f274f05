//! HTTP front end: `GET /{starting_page}` answers with the shortest path from
//! that page to the configured target.

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use wikihop_core::{SearchConfig, SearchReport};
use wikihop_crawler::{ArticleTitle, LinkExtractor, PageFetcher, PathFinder, SearchStats};

pub struct AppState<F, E> {
    pub finder: Arc<PathFinder<F, E>>,
    pub target: ArticleTitle,
}

// A derived Clone would require `F: Clone` and `E: Clone`.
impl<F, E> Clone for AppState<F, E> {
    fn clone(&self) -> Self {
        Self {
            finder: Arc::clone(&self.finder),
            target: self.target.clone(),
        }
    }
}

/// JSON body of `GET /{starting_page}`: a [`SearchReport`] with the start
/// under the key the route is named after.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    pub starting_page: String,
    pub target: String,
    pub path: Option<Vec<String>>,
    pub hops: Option<usize>,
    pub outcome: String,
    pub stats: SearchStats,
}

impl From<SearchReport> for PathResponse {
    fn from(report: SearchReport) -> Self {
        let SearchReport {
            start,
            target,
            outcome,
            path,
            hops,
            stats,
        } = report;
        Self {
            starting_page: start,
            target,
            path,
            hops,
            outcome,
            stats,
        }
    }
}

pub fn build_app<F, E>(finder: PathFinder<F, E>, target: ArticleTitle) -> Router
where
    F: PageFetcher + 'static,
    E: LinkExtractor + 'static,
{
    let state = AppState {
        finder: Arc::new(finder),
        target,
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/favicon.ico", get(|| async { StatusCode::NOT_FOUND }))
        .route("/:starting_page", get(get_path::<F, E>))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn get_path<F, E>(
    State(state): State<AppState<F, E>>,
    Path(starting_page): Path<String>,
) -> Response
where
    F: PageFetcher + 'static,
    E: LinkExtractor + 'static,
{
    let start = match ArticleTitle::parse(&starting_page) {
        Ok(title) => title,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // Dropping this future (client went away) stops the search with it.
    match state.finder.find_path(&start, &state.target).await {
        Ok(outcome) => {
            let status = if outcome.is_found() {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            };
            let report = SearchReport::from_outcome(&start, &state.target, &outcome);
            (status, Json(PathResponse::from(report))).into_response()
        }
        Err(e) => {
            error!("Search from {} failed: {}", start, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(config: &SearchConfig, addr: SocketAddr) -> anyhow::Result<()> {
    let finder = config.build_finder(None).map_err(anyhow::Error::msg)?;
    let app = build_app(finder, config.target.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "Serving paths to {} on http://{}",
        config.target,
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
