use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::article::Article;
use crate::cache::ArticleCache;
use crate::query::{query, NewsQuery};

pub struct AppState {
    pub cache: ArticleCache,
}

// Any fault inside a handler becomes a generic 500
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Error handling API request: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "failed" })),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

/// Raw `/api/news` parameters; interpretation lives in [`NewsQuery`].
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub q: Option<String>,
    pub max: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub total: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub articles: Vec<Article>,
}

pub async fn ping() -> impl IntoResponse {
    Json(json!({ "ok": true, "msg": "pong" }))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NewsParams>, QueryRejection>,
) -> Result<Json<NewsResponse>, AppError> {
    let Query(params) = params?;
    let filter = NewsQuery::from_params(
        params.q.as_deref(),
        params.source.as_deref(),
        params.max.as_deref(),
    );

    let snapshot = state.cache.read().await;
    let result = query(&snapshot.articles, &filter);

    Ok(Json(NewsResponse {
        total: result.total,
        last_updated: snapshot.last_updated,
        articles: result.articles,
    }))
}

pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
}

/// The JSON API alone.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/news", get(news))
        .route("/api/*rest", any(api_not_found))
        .with_state(state)
}

/// The API plus the frontend documents under `static_dir`, with
/// `index.html` answering any other path.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let app = api_router(state);

    let app = if static_dir.is_dir() {
        let index = static_dir.join("index.html");
        app.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
    } else {
        warn!(
            "Frontend folder {} not found, static files will not be served",
            static_dir.display()
        );
        app
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
