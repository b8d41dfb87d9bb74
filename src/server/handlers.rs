//! HTTPハンドラ

use super::AppState;
use crate::error::OnTrackError;
use crate::table::{build_table, TableQuery};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use ontrack_common::{Gender, TableReport};
use serde::Serialize;
use serde_json::json;

const INDEX_HTML: &str = include_str!("page.html");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "ontrack".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize)]
pub struct MeetsResponse {
    pub meets: Vec<String>,
    pub genders: Vec<Gender>,
    pub events: Vec<String>,
    pub states: Vec<String>,
}

/// GET /api/meets
pub async fn get_meets(State(state): State<AppState>) -> Json<MeetsResponse> {
    Json(MeetsResponse {
        meets: state.config.meets(),
        genders: Gender::ALL.to_vec(),
        events: state.refs.targets.event_labels(),
        states: state.refs.aliases.codes(),
    })
}

/// GET /api/table
///
/// 計算は同期処理なのでブロッキングスレッドで実行する。
pub async fn get_table(
    State(state): State<AppState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<TableReport>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = query.parse()?;

    let report = tokio::task::spawn_blocking(move || {
        build_table(&state.config, &state.refs, &request)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("table task failed: {}", e)))??;

    Ok(Json(report))
}

/// APIエラー（`{"error": ...}` で返す）
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<OnTrackError> for ApiError {
    fn from(err: OnTrackError) -> Self {
        match err {
            OnTrackError::InvalidQuery(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
