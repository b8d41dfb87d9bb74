//! 結果テーブルのHTTPサービス
//!
//! - `GET /` 絞り込みとソートができる表ページ
//! - `GET /api/table` 表と失敗サマリー（JSON）
//! - `GET /api/meets` 大会・性別・種目の一覧
//! - `GET /health` 死活確認

pub mod handlers;

use crate::config::Config;
use crate::error::{OnTrackError, Result};
use axum::routing::get;
use axum::Router;
use ontrack_common::ReferenceData;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// ハンドラ間で共有する読み取り専用の状態
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub refs: Arc<ReferenceData>,
}

impl AppState {
    pub fn new(config: Config, refs: ReferenceData) -> Self {
        Self {
            config: Arc::new(config),
            refs: Arc::new(refs),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::serve_index))
        .route("/api/table", get(handlers::get_table))
        .route("/api/meets", get(handlers::get_meets))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// サーバを起動（終了まで戻らない）
pub async fn run(state: AppState, port: u16) -> Result<()> {
    let addr = format!("{}:{}", state.config.bind_address, port);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OnTrackError::Http(format!("{} にバインドできません: {}", addr, e)))?;
    info!("On Track table listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| OnTrackError::Http(format!("サーバエラー: {}", e)))?;

    Ok(())
}
