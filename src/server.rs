use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::context::ConnectorContext;
use crate::error::{LcuError, Result};

// Thin REST adapter over ConnectorContext

pub struct ApiError(LcuError);

impl From<LcuError> for ApiError {
    fn from(e: LcuError) -> Self {
        Self(e)
    }
}

/// 503 when the client is unreachable, 409 when champion select is not in a
/// state that allows the action, 502 for anything the client rejected.
pub fn status_for(error: &LcuError) -> StatusCode {
    match error {
        LcuError::NotInChampSelect | LcuError::NoPickAction => StatusCode::CONFLICT,
        LcuError::SelectSkin { source } if !source.is_connection_error() => status_for(source),
        e if e.is_connection_error() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::debug!("[Server] Request failed with {}: {}", status, self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = std::result::Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub champion_id: i64,
    pub skin_id: i64,
    #[serde(default)]
    pub chroma_id: Option<i64>,
}

pub fn router(ctx: Arc<ConnectorContext>) -> Router {
    // The UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/status", get(api_status))
        .route("/api/connect", post(api_connect))
        .route("/api/me", get(api_me))
        .route("/api/champ-select", get(api_champ_select))
        .route("/api/skins/{champion_id}", get(api_skins))
        .route("/api/select", post(api_select))
        .route("/api/ready-check", get(api_ready_check))
        .route("/api/ready-check/accept", post(api_accept_ready_check))
        .layer(cors)
        .with_state(ctx)
}

/// Serve until Ctrl-C, then drop the client connection.
pub async fn run_server(ctx: Arc<ConnectorContext>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Server] HTTP server listening on {}", addr);

    axum::serve(listener, router(ctx.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[Server] Shutting down");
    ctx.disconnect();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("[Server] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

pub(crate) async fn api_status(State(ctx): State<Arc<ConnectorContext>>) -> Json<Value> {
    let connected = ctx.is_connected().await;
    let phase = if connected {
        ctx.get_gameflow_phase().await.ok().flatten()
    } else {
        None
    };
    Json(json!({
        "state": format!("{:?}", ctx.connection_state()),
        "connected": connected,
        "phase": phase,
    }))
}

pub(crate) async fn api_connect(State(ctx): State<Arc<ConnectorContext>>) -> ApiResult {
    let generation = ctx.connect().await?;
    Ok(Json(json!({ "ok": true, "connection": generation })))
}

pub(crate) async fn api_me(State(ctx): State<Arc<ConnectorContext>>) -> ApiResult {
    let player = ctx.get_current_player().await?;
    Ok(Json(json!(player)))
}

pub(crate) async fn api_champ_select(State(ctx): State<Arc<ConnectorContext>>) -> ApiResult {
    let session = ctx.get_champ_select_session().await?;
    let champion_id = session.as_ref().and_then(|s| s.selected_champion());
    let champion_name = match champion_id {
        Some(id) => Some(ctx.champion_name(id).await),
        None => None,
    };
    Ok(Json(json!({
        "inChampSelect": session.is_some(),
        "championId": champion_id,
        "championName": champion_name,
        "lockedIn": session.as_ref().map(|s| s.is_locked_in()).unwrap_or(false),
    })))
}

pub(crate) async fn api_skins(
    State(ctx): State<Arc<ConnectorContext>>,
    Path(champion_id): Path<i64>,
) -> ApiResult {
    let skins = ctx.resolve_owned_skins(champion_id).await?;
    Ok(Json(json!({
        "championId": champion_id,
        "championName": ctx.champion_name(champion_id).await,
        "skins": skins,
    })))
}

pub(crate) async fn api_select(
    State(ctx): State<Arc<ConnectorContext>>,
    Json(body): Json<SelectRequest>,
) -> ApiResult {
    ctx.apply_skin(body.champion_id, body.skin_id, body.chroma_id)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

pub(crate) async fn api_ready_check(State(ctx): State<Arc<ConnectorContext>>) -> ApiResult {
    let check = ctx.get_ready_check().await?;
    Ok(Json(json!(check)))
}

pub(crate) async fn api_accept_ready_check(State(ctx): State<Arc<ConnectorContext>>) -> ApiResult {
    ctx.accept_ready_check().await?;
    Ok(Json(json!({ "ok": true })))
}
