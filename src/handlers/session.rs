//! 会话生命周期处理器

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    auth::AuthContext,
    middleware::AppState,
    models::{Capabilities, CapabilitiesResponse},
};

/// 登录后建立会话，返回新加载的能力
pub async fn establish_session(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Json<CapabilitiesResponse> {
    let grants = state.sessions.establish(auth.user_id).await;
    let capabilities = Capabilities::derive(&grants);

    Json(CapabilitiesResponse::new(Some(auth.user_id), capabilities, &grants))
}

/// 登出：丢弃会话缓存
pub async fn end_session(State(state): State<Arc<AppState>>, auth: AuthContext) -> StatusCode {
    state.sessions.invalidate(auth.user_id).await;
    tracing::info!(user_id = %auth.user_id, "Session ended");
    StatusCode::NO_CONTENT
}
