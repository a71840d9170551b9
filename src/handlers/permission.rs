//! 权限授予管理的 HTTP 处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{GrantPermissionRequest, UserGrantsResponse},
};

/// 列出用户的权限与角色
pub async fn list_user_permissions(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserGrantsResponse>, AppError> {
    state.grant_service.require_admin(auth.user_id).await?;

    let grants = state.grant_service.list(user_id).await;

    Ok(Json(UserGrantsResponse {
        user_id,
        permissions: grants.permission_tags(),
        roles: grants.role_names(),
    }))
}

/// 授予权限
pub async fn grant_permission(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantPermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let permission = state
        .grant_service
        .grant(auth.user_id, user_id, &req.permission)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user_id": user_id,
            "permission": permission,
        })),
    ))
}

/// 撤销权限
pub async fn revoke_permission(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path((user_id, tag)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state
        .grant_service
        .revoke(auth.user_id, user_id, &tag)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
