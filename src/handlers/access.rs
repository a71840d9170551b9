//! 访问控制的 HTTP 处理器

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::GuardState,
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        AccessLevel, AccessProbeResponse, AccessQuery, CapabilitiesResponse, ResourceKind,
        ResourceRecord,
    },
};

fn parse_kind(kind: &str) -> Result<ResourceKind, AppError> {
    kind.parse::<ResourceKind>().map_err(AppError::BadRequest)
}

/// 当前用户的能力
pub async fn get_capabilities(
    State(state): State<Arc<AppState>>,
    auth: Option<AuthContext>,
) -> Json<CapabilitiesResponse> {
    let user_id = auth.map(|a| a.user_id);
    let (grants, capabilities) = state.access_service.capabilities(user_id).await;

    Json(CapabilitiesResponse::new(user_id, capabilities, &grants))
}

/// 守卫探测（非阻塞）
pub async fn probe_access(
    State(state): State<Arc<AppState>>,
    auth: Option<AuthContext>,
    Path((kind, id)): Path<(String, Uuid)>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessProbeResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    let user_id = auth.map(|a| a.user_id);

    let guard_state = state
        .access_service
        .probe(user_id, kind, id, query.level)
        .await?;

    let label = match guard_state {
        GuardState::Loading => "loading",
        GuardState::Allowed => "allowed",
        // 拒绝已作为错误返回
        GuardState::Denied => return Err(AppError::Forbidden),
    };

    Ok(Json(AccessProbeResponse {
        state: label,
        level: query.level,
    }))
}

/// 受保护的资源内容（查看级别）
pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    auth: Option<AuthContext>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<ResourceRecord>, AppError> {
    let kind = parse_kind(&kind)?;
    let user_id = auth.map(|a| a.user_id);

    let record = state
        .access_service
        .authorize(user_id, kind, id, AccessLevel::View)
        .await?;

    Ok(Json(record))
}
