//! 权限授予管理服务

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{GrantSet, Permission},
    repository::{load_grants, GrantStore},
    services::session_service::SessionService,
};

pub struct GrantService {
    store: Arc<dyn GrantStore>,
    sessions: Arc<SessionService>,
}

impl GrantService {
    pub fn new(store: Arc<dyn GrantStore>, sessions: Arc<SessionService>) -> Self {
        Self { store, sessions }
    }

    /// 只有 master 或 ADMIN 可以管理授权
    pub async fn require_admin(&self, user_id: Uuid) -> Result<(), AppError> {
        let grants = self.sessions.grants(Some(user_id)).await;

        if !grants.is_administrator() {
            tracing::warn!(user_id = %user_id, "Grant management denied");
            return Err(AppError::Forbidden);
        }

        Ok(())
    }

    /// 直接读取存储，绕过会话缓存
    pub async fn list(&self, target: Uuid) -> GrantSet {
        load_grants(self.store.as_ref(), target).await
    }

    pub async fn grant(&self, actor: Uuid, target: Uuid, tag: &str) -> Result<Permission, AppError> {
        self.require_admin(actor).await?;
        let permission = parse_tag(tag)?;

        self.store.grant_permission(target, permission).await?;
        self.sessions.invalidate(target).await;

        tracing::info!(actor = %actor, target = %target, permission = %permission, "Permission granted");
        Ok(permission)
    }

    pub async fn revoke(&self, actor: Uuid, target: Uuid, tag: &str) -> Result<Permission, AppError> {
        self.require_admin(actor).await?;
        let permission = parse_tag(tag)?;

        if !self.store.revoke_permission(target, permission).await? {
            return Err(AppError::NotFound);
        }
        self.sessions.invalidate(target).await;

        tracing::info!(actor = %actor, target = %target, permission = %permission, "Permission revoked");
        Ok(permission)
    }
}

fn parse_tag(tag: &str) -> Result<Permission, AppError> {
    tag.parse::<Permission>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
