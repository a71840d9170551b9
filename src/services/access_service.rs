//! 资源访问服务
//! 组合会话授权、全局策略、资源所有者查询与访问守卫

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::{AccessGuard, DenialHandler, GuardOutcome, GuardRequest, GuardState},
    error::AppError,
    models::{AccessLevel, Capabilities, GrantSet, Notice, ResourceKind, ResourceRecord},
    repository::ResourceDirectory,
    services::session_service::{GrantSnapshot, SessionService},
};

/// 把守卫的拒绝副作用收集为 HTTP 错误
#[derive(Debug, Default)]
pub struct DeniedResponse {
    notice: Option<Notice>,
    location: Option<String>,
}

impl DenialHandler for DeniedResponse {
    fn notify(&mut self, notice: &Notice) {
        self.notice = Some(notice.clone());
    }

    fn redirect(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }
}

impl DeniedResponse {
    pub fn into_error(self) -> AppError {
        match (self.notice, self.location) {
            (Some(notice), Some(redirect_to)) => AppError::AccessDenied { notice, redirect_to },
            _ => AppError::Forbidden,
        }
    }
}

pub struct AccessService {
    sessions: Arc<SessionService>,
    resources: Arc<dyn ResourceDirectory>,
    guard: AccessGuard,
}

impl AccessService {
    pub fn new(
        sessions: Arc<SessionService>,
        resources: Arc<dyn ResourceDirectory>,
        guard: AccessGuard,
    ) -> Self {
        Self {
            sessions,
            resources,
            guard,
        }
    }

    /// 当前用户的授权集合与派生能力
    pub async fn capabilities(&self, user_id: Option<Uuid>) -> (GrantSet, Capabilities) {
        let grants = self.sessions.grants(user_id).await;
        let caps = Capabilities::derive(&grants);
        (grants, caps)
    }

    // 不存在的资源按“无所有者”处理，避免向无权用户暴露资源是否存在
    async fn owner_of(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<(Option<ResourceRecord>, Option<Uuid>), AppError> {
        let record = self.resources.find(kind, id).await?;
        let owner_id = record.as_ref().and_then(|r| r.owner_id);
        Ok((record, owner_id))
    }

    /// 非阻塞探测：授权数据尚未就绪时返回 `Loading`。
    /// 允许访问但资源不存在时与 [`authorize`](Self::authorize) 一致返回 404。
    pub async fn probe(
        &self,
        user_id: Option<Uuid>,
        kind: ResourceKind,
        id: Uuid,
        level: AccessLevel,
    ) -> Result<GuardState, AppError> {
        let (record, owner_id) = self.owner_of(kind, id).await?;

        let (capabilities, loading) = match self.sessions.snapshot(user_id).await {
            GrantSnapshot::Loading => (Capabilities::none(), true),
            GrantSnapshot::Ready(grants) => (Capabilities::derive(&grants), false),
        };

        let request = GuardRequest {
            level,
            owner_id,
            user_id,
            capabilities,
            loading,
        };

        let mut denial = DeniedResponse::default();
        match self.guard.resolve(&request, &mut denial, || record.is_some()) {
            GuardOutcome::Loading => Ok(GuardState::Loading),
            GuardOutcome::Render(true) => Ok(GuardState::Allowed),
            GuardOutcome::Render(false) => Err(AppError::NotFound),
            GuardOutcome::Redirected => Err(denial.into_error()),
        }
    }

    /// 等待授权数据就绪后执行守卫，允许时返回资源
    pub async fn authorize(
        &self,
        user_id: Option<Uuid>,
        kind: ResourceKind,
        id: Uuid,
        level: AccessLevel,
    ) -> Result<ResourceRecord, AppError> {
        let (record, owner_id) = self.owner_of(kind, id).await?;
        let (_, capabilities) = self.capabilities(user_id).await;

        let request = GuardRequest {
            level,
            owner_id,
            user_id,
            capabilities,
            loading: false,
        };

        let mut denial = DeniedResponse::default();
        match self.guard.resolve(&request, &mut denial, || record) {
            GuardOutcome::Render(Some(record)) => Ok(record),
            GuardOutcome::Render(None) => Err(AppError::NotFound),
            GuardOutcome::Redirected => Err(denial.into_error()),
            GuardOutcome::Loading => Err(AppError::Internal(
                "guard reported loading after grants resolved".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_response_without_redirect_is_plain_forbidden() {
        let error = DeniedResponse::default().into_error();
        assert!(matches!(error, AppError::Forbidden));
    }

    #[test]
    fn test_denied_response_collects_notice_and_location() {
        let mut denial = DeniedResponse::default();
        denial.notify(&Notice::destructive("Acesso negado", "Sem permissão"));
        denial.redirect("/dashboard");

        match denial.into_error() {
            AppError::AccessDenied { notice, redirect_to } => {
                assert_eq!(notice.title, "Acesso negado");
                assert_eq!(redirect_to, "/dashboard");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
