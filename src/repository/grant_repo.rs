//! Grant repository (权限/角色数据访问)

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{GrantSet, Permission},
};

/// 权限与角色存储
#[async_trait]
pub trait GrantStore: Send + Sync {
    async fn fetch_permissions(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;

    async fn fetch_roles(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;

    async fn grant_permission(&self, user_id: Uuid, permission: Permission) -> Result<(), AppError>;

    /// 返回是否确实删除了一条授权
    async fn revoke_permission(&self, user_id: Uuid, permission: Permission)
        -> Result<bool, AppError>;
}

/// 一次授权读取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantLoad {
    pub grants: GrantSet,
    /// 至少一次读取失败，结果被降级为（部分）空集合
    pub degraded: bool,
}

/// 读取用户的授权集合；任何读取错误都映射为空集合（拒绝访问），不向上传播
pub async fn load_grants(store: &dyn GrantStore, user_id: Uuid) -> GrantSet {
    load_grants_checked(store, user_id).await.grants
}

/// 同 [`load_grants`]，但报告读取是否降级，调用方据此决定能否缓存
pub async fn load_grants_checked(store: &dyn GrantStore, user_id: Uuid) -> GrantLoad {
    let mut degraded = false;

    let permissions = match store.fetch_permissions(user_id).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to fetch permissions, denying");
            degraded = true;
            Vec::new()
        }
    };

    let roles = match store.fetch_roles(user_id).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to fetch roles, denying");
            degraded = true;
            Vec::new()
        }
    };

    let grants = GrantSet::from_tags(permissions, roles);

    tracing::debug!(
        user_id = %user_id,
        permissions = ?grants.permission_tags(),
        roles = ?grants.role_names(),
        degraded,
        "Grants loaded"
    );

    GrantLoad { grants, degraded }
}

pub struct PgGrantRepository {
    db: PgPool,
}

impl PgGrantRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GrantStore for PgGrantRepository {
    async fn fetch_permissions(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT permission FROM user_permissions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(tags)
    }

    async fn fetch_roles(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let roles = sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(roles)
    }

    async fn grant_permission(&self, user_id: Uuid, permission: Permission) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_permissions (user_id, permission)
            VALUES ($1, $2)
            ON CONFLICT (user_id, permission) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(permission.as_tag())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: Uuid,
        permission: Permission,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM user_permissions WHERE user_id = $1 AND permission = $2")
                .bind(user_id)
                .bind(permission.as_tag())
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
