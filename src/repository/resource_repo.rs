//! Resource repository (受保护资源的所有者查询)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{ResourceKind, ResourceRecord},
};

/// 资源目录
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    async fn find(&self, kind: ResourceKind, id: Uuid) -> Result<Option<ResourceRecord>, AppError>;
}

#[derive(sqlx::FromRow)]
struct ResourceRow {
    id: Uuid,
    user_id: Option<Uuid>,
    label: String,
    created_at: DateTime<Utc>,
}

pub struct PgResourceRepository {
    db: PgPool,
}

impl PgResourceRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceDirectory for PgResourceRepository {
    async fn find(&self, kind: ResourceKind, id: Uuid) -> Result<Option<ResourceRecord>, AppError> {
        let sql = match kind {
            ResourceKind::Process => {
                "SELECT id, user_id, title AS label, created_at FROM processes WHERE id = $1"
            }
            ResourceKind::Client => {
                "SELECT id, user_id, name AS label, created_at FROM clients WHERE id = $1"
            }
        };

        let row = sqlx::query_as::<_, ResourceRow>(sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(|r| ResourceRecord {
            id: r.id,
            kind,
            owner_id: r.user_id,
            label: r.label,
            created_at: r.created_at,
        }))
    }
}
