//! 会话授权缓存
//!
//! 进程级缓存，按用户 id 保存已加载的权限/角色集合，生命周期显式管理：
//! 认证时 `establish`，登出或权限变更时 `invalidate`，超过 TTL 自动重新加载。
//! 同一用户的并发请求共享一次读取。降级（存储读取失败）的结果只交给当次调用者，不缓存。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OnceCell, RwLock};
use uuid::Uuid;

use crate::{
    models::GrantSet,
    repository::{load_grants_checked, GrantStore},
};

/// 非阻塞读取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantSnapshot {
    Loading,
    Ready(GrantSet),
}

struct LoadedGrants {
    grants: GrantSet,
    loaded_at: Instant,
    degraded: bool,
}

#[derive(Default)]
struct SessionSlot {
    cell: OnceCell<LoadedGrants>,
    spawned: AtomicBool,
}

pub struct SessionService {
    store: Arc<dyn GrantStore>,
    sessions: RwLock<HashMap<Uuid, Arc<SessionSlot>>>,
    ttl: Duration,
}

async fn load(store: Arc<dyn GrantStore>, user_id: Uuid) -> LoadedGrants {
    let load = load_grants_checked(store.as_ref(), user_id).await;
    LoadedGrants {
        grants: load.grants,
        loaded_at: Instant::now(),
        degraded: load.degraded,
    }
}

impl SessionService {
    pub fn new(store: Arc<dyn GrantStore>, ttl: Duration) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    // 已过期或降级的条目需要重新加载；加载中的条目不算
    fn stale(&self, slot: &SessionSlot) -> bool {
        slot.cell
            .get()
            .is_some_and(|loaded| loaded.degraded || loaded.loaded_at.elapsed() >= self.ttl)
    }

    async fn slot(&self, user_id: Uuid) -> Arc<SessionSlot> {
        if let Some(slot) = self.sessions.read().await.get(&user_id) {
            if !self.stale(slot) {
                return slot.clone();
            }
        }

        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, slot| !self.stale(slot));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Stale sessions evicted");
        }

        sessions.entry(user_id).or_default().clone()
    }

    /// 获取用户的授权集合，必要时等待加载完成。匿名用户得到空集合。
    pub async fn grants(&self, user_id: Option<Uuid>) -> GrantSet {
        let Some(user_id) = user_id else {
            return GrantSet::empty();
        };

        let slot = self.slot(user_id).await;
        let store = self.store.clone();
        slot.cell
            .get_or_init(|| load(store, user_id))
            .await
            .grants
            .clone()
    }

    /// 非阻塞读取；尚未加载时在后台启动一次加载并返回 `Loading`
    pub async fn snapshot(&self, user_id: Option<Uuid>) -> GrantSnapshot {
        let Some(user_id) = user_id else {
            return GrantSnapshot::Ready(GrantSet::empty());
        };

        let slot = self.slot(user_id).await;
        if let Some(loaded) = slot.cell.get() {
            return GrantSnapshot::Ready(loaded.grants.clone());
        }

        if !slot.spawned.swap(true, Ordering::AcqRel) {
            let store = self.store.clone();
            let slot = slot.clone();
            tokio::spawn(async move {
                slot.cell.get_or_init(|| load(store, user_id)).await;
            });
        }

        GrantSnapshot::Loading
    }

    /// 认证后建立会话：丢弃旧缓存并重新加载
    pub async fn establish(&self, user_id: Uuid) -> GrantSet {
        self.invalidate(user_id).await;
        tracing::info!(user_id = %user_id, "Session established");
        self.grants(Some(user_id)).await
    }

    /// 使某个用户的缓存失效（登出或权限变更）
    pub async fn invalidate(&self, user_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&user_id).is_some();
        if removed {
            tracing::debug!(user_id = %user_id, "Session invalidated");
        }
        removed
    }

    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
