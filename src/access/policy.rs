//! 全局访问策略
//! 将用户的权限/角色集合映射为三个命名能力。纯函数，无副作用（除诊断日志）。

use crate::models::{Capabilities, GrantSet, Permission};

/// 全局查看能力：processes 与 clients 共用同一条规则
fn global_view(grants: &GrantSet) -> bool {
    grants.holds(Permission::VerTodosProcessos)
        || grants.holds(Permission::Admin)
        || grants.holds(Permission::Master)
}

fn trace(capability: &'static str, grants: &GrantSet, result: bool) -> bool {
    tracing::debug!(
        capability,
        permissions = ?grants.permission_tags(),
        roles = ?grants.role_names(),
        result,
        "Capability evaluated"
    );
    result
}

/// 是否可查看全部案件
pub fn can_view_all_processes(grants: &GrantSet) -> bool {
    trace("view_all_processes", grants, global_view(grants))
}

/// 是否可查看全部财务数据：需要 financeiro 且具备全局查看能力
pub fn can_view_all_financial(grants: &GrantSet) -> bool {
    let result = grants.holds(Permission::Financeiro) && global_view(grants);
    trace("view_all_financial", grants, result)
}

/// 是否可查看全部客户
pub fn can_view_all_clients(grants: &GrantSet) -> bool {
    trace("view_all_clients", grants, global_view(grants))
}

impl Capabilities {
    /// 每次调用都重新计算，不缓存
    pub fn derive(grants: &GrantSet) -> Self {
        Self {
            view_all_processes: can_view_all_processes(grants),
            view_all_financial: can_view_all_financial(grants),
            view_all_clients: can_view_all_clients(grants),
        }
    }
}
