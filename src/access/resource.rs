//! 资源访问策略
//! 结合全局能力与资源所有权，对单个资源实例做 view/edit/delete 授权。
//!
//! 加载期间一律拒绝，所有者也不例外。

use uuid::Uuid;

use crate::models::{AccessLevel, Capabilities};

/// 两个 id 都存在且相等才算所有者
pub fn is_owner(user_id: Option<Uuid>, owner_id: Option<Uuid>) -> bool {
    matches!((user_id, owner_id), (Some(user), Some(owner)) if user == owner)
}

/// 查看：所有者，或持有任一全局能力
pub fn can_access_resource(
    caps: &Capabilities,
    user_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    loading: bool,
) -> bool {
    if loading {
        return false;
    }
    is_owner(user_id, owner_id) || caps.any()
}

/// 编辑：所有者，或可查看全部案件
pub fn can_edit_resource(
    caps: &Capabilities,
    user_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    loading: bool,
) -> bool {
    if loading {
        return false;
    }
    is_owner(user_id, owner_id) || caps.view_all_processes
}

/// 删除：与编辑相同的规则
pub fn can_delete_resource(
    caps: &Capabilities,
    user_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    loading: bool,
) -> bool {
    can_edit_resource(caps, user_id, owner_id, loading)
}

impl AccessLevel {
    /// 按访问级别分派到对应的策略函数
    pub fn permits(
        &self,
        caps: &Capabilities,
        user_id: Option<Uuid>,
        owner_id: Option<Uuid>,
        loading: bool,
    ) -> bool {
        match self {
            AccessLevel::View => can_access_resource(caps, user_id, owner_id, loading),
            AccessLevel::Edit => can_edit_resource(caps, user_id, owner_id, loading),
            AccessLevel::Delete => can_delete_resource(caps, user_id, owner_id, loading),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner_requires_both_ids() {
        let id = Uuid::new_v4();
        assert!(is_owner(Some(id), Some(id)));
        assert!(!is_owner(None, Some(id)));
        assert!(!is_owner(Some(id), None));
        assert!(!is_owner(None, None));
        assert!(!is_owner(Some(id), Some(Uuid::new_v4())));
    }

    #[test]
    fn test_financial_only_grants_view_not_edit() {
        let caps = Capabilities {
            view_all_financial: true,
            ..Capabilities::none()
        };
        let user = Some(Uuid::new_v4());
        let owner = Some(Uuid::new_v4());

        assert!(can_access_resource(&caps, user, owner, false));
        assert!(!can_edit_resource(&caps, user, owner, false));
        assert!(!can_delete_resource(&caps, user, owner, false));
    }

    #[test]
    fn test_clients_capability_grants_view_only() {
        let caps = Capabilities {
            view_all_clients: true,
            ..Capabilities::none()
        };
        let user = Some(Uuid::new_v4());

        assert!(AccessLevel::View.permits(&caps, user, None, false));
        assert!(!AccessLevel::Edit.permits(&caps, user, None, false));
    }

    #[test]
    fn test_loading_blocks_owner() {
        let id = Some(Uuid::new_v4());
        let caps = Capabilities::none();
        for level in [AccessLevel::View, AccessLevel::Edit, AccessLevel::Delete] {
            assert!(!level.permits(&caps, id, id, true));
            assert!(level.permits(&caps, id, id, false));
        }
    }
}
