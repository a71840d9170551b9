//! 访问策略测试
//!
//! 覆盖全局能力推导和资源级授权的性质与端到端场景

use facilita_access::{
    access::{
        can_access_resource, can_delete_resource, can_edit_resource, can_view_all_clients,
        can_view_all_financial, can_view_all_processes,
    },
    models::{AccessLevel, Capabilities, GrantSet, Permission, Role},
};
use uuid::Uuid;

/// 枚举所有权限子集（2^5 种）
fn all_permission_sets() -> Vec<GrantSet> {
    let all = Permission::ALL;
    (0u32..(1 << all.len()))
        .map(|mask| {
            let perms = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << *i) != 0)
                .map(|(_, p)| *p);
            GrantSet::with_permissions(perms)
        })
        .collect()
}

fn user(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

// ==================== 全局策略 ====================

#[test]
fn test_master_always_views_all_processes() {
    for grants in all_permission_sets() {
        if grants.permissions.contains(&Permission::Master) {
            assert!(can_view_all_processes(&grants), "{:?}", grants);
        }
    }
}

#[test]
fn test_financeiro_without_global_tag_is_not_financial() {
    for grants in all_permission_sets() {
        let global = [Permission::VerTodosProcessos, Permission::Admin, Permission::Master]
            .iter()
            .any(|p| grants.permissions.contains(p));

        if grants.permissions.contains(&Permission::Financeiro) && !global {
            assert!(!can_view_all_financial(&grants), "{:?}", grants);
        }
    }
}

#[test]
fn test_financeiro_with_admin_is_financial() {
    for grants in all_permission_sets() {
        if grants.permissions.contains(&Permission::Financeiro)
            && grants.permissions.contains(&Permission::Admin)
        {
            assert!(can_view_all_financial(&grants), "{:?}", grants);
        }
    }
}

#[test]
fn test_clients_and_processes_never_diverge() {
    let role_sets = [
        vec![],
        vec![Role::Master],
        vec![Role::Admin],
        vec![Role::Other("advogado".to_string())],
    ];

    for base in all_permission_sets() {
        for roles in &role_sets {
            let grants = GrantSet::new(base.permissions.iter().copied(), roles.iter().cloned());
            assert_eq!(
                can_view_all_clients(&grants),
                can_view_all_processes(&grants),
                "{:?}",
                grants
            );
        }
    }
}

#[test]
fn test_derivation_is_deterministic() {
    for grants in all_permission_sets() {
        assert_eq!(Capabilities::derive(&grants), Capabilities::derive(&grants.clone()));
    }
}

#[test]
fn test_excluir_processo_grants_nothing_globally() {
    let grants = GrantSet::with_permissions([Permission::ExcluirProcesso]);
    assert_eq!(Capabilities::derive(&grants), Capabilities::none());
}

// ==================== 资源策略 ====================

#[test]
fn test_owner_allowed_without_capabilities_once_loaded() {
    let caps = Capabilities::none();
    let me = Some(user(1));

    assert!(can_access_resource(&caps, me, me, false));
    assert!(can_edit_resource(&caps, me, me, false));
    assert!(can_delete_resource(&caps, me, me, false));
}

#[test]
fn test_loading_denies_everything() {
    let full = Capabilities {
        view_all_processes: true,
        view_all_financial: true,
        view_all_clients: true,
    };
    let me = Some(user(1));

    for caps in [Capabilities::none(), full] {
        for owner in [me, Some(user(2)), None] {
            for level in [AccessLevel::View, AccessLevel::Edit, AccessLevel::Delete] {
                assert!(!level.permits(&caps, me, owner, true));
            }
        }
    }
}

#[test]
fn test_missing_identity_is_never_owner() {
    let caps = Capabilities::none();
    assert!(!can_access_resource(&caps, None, None, false));
    assert!(!can_access_resource(&caps, None, Some(user(1)), false));
    assert!(!can_edit_resource(&caps, None, Some(user(1)), false));
}

// ==================== 端到端场景 ====================

#[test]
fn test_scenario_owner_with_no_grants() {
    let grants = GrantSet::from_tags(Vec::<&str>::new(), Vec::<String>::new());
    let caps = Capabilities::derive(&grants);
    let (me, owner) = (Some(user(1)), Some(user(1)));

    assert!(can_access_resource(&caps, me, owner, false));
    assert!(can_edit_resource(&caps, me, owner, false));
    assert!(can_delete_resource(&caps, me, owner, false));
}

#[test]
fn test_scenario_financeiro_only_non_owner() {
    let grants = GrantSet::from_tags(["financeiro"], Vec::<String>::new());
    let caps = Capabilities::derive(&grants);
    let (me, owner) = (Some(user(1)), Some(user(2)));

    assert!(!caps.view_all_financial);
    assert!(!can_access_resource(&caps, me, owner, false));
}

#[test]
fn test_scenario_master_non_owner() {
    let grants = GrantSet::from_tags(["master"], Vec::<String>::new());
    let caps = Capabilities::derive(&grants);
    let (me, owner) = (Some(user(1)), Some(user(2)));

    assert!(caps.view_all_processes);
    assert!(can_access_resource(&caps, me, owner, false));
    assert!(can_edit_resource(&caps, me, owner, false));
    assert!(can_delete_resource(&caps, me, owner, false));
}

#[test]
fn test_scenario_master_role_non_owner() {
    let grants = GrantSet::from_tags(Vec::<&str>::new(), ["master".to_string()]);
    let caps = Capabilities::derive(&grants);

    assert!(caps.view_all_processes);
    assert!(can_delete_resource(&caps, Some(user(1)), Some(user(2)), false));
}
