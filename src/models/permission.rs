//! Permission and role domain models
//!
//! 权限标签使用封闭枚举，未知标签在解析时被拒绝，而不是静默地得到 `false`。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// 已知的权限标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "financeiro")]
    Financeiro,
    #[serde(rename = "ver_todos_processos")]
    VerTodosProcessos,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "master")]
    Master,
    /// 由管理员授予，但资源删除规则不读取它
    #[serde(rename = "excluir_processo")]
    ExcluirProcesso,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::Financeiro,
        Permission::VerTodosProcessos,
        Permission::Admin,
        Permission::Master,
        Permission::ExcluirProcesso,
    ];

    /// 存储层使用的标签文本
    pub fn as_tag(&self) -> &'static str {
        match self {
            Permission::Financeiro => "financeiro",
            Permission::VerTodosProcessos => "ver_todos_processos",
            Permission::Admin => "ADMIN",
            Permission::Master => "master",
            Permission::ExcluirProcesso => "excluir_processo",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// 未知权限标签
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission tag: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    // 精确匹配，大小写敏感
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_tag() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// 用户角色
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Role {
    Master,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Master => "master",
            Role::Admin => "admin",
            Role::Other(name) => name,
        }
    }

    /// 角色隐含的权限标签
    pub fn implied_permission(&self) -> Option<Permission> {
        match self {
            Role::Master => Some(Permission::Master),
            Role::Admin => Some(Permission::Admin),
            Role::Other(_) => None,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "master" => Role::Master,
            "admin" => Role::Admin,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户的权限与角色集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
    pub permissions: HashSet<Permission>,
    pub roles: HashSet<Role>,
}

impl GrantSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        permissions: impl IntoIterator<Item = Permission>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn with_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            roles: HashSet::new(),
        }
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            permissions: HashSet::new(),
            roles: roles.into_iter().collect(),
        }
    }

    /// 从存储层的原始标签构造；未知权限标签被丢弃
    pub fn from_tags<P, R>(permissions: P, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let permissions = permissions
            .into_iter()
            .filter_map(|tag| match tag.as_ref().parse::<Permission>() {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unknown permission tag");
                    None
                }
            })
            .collect();

        let roles = roles
            .into_iter()
            .map(|r| Role::from(r.into()))
            .collect();

        Self { permissions, roles }
    }

    /// 是否持有某个权限（直接授予或由角色隐含）
    pub fn holds(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
            || self
                .roles
                .iter()
                .any(|r| r.implied_permission() == Some(permission))
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty()
    }

    /// 可管理权限授予（master 或 ADMIN）
    pub fn is_administrator(&self) -> bool {
        self.holds(Permission::Master) || self.holds(Permission::Admin)
    }

    /// 排序后的权限标签，便于序列化和日志
    pub fn permission_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.permissions.iter().map(|p| p.as_tag()).collect();
        tags.sort_unstable();
        tags
    }

    pub fn role_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.roles.iter().map(|r| r.to_string()).collect();
        names.sort_unstable();
        names
    }
}
