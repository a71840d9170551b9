//! Access decision models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::permission::GrantSet;

/// 派生出的全局能力，不持久化
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub view_all_processes: bool,
    pub view_all_financial: bool,
    pub view_all_clients: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.view_all_processes || self.view_all_financial || self.view_all_clients
    }
}

/// 需要的访问级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    View,
    Edit,
    Delete,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::View => "view",
            AccessLevel::Edit => "edit",
            AccessLevel::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 受保护资源的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Process,
    Client,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Process => "process",
            ResourceKind::Client => "client",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "process" | "processes" => Ok(ResourceKind::Process),
            "client" | "clients" => Ok(ResourceKind::Client),
            other => Err(format!("Unknown resource kind: {}", other)),
        }
    }
}

/// 资源记录（所有者可能为空）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub id: Uuid,
    pub kind: ResourceKind,
    pub owner_id: Option<Uuid>,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// 通知严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Destructive,
}

/// 面向用户的通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// 访问探测查询参数
#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    #[serde(default)]
    pub level: AccessLevel,
}

/// 访问探测响应
#[derive(Debug, Serialize)]
pub struct AccessProbeResponse {
    pub state: &'static str,
    pub level: AccessLevel,
}

/// 当前用户能力响应
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub user_id: Option<Uuid>,
    pub capabilities: Capabilities,
    pub permissions: Vec<&'static str>,
    pub roles: Vec<String>,
}

impl CapabilitiesResponse {
    pub fn new(user_id: Option<Uuid>, capabilities: Capabilities, grants: &GrantSet) -> Self {
        Self {
            user_id,
            capabilities,
            permissions: grants.permission_tags(),
            roles: grants.role_names(),
        }
    }
}

/// 授予权限请求
#[derive(Debug, Deserialize)]
pub struct GrantPermissionRequest {
    pub permission: String,
}

/// 用户权限列表响应
#[derive(Debug, Serialize)]
pub struct UserGrantsResponse {
    pub user_id: Uuid,
    pub permissions: Vec<&'static str>,
    pub roles: Vec<String>,
}
