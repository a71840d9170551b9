//! 数据模型模块
//! 权限与角色模型，以及访问决策相关的数据契约

pub mod access;
pub mod permission;

pub use access::*;
pub use permission::*;
