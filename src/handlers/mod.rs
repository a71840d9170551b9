//! HTTP 处理器模块

pub mod access;
pub mod health;
pub mod permission;
pub mod session;
