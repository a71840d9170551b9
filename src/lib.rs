//! FacilitaAdv 访问控制服务
//! 按权限、角色与资源所有权决定用户能否查看/编辑/删除资源

pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
