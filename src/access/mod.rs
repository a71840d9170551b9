//! 访问控制核心：全局策略、资源策略与访问守卫

pub mod guard;
pub mod policy;
pub mod resource;

pub use guard::{AccessGuard, DenialHandler, GuardOutcome, GuardRequest, GuardState};
pub use policy::{can_view_all_clients, can_view_all_financial, can_view_all_processes};
pub use resource::{can_access_resource, can_delete_resource, can_edit_resource, is_owner};
