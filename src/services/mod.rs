//! Business logic services layer

pub mod access_service;
pub mod grant_service;
pub mod session_service;

pub use access_service::AccessService;
pub use grant_service::GrantService;
pub use session_service::{GrantSnapshot, SessionService};
