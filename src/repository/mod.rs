//! Database repository layer

pub mod grant_repo;
pub mod resource_repo;

pub use grant_repo::*;
pub use resource_repo::*;
