//! Identity extraction for incoming requests

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::{extract_token, identity_middleware, AuthContext};
