//! Middleware for bearer authentication and role checks.

mod auth;

pub use auth::{auth_middleware, require_role, Claims, JwtVerifier, RealmAccess};
