//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user creation request and its constraints, the identity provider's
//! user representation, the read projection served to clients, and the
//! authenticated principal.

pub mod constants;
pub mod error;
pub mod principal;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use principal::{Principal, Role};
pub use user::{CredentialRepresentation, UserRepresentation, UserRequest, UserResponse};
