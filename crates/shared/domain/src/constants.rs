//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Moderators manage realm users through the API
pub const ROLE_MODERATOR: &str = "MODERATOR";

/// Realm administrator
pub const ROLE_ADMIN: &str = "ADMIN";

/// Plain realm user
pub const ROLE_USER: &str = "USER";

/// Prefix some token issuers put in front of role names
pub const ROLE_PREFIX: &str = "ROLE_";

// =============================================================================
// Listing
// =============================================================================

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the provider is asked for in one call
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Identity provider
// =============================================================================

/// Credential type for password credentials
pub const CREDENTIAL_TYPE_PASSWORD: &str = "password";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
