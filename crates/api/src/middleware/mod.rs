//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous callers are allowed.
//! - [`rbac::RequireNavManager`] -- Requires the `manage_navlinks` ability.

pub mod auth;
pub mod rbac;
