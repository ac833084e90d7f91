//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod nav_link_repo;

pub use nav_link_repo::NavLinkRepo;
