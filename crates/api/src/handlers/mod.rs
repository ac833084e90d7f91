//! Request handlers.
//!
//! Handlers extract the caller and payload, delegate to the repositories in
//! `navmgr_db` or to [`crate::navigation::service`], and map errors via
//! [`crate::error::AppError`].

pub mod nav_manager;
pub mod navigation;
