//! Domain types and pure logic for the navigation link manager.
//!
//! Nothing in this crate performs I/O: the store lives in `navmgr_db` and the
//! HTTP surface in `navmgr_api`.

pub mod error;
pub mod nav_link;
pub mod pagination;
pub mod permissions;
pub mod provider;
pub mod reconcile;
pub mod types;
