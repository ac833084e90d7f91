//! Navigation building and the write-side operations of the navigation
//! manager (import, restore, save).
//!
//! Handlers stay thin: they extract the caller and payload, then delegate to
//! [`service`], which combines the [`DefaultLinkProvider`] with
//! `NavLinkRepo`.
//!
//! [`DefaultLinkProvider`]: navmgr_core::provider::DefaultLinkProvider

pub mod provider;
pub mod service;

pub use provider::{load_provider, NavManagerLinks};
