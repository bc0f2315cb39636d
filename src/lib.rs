//! Admin backend for a community organization's dashboard.
//!
//! Hooks in [`hooks`] and [`entities`] run paged, searchable and filterable
//! queries against a hosted row API and object storage ([`store`]). The
//! review workflow in [`review`] moves applications through
//! pending → approved/rejected and promotes approved events and donations.

pub mod config;
pub mod entities;
pub mod hooks;
pub mod review;
pub mod serde_utils;
pub mod stats;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
