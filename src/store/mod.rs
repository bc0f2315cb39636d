//! Remote data access.
//!
//! # Architecture
//!
//! - `error`: backend agnostic error types
//! - `models`: rows, selections and storage entries
//! - `query`: the [`Select`] description shared by every backend
//! - `remote`: client traits ([`QueryClient`], [`MutationClient`], [`StorageClient`], [`Remote`])
//! - `memory`: in-process implementation
//! - `postgrest`: HTTP implementation for the hosted row and storage APIs

mod error;
mod memory;
mod models;
pub mod postgrest;
mod query;
mod remote;


pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;
pub use postgrest::PostgrestClient;
pub use query::{Condition, Order, Select};
pub use remote::*;
