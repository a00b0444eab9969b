//! In-memory backend for the SmartRoad report and session stores.
//!
//! State lives for the lifetime of the process and is never persisted. Each
//! store is an explicitly constructed handle; clones share state.

mod reports;
mod sessions;

pub use reports::MemoryReportStore;
pub use sessions::{Account, AuthConfig, AuthMode, MemorySessionStore, demo_admin, demo_citizen};
