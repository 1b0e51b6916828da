//! Backup-sync core library: configuration record, persistence, layout.
//!
//! - [`types`]: [`SyncConfig`] and the configure request
//! - [`store`]: [`ConfigStore`] read / write
//! - [`paths`]: [`Layout`] of the on-disk state
//! - [`error`]: [`ConfigError`]

pub mod error;
pub mod paths;
pub mod store;
pub mod types;

pub use error::ConfigError;
pub use paths::Layout;
pub use store::ConfigStore;
pub use types::{ConfigureRequest, SyncConfig, DEFAULT_BRANCH, DEFAULT_HOST};
