//! Core module - workspace, configuration, identity, and persistence

pub mod config;
pub mod identity;
pub mod logging;
pub mod storage;
pub mod store;
pub mod user;
pub mod workspace;

pub use config::Config;
pub use identity::{IdParseError, RecordId, RecordPrefix};
pub use storage::{LocalObjectStore, ObjectStore, StorageError, StoredObject};
pub use store::{Store, StoreError};
pub use user::CurrentUser;
pub use workspace::{Workspace, WorkspaceError};
