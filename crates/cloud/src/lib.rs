//! Clients for the external services KindQuest depends on.
//!
//! - [`storage`]: S3-compatible object storage for uploaded images.
//! - [`chat`]: the support chat service that hosts ticket rooms.
//!
//! Both are exposed behind object-safe traits so the API crate can hold them
//! as `Arc<dyn ...>` and tests can substitute in-memory fakes.

pub mod chat;
pub mod storage;

pub use chat::{ChatClient, ChatConfig, ChatError, ChatService};
pub use storage::{ObjectStorage, S3Storage, StorageConfig, StorageError};
