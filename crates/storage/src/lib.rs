#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    DEFAULT_NAMESPACE, InMemoryProgressRepository, ProgressBlob, ProgressRepository, Storage,
    StorageError, storage_key,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
