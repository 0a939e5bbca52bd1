//! Shared error types for the services crate.

use thiserror::Error;

use academy_core::model::ModuleError;
use storage::repository::StorageError;

/// Errors emitted while opening a module session.
///
/// Navigation itself never errors: invalid targets are silent no-ops, and a
/// failed save during navigation is logged rather than surfaced, per the
/// graceful-degradation contract of the progress tracker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
