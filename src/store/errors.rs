//! Store error types
//!
//! Failure modes at the storage boundary:
//! - `NotFound`: id does not resolve to a visible record
//! - `DuplicateSku`: the live-SKU unique constraint would be violated
//! - `NotDeleted`: restore called on a record that is not soft-deleted

use thiserror::Error;
use uuid::Uuid;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Repository errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepoError {
    /// No visible record with this id
    #[error("product {0} not found")]
    NotFound(Uuid),

    /// A live record already holds this SKU
    #[error("SKU '{0}' is already in use")]
    DuplicateSku(String),

    /// Restore requested for a record that is not deleted
    #[error("product {0} is not deleted")]
    NotDeleted(Uuid),
}
