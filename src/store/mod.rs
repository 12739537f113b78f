//! # Product Store
//!
//! Repository seam between the HTTP layer and persistence. The entity stays
//! inert; create/find/update/soft-delete/restore live behind the
//! `ProductRepository` trait so handlers can be exercised without a live
//! relational store.
//!
//! The SKU uniqueness invariant is enforced here, at the storage boundary:
//! a SKU is taken while a live (non-deleted) record holds it, compared
//! case-insensitively. Soft-deleting a record frees its SKU.

mod errors;
mod memory;

pub use errors::{RepoError, RepoResult};
pub use memory::MemoryRepository;

use uuid::Uuid;

use crate::product::Product;
use crate::query::ProductFilter;

/// Storage operations for the product table.
///
/// `find` sees live records only; `find_any` also returns soft-deleted ones
/// (needed by restore). `list` applies the full filter/sort/page descriptor
/// and reports the pre-pagination match count.
pub trait ProductRepository: Send + Sync {
    /// Insert a new record, enforcing SKU uniqueness among live records
    fn insert(&self, product: Product) -> RepoResult<Product>;

    /// Fetch a live record by id
    fn find(&self, id: Uuid) -> RepoResult<Product>;

    /// Fetch a record by id regardless of deletion state
    fn find_any(&self, id: Uuid) -> RepoResult<Product>;

    /// List live records matching the filter; returns (page, total matches)
    fn list(&self, filter: &ProductFilter) -> (Vec<Product>, usize);

    /// All live records, unfiltered (stats and reports)
    fn all_live(&self) -> Vec<Product>;

    /// Persist a mutated record, re-checking SKU uniqueness against others
    fn update(&self, product: Product) -> RepoResult<Product>;

    /// Set deleted_at on a live record
    fn soft_delete(&self, id: Uuid) -> RepoResult<()>;

    /// Clear deleted_at on a soft-deleted record, re-checking that no live
    /// record has claimed its SKU in the meantime
    fn restore(&self, id: Uuid) -> RepoResult<Product>;
}
