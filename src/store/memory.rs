//! In-memory repository
//!
//! Stand-in for the relational store: a `RwLock`-guarded map keyed by id.
//! Soft delete keeps the row and stamps `deleted_at`; nothing is ever
//! physically erased. Lock scope is a single call, so handlers never hold
//! a guard across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use super::errors::{RepoError, RepoResult};
use super::ProductRepository;
use crate::product::Product;
use crate::query::ProductFilter;

/// In-memory product store
#[derive(Default)]
pub struct MemoryRepository {
    records: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for MemoryRepository {
    fn insert(&self, product: Product) -> RepoResult<Product> {
        let mut records = self.records.write().expect("store lock poisoned");
        let taken = records
            .values()
            .any(|p| !p.is_deleted() && p.sku.eq_ignore_ascii_case(&product.sku));
        if taken {
            return Err(RepoError::DuplicateSku(product.sku));
        }
        records.insert(product.id, product.clone());
        Ok(product)
    }

    fn find(&self, id: Uuid) -> RepoResult<Product> {
        let records = self.records.read().expect("store lock poisoned");
        records
            .get(&id)
            .filter(|p| !p.is_deleted())
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn find_any(&self, id: Uuid) -> RepoResult<Product> {
        let records = self.records.read().expect("store lock poisoned");
        records.get(&id).cloned().ok_or(RepoError::NotFound(id))
    }

    fn list(&self, filter: &ProductFilter) -> (Vec<Product>, usize) {
        let records = self.records.read().expect("store lock poisoned");
        let mut matches: Vec<Product> = records
            .values()
            .filter(|p| !p.is_deleted() && filter.matches(p))
            .cloned()
            .collect();
        drop(records);

        filter.sort(&mut matches);
        let total = matches.len();
        let page = filter.paginate(matches);
        (page, total)
    }

    fn all_live(&self) -> Vec<Product> {
        let records = self.records.read().expect("store lock poisoned");
        records.values().filter(|p| !p.is_deleted()).cloned().collect()
    }

    fn update(&self, product: Product) -> RepoResult<Product> {
        let mut records = self.records.write().expect("store lock poisoned");
        if !records.contains_key(&product.id) {
            return Err(RepoError::NotFound(product.id));
        }
        let taken = records.values().any(|p| {
            p.id != product.id && !p.is_deleted() && p.sku.eq_ignore_ascii_case(&product.sku)
        });
        if taken {
            return Err(RepoError::DuplicateSku(product.sku));
        }
        records.insert(product.id, product.clone());
        Ok(product)
    }

    fn soft_delete(&self, id: Uuid) -> RepoResult<()> {
        let mut records = self.records.write().expect("store lock poisoned");
        match records.get_mut(&id) {
            Some(product) if !product.is_deleted() => {
                product.deleted_at = Some(Utc::now());
                product.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(RepoError::NotFound(id)),
        }
    }

    fn restore(&self, id: Uuid) -> RepoResult<Product> {
        let mut records = self.records.write().expect("store lock poisoned");
        let sku = match records.get(&id) {
            Some(product) if product.is_deleted() => product.sku.clone(),
            Some(product) => return Err(RepoError::NotDeleted(product.id)),
            None => return Err(RepoError::NotFound(id)),
        };

        // Soft delete freed the SKU; a live record may have claimed it since
        let taken = records
            .values()
            .any(|p| p.id != id && !p.is_deleted() && p.sku.eq_ignore_ascii_case(&sku));
        if taken {
            return Err(RepoError::DuplicateSku(sku));
        }

        match records.get_mut(&id) {
            Some(product) => {
                product.deleted_at = None;
                product.updated_at = Utc::now();
                Ok(product.clone())
            }
            None => Err(RepoError::NotFound(id)),
        }
    }
}
