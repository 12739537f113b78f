//! # Response Formatting
//!
//! Wire representation of a product. Three fields are derived at format
//! time and never stored: `needs_restock`, `is_out_of_stock` and
//! `stock_value`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::product::Product;

/// A product as it appears on the wire
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: f64,
    pub cost: Option<f64>,
    pub stock: i64,
    pub min_stock: i64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub needs_restock: bool,
    pub is_out_of_stock: bool,
    pub stock_value: f64,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            price: product.price,
            cost: product.cost,
            stock: product.stock,
            min_stock: product.min_stock,
            category: product.category.clone(),
            brand: product.brand.clone(),
            is_active: product.is_active,
            image_url: product.image_url.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
            deleted_at: product.deleted_at,
            needs_restock: product.needs_restock(),
            is_out_of_stock: product.is_out_of_stock(),
            stock_value: product.stock_value(),
        }
    }
}

/// Format a sequence of records
pub fn format_list(products: &[Product]) -> Vec<ProductView> {
    products.iter().map(ProductView::from).collect()
}
