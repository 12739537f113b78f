//! Product record and request payload types
//!
//! Invariants carried by this module:
//! - SKU is stored trimmed and upper-cased
//! - `min_stock` always has a value after creation (default 5)
//! - `deleted_at` present means the record is logically deleted, never erased

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default minimum-stock threshold applied at creation
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// A single inventory record.
///
/// Identity and audit fields are system-maintained; everything else comes
/// from validated request payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
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
}

impl Product {
    /// Build a new record from a validated create payload.
    ///
    /// Generates the identifier, stamps timestamps, trims the name and
    /// normalizes the SKU.
    pub fn from_new(payload: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            sku: normalize_sku(&payload.sku),
            description: payload.description,
            price: payload.price,
            cost: payload.cost,
            stock: payload.stock.unwrap_or(0),
            min_stock: payload.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            category: payload.category,
            brand: payload.brand,
            is_active: payload.is_active.unwrap_or(true),
            image_url: payload.image_url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the record is logically deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Stock has fallen to or below the configured threshold
    pub fn needs_restock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Stock is exactly zero
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Value of stock on hand (price x units)
    pub fn stock_value(&self) -> f64 {
        self.price * self.stock as f64
    }

    /// Apply a full-replace payload, keeping identity and created_at.
    pub fn apply_replace(&mut self, payload: NewProduct) {
        self.name = payload.name.trim().to_string();
        self.sku = normalize_sku(&payload.sku);
        self.description = payload.description;
        self.price = payload.price;
        self.cost = payload.cost;
        self.stock = payload.stock.unwrap_or(0);
        self.min_stock = payload.min_stock.unwrap_or(DEFAULT_MIN_STOCK);
        self.category = payload.category;
        self.brand = payload.brand;
        self.is_active = payload.is_active.unwrap_or(true);
        self.image_url = payload.image_url;
        self.updated_at = Utc::now();
    }

    /// Apply a partial-update payload. Returns the number of fields changed
    /// so the handler can reject an effectively empty body.
    pub fn apply_patch(&mut self, patch: &ProductPatch) -> usize {
        let mut touched = 0;
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
            touched += 1;
        }
        if let Some(sku) = &patch.sku {
            self.sku = normalize_sku(sku);
            touched += 1;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
            touched += 1;
        }
        if let Some(price) = patch.price {
            self.price = price;
            touched += 1;
        }
        if let Some(cost) = patch.cost {
            self.cost = Some(cost);
            touched += 1;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
            touched += 1;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
            touched += 1;
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
            touched += 1;
        }
        if let Some(brand) = &patch.brand {
            self.brand = Some(brand.clone());
            touched += 1;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
            touched += 1;
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = Some(image_url.clone());
            touched += 1;
        }
        if touched > 0 {
            self.updated_at = Utc::now();
        }
        touched
    }
}

/// Trim and upper-case a raw SKU
pub fn normalize_sku(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Create / full-replace payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial-update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// True when no recognized field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.cost.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.is_active.is_none()
            && self.image_url.is_none()
    }
}

/// Direction of a stock mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Add,
    Subtract,
}

impl StockOperation {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            StockOperation::Add => "add",
            StockOperation::Subtract => "subtract",
        }
    }
}

/// Stock mutation payload
#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdate {
    pub quantity: i64,
    pub operation: StockOperation,
    #[serde(default)]
    pub reason: Option<String>,
}
