//! # Query Filter Builder
//!
//! Translates validated listing parameters into a structured
//! filter/sort/pagination descriptor applied by the repository.
//!
//! Rules:
//! - `search` matches name OR sku OR description, case-insensitively
//! - `category` / `brand` match as case-insensitive substrings
//! - `is_active` is exact equality when present
//! - `low_stock` matches stock <= the record's own threshold OR stock <= 10
//! - every supplied group is AND-combined with the others; in particular
//!   `search` and `low_stock` are independent predicates
//! - sort field is allow-listed, falling back to created_at descending
//! - page >= 1, limit 1..=100 defaulting to 10, offset = (page - 1) * limit

use serde::Deserialize;

use crate::product::Product;

/// Hard cap on page size
pub const MAX_LIMIT: u32 = 100;

/// Page size when the caller does not supply one
pub const DEFAULT_LIMIT: u32 = 10;

/// Fallback low-stock cutoff for records with a high configured threshold
pub const LOW_STOCK_FALLBACK: i64 = 10;

/// Raw listing parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub low_stock: Option<bool>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub include_stats: Option<bool>,
}

/// Sortable fields (allow-list)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Sku,
    Price,
    Stock,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// Parse a sort field; anything outside the allow-list falls back to
    /// created_at.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("name") => SortKey::Name,
            Some("sku") => SortKey::Sku,
            Some("price") => SortKey::Price,
            Some("stock") => SortKey::Stock,
            Some("created_at") => SortKey::CreatedAt,
            Some("updated_at") => SortKey::UpdatedAt,
            _ => SortKey::CreatedAt,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse case-insensitively; invalid or absent falls back to DESC.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()) {
            Some(ref s) if s == "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Structured filter/sort/pagination descriptor
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
    pub low_stock: bool,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            brand: None,
            is_active: None,
            low_stock: false,
            sort_key: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductFilter {
    /// Build the descriptor from raw listing parameters.
    pub fn from_query(query: &ListQuery) -> Self {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Self {
            search: non_blank(query.search.as_deref()),
            category: non_blank(query.category.as_deref()),
            brand: non_blank(query.brand.as_deref()),
            is_active: query.is_active,
            low_stock: query.low_stock.unwrap_or(false),
            sort_key: SortKey::parse(query.sort_by.as_deref()),
            sort_order: SortOrder::parse(query.sort_order.as_deref()),
            page,
            limit,
        }
    }

    /// Row offset implied by page and limit
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Evaluate every supplied predicate group against one record.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle)
                || product
                    .description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            let hit = product
                .category
                .as_deref()
                .map(|c| c.to_lowercase().contains(&category.to_lowercase()))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some(brand) = &self.brand {
            let hit = product
                .brand
                .as_deref()
                .map(|b| b.to_lowercase().contains(&brand.to_lowercase()))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some(is_active) = self.is_active {
            if product.is_active != is_active {
                return false;
            }
        }

        if self.low_stock {
            let low = product.stock <= product.min_stock
                || product.stock <= LOW_STOCK_FALLBACK;
            if !low {
                return false;
            }
        }

        true
    }

    /// Order records in place per the sort directive.
    pub fn sort(&self, products: &mut [Product]) {
        products.sort_by(|a, b| {
            let ordering = match self.sort_key {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortKey::Sku => a.sku.cmp(&b.sku),
                SortKey::Price => a
                    .price
                    .partial_cmp(&b.price)
                    .unwrap_or(std::cmp::Ordering::Equal),
                SortKey::Stock => a.stock.cmp(&b.stock),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    /// Cut the page out of the full (sorted) match set.
    pub fn paginate(&self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect()
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
