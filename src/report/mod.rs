//! # Aggregate Statistics and Reports
//!
//! Pure calculations over an in-memory collection of records: global
//! inventory stats, the per-category breakdown behind the stats endpoint,
//! and the four named report views.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::format::{format_list, ProductView};
use crate::product::Product;

/// Stock value above which a record counts as high-value
pub const HIGH_VALUE_CUTOFF: f64 = 1000.0;

/// Summary statistics over a set of records
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryStats {
    pub total_products: usize,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub categories: usize,
    pub brands: usize,
}

impl InventoryStats {
    /// Compute stats over a collection. Empty input yields all zeros.
    pub fn compute(products: &[Product]) -> Self {
        let total_value: f64 = products.iter().map(Product::stock_value).sum();

        let categories: HashSet<&str> = products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| !c.trim().is_empty())
            .collect();
        let brands: HashSet<&str> = products
            .iter()
            .filter_map(|p| p.brand.as_deref())
            .filter(|b| !b.trim().is_empty())
            .collect();

        Self {
            total_products: products.len(),
            total_value: round2(total_value),
            low_stock_count: products.iter().filter(|p| p.needs_restock()).count(),
            out_of_stock_count: products.iter().filter(|p| p.is_out_of_stock()).count(),
            categories: categories.len(),
            brands: brands.len(),
        }
    }
}

/// Per-category slice of the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub stock_value: f64,
}

/// Group records by category. Records without a category land in an
/// "uncategorized" bucket; output is ordered by category name.
pub fn category_breakdown(products: &[Product]) -> Vec<CategoryBreakdown> {
    let mut buckets: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for product in products {
        let key = product
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("uncategorized")
            .to_string();
        let entry = buckets.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += product.stock_value();
    }
    buckets
        .into_iter()
        .map(|(category, (count, value))| CategoryBreakdown {
            category,
            count,
            stock_value: round2(value),
        })
        .collect()
}

/// The four named report views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Inventory,
    LowStock,
    OutOfStock,
    HighValue,
}

impl ReportType {
    /// Parse a report type from its route segment
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "inventory" => Some(ReportType::Inventory),
            "low_stock" => Some(ReportType::LowStock),
            "out_of_stock" => Some(ReportType::OutOfStock),
            "high_value" => Some(ReportType::HighValue),
            _ => None,
        }
    }

    /// Human-readable report title
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Inventory => "Full Inventory Report",
            ReportType::LowStock => "Low Stock Report",
            ReportType::OutOfStock => "Out of Stock Report",
            ReportType::HighValue => "High Value Stock Report",
        }
    }

    /// Valid route segments, for error messages
    pub fn valid_types() -> &'static str {
        "inventory, low_stock, out_of_stock, high_value"
    }
}

/// A generated report: the filtered subset plus stats recomputed over it
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_type: ReportType,
    pub title: String,
    pub count: usize,
    pub stats: InventoryStats,
    pub items: Vec<ProductView>,
}

/// Build the named report over a collection of live records.
pub fn generate_report(report_type: ReportType, products: &[Product]) -> Report {
    let mut subset: Vec<Product> = match report_type {
        ReportType::Inventory => products.to_vec(),
        ReportType::LowStock => products
            .iter()
            .filter(|p| p.needs_restock())
            .cloned()
            .collect(),
        ReportType::OutOfStock => products
            .iter()
            .filter(|p| p.is_out_of_stock())
            .cloned()
            .collect(),
        ReportType::HighValue => products
            .iter()
            .filter(|p| p.stock_value() > HIGH_VALUE_CUTOFF)
            .cloned()
            .collect(),
    };

    if report_type == ReportType::HighValue {
        subset.sort_by(|a, b| {
            b.stock_value()
                .partial_cmp(&a.stock_value())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    Report {
        report_type,
        title: report_type.title().to_string(),
        count: subset.len(),
        stats: InventoryStats::compute(&subset),
        items: format_list(&subset),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::NewProduct;

    fn product(name: &str, price: f64, stock: i64, category: Option<&str>) -> Product {
        Product::from_new(NewProduct {
            name: name.to_string(),
            sku: format!("{}-SKU", name.to_uppercase()),
            description: None,
            price,
            cost: None,
            stock: Some(stock),
            min_stock: Some(5),
            category: category.map(str::to_string),
            brand: Some("Acme".to_string()),
            is_active: None,
            image_url: None,
        })
    }

    #[test]
    fn test_empty_input_yields_zeros() {
        let stats = InventoryStats::compute(&[]);
        assert_eq!(
            stats,
            InventoryStats {
                total_products: 0,
                total_value: 0.0,
                low_stock_count: 0,
                out_of_stock_count: 0,
                categories: 0,
                brands: 0,
            }
        );
    }

    #[test]
    fn test_stats_totals_and_rounding() {
        let items = vec![
            product("Widget", 9.99, 3, Some("Tools")),
            product("Gadget", 0.10, 7, Some("Tools")),
            product("Doodad", 5.00, 0, Some("Toys")),
        ];
        let stats = InventoryStats::compute(&items);
        assert_eq!(stats.total_products, 3);
        // 29.97 + 0.70 + 0.00
        assert_eq!(stats.total_value, 30.67);
        assert_eq!(stats.low_stock_count, 2); // stock 3 and stock 0
        assert_eq!(stats.out_of_stock_count, 1);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.brands, 1);
    }

    #[test]
    fn test_category_breakdown_buckets_missing_category() {
        let items = vec![
            product("Widget", 10.0, 2, Some("Tools")),
            product("Gadget", 10.0, 3, Some("Tools")),
            product("Mystery", 1.0, 4, None),
        ];
        let breakdown = category_breakdown(&items);
        assert_eq!(breakdown.len(), 2);

        let tools = breakdown.iter().find(|b| b.category == "Tools").unwrap();
        assert_eq!(tools.count, 2);
        assert_eq!(tools.stock_value, 50.0);

        assert!(breakdown.iter().any(|b| b.category == "uncategorized"));
    }

    #[test]
    fn test_report_type_parsing() {
        assert_eq!(ReportType::parse("inventory"), Some(ReportType::Inventory));
        assert_eq!(ReportType::parse("high_value"), Some(ReportType::HighValue));
        assert_eq!(ReportType::parse("weekly"), None);
    }

    #[test]
    fn test_high_value_report_filters_and_sorts() {
        let items = vec![
            product("Bulk", 2.0, 600, None),    // 1200
            product("Cheap", 1.0, 100, None),   // 100
            product("Premium", 50.0, 100, None), // 5000
            product("Edge", 10.0, 100, None),   // exactly 1000, excluded
        ];
        let report = generate_report(ReportType::HighValue, &items);
        assert_eq!(report.count, 2);
        assert_eq!(report.items[0].name, "Premium");
        assert_eq!(report.items[1].name, "Bulk");
        assert_eq!(report.stats.total_products, 2);
        assert_eq!(report.title, "High Value Stock Report");
    }

    #[test]
    fn test_low_stock_report_recomputes_stats_over_subset() {
        let items = vec![
            product("Scarce", 10.0, 2, Some("Tools")),
            product("Plenty", 10.0, 100, Some("Toys")),
        ];
        let report = generate_report(ReportType::LowStock, &items);
        assert_eq!(report.count, 1);
        assert_eq!(report.stats.total_products, 1);
        assert_eq!(report.stats.categories, 1);
    }

    #[test]
    fn test_inventory_report_includes_everything() {
        let items = vec![
            product("A", 1.0, 1, None),
            product("B", 1.0, 2, None),
        ];
        let report = generate_report(ReportType::Inventory, &items);
        assert_eq!(report.count, 2);
    }
}
