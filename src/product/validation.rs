//! Declarative payload validation
//!
//! Field rules are data, not code: each payload kind has a table of
//! `FieldRule` entries consumed by a generic checker. Violations abort the
//! request before any handler logic runs.
//!
//! Rule sets:
//! - create / replace: name, sku, price required; everything else optional
//! - patch: every supplied field re-checked against the same constraints
//! - stock update: quantity must be a positive integer

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::model::{NewProduct, ProductPatch, StockUpdate};

/// Upper bound on name length
const NAME_MAX: usize = 255;
/// Bounds on SKU length
const SKU_MIN: usize = 2;
const SKU_MAX: usize = 50;
/// Upper bound on description length
const DESCRIPTION_MAX: usize = 1000;
/// Upper bound on category / brand length
const LABEL_MAX: usize = 100;
/// Upper bound on image URL length
const URL_MAX: usize = 500;

fn sku_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid SKU pattern"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://\S+$").expect("valid URL pattern"))
}

/// A single field violation, reported back to the caller
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: Value,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            value,
        }
    }
}

/// Constraints a field value can be checked against
#[derive(Debug, Clone, Copy)]
enum Constraint {
    /// Trimmed length within [min, max]
    LenRange(usize, usize),
    /// Trimmed length at most max (empty allowed)
    MaxLen(usize),
    /// Characters restricted to the SKU alphabet
    SkuChars,
    /// http(s) URL shape
    UrlShape,
    /// Numeric value must be >= 0
    NonNegative,
    /// Integer value must be > 0
    Positive,
}

impl Constraint {
    fn message(&self) -> String {
        match self {
            Constraint::LenRange(min, max) => {
                format!("must be between {} and {} characters", min, max)
            }
            Constraint::MaxLen(max) => format!("must be at most {} characters", max),
            Constraint::SkuChars => {
                "must contain only letters, digits, '-' and '_'".to_string()
            }
            Constraint::UrlShape => "must be a valid http(s) URL".to_string(),
            Constraint::NonNegative => "must not be negative".to_string(),
            Constraint::Positive => "must be a positive integer".to_string(),
        }
    }
}

/// Check a string field against a constraint list, appending violations.
fn check_str(field: &str, value: &str, constraints: &[Constraint], errors: &mut Vec<FieldError>) {
    let trimmed = value.trim();
    for constraint in constraints {
        let ok = match constraint {
            Constraint::LenRange(min, max) => {
                trimmed.chars().count() >= *min && trimmed.chars().count() <= *max
            }
            Constraint::MaxLen(max) => trimmed.chars().count() <= *max,
            Constraint::SkuChars => sku_pattern().is_match(trimmed),
            Constraint::UrlShape => url_pattern().is_match(trimmed),
            _ => true,
        };
        if !ok {
            errors.push(FieldError::new(field, constraint.message(), json!(value)));
        }
    }
}

/// Check a numeric field against a constraint list, appending violations.
fn check_num(field: &str, value: f64, constraints: &[Constraint], errors: &mut Vec<FieldError>) {
    for constraint in constraints {
        let ok = match constraint {
            Constraint::NonNegative => value >= 0.0,
            Constraint::Positive => value > 0.0,
            _ => true,
        };
        if !ok {
            errors.push(FieldError::new(field, constraint.message(), json!(value)));
        }
    }
}

// Rule tables shared by create and patch validation. A patch only applies a
// rule when the field is present.

const NAME_RULES: &[Constraint] = &[Constraint::LenRange(2, NAME_MAX)];
const SKU_RULES: &[Constraint] = &[Constraint::LenRange(SKU_MIN, SKU_MAX), Constraint::SkuChars];
const DESCRIPTION_RULES: &[Constraint] = &[Constraint::MaxLen(DESCRIPTION_MAX)];
const LABEL_RULES: &[Constraint] = &[Constraint::MaxLen(LABEL_MAX)];
const URL_RULES: &[Constraint] = &[Constraint::MaxLen(URL_MAX), Constraint::UrlShape];
const MONEY_RULES: &[Constraint] = &[Constraint::NonNegative];
const COUNT_RULES: &[Constraint] = &[Constraint::NonNegative];
const QUANTITY_RULES: &[Constraint] = &[Constraint::Positive];

/// Validate a create / full-replace payload.
pub fn validate_new_product(payload: &NewProduct) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    check_str("name", &payload.name, NAME_RULES, &mut errors);
    check_str("sku", &payload.sku, SKU_RULES, &mut errors);
    if let Some(description) = &payload.description {
        check_str("description", description, DESCRIPTION_RULES, &mut errors);
    }
    check_num("price", payload.price, MONEY_RULES, &mut errors);
    if let Some(cost) = payload.cost {
        check_num("cost", cost, MONEY_RULES, &mut errors);
    }
    if let Some(stock) = payload.stock {
        check_num("stock", stock as f64, COUNT_RULES, &mut errors);
    }
    if let Some(min_stock) = payload.min_stock {
        check_num("min_stock", min_stock as f64, COUNT_RULES, &mut errors);
    }
    if let Some(category) = &payload.category {
        check_str("category", category, LABEL_RULES, &mut errors);
    }
    if let Some(brand) = &payload.brand {
        check_str("brand", brand, LABEL_RULES, &mut errors);
    }
    if let Some(image_url) = &payload.image_url {
        check_str("image_url", image_url, URL_RULES, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a partial-update payload. Presence is decided by the handler;
/// this only checks the fields that were supplied.
pub fn validate_patch(patch: &ProductPatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(name) = &patch.name {
        check_str("name", name, NAME_RULES, &mut errors);
    }
    if let Some(sku) = &patch.sku {
        check_str("sku", sku, SKU_RULES, &mut errors);
    }
    if let Some(description) = &patch.description {
        check_str("description", description, DESCRIPTION_RULES, &mut errors);
    }
    if let Some(price) = patch.price {
        check_num("price", price, MONEY_RULES, &mut errors);
    }
    if let Some(cost) = patch.cost {
        check_num("cost", cost, MONEY_RULES, &mut errors);
    }
    if let Some(stock) = patch.stock {
        check_num("stock", stock as f64, COUNT_RULES, &mut errors);
    }
    if let Some(min_stock) = patch.min_stock {
        check_num("min_stock", min_stock as f64, COUNT_RULES, &mut errors);
    }
    if let Some(category) = &patch.category {
        check_str("category", category, LABEL_RULES, &mut errors);
    }
    if let Some(brand) = &patch.brand {
        check_str("brand", brand, LABEL_RULES, &mut errors);
    }
    if let Some(image_url) = &patch.image_url {
        check_str("image_url", image_url, URL_RULES, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a stock mutation payload. Rejects quantity <= 0 before either
/// operation branch runs.
pub fn validate_stock_update(payload: &StockUpdate) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_num("quantity", payload.quantity as f64, QUANTITY_RULES, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
