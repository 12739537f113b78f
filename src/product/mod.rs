//! # Product Domain
//!
//! The single entity managed by stockroom, plus the declarative
//! validation rules applied to inbound payloads.
//!
//! The `Product` record itself is inert: persistence lives behind the
//! repository trait in `crate::store`, and derived wire fields live in
//! `crate::format`.

pub mod model;
pub mod validation;

pub use model::{NewProduct, Product, ProductPatch, StockOperation, StockUpdate};
pub use validation::{
    validate_new_product, validate_patch, validate_stock_update, FieldError,
};
