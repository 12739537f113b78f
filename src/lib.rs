//! stockroom - a small, strict inventory and product management REST API
//!
//! A thin HTTP layer over a single product table: CRUD with soft delete
//! and restore, stock mutations, filtered/paginated listings, aggregate
//! statistics and named reports.

pub mod cli;
pub mod config;
pub mod format;
pub mod http;
pub mod observability;
pub mod product;
pub mod query;
pub mod report;
pub mod store;
