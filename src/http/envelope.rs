//! # Response Envelope
//!
//! Every JSON response uses the same shape:
//! `{success, message, data?, errors?, meta?}` with optional pagination and
//! stats metadata.

use serde::Serialize;

use crate::product::FieldError;
use crate::report::InventoryStats;

/// Uniform response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            meta: None,
        }
    }

    /// Successful response with payload and metadata
    pub fn ok_with_meta(message: impl Into<String>, data: T, meta: Meta) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            meta: Some(meta),
        }
    }

    /// Failed response, optionally carrying field-level detail
    pub fn fail(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
            meta: None,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<InventoryStats>,
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl PaginationMeta {
    /// Derive the full metadata block from page, page size and match count.
    pub fn new(current_page: u32, per_page: u32, total_items: usize) -> Self {
        let total_pages = (total_items as u32).div_ceil(per_page);
        let has_next_page = current_page < total_pages;
        let has_prev_page = current_page > 1;
        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| current_page + 1),
            prev_page: has_prev_page.then(|| current_page - 1),
        }
    }
}
