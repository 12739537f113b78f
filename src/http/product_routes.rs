//! Product HTTP Routes
//!
//! One handler per operation. Each handler is a linear sequence:
//! validate -> build filter (listings) -> repository call -> format ->
//! envelope. Concurrency discipline (racing creates on one SKU) is the
//! repository's problem, not ours.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::envelope::{ApiResponse, Meta, PaginationMeta};
use super::errors::{ApiError, ApiResult};
use super::AppState;
use crate::format::{format_list, ProductView};
use crate::product::{
    validate_new_product, validate_patch, validate_stock_update, NewProduct, Product,
    ProductPatch, StockOperation, StockUpdate,
};
use crate::query::{ListQuery, ProductFilter};
use crate::report::{category_breakdown, generate_report, CategoryBreakdown, InventoryStats, Report, ReportType};

/// Maximum number of quick-search matches returned
const SEARCH_LIMIT: u32 = 20;

/// Minimum quick-search term length
const SEARCH_MIN_CHARS: usize = 2;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: Option<String>,
}

/// Movement summary returned alongside a stock mutation
#[derive(Debug, Serialize)]
pub struct StockMovement {
    pub previous_stock: i64,
    pub current_stock: i64,
    pub operation: &'static str,
    pub quantity: i64,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StockUpdateResponse {
    pub product: ProductView,
    pub movement: StockMovement,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: InventoryStats,
    pub by_category: Vec<CategoryBreakdown>,
}

// ==================
// Product Routes
// ==================

/// Create product routes (nested under /api/products)
pub fn product_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_products_handler).post(create_product_handler))
        .route("/stats", get(stats_handler))
        .route("/search", get(search_handler))
        .route("/reports/:report_type", get(report_handler))
        .route(
            "/:id",
            get(get_product_handler)
                .put(replace_product_handler)
                .patch(patch_product_handler)
                .delete(delete_product_handler),
        )
        .route("/:id/stock", patch(stock_update_handler))
        .route("/:id/restore", post(restore_product_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid product id: {}", raw)))
}

// ==================
// Listing Handlers
// ==================

async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ProductView>>>> {
    let filter = ProductFilter::from_query(&query);
    let (page, total) = state.repo.list(&filter);

    let stats = if query.include_stats.unwrap_or(false) {
        let matching: Vec<Product> = state
            .repo
            .all_live()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        Some(InventoryStats::compute(&matching))
    } else {
        None
    };

    let meta = Meta {
        pagination: Some(PaginationMeta::new(filter.page, filter.limit, total)),
        stats,
    };

    Ok(Json(ApiResponse::ok_with_meta(
        "products retrieved",
        format_list(&page),
        meta,
    )))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ApiResponse<Vec<ProductView>>>> {
    let term = params.search.as_deref().map(str::trim).unwrap_or("");
    if term.chars().count() < SEARCH_MIN_CHARS {
        return Err(ApiError::BadRequest(format!(
            "search term must be at least {} characters",
            SEARCH_MIN_CHARS
        )));
    }

    let filter = ProductFilter {
        search: Some(term.to_string()),
        limit: SEARCH_LIMIT,
        ..Default::default()
    };
    let (matches, _) = state.repo.list(&filter);

    Ok(Json(ApiResponse::ok(
        "search results",
        format_list(&matches),
    )))
}

// ==================
// CRUD Handlers
// ==================

async fn get_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ProductView>>> {
    let id = parse_id(&id)?;
    let product = state.repo.find(id)?;
    Ok(Json(ApiResponse::ok(
        "product retrieved",
        ProductView::from(&product),
    )))
}

async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ProductView>>)> {
    validate_new_product(&payload).map_err(ApiError::Validation)?;

    let created = state.repo.insert(Product::from_new(payload))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "product created",
            ProductView::from(&created),
        )),
    ))
}

async fn replace_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<Json<ApiResponse<ProductView>>> {
    let id = parse_id(&id)?;
    validate_new_product(&payload).map_err(ApiError::Validation)?;

    let mut product = state.repo.find(id)?;
    product.apply_replace(payload);
    let updated = state.repo.update(product)?;

    Ok(Json(ApiResponse::ok(
        "product updated",
        ProductView::from(&updated),
    )))
}

async fn patch_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> ApiResult<Json<ApiResponse<ProductView>>> {
    let id = parse_id(&id)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "update body cannot be empty".to_string(),
        ));
    }
    validate_patch(&patch).map_err(ApiError::Validation)?;

    let mut product = state.repo.find(id)?;
    product.apply_patch(&patch);
    let updated = state.repo.update(product)?;

    Ok(Json(ApiResponse::ok(
        "product updated",
        ProductView::from(&updated),
    )))
}

async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.repo.soft_delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ProductView>>> {
    let id = parse_id(&id)?;
    let restored = state.repo.restore(id)?;
    Ok(Json(ApiResponse::ok(
        "product restored",
        ProductView::from(&restored),
    )))
}

// ==================
// Stock Handler
// ==================

async fn stock_update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<StockUpdate>,
) -> ApiResult<Json<ApiResponse<StockUpdateResponse>>> {
    let id = parse_id(&id)?;
    validate_stock_update(&payload).map_err(ApiError::Validation)?;

    let mut product = state.repo.find(id)?;
    let previous_stock = product.stock;

    match payload.operation {
        StockOperation::Add => {
            product.stock = previous_stock.checked_add(payload.quantity).ok_or_else(|| {
                ApiError::BadRequest("quantity exceeds representable stock".to_string())
            })?;
        }
        StockOperation::Subtract => {
            if previous_stock < payload.quantity {
                return Err(ApiError::InsufficientStock {
                    available: previous_stock,
                    requested: payload.quantity,
                });
            }
            product.stock = previous_stock - payload.quantity;
        }
    }
    product.updated_at = Utc::now();

    let updated = state.repo.update(product)?;

    let movement = StockMovement {
        previous_stock,
        current_stock: updated.stock,
        operation: payload.operation.as_str(),
        quantity: payload.quantity,
        reason: payload.reason,
        timestamp: updated.updated_at,
    };

    Ok(Json(ApiResponse::ok(
        "stock updated",
        StockUpdateResponse {
            product: ProductView::from(&updated),
            movement,
        },
    )))
}

// ==================
// Stats and Report Handlers
// ==================

async fn stats_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<StatsResponse>>> {
    let live = state.repo.all_live();
    let response = StatsResponse {
        stats: InventoryStats::compute(&live),
        by_category: category_breakdown(&live),
    };
    Ok(Json(ApiResponse::ok("inventory statistics", response)))
}

async fn report_handler(
    State(state): State<Arc<AppState>>,
    Path(report_type): Path<String>,
) -> ApiResult<Json<ApiResponse<Report>>> {
    let report_type = ReportType::parse(&report_type).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "unknown report type '{}' (valid: {})",
            report_type,
            ReportType::valid_types()
        ))
    })?;

    let report = generate_report(report_type, &state.repo.all_live());
    Ok(Json(ApiResponse::ok("report generated", report)))
}
