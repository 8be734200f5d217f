//! Routes for product detail and variant resolution. Variant swaps are
//! independent of any comparison session: swapping the displayed
//! storage or color never touches session slots.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::product_kind::ProductKind;
use serde::Deserialize;
use services::services::{
    session_state::AnyProduct,
    variants::{self, VariantAxes},
};
use sqlx::SqlitePool;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Deserialize, TS)]
pub struct ResolveVariantRequest {
    pub storage: Option<String>,
    pub color: Option<String>,
}

/// GET /api/products/{kind}/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ProductKind, Uuid)>,
) -> Result<ResponseJson<ApiResponse<AnyProduct>>, ApiError> {
    let product = super::fetch_product(state.pool(), kind, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

async fn axes_for(pool: &SqlitePool, product: &AnyProduct) -> Result<VariantAxes, sqlx::Error> {
    match product {
        AnyProduct::Mobile(p) => {
            let group = variants::siblings(pool, p).await?;
            Ok(variants::axes(&group))
        }
        AnyProduct::Laptop(p) => {
            let group = variants::siblings(pool, p).await?;
            Ok(variants::axes(&group))
        }
    }
}

/// GET /api/products/{kind}/{id}/variants
/// The distinct storage and color options across the sibling group.
pub async fn get_variants(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ProductKind, Uuid)>,
) -> Result<ResponseJson<ApiResponse<VariantAxes>>, ApiError> {
    let product = super::fetch_product(state.pool(), kind, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    let axes = axes_for(state.pool(), &product).await?;
    Ok(ResponseJson(ApiResponse::success(axes)))
}

/// POST /api/products/{kind}/{id}/variants/resolve
/// The sibling matching the requested axis change, holding the current
/// value on the untouched axis. `null` data means no such record
/// exists and the caller keeps its prior selection.
pub async fn resolve_variant(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ProductKind, Uuid)>,
    axum::Json(payload): axum::Json<ResolveVariantRequest>,
) -> Result<ResponseJson<ApiResponse<Option<AnyProduct>>>, ApiError> {
    let product = super::fetch_product(state.pool(), kind, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    let resolved = match &product {
        AnyProduct::Mobile(p) => {
            let group = variants::siblings(state.pool(), p).await?;
            variants::resolve(
                &group,
                p,
                payload.storage.as_deref(),
                payload.color.as_deref(),
            )
            .cloned()
            .map(AnyProduct::Mobile)
        }
        AnyProduct::Laptop(p) => {
            let group = variants::siblings(state.pool(), p).await?;
            variants::resolve(
                &group,
                p,
                payload.storage.as_deref(),
                payload.color.as_deref(),
            )
            .cloned()
            .map(AnyProduct::Laptop)
        }
    };

    Ok(ResponseJson(ApiResponse::success(resolved)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/products/{kind}/{id}",
        Router::new()
            .route("/", get(get_product))
            .route("/variants", get(get_variants))
            .route("/variants/resolve", post(resolve_variant)),
    )
}
