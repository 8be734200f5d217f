use axum::Router;
use db::models::{
    laptop_product::LaptopProduct,
    mobile_product::MobileProduct,
    product::CatalogProduct,
    product_kind::ProductKind,
};
use services::services::session_state::AnyProduct;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::state::AppState;

pub mod comparisons;
pub mod products;

pub(crate) async fn fetch_product(
    pool: &SqlitePool,
    kind: ProductKind,
    id: Uuid,
) -> Result<Option<AnyProduct>, sqlx::Error> {
    Ok(match kind {
        ProductKind::Mobile => MobileProduct::find_by_id(pool, id)
            .await?
            .map(AnyProduct::Mobile),
        ProductKind::Laptop => LaptopProduct::find_by_id(pool, id)
            .await?
            .map(AnyProduct::Laptop),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(comparisons::router())
                .merge(products::router()),
        )
        .with_state(state)
}
