use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::product_kind::ProductKind;

/// Uniform surface over the catalog record kinds: the identity and
/// purchasable-axis fields the comparison engine reads, plus the store
/// queries it issues. Everything else stays on the concrete record and
/// is reached through the kind's taxonomy accessors.
#[async_trait]
pub trait CatalogProduct: Clone + Send + Sync + Unpin + 'static {
    const KIND: ProductKind;

    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn brand(&self) -> &str;
    fn price(&self) -> i64;
    fn image_url(&self) -> Option<&str>;
    fn storage(&self) -> Option<&str>;
    fn color(&self) -> Option<&str>;

    async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error>;

    /// All records of the same kind sharing `(name, brand)` with the
    /// given product, the anchor included.
    async fn find_siblings(
        pool: &SqlitePool,
        name: &str,
        brand: &str,
    ) -> Result<Vec<Self>, sqlx::Error>;

    /// Case-insensitive substring match on `name`, excluding one id.
    async fn search_by_name(
        pool: &SqlitePool,
        query: &str,
        exclude: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>;
}
