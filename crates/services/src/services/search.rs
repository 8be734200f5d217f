//! Candidate lookup for adding products to a comparison.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use db::models::product::CatalogProduct;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub const MAX_RESULTS: i64 = 8;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("store fetch failed: {0}")]
    Transient(String),
    #[error("store fetch timed out")]
    Timeout,
}

impl SearchError {
    /// Transient store errors are retried in place; a timeout is
    /// surfaced to the caller, which owns the retry affordance.
    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// A blank query is a distinct state from a query with no matches: the
/// UI shows "type to search" for one and "no results" for the other.
#[derive(Debug, Clone)]
pub enum SearchOutcome<P> {
    EmptyQuery,
    Results(Vec<P>),
}

#[async_trait]
pub trait SearchProvider<P>: Send + Sync {
    /// Case-insensitive substring match on product name, capped at
    /// [`MAX_RESULTS`], excluding the anchor id. Slots already in the
    /// session are filtered at `add`, not here.
    async fn search(&self, query: &str, exclude: Uuid) -> Result<Vec<P>, SearchError>;
}

/// Search provider backed by the catalog store.
#[derive(Clone)]
pub struct StoreSearchProvider {
    pool: SqlitePool,
}

impl StoreSearchProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<P: CatalogProduct> SearchProvider<P> for StoreSearchProvider {
    async fn search(&self, query: &str, exclude: Uuid) -> Result<Vec<P>, SearchError> {
        let fetch = || async {
            P::search_by_name(&self.pool, query, exclude, MAX_RESULTS)
                .await
                .map_err(|e| SearchError::Transient(e.to_string()))
        };

        let retried = fetch
            .retry(
                &ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(100))
                    .with_max_delay(Duration::from_secs(2))
                    .with_max_times(2)
                    .with_jitter(),
            )
            .when(|e: &SearchError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    "catalog search failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            });

        tokio::time::timeout(FETCH_TIMEOUT, retried)
            .await
            .map_err(|_| SearchError::Timeout)?
    }
}

/// Entry point used by the comparison view's search box.
pub async fn find_candidates<P>(
    provider: &dyn SearchProvider<P>,
    query: &str,
    exclude_anchor: Uuid,
) -> Result<SearchOutcome<P>, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Ok(SearchOutcome::EmptyQuery);
    }
    provider
        .search(trimmed, exclude_anchor)
        .await
        .map(SearchOutcome::Results)
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::mobile_product::{CreateMobileProduct, MobileProduct},
    };

    use super::*;

    #[tokio::test]
    async fn blank_queries_do_not_hit_the_store() {
        let pool = DBService::new("sqlite::memory:").await.unwrap().pool;
        let provider = StoreSearchProvider::new(pool);

        let outcome: SearchOutcome<MobileProduct> =
            find_candidates(&provider, "   ", Uuid::new_v4()).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::EmptyQuery));
    }

    #[tokio::test]
    async fn results_exclude_the_anchor() {
        let pool = DBService::new("sqlite::memory:").await.unwrap().pool;
        let anchor = MobileProduct::create(
            &pool,
            &CreateMobileProduct::new("Nova 5", "Acme", 0),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        MobileProduct::create(
            &pool,
            &CreateMobileProduct::new("Nova 5 Pro", "Acme", 0),
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let provider = StoreSearchProvider::new(pool);
        let outcome: SearchOutcome<MobileProduct> =
            find_candidates(&provider, "nova", anchor.id).await.unwrap();

        match outcome {
            SearchOutcome::Results(hits) => {
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0].name, "Nova 5 Pro");
            }
            SearchOutcome::EmptyQuery => panic!("expected results"),
        }
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_result_set_not_empty_query() {
        let pool = DBService::new("sqlite::memory:").await.unwrap().pool;
        let provider = StoreSearchProvider::new(pool);

        let outcome: SearchOutcome<MobileProduct> =
            find_candidates(&provider, "nothing", Uuid::new_v4())
                .await
                .unwrap();
        assert!(matches!(outcome, SearchOutcome::Results(hits) if hits.is_empty()));
    }
}
