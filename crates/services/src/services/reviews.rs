//! Batched expert-review lookup for the products in a comparison.

use std::collections::HashMap;

use db::models::expert_review::ExpertReview;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Reviews for one slot set. Built from a single `product_id IN (...)`
/// query: a per-product fetch inside the render loop would multiply
/// store round-trips by slot count.
#[derive(Debug, Default)]
pub struct ReviewLookup {
    by_product: HashMap<Uuid, ExpertReview>,
}

impl ReviewLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub async fn fetch(pool: &SqlitePool, product_ids: &[Uuid]) -> Result<Self, sqlx::Error> {
        let rows = ExpertReview::find_for_products(pool, product_ids).await?;
        let mut by_product = HashMap::new();
        for review in rows {
            // Rows arrive newest first; the first seen per product wins.
            by_product.entry(review.product_id).or_insert(review);
        }
        Ok(Self { by_product })
    }

    pub fn get(&self, product_id: Uuid) -> Option<&ExpertReview> {
        self.by_product.get(&product_id)
    }

    pub fn len(&self) -> usize {
        self.by_product.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_product.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use db::{DBService, models::expert_review::CreateExpertReview};

    use super::*;

    #[tokio::test]
    async fn latest_review_wins_per_product() {
        let pool = DBService::new("sqlite::memory:").await.unwrap().pool;
        let product_id = Uuid::new_v4();

        for (rating, verdict) in [(6.0, "early look"), (8.0, "final word")] {
            ExpertReview::create(
                &pool,
                &CreateExpertReview {
                    product_id,
                    rating,
                    verdict: Some(verdict.to_string()),
                    pros: vec![],
                    cons: vec![],
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
            // Distinct created_at timestamps for a deterministic order.
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        let lookup = ReviewLookup::fetch(&pool, &[product_id]).await.unwrap();
        assert_eq!(lookup.len(), 1);
        let review = lookup.get(product_id).unwrap();
        assert_eq!(review.verdict.as_deref(), Some("final word"));
    }

    #[tokio::test]
    async fn products_without_reviews_read_as_none() {
        let pool = DBService::new("sqlite::memory:").await.unwrap().pool;
        let lookup = ReviewLookup::fetch(&pool, &[Uuid::new_v4()]).await.unwrap();
        assert!(lookup.is_empty());
        assert!(lookup.get(Uuid::new_v4()).is_none());
    }
}
