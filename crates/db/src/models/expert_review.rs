use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{parse_string_list, to_string_list};

/// Editorial review of one catalog product. A product may accumulate
/// several over time; consumers surface the most recent.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ExpertReview {
    pub id: Uuid,
    pub product_id: Uuid,
    pub rating: f64, // 0-10
    pub verdict: Option<String>,
    pub pros: Option<String>, // JSON-serialized Vec<String>
    pub cons: Option<String>, // JSON-serialized Vec<String>
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateExpertReview {
    pub product_id: Uuid,
    pub rating: f64,
    pub verdict: Option<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl ExpertReview {
    pub fn pro_list(&self) -> Vec<String> {
        parse_string_list(self.pros.as_deref())
    }

    pub fn con_list(&self) -> Vec<String> {
        parse_string_list(self.cons.as_deref())
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateExpertReview,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let pros = to_string_list(&data.pros);
        let cons = to_string_list(&data.cons);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO expert_reviews (id, product_id, rating, verdict, pros, cons)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.product_id)
        .bind(data.rating)
        .bind(&data.verdict)
        .bind(pros)
        .bind(cons)
        .fetch_one(pool)
        .await
    }

    pub async fn find_latest_by_product_id(
        pool: &SqlitePool,
        product_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM expert_reviews
               WHERE product_id = ?
               ORDER BY created_at DESC
               LIMIT 1"#,
        )
        .bind(product_id)
        .fetch_optional(pool)
        .await
    }

    /// One `product_id IN (...)` round-trip for a whole slot set,
    /// newest first. Callers keep the first row they see per product.
    pub async fn find_for_products(
        pool: &SqlitePool,
        product_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM expert_reviews WHERE product_id IN (");
        let mut separated = builder.separated(", ");
        for id in product_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        builder.push(" ORDER BY created_at DESC");

        builder.build_query_as::<Self>().fetch_all(pool).await
    }
}
