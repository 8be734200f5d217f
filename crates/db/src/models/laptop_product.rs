use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{parse_string_list, product::CatalogProduct, product_kind::ProductKind, to_string_list};

/// Laptop record, sparse like its mobile counterpart.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct LaptopProduct {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub gallery_images: Option<String>, // JSON-serialized Vec<String>
    pub display: Option<String>,
    pub resolution: Option<String>,
    pub processor: Option<String>,
    pub graphics: Option<String>,
    pub ram: Option<String>,
    pub ram_type: Option<String>,
    pub storage: Option<String>,
    pub storage_type: Option<String>,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub os: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub ports: Option<String>, // JSON-serialized Vec<String>
    pub webcam: Option<bool>,
    pub backlit_keyboard: Option<bool>,
    pub touchscreen: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateLaptopProduct {
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub gallery_images: Vec<String>,
    pub display: Option<String>,
    pub resolution: Option<String>,
    pub processor: Option<String>,
    pub graphics: Option<String>,
    pub ram: Option<String>,
    pub ram_type: Option<String>,
    pub storage: Option<String>,
    pub storage_type: Option<String>,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub os: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub ports: Vec<String>,
    pub webcam: Option<bool>,
    pub backlit_keyboard: Option<bool>,
    pub touchscreen: Option<bool>,
}

impl CreateLaptopProduct {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            price,
            ..Default::default()
        }
    }
}

impl LaptopProduct {
    pub fn gallery(&self) -> Vec<String> {
        parse_string_list(self.gallery_images.as_deref())
    }

    pub fn port_list(&self) -> Vec<String> {
        parse_string_list(self.ports.as_deref())
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateLaptopProduct,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let gallery_images = to_string_list(&data.gallery_images);
        let ports = to_string_list(&data.ports);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO laptop_products (
                id, name, brand, price, image_url, gallery_images,
                display, resolution, processor, graphics, ram, ram_type,
                storage, storage_type, color, battery, os, weight,
                dimensions, ports, webcam, backlit_keyboard, touchscreen
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.brand)
        .bind(data.price)
        .bind(&data.image_url)
        .bind(gallery_images)
        .bind(&data.display)
        .bind(&data.resolution)
        .bind(&data.processor)
        .bind(&data.graphics)
        .bind(&data.ram)
        .bind(&data.ram_type)
        .bind(&data.storage)
        .bind(&data.storage_type)
        .bind(&data.color)
        .bind(&data.battery)
        .bind(&data.os)
        .bind(&data.weight)
        .bind(&data.dimensions)
        .bind(ports)
        .bind(data.webcam)
        .bind(data.backlit_keyboard)
        .bind(data.touchscreen)
        .fetch_one(pool)
        .await
    }
}

#[async_trait]
impl CatalogProduct for LaptopProduct {
    const KIND: ProductKind = ProductKind::Laptop;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn brand(&self) -> &str {
        &self.brand
    }

    fn price(&self) -> i64 {
        self.price
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn storage(&self) -> Option<&str> {
        self.storage.as_deref()
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM laptop_products WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn find_siblings(
        pool: &SqlitePool,
        name: &str,
        brand: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM laptop_products
               WHERE name = ? AND brand = ?
               ORDER BY price ASC, created_at ASC"#,
        )
        .bind(name)
        .bind(brand)
        .fetch_all(pool)
        .await
    }

    async fn search_by_name(
        pool: &SqlitePool,
        query: &str,
        exclude: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM laptop_products
               WHERE name LIKE '%' || ? || '%' AND id != ?
               ORDER BY name COLLATE NOCASE ASC
               LIMIT ?"#,
        )
        .bind(query)
        .bind(exclude)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
