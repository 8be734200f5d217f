use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{parse_string_list, product::CatalogProduct, product_kind::ProductKind, to_string_list};

/// Phone record. Attribute columns are sparse: NULL and empty string
/// are valid states and surface as "Not Specified" downstream.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MobileProduct {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub price: i64, // minor-unit-free currency amount
    pub image_url: Option<String>,
    pub gallery_images: Option<String>, // JSON-serialized Vec<String>
    pub display: Option<String>,
    pub resolution: Option<String>,
    pub chipset: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub camera: Option<String>,
    pub front_camera: Option<String>,
    pub os: Option<String>,
    pub sim: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub network_bands: Option<String>, // JSON-serialized Vec<String>
    pub sensors: Option<String>,       // JSON-serialized Vec<String>
    pub nfc: Option<bool>,
    pub fast_charging: Option<bool>,
    pub fingerprint: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateMobileProduct {
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub gallery_images: Vec<String>,
    pub display: Option<String>,
    pub resolution: Option<String>,
    pub chipset: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub color: Option<String>,
    pub battery: Option<String>,
    pub camera: Option<String>,
    pub front_camera: Option<String>,
    pub os: Option<String>,
    pub sim: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub network_bands: Vec<String>,
    pub sensors: Vec<String>,
    pub nfc: Option<bool>,
    pub fast_charging: Option<bool>,
    pub fingerprint: Option<bool>,
}

impl CreateMobileProduct {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            price,
            ..Default::default()
        }
    }
}

impl MobileProduct {
    pub fn gallery(&self) -> Vec<String> {
        parse_string_list(self.gallery_images.as_deref())
    }

    pub fn network_band_list(&self) -> Vec<String> {
        parse_string_list(self.network_bands.as_deref())
    }

    pub fn sensor_list(&self) -> Vec<String> {
        parse_string_list(self.sensors.as_deref())
    }

    /// Store write used by the admin collaborator and test fixtures;
    /// the comparison core itself only reads.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateMobileProduct,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let gallery_images = to_string_list(&data.gallery_images);
        let network_bands = to_string_list(&data.network_bands);
        let sensors = to_string_list(&data.sensors);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO mobile_products (
                id, name, brand, price, image_url, gallery_images,
                display, resolution, chipset, ram, storage, color,
                battery, camera, front_camera, os, sim, weight,
                dimensions, network_bands, sensors, nfc, fast_charging,
                fingerprint
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        .bind(&data.chipset)
        .bind(&data.ram)
        .bind(&data.storage)
        .bind(&data.color)
        .bind(&data.battery)
        .bind(&data.camera)
        .bind(&data.front_camera)
        .bind(&data.os)
        .bind(&data.sim)
        .bind(&data.weight)
        .bind(&data.dimensions)
        .bind(network_bands)
        .bind(sensors)
        .bind(data.nfc)
        .bind(data.fast_charging)
        .bind(data.fingerprint)
        .fetch_one(pool)
        .await
    }
}

#[async_trait]
impl CatalogProduct for MobileProduct {
    const KIND: ProductKind = ProductKind::Mobile;

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
        sqlx::query_as::<_, Self>("SELECT * FROM mobile_products WHERE id = ?")
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
            r#"SELECT * FROM mobile_products
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
            r#"SELECT * FROM mobile_products
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    async fn memory_pool() -> SqlitePool {
        DBService::new("sqlite::memory:").await.unwrap().pool
    }

    #[tokio::test]
    async fn create_and_find_round_trip() {
        let pool = memory_pool().await;
        let id = Uuid::new_v4();
        let mut data = CreateMobileProduct::new("X1", "Acme", 49_999);
        data.storage = Some("128GB".to_string());
        data.sensors = vec!["Accelerometer".to_string(), "Gyro".to_string()];
        data.gallery_images = vec!["https://img.example/x1-front.jpg".to_string()];

        let created = MobileProduct::create(&pool, &data, id).await.unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.sensor_list(), vec!["Accelerometer", "Gyro"]);
        assert_eq!(created.gallery(), vec!["https://img.example/x1-front.jpg"]);

        let found = MobileProduct::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(found.name, "X1");
        assert_eq!(found.storage.as_deref(), Some("128GB"));
        assert_eq!(found.nfc, None);
    }

    #[tokio::test]
    async fn siblings_share_name_and_brand() {
        let pool = memory_pool().await;
        for (brand, storage) in [("Acme", "128GB"), ("Acme", "256GB"), ("Other", "128GB")] {
            let mut data = CreateMobileProduct::new("X1", brand, 0);
            data.storage = Some(storage.to_string());
            MobileProduct::create(&pool, &data, Uuid::new_v4())
                .await
                .unwrap();
        }

        let siblings = MobileProduct::find_siblings(&pool, "X1", "Acme").await.unwrap();
        assert_eq!(siblings.len(), 2);
        assert!(siblings.iter().all(|s| s.brand == "Acme"));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_excludes_id() {
        let pool = memory_pool().await;
        let anchor = MobileProduct::create(
            &pool,
            &CreateMobileProduct::new("Galaxy Prime", "Acme", 0),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        MobileProduct::create(
            &pool,
            &CreateMobileProduct::new("Galaxy Prime Plus", "Acme", 0),
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let hits = MobileProduct::search_by_name(&pool, "galaxy", anchor.id, 8)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Galaxy Prime Plus");
    }
}
