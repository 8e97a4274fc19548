use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::homes::models::{Home, HomeListing, HomePatch, Image, NewHome, RealtorContact};
use crate::homes::query::{FilterParam, HomeFilter, HomeQueryBuilder};

/// Storage for listings and their images
#[async_trait]
pub trait HomeRepository: Send + Sync {
    /// Listings matching every present filter condition, in id order
    async fn list(&self, filter: &HomeFilter) -> Result<Vec<HomeListing>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Home>, ApiError>;
    /// Images of a listing in insertion order
    async fn images_for(&self, home_id: i32) -> Result<Vec<Image>, ApiError>;
    async fn realtor_of(&self, home_id: i32) -> Result<Option<RealtorContact>, ApiError>;
    /// Insert a listing and its images atomically
    async fn create(&self, home: NewHome, image_urls: Vec<String>) -> Result<(Home, Vec<Image>), ApiError>;
    /// Apply a patch; returns None when the listing does not exist
    async fn update(&self, id: i32, patch: HomePatch) -> Result<Option<Home>, ApiError>;
    /// Delete a listing and its images atomically; returns whether it existed
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Postgres-backed listing repository
#[derive(Clone)]
pub struct PgHomeRepository {
    pool: PgPool,
}

impl PgHomeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const HOME_COLUMNS: &str = "id, address, number_of_bedrooms, number_of_bathrooms, city, listed_date, \
     price, land_size, property_type, realtor_id, created_at, updated_at";

#[async_trait]
impl HomeRepository for PgHomeRepository {
    async fn list(&self, filter: &HomeFilter) -> Result<Vec<HomeListing>, ApiError> {
        let (sql, params) = HomeQueryBuilder::from_filter(filter).build();
        tracing::debug!("Listing homes: {}", sql);

        let mut query = sqlx::query_as::<_, HomeListing>(&sql);
        for param in params {
            query = match param {
                FilterParam::Text(value) => query.bind(value),
                FilterParam::Price(value) => query.bind(value),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Home>, ApiError> {
        let home = sqlx::query_as::<_, Home>(&format!(
            "SELECT {} FROM homes WHERE id = $1",
            HOME_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(home)
    }

    async fn images_for(&self, home_id: i32) -> Result<Vec<Image>, ApiError> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT id, url, home_id, created_at FROM images WHERE home_id = $1 ORDER BY id",
        )
        .bind(home_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn realtor_of(&self, home_id: i32) -> Result<Option<RealtorContact>, ApiError> {
        let realtor = sqlx::query_as::<_, RealtorContact>(
            "SELECT u.id, u.name, u.email, u.phone FROM homes h \
             JOIN users u ON u.id = h.realtor_id WHERE h.id = $1",
        )
        .bind(home_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(realtor)
    }

    async fn create(&self, home: NewHome, image_urls: Vec<String>) -> Result<(Home, Vec<Image>), ApiError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Home>(&format!(
            "INSERT INTO homes (address, number_of_bedrooms, number_of_bathrooms, city, price, \
             land_size, property_type, realtor_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            HOME_COLUMNS
        ))
        .bind(&home.address)
        .bind(home.number_of_bedrooms)
        .bind(home.number_of_bathrooms)
        .bind(&home.city)
        .bind(home.price)
        .bind(home.land_size)
        .bind(home.property_type)
        .bind(home.realtor_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let image = sqlx::query_as::<_, Image>(
                "INSERT INTO images (url, home_id) VALUES ($1, $2) \
                 RETURNING id, url, home_id, created_at",
            )
            .bind(url)
            .bind(created.id)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image);
        }

        tx.commit().await?;
        Ok((created, images))
    }

    async fn update(&self, id: i32, patch: HomePatch) -> Result<Option<Home>, ApiError> {
        let updated = sqlx::query_as::<_, Home>(&format!(
            "UPDATE homes SET \
             address = COALESCE($2, address), \
             number_of_bedrooms = COALESCE($3, number_of_bedrooms), \
             number_of_bathrooms = COALESCE($4, number_of_bathrooms), \
             city = COALESCE($5, city), \
             price = COALESCE($6, price), \
             land_size = COALESCE($7, land_size), \
             property_type = COALESCE($8, property_type), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            HOME_COLUMNS
        ))
        .bind(id)
        .bind(patch.address)
        .bind(patch.number_of_bedrooms)
        .bind(patch.number_of_bathrooms)
        .bind(patch.city)
        .bind(patch.price)
        .bind(patch.land_size)
        .bind(patch.property_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM images WHERE home_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM homes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
