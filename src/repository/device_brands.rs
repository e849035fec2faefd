//! Device type / brand catalogue repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::device_brand::DeviceBrandMapping};

#[derive(Clone)]
pub struct DeviceBrandsRepository {
    pool: Pool<Postgres>,
}

impl DeviceBrandsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<DeviceBrandMapping>> {
        let rows = sqlx::query_as::<_, DeviceBrandMapping>(
            "SELECT id, device_type, brands FROM device_brand_mappings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, device_type: &str) -> AppResult<Option<DeviceBrandMapping>> {
        let row = sqlx::query_as::<_, DeviceBrandMapping>(
            "SELECT id, device_type, brands FROM device_brand_mappings WHERE device_type = $1",
        )
        .bind(device_type)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Add a brand to a device type, creating the device type if needed.
    /// Brands already listed are left untouched.
    pub async fn add_brand(&self, device_type: &str, brand: &str) -> AppResult<DeviceBrandMapping> {
        let row = sqlx::query_as::<_, DeviceBrandMapping>(
            r#"
            INSERT INTO device_brand_mappings (device_type, brands)
            VALUES ($1, ARRAY[$2]::TEXT[])
            ON CONFLICT (device_type) DO UPDATE
            SET brands = CASE
                WHEN $2 = ANY(device_brand_mappings.brands) THEN device_brand_mappings.brands
                ELSE array_append(device_brand_mappings.brands, $2)
            END
            RETURNING id, device_type, brands
            "#,
        )
        .bind(device_type)
        .bind(brand)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
