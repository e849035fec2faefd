//! Assets repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::asset::{Asset, AssetQuery, NewAsset},
};

#[derive(Clone)]
pub struct AssetsRepository {
    pool: Pool<Postgres>,
}

/// Treat blank strings and the UI's `All` as "no filter".
fn filter_value(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Fields written by a lifecycle change
#[derive(Debug, Clone, Default)]
pub struct AssetLifecycleUpdate {
    pub status: String,
    pub assigned_to: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
    pub return_type: Option<String>,
}

impl AssetLifecycleUpdate {
    /// Keep the holder and dates of `asset`, change only the status.
    pub fn status_only(asset: &Asset, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            assigned_to: asset.assigned_to.clone(),
            assignment_date: asset.assignment_date,
            expected_return_date: asset.expected_return_date,
            return_type: asset.return_type.clone(),
        }
    }

    /// New status with the holder and assignment dates cleared.
    pub fn released(status: impl Into<String>, return_type: Option<String>) -> Self {
        Self {
            status: status.into(),
            return_type,
            ..Default::default()
        }
    }
}

impl AssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Assets matching the column filters of `query`, newest first.
    ///
    /// Derived filters (`category`, `stock`, `new`, `unassigned`) are applied
    /// by the service on the classified rows.
    pub async fn search(&self, query: &AssetQuery) -> AppResult<Vec<Asset>> {
        let oracle_pattern = filter_value(&query.oracle_number).map(|o| format!("%{}%", o));
        let search_pattern = filter_value(&query.search).map(|s| format!("%{}%", s));

        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT * FROM assets
            WHERE ($1::TEXT IS NULL OR device_type = $1)
              AND ($2::TEXT IS NULL OR brand_name = $2)
              AND ($3::TEXT IS NULL OR oracle_number ILIKE $3)
              AND ($4::TEXT IS NULL
                   OR oracle_number ILIKE $4
                   OR device_type ILIKE $4
                   OR brand_name ILIKE $4
                   OR model_name ILIKE $4
                   OR serial_number ILIKE $4)
              AND ($5::TEXT IS NULL OR status = $5)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter_value(&query.device_type))
        .bind(filter_value(&query.brand_name))
        .bind(oracle_pattern)
        .bind(search_pattern)
        .bind(filter_value(&query.status))
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    /// Assets of one device type (case-insensitive)
    pub async fn list_by_device_type(&self, device_type: &str) -> AppResult<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE LOWER(device_type) = LOWER($1) ORDER BY oracle_number",
        )
        .bind(device_type.trim())
        .fetch_all(&self.pool)
        .await?;
        Ok(assets)
    }

    pub async fn get_by_oracle_number(&self, oracle_number: &str) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE oracle_number = $1")
            .bind(oracle_number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", oracle_number)))
    }

    /// Load and lock the asset row for the rest of the transaction.
    pub async fn lock(&self, conn: &mut PgConnection, oracle_number: &str) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE oracle_number = $1 FOR UPDATE")
            .bind(oracle_number)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", oracle_number)))
    }

    pub async fn oracle_number_exists(&self, oracle_number: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM assets WHERE oracle_number = $1)",
        )
        .bind(oracle_number.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn serial_number_exists(&self, serial_number: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM assets WHERE serial_number = $1)",
        )
        .bind(serial_number.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new asset with status `new`
    pub async fn create(&self, conn: &mut PgConnection, asset: &NewAsset) -> AppResult<Asset> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (
                oracle_number, device_type, brand_name, model_name, serial_number,
                unit_price, purchase_date, warranty_expiry, vendor_name, tender_number,
                notes, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'new', $12, $12)
            RETURNING *
            "#,
        )
        .bind(&asset.oracle_number)
        .bind(&asset.device_type)
        .bind(&asset.brand_name)
        .bind(&asset.model_name)
        .bind(&asset.serial_number)
        .bind(asset.unit_price)
        .bind(asset.purchase_date)
        .bind(asset.warranty_expiry)
        .bind(&asset.vendor_name)
        .bind(&asset.tender_number)
        .bind(&asset.notes)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Oracle Number or Serial Number already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(created)
    }

    /// Write the lifecycle fields of an asset
    pub async fn update_lifecycle(
        &self,
        conn: &mut PgConnection,
        oracle_number: &str,
        update: &AssetLifecycleUpdate,
    ) -> AppResult<Asset> {
        let updated = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET status = $2,
                assigned_to = $3,
                assignment_date = $4,
                expected_return_date = $5,
                return_type = $6,
                updated_at = $7
            WHERE oracle_number = $1
            RETURNING *
            "#,
        )
        .bind(oracle_number)
        .bind(&update.status)
        .bind(&update.assigned_to)
        .bind(update.assignment_date)
        .bind(update.expected_return_date)
        .bind(&update.return_type)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", oracle_number)))?;

        Ok(updated)
    }

    /// Brands recorded on assets of a device type
    pub async fn brands_in_use(&self, device_type: &str) -> AppResult<Vec<String>> {
        let brands = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT brand_name FROM assets
            WHERE device_type = $1 AND brand_name IS NOT NULL AND brand_name <> ''
            ORDER BY brand_name
            "#,
        )
        .bind(device_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(brands)
    }

    /// Oracle numbers whose status is `auctioned`
    pub async fn auctioned_oracle_numbers(&self) -> AppResult<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT oracle_number FROM assets WHERE status = 'auctioned' ORDER BY oracle_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }
}
