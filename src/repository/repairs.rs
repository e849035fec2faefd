//! Repairs repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        asset::Asset,
        enums::RepairStatus,
        repair::{CreateRepairRequest, Repair, RepairCompletion, RepairStats},
    },
};

#[derive(Clone)]
pub struct RepairsRepository {
    pool: Pool<Postgres>,
}

impl RepairsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> AppResult<RepairStats> {
        let stats = sqlx::query_as::<_, RepairStats>(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'in-progress') AS under_repair,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) AS total
            FROM repairs
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Repairs, optionally restricted to one status, newest first
    pub async fn list(&self, status: Option<RepairStatus>) -> AppResult<Vec<Repair>> {
        let repairs = sqlx::query_as::<_, Repair>(
            r#"
            SELECT * FROM repairs
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(repairs)
    }

    pub async fn for_asset(&self, oracle_number: &str) -> AppResult<Vec<Repair>> {
        let repairs = sqlx::query_as::<_, Repair>(
            "SELECT * FROM repairs WHERE oracle_number = $1 ORDER BY start_date DESC, id DESC",
        )
        .bind(oracle_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(repairs)
    }

    /// Oracle numbers with an open repair
    pub async fn open_oracle_numbers(&self) -> AppResult<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT oracle_number FROM repairs WHERE status = 'in-progress' ORDER BY oracle_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }

    pub async fn find_open(
        &self,
        conn: &mut PgConnection,
        oracle_number: &str,
    ) -> AppResult<Option<Repair>> {
        let repair = sqlx::query_as::<_, Repair>(
            "SELECT * FROM repairs WHERE oracle_number = $1 AND status = 'in-progress' FOR UPDATE",
        )
        .bind(oracle_number)
        .fetch_optional(conn)
        .await?;
        Ok(repair)
    }

    /// Open a repair, recording the status the asset had before
    pub async fn open(
        &self,
        conn: &mut PgConnection,
        asset: &Asset,
        request: &CreateRepairRequest,
    ) -> AppResult<Repair> {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            INSERT INTO repairs (
                oracle_number, asset_type, asset_model, repair_description, status,
                previous_status, employee_name, department, designation,
                technician, cost, notes, vendor_name
            )
            VALUES ($1, $2, $3, $4, 'in-progress', $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&asset.oracle_number)
        .bind(&asset.device_type)
        .bind(&asset.model_name)
        .bind(&request.repair_description)
        .bind(&asset.status)
        .bind(&request.employee_name)
        .bind(&request.department)
        .bind(&request.designation)
        .bind(&request.technician)
        .bind(request.cost)
        .bind(&request.notes)
        .bind(&request.vendor_name)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                format!("Asset {} is already under repair", asset.oracle_number),
            ),
            other => AppError::Database(other),
        })?;
        Ok(repair)
    }

    /// Close an open repair; fields left empty keep the values from the request
    pub async fn complete(
        &self,
        conn: &mut PgConnection,
        repair_id: i32,
        completion: &RepairCompletion,
    ) -> AppResult<Repair> {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            UPDATE repairs
            SET status = 'completed',
                repair_description = $2,
                is_fixed = $3,
                completion_date = $4,
                return_date = $5,
                technician = COALESCE($6, technician),
                cost = COALESCE($7, cost),
                notes = COALESCE($8, notes),
                vendor_name = COALESCE($9, vendor_name),
                voucher_path = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(repair_id)
        .bind(&completion.repair_description)
        .bind(&completion.is_fixed)
        .bind(completion.completion_date)
        .bind(completion.return_date)
        .bind(&completion.technician)
        .bind(completion.cost)
        .bind(&completion.notes)
        .bind(&completion.vendor_name)
        .bind(&completion.voucher_path)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Repair {} not found", repair_id)))?;
        Ok(repair)
    }
}
