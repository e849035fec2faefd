//! Returns repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::return_record::{ReturnRecord, ReturnStats, ReturnView},
};

/// Return joined with the asset and the most recent assignment it closed
const RETURN_VIEW_SELECT: &str = r#"
    SELECT r.id, r.oracle_number, r.return_type, r.return_date, r.reason, r.notes,
           r.voucher_path, r.created_at,
           s.device_type AS asset_type, s.model_name AS asset_model,
           s.serial_number, s.status AS asset_status,
           a.employee_name, a.department AS employee_department,
           a.designation AS employee_designation,
           a.assignment_date AS allocation_date, a.expected_return_date
    FROM returns r
    LEFT JOIN assets s ON s.oracle_number = r.oracle_number
    LEFT JOIN LATERAL (
        SELECT employee_name, department, designation, assignment_date, expected_return_date
        FROM assignments
        WHERE oracle_number = r.oracle_number AND status = 'returned'
        ORDER BY actual_return_date DESC NULLS LAST, id DESC
        LIMIT 1
    ) a ON TRUE
"#;

#[derive(Clone)]
pub struct ReturnsRepository {
    pool: Pool<Postgres>,
}

/// Values written when a return is recorded
#[derive(Debug, Clone)]
pub struct NewReturn {
    pub oracle_number: String,
    pub return_type: String,
    pub return_date: NaiveDate,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl ReturnsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> AppResult<ReturnStats> {
        let stats = sqlx::query_as::<_, ReturnStats>(
            r#"
            SELECT COUNT(*) FILTER (WHERE return_type = 'buyback') AS buyback_count,
                   COUNT(*) FILTER (WHERE return_type = 'damaged') AS damaged_count
            FROM returns
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn total_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM returns")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list(&self) -> AppResult<Vec<ReturnView>> {
        let query = format!("{} ORDER BY r.return_date DESC, r.id DESC", RETURN_VIEW_SELECT);
        let rows = sqlx::query_as::<_, ReturnView>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn for_asset(&self, oracle_number: &str) -> AppResult<Vec<ReturnView>> {
        let query = format!(
            "{} WHERE r.oracle_number = $1 ORDER BY r.return_date DESC, r.id DESC",
            RETURN_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, ReturnView>(&query)
            .bind(oracle_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        record: &NewReturn,
        voucher_path: Option<&str>,
    ) -> AppResult<ReturnRecord> {
        let created = sqlx::query_as::<_, ReturnRecord>(
            r#"
            INSERT INTO returns (oracle_number, return_type, return_date, reason, notes, voucher_path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&record.oracle_number)
        .bind(&record.return_type)
        .bind(record.return_date)
        .bind(&record.reason)
        .bind(&record.notes)
        .bind(voucher_path)
        .fetch_one(conn)
        .await?;
        Ok(created)
    }

    pub async fn set_voucher(&self, id: i32, voucher_path: &str) -> AppResult<ReturnRecord> {
        sqlx::query_as::<_, ReturnRecord>(
            "UPDATE returns SET voucher_path = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(voucher_path)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Return record {} not found", id)))
    }
}
