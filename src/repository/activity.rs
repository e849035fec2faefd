//! Activity log repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::activity::{ActivityLog, NewActivity},
};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: Pool<Postgres>,
}

impl ActivityRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn recent(&self, limit: i64) -> AppResult<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Append an entry as part of the caller's transaction
    pub async fn record(&self, conn: &mut PgConnection, entry: &NewActivity) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (
                activity_type, oracle_number, asset_type, brand_name, asset_name,
                employee_name, department_name, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.activity_type.to_string())
        .bind(&entry.oracle_number)
        .bind(&entry.asset_type)
        .bind(&entry.brand_name)
        .bind(&entry.asset_name)
        .bind(&entry.employee_name)
        .bind(&entry.department_name)
        .bind(&entry.remarks)
        .execute(conn)
        .await?;
        Ok(())
    }
}
