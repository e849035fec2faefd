//! Assignments repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, AssignmentDetails, AssignmentHistoryEntry, AssignmentView},
        dashboard::DepartmentCount,
        enums::AssignmentStatus,
    },
};

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

/// Values written when an assignment is opened
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub oracle_number: String,
    pub employee_name: String,
    pub designation: String,
    pub department: String,
    pub assignment_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub notes: Option<String>,
    pub allocation_voucher_path: Option<String>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active assignments joined with their asset, newest first
    pub async fn list_active(&self) -> AppResult<Vec<AssignmentView>> {
        let rows = sqlx::query_as::<_, AssignmentView>(
            r#"
            SELECT a.id, a.oracle_number, a.employee_name, a.designation, a.department,
                   a.assignment_date, a.expected_return_date, a.notes, a.allocation_voucher_path,
                   s.device_type, s.brand_name, s.model_name, s.serial_number,
                   s.status AS asset_status, s.return_type AS asset_return_type
            FROM assignments a
            JOIN assets s ON s.oracle_number = a.oracle_number
            WHERE a.status = 'assigned'
            ORDER BY a.assignment_date DESC, a.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_active(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assignments WHERE status = 'assigned'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Oracle numbers referenced by an active assignment
    pub async fn active_oracle_numbers(&self) -> AppResult<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT oracle_number FROM assignments WHERE status = 'assigned'",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }

    /// Active assignments whose asset is still held (not damaged or auctioned)
    pub async fn assigned_oracle_numbers(&self) -> AppResult<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT a.oracle_number
            FROM assignments a
            JOIN assets s ON s.oracle_number = a.oracle_number
            WHERE a.status = 'assigned'
              AND COALESCE(s.status, '') NOT IN ('damaged', 'auctioned')
            ORDER BY a.oracle_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }

    /// Employee currently holding an asset
    pub async fn current_holders(&self) -> AppResult<Vec<(String, String)>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT oracle_number, employee_name FROM assignments WHERE status = 'assigned'",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_active(&self, oracle_number: &str) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE oracle_number = $1 AND status = 'assigned'",
        )
        .bind(oracle_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    pub async fn history(&self, oracle_number: &str) -> AppResult<Vec<AssignmentHistoryEntry>> {
        let rows = sqlx::query_as::<_, AssignmentHistoryEntry>(
            r#"
            SELECT id, employee_name, designation, department,
                   assignment_date, actual_return_date, status
            FROM assignments
            WHERE oracle_number = $1
            ORDER BY assignment_date DESC, id DESC
            "#,
        )
        .bind(oracle_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn details(&self, oracle_number: &str) -> AppResult<AssignmentDetails> {
        sqlx::query_as::<_, AssignmentDetails>(
            r#"
            SELECT s.oracle_number, s.device_type, s.brand_name, s.model_name, s.serial_number,
                   a.employee_name, a.designation, a.department,
                   a.assignment_date, a.expected_return_date, a.allocation_voucher_path
            FROM assignments a
            JOIN assets s ON s.oracle_number = a.oracle_number
            WHERE a.oracle_number = $1 AND a.status = 'assigned'
            "#,
        )
        .bind(oracle_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No active assignment for asset {}", oracle_number))
        })
    }

    /// Active assignment count per department
    pub async fn department_counts(&self) -> AppResult<Vec<DepartmentCount>> {
        let rows = sqlx::query_as::<_, DepartmentCount>(
            r#"
            SELECT COALESCE(NULLIF(department, ''), 'Unspecified') AS department,
                   COUNT(*) AS count
            FROM assignments
            WHERE status = 'assigned'
            GROUP BY 1
            ORDER BY count DESC, department
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active assignment inside a transaction
    pub async fn find_active(
        &self,
        conn: &mut PgConnection,
        oracle_number: &str,
    ) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE oracle_number = $1 AND status = 'assigned'",
        )
        .bind(oracle_number)
        .fetch_optional(conn)
        .await?;
        Ok(assignment)
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        assignment: &NewAssignment,
    ) -> AppResult<Assignment> {
        let created = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (
                oracle_number, employee_name, designation, department,
                assignment_date, expected_return_date, status, notes, allocation_voucher_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'assigned', $7, $8)
            RETURNING *
            "#,
        )
        .bind(&assignment.oracle_number)
        .bind(&assignment.employee_name)
        .bind(&assignment.designation)
        .bind(&assignment.department)
        .bind(assignment.assignment_date)
        .bind(assignment.expected_return_date)
        .bind(&assignment.notes)
        .bind(&assignment.allocation_voucher_path)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                format!("Asset {} already has an active assignment", assignment.oracle_number),
            ),
            other => AppError::Database(other),
        })?;

        Ok(created)
    }

    /// Close the active assignment of an asset, if any
    pub async fn close_active(
        &self,
        conn: &mut PgConnection,
        oracle_number: &str,
        status: AssignmentStatus,
        actual_return_date: NaiveDate,
    ) -> AppResult<Option<Assignment>> {
        let closed = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET status = $2, actual_return_date = $3
            WHERE oracle_number = $1 AND status = 'assigned'
            RETURNING *
            "#,
        )
        .bind(oracle_number)
        .bind(status.as_str())
        .bind(actual_return_date)
        .fetch_optional(conn)
        .await?;
        Ok(closed)
    }
}
