//! Return record model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Return record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReturnRecord {
    pub id: i32,
    pub oracle_number: String,
    /// `returned_to_inventory`, `buyback` or `damaged`
    pub return_type: String,
    pub return_date: NaiveDate,
    /// Condition reported at return
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub voucher_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Return joined with the asset and the assignment it closed
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReturnView {
    pub id: i32,
    pub oracle_number: String,
    pub return_type: String,
    pub return_date: NaiveDate,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub voucher_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub asset_type: Option<String>,
    pub asset_model: Option<String>,
    pub serial_number: Option<String>,
    pub asset_status: Option<String>,
    pub employee_name: Option<String>,
    pub employee_department: Option<String>,
    pub employee_designation: Option<String>,
    pub allocation_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
}

/// Record a return (multipart form fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReturn {
    #[validate(length(min = 1, message = "oracle_number is required"))]
    pub oracle_number: String,
    /// `returned_to_inventory`, `employee_buyback` or `marked_as_damaged`
    #[validate(length(min = 1, message = "return_option is required"))]
    pub return_option: String,
    #[validate(length(min = 1, message = "return_date is required"))]
    pub return_date: String,
    #[serde(alias = "condition")]
    pub reason: Option<String>,
    #[serde(alias = "comments")]
    pub notes: Option<String>,
}

/// Return counters by disposition
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReturnStats {
    pub buyback_count: i64,
    pub damaged_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnCount {
    pub total_return_count: i64,
}
