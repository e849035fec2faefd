//! Repair model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Repair record; opened `in-progress`, closed `completed`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Repair {
    pub id: i32,
    pub oracle_number: String,
    pub asset_type: Option<String>,
    pub asset_model: Option<String>,
    pub repair_description: String,
    pub status: String,
    /// Asset status when the repair was requested
    pub previous_status: Option<String>,
    /// `fixed` / `not_fixed`, set on completion
    pub is_fixed: Option<String>,
    pub start_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
    pub return_date: Option<NaiveDate>,
    pub technician: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub vendor_name: Option<String>,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub voucher_path: Option<String>,
}

/// Open a repair (JSON body)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRepairRequest {
    #[validate(length(min = 1, message = "oracle_number is required"))]
    pub oracle_number: String,
    #[validate(length(min = 1, message = "repair_description is required"))]
    pub repair_description: String,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub technician: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub vendor_name: Option<String>,
}

/// Close a repair (multipart form fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteRepair {
    #[validate(length(min = 1, message = "oracle_number is required"))]
    pub oracle_number: String,
    #[validate(length(min = 1, message = "repair_description is required"))]
    pub repair_description: String,
    /// `fixed` or `not_fixed`
    #[validate(length(min = 1, message = "is_fixed is required"))]
    pub is_fixed: String,
    pub completion_date: Option<String>,
    pub return_date: Option<String>,
    pub technician: Option<String>,
    #[serde(alias = "cost")]
    pub repair_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub vendor_name: Option<String>,
}

/// Values written when a repair is completed
#[derive(Debug, Clone)]
pub struct RepairCompletion {
    pub repair_description: String,
    pub is_fixed: String,
    pub completion_date: DateTime<Utc>,
    pub return_date: Option<NaiveDate>,
    pub technician: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub vendor_name: Option<String>,
    pub voucher_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RepairQuery {
    /// `in-progress` or `completed`; both when absent
    pub status: Option<String>,
}

/// Repair counters
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RepairStats {
    pub under_repair: i64,
    pub completed: i64,
    pub total: i64,
}

/// Oracle numbers with an open repair
#[derive(Debug, Serialize, ToSchema)]
pub struct OracleNumberList {
    pub oracle_numbers: Vec<String>,
    pub count: usize,
}
