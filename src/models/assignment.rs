//! Assignment (asset allocation) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::lifecycle::{LifecycleRecord, StatusClassification};

/// Assignment row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub oracle_number: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub assignment_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub actual_return_date: Option<NaiveDate>,
    /// `assigned`, `returned` or `auctioned`
    pub status: String,
    pub notes: Option<String>,
    /// Relative path of the allocation voucher under `/uploads`
    pub allocation_voucher_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Active assignment joined with its asset
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentView {
    pub id: i32,
    pub oracle_number: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub assignment_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub allocation_voucher_path: Option<String>,
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub asset_status: Option<String>,
    pub asset_return_type: Option<String>,
    /// Filled in by the service from the asset columns
    #[sqlx(skip)]
    pub classification: Option<StatusClassification>,
}

impl LifecycleRecord for AssignmentView {
    fn oracle_number(&self) -> &str {
        &self.oracle_number
    }

    fn device_type(&self) -> &str {
        &self.device_type
    }

    fn status(&self) -> Option<&str> {
        self.asset_status.as_deref()
    }

    fn assigned_to(&self) -> Option<&str> {
        Some(&self.employee_name)
    }

    fn return_type(&self) -> Option<&str> {
        self.asset_return_type.as_deref()
    }
}

/// Create assignment request (multipart form fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssignment {
    #[validate(length(min = 1, message = "oracle_number is required"))]
    pub oracle_number: String,
    #[validate(length(min = 1, max = 100, message = "employee_name is required"))]
    pub employee_name: String,
    #[validate(length(min = 1, message = "designation is required"))]
    pub designation: String,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "assignment_date is required"))]
    pub assignment_date: String,
    #[validate(length(min = 1, message = "expected_return_date is required"))]
    pub expected_return_date: String,
    pub notes: Option<String>,
}

/// Assignment history entry, newest first
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentHistoryEntry {
    pub id: i32,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub assignment_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub status: String,
}

/// Active assignment with the assigned asset's description
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentDetails {
    pub oracle_number: String,
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub assignment_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub allocation_voucher_path: Option<String>,
}

/// Active assignment count
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentCount {
    pub assigned_count: i64,
}
