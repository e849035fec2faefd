//! Recent-activity feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::asset::Asset;
use super::enums::ActivityType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityLog {
    pub id: i32,
    pub activity_type: String,
    pub oracle_number: Option<String>,
    pub asset_type: Option<String>,
    pub brand_name: Option<String>,
    pub asset_name: Option<String>,
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Activity entry to append
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub oracle_number: String,
    pub asset_type: Option<String>,
    pub brand_name: Option<String>,
    pub asset_name: Option<String>,
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub remarks: Option<String>,
}

impl NewActivity {
    /// Entry describing `asset`, without employee details.
    pub fn for_asset(activity_type: ActivityType, asset: &Asset) -> Self {
        Self {
            activity_type,
            oracle_number: asset.oracle_number.clone(),
            asset_type: Some(asset.device_type.clone()),
            brand_name: asset.brand_name.clone(),
            asset_name: asset.model_name.clone(),
            employee_name: None,
            department_name: None,
            remarks: None,
        }
    }

    pub fn employee(mut self, name: Option<String>, department: Option<String>) -> Self {
        self.employee_name = name;
        self.department_name = department;
        self
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ActivityQuery {
    /// Number of entries (default 10, max 100)
    pub limit: Option<i64>,
}
