//! Asset model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::assignment::Assignment;
use crate::lifecycle::{LifecycleRecord, StatusClassification};

/// Asset row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Asset {
    pub id: i32,
    /// Organisation-wide asset identifier, immutable once created
    pub oracle_number: String,
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub unit_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub vendor_name: Option<String>,
    pub tender_number: Option<String>,
    pub notes: Option<String>,
    /// Raw lifecycle status (`new`, `used`, `assigned`, `under_repair`, ...)
    pub status: Option<String>,
    /// Employee currently holding the asset
    pub assigned_to: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
    /// Disposition of the most recent return
    pub return_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LifecycleRecord for Asset {
    fn oracle_number(&self) -> &str {
        &self.oracle_number
    }

    fn device_type(&self) -> &str {
        &self.device_type
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }
}

/// Asset enriched for list views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: Asset,
    pub classification: StatusClassification,
    /// Employee named on the active assignment, if any
    pub current_holder: Option<String>,
}

/// Full asset detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetDetails {
    #[serde(flatten)]
    pub asset: Asset,
    pub classification: StatusClassification,
    pub active_assignment: Option<Assignment>,
}

/// Assignable asset, as offered by the assignment form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableAsset {
    pub oracle_number: String,
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
}

impl From<&Asset> for AvailableAsset {
    fn from(asset: &Asset) -> Self {
        Self {
            oracle_number: asset.oracle_number.clone(),
            device_type: asset.device_type.clone(),
            brand_name: asset.brand_name.clone(),
            model_name: asset.model_name.clone(),
        }
    }
}

/// Create asset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 50, message = "Oracle Number is required"))]
    pub oracle_number: String,
    #[validate(length(min = 1, max = 100, message = "Device type is required"))]
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub unit_price: Option<Decimal>,
    /// `YYYY-MM-DD`
    pub purchase_date: Option<String>,
    /// `YYYY-MM-DD` or a duration such as `3 years`
    pub warranty_expiry: Option<String>,
    pub vendor_name: Option<String>,
    #[serde(alias = "tender_no")]
    pub tender_number: Option<String>,
    pub notes: Option<String>,
}

/// Values written when an asset is created
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub oracle_number: String,
    pub device_type: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub unit_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub vendor_name: Option<String>,
    pub tender_number: Option<String>,
    pub notes: Option<String>,
}

/// Gated status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAssetStatus {
    #[validate(length(min = 1, message = "Oracle Number is required"))]
    pub oracle_number: String,
    /// Target status or category name (`used`, `under_repair`, `Under Repair`, ...)
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Asset list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AssetQuery {
    /// Exact device type; `All` disables the filter
    pub device_type: Option<String>,
    /// Exact brand; `All` disables the filter
    pub brand_name: Option<String>,
    /// Partial, case-insensitive oracle number
    pub oracle_number: Option<String>,
    /// Free text over oracle number, type, brand, model and serial
    pub search: Option<String>,
    /// Raw status value
    pub status: Option<String>,
    /// Derived status category (`new`, `assigned`, `under_repair`, ...)
    pub category: Option<String>,
    /// Only unassigned assets in stock (new, used or being repaired)
    pub stock: Option<bool>,
    /// Only unassigned assets that are not under repair, damaged or auctioned
    pub new: Option<bool>,
    /// Only assets without a holder
    pub unassigned: Option<bool>,
}

/// Add a brand to the device catalogue
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddBrand {
    #[validate(length(min = 1, message = "Device type is required"))]
    pub device_type: String,
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub brand_name: String,
}

/// Existence check response
#[derive(Debug, Serialize, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}
