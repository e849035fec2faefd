//! Auction model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Auction record with the asset description captured at sale time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Auction {
    pub id: i32,
    pub oracle_number: String,
    pub asset_type: Option<String>,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub price: Decimal,
    pub auction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Record an auction (JSON body)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuction {
    #[validate(length(min = 1, message = "oracle_number is required"))]
    pub oracle_number: String,
    pub price: Decimal,
    /// `YYYY-MM-DD` or RFC 3339
    #[validate(length(min = 1, message = "auction_date is required"))]
    pub auction_date: String,
}
