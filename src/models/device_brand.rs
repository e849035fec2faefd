//! Device type / brand catalogue

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeviceBrandMapping {
    pub id: i32,
    pub device_type: String,
    pub brands: Vec<String>,
}
