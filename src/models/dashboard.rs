//! Dashboard statistics

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::lifecycle::StatusCategory;

/// Asset counters derived from the lifecycle classification of every asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_assets: i64,
    /// Held by an employee (category Assigned)
    pub assigned: i64,
    /// No holder recorded, whatever the category
    pub unassigned: i64,
    pub under_repair: i64,
    pub damaged: i64,
    pub auctioned: i64,
    pub buyback: i64,
    /// Ready to hand out (categories New and Used)
    pub available: i64,
    pub under_repair_unassigned: i64,
    /// `available + under_repair_unassigned`
    pub stock_count: i64,
    pub categories: Vec<CategoryCount>,
    pub departments: Vec<DepartmentCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryCount {
    pub category: StatusCategory,
    pub label: String,
    pub count: i64,
}

/// Active assignments per department
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}
