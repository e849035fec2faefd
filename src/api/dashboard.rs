//! Dashboard endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        activity::{ActivityLog, ActivityQuery},
        dashboard::DashboardStats,
    },
};

/// Asset counters by lifecycle category and department
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    )
)]
pub async fn get_dashboard(State(state): State<crate::AppState>) -> AppResult<Json<DashboardStats>> {
    let stats = state.services.dashboard.stats().await?;
    Ok(Json(stats))
}

/// Most recent lifecycle activity
#[utoipa::path(
    get,
    path = "/activities",
    tag = "dashboard",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activity log, newest first", body = Vec<ActivityLog>)
    )
)]
pub async fn list_activities(
    State(state): State<crate::AppState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityLog>>> {
    let activities = state.services.dashboard.recent_activities(query.limit).await?;
    Ok(Json(activities))
}
