//! Repair workflow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use validator::Validate;

use crate::{
    error::AppResult,
    models::repair::{
        CompleteRepair, CreateRepairRequest, OracleNumberList, Repair, RepairQuery, RepairStats,
    },
};

use super::FormSubmission;

const VOUCHER_FIELDS: &[&str] = &["voucher", "voucher_file", "repair_voucher"];

/// List repairs, optionally by state
#[utoipa::path(
    get,
    path = "/repairs",
    tag = "repairs",
    params(RepairQuery),
    responses(
        (status = 200, description = "Repairs, newest first", body = Vec<Repair>),
        (status = 400, description = "Unknown repair status")
    )
)]
pub async fn list_repairs(
    State(state): State<crate::AppState>,
    Query(query): Query<RepairQuery>,
) -> AppResult<Json<Vec<Repair>>> {
    let repairs = state.services.repairs.list(query.status.as_deref()).await?;
    Ok(Json(repairs))
}

/// Repair counters
#[utoipa::path(
    get,
    path = "/repairs/stats",
    tag = "repairs",
    responses(
        (status = 200, description = "Repair counters", body = RepairStats)
    )
)]
pub async fn get_repair_stats(State(state): State<crate::AppState>) -> AppResult<Json<RepairStats>> {
    let stats = state.services.repairs.stats().await?;
    Ok(Json(stats))
}

/// Oracle numbers with an open repair
#[utoipa::path(
    get,
    path = "/repairs/under-repair",
    tag = "repairs",
    responses(
        (status = 200, description = "Assets in the workshop", body = OracleNumberList)
    )
)]
pub async fn list_under_repair(
    State(state): State<crate::AppState>,
) -> AppResult<Json<OracleNumberList>> {
    let list = state.services.repairs.under_repair_oracle_numbers().await?;
    Ok(Json(list))
}

/// Repair history of an asset
#[utoipa::path(
    get,
    path = "/repairs/{oracle_number}",
    tag = "repairs",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Repairs of the asset", body = Vec<Repair>)
    )
)]
pub async fn get_repair_history(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<Vec<Repair>>> {
    let repairs = state.services.repairs.history(&oracle_number).await?;
    Ok(Json(repairs))
}

/// Send an asset for repair
#[utoipa::path(
    post,
    path = "/repairs/request",
    tag = "repairs",
    request_body = CreateRepairRequest,
    responses(
        (status = 201, description = "Repair opened", body = Repair),
        (status = 404, description = "Asset not found"),
        (status = 409, description = "Asset already under repair"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn request_repair(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateRepairRequest>,
) -> AppResult<(StatusCode, Json<Repair>)> {
    data.validate()?;

    let repair = state.services.repairs.request(data).await?;
    Ok((StatusCode::CREATED, Json(repair)))
}

/// Close the open repair of an asset
///
/// Multipart form: the fields of `CompleteRepair` plus an optional `voucher`
/// file.
#[utoipa::path(
    post,
    path = "/repairs/complete",
    tag = "repairs",
    request_body(content = CompleteRepair, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Repair completed", body = Repair),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No open repair for the asset"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn complete_repair(
    State(state): State<crate::AppState>,
    multipart: Multipart,
) -> AppResult<Json<Repair>> {
    let form = FormSubmission::read(multipart, VOUCHER_FIELDS).await?;
    let (data, voucher) = form.into_parts::<CompleteRepair>()?;
    data.validate()?;

    let repair = state.services.repairs.complete(data, voucher).await?;
    Ok(Json(repair))
}
