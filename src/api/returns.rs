//! Return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::return_record::{CreateReturn, ReturnCount, ReturnRecord, ReturnStats, ReturnView},
};

use super::FormSubmission;

const VOUCHER_FIELDS: &[&str] = &["voucher", "voucher_file", "return_voucher"];

/// Voucher upload form
#[derive(ToSchema)]
pub struct VoucherForm {
    #[schema(value_type = String, format = Binary)]
    pub voucher: Vec<u8>,
}

/// Every return, newest first
#[utoipa::path(
    get,
    path = "/returns",
    tag = "returns",
    responses(
        (status = 200, description = "Returns with asset and holder details", body = Vec<ReturnView>)
    )
)]
pub async fn list_returns(State(state): State<crate::AppState>) -> AppResult<Json<Vec<ReturnView>>> {
    let returns = state.services.returns.list().await?;
    Ok(Json(returns))
}

/// Buyback and damaged counters
#[utoipa::path(
    get,
    path = "/returns/stats",
    tag = "returns",
    responses(
        (status = 200, description = "Return counters", body = ReturnStats)
    )
)]
pub async fn get_return_stats(State(state): State<crate::AppState>) -> AppResult<Json<ReturnStats>> {
    let stats = state.services.returns.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/returns/total-count",
    tag = "returns",
    responses(
        (status = 200, description = "Number of returns", body = ReturnCount)
    )
)]
pub async fn get_total_count(State(state): State<crate::AppState>) -> AppResult<Json<ReturnCount>> {
    let total_return_count = state.services.returns.total_count().await?;
    Ok(Json(ReturnCount { total_return_count }))
}

/// Returns of one asset
#[utoipa::path(
    get,
    path = "/returns/{oracle_number}",
    tag = "returns",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Returns of the asset", body = Vec<ReturnView>)
    )
)]
pub async fn get_asset_returns(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<Vec<ReturnView>>> {
    let returns = state.services.returns.for_asset(&oracle_number).await?;
    Ok(Json(returns))
}

/// Record a return
///
/// Multipart form: the fields of `CreateReturn` plus an optional `voucher`
/// file.
#[utoipa::path(
    post,
    path = "/returns",
    tag = "returns",
    request_body(content = CreateReturn, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Return recorded", body = ReturnRecord),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Asset not found"),
        (status = 422, description = "Asset cannot be returned")
    )
)]
pub async fn create_return(
    State(state): State<crate::AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ReturnRecord>)> {
    let form = FormSubmission::read(multipart, VOUCHER_FIELDS).await?;
    let (data, voucher) = form.into_parts::<CreateReturn>()?;
    data.validate()?;

    let record = state.services.returns.create(data, voucher).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Attach or replace the voucher of a return
#[utoipa::path(
    post,
    path = "/returns/{id}/voucher",
    tag = "returns",
    params(
        ("id" = i32, Path, description = "Return ID")
    ),
    request_body(content = VoucherForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Return with its voucher", body = ReturnRecord),
        (status = 400, description = "No file supplied"),
        (status = 404, description = "Return not found")
    )
)]
pub async fn attach_voucher(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<ReturnRecord>> {
    let mut form = FormSubmission::read(multipart, VOUCHER_FIELDS).await?;
    let voucher = form
        .take_file()
        .ok_or_else(|| AppError::BadRequest("A voucher file is required".to_string()))?;

    let record = state.services.returns.attach_voucher(id, voucher).await?;
    Ok(Json(record))
}
