//! Assignment endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Multipart;
use validator::Validate;

use crate::{
    error::AppResult,
    models::assignment::{Assignment, AssignmentCount, AssignmentView, CreateAssignment},
};

use super::FormSubmission;

/// Names accepted for the allocation voucher part
const VOUCHER_FIELDS: &[&str] = &["allocation_voucher", "voucher", "voucher_file"];

/// Active assignments
#[utoipa::path(
    get,
    path = "/assignments",
    tag = "assignments",
    responses(
        (status = 200, description = "Active assignments", body = Vec<AssignmentView>)
    )
)]
pub async fn list_assignments(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AssignmentView>>> {
    let assignments = state.services.assignments.list_active().await?;
    Ok(Json(assignments))
}

/// Number of active assignments
#[utoipa::path(
    get,
    path = "/assignments/count",
    tag = "assignments",
    responses(
        (status = 200, description = "Active assignment count", body = AssignmentCount)
    )
)]
pub async fn count_assignments(
    State(state): State<crate::AppState>,
) -> AppResult<Json<AssignmentCount>> {
    let assigned_count = state.services.assignments.count_active().await?;
    Ok(Json(AssignmentCount { assigned_count }))
}

/// Assign an asset to an employee
///
/// Multipart form: the fields of `CreateAssignment` plus an optional
/// `allocation_voucher` file.
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "assignments",
    request_body(content = CreateAssignment, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Asset not found"),
        (status = 409, description = "Asset already assigned"),
        (status = 422, description = "Asset cannot be assigned")
    )
)]
pub async fn create_assignment(
    State(state): State<crate::AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Assignment>)> {
    let form = FormSubmission::read(multipart, VOUCHER_FIELDS).await?;
    let (data, voucher) = form.into_parts::<CreateAssignment>()?;
    data.validate()?;

    let assignment = state.services.assignments.create(data, voucher).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}
