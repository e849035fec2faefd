//! Lifecycle engine endpoints
//!
//! Expose classification, assignability and the transition graph to clients
//! that hold raw asset records, so every view derives badges and allowed
//! actions from one place.

use std::collections::HashSet;

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, AssetSnapshot, LifecycleError, StatusCategory, StatusClassification, TransitionRule},
};

/// Classification of one submitted record
#[derive(Serialize, ToSchema)]
pub struct ClassifiedRecord {
    pub oracle_number: String,
    pub classification: StatusClassification,
}

/// Assignability check request
#[derive(Deserialize, ToSchema)]
pub struct AssignableRequest {
    /// Raw asset record
    #[schema(value_type = Object)]
    pub asset: Value,
    /// Oracle numbers with an active assignment
    #[serde(default)]
    pub active_assignments: Vec<String>,
    /// Device type requested by the assignment form
    pub device_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AssignableResponse {
    pub assignable: bool,
    pub classification: StatusClassification,
}

#[derive(Deserialize, IntoParams)]
pub struct TransitionQuery {
    /// Current category (`New`, `used`, `Under Repair`, ...)
    pub from: String,
    /// Requested category
    pub to: String,
}

#[derive(Serialize, ToSchema)]
pub struct TransitionCheck {
    pub from: StatusCategory,
    pub to: StatusCategory,
    pub allowed: bool,
    /// Every category reachable from `from`
    pub reachable: Vec<StatusCategory>,
}

fn parse_category(field: &str, raw: &str) -> AppResult<StatusCategory> {
    StatusCategory::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown {} category '{}'", field, raw)))
}

/// Classify raw asset records
///
/// Accepts a single record or an array of records. A `null` record rejects
/// the whole batch.
#[utoipa::path(
    post,
    path = "/lifecycle/classify",
    tag = "lifecycle",
    request_body(content = Vec<AssetSnapshot>, description = "Asset record or array of asset records"),
    responses(
        (status = 200, description = "One classification per record", body = Vec<ClassifiedRecord>),
        (status = 400, description = "Null or malformed record")
    )
)]
pub async fn classify_records(Json(body): Json<Value>) -> AppResult<Json<Vec<ClassifiedRecord>>> {
    let records = match body {
        Value::Array(records) => records,
        single => vec![single],
    };

    let classified = records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            classify_one(value).map_err(|e| match e {
                LifecycleError::InvalidInput(msg) => {
                    LifecycleError::InvalidInput(format!("record {}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, LifecycleError>>()?;

    Ok(Json(classified))
}

fn classify_one(value: &Value) -> Result<ClassifiedRecord, LifecycleError> {
    let record = lifecycle::record_from_value(value)?;
    let classification = lifecycle::try_classify(record.as_ref())?;
    Ok(ClassifiedRecord {
        oracle_number: record.map(|r| r.oracle_number).unwrap_or_default(),
        classification,
    })
}

/// Check whether a raw record may be offered for assignment
#[utoipa::path(
    post,
    path = "/lifecycle/assignable",
    tag = "lifecycle",
    request_body = AssignableRequest,
    responses(
        (status = 200, description = "Assignability verdict", body = AssignableResponse),
        (status = 400, description = "Null or malformed record")
    )
)]
pub async fn check_assignable(
    Json(request): Json<AssignableRequest>,
) -> AppResult<Json<AssignableResponse>> {
    let record = lifecycle::record_from_value(&request.asset)?;
    let active: HashSet<String> = request.active_assignments.into_iter().collect();

    Ok(Json(AssignableResponse {
        assignable: lifecycle::try_is_assignable(
            record.as_ref(),
            &active,
            request.device_type.as_deref(),
        )?,
        classification: lifecycle::try_classify(record.as_ref())?,
    }))
}

/// Full transition graph
#[utoipa::path(
    get,
    path = "/lifecycle/transitions",
    tag = "lifecycle",
    responses(
        (status = 200, description = "One row per category", body = Vec<TransitionRule>)
    )
)]
pub async fn list_transitions() -> Json<Vec<TransitionRule>> {
    Json(lifecycle::transition_table())
}

/// Check a single transition
#[utoipa::path(
    get,
    path = "/lifecycle/can-transition",
    tag = "lifecycle",
    params(TransitionQuery),
    responses(
        (status = 200, description = "Transition verdict", body = TransitionCheck),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn check_transition(Query(query): Query<TransitionQuery>) -> AppResult<Json<TransitionCheck>> {
    let from = parse_category("from", &query.from)?;
    let to = parse_category("to", &query.to)?;

    Ok(Json(TransitionCheck {
        from,
        to,
        allowed: lifecycle::can_transition(from, to),
        reachable: lifecycle::allowed_transitions(from).to_vec(),
    }))
}
