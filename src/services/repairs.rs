//! Repair workflow: request, then complete as fixed or not fixed

use chrono::{NaiveTime, Utc};
use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, AssetStatus, StatusCategory},
    models::{
        activity::NewActivity,
        asset::Asset,
        dates::parse_optional_date,
        enums::{ActivityType, AssignmentStatus, RepairOutcome, RepairStatus},
        repair::{CompleteRepair, CreateRepairRequest, OracleNumberList, Repair, RepairCompletion, RepairStats},
    },
    repository::{assets::AssetLifecycleUpdate, Repository},
};

use super::events::{EventBus, EventKind, LifecycleEvent};
use super::non_blank;
use super::vouchers::{VoucherStore, VoucherUpload};

#[derive(Clone)]
pub struct RepairsService {
    repository: Repository,
    events: EventBus,
    vouchers: VoucherStore,
}

/// Category an asset returns to when its repair is closed.
///
/// A fixed asset goes back to its holder when it was assigned before the
/// repair, otherwise back to stock as used. An asset that could not be fixed
/// is damaged.
pub fn completion_target(
    outcome: RepairOutcome,
    previous_status: Option<&str>,
    holder: Option<&str>,
) -> StatusCategory {
    match outcome {
        RepairOutcome::NotFixed => StatusCategory::Damaged,
        RepairOutcome::Fixed => {
            let was_assigned = previous_status.and_then(AssetStatus::parse) == Some(AssetStatus::Assigned);
            let has_holder = holder.map(|h| !h.trim().is_empty()).unwrap_or(false);
            if was_assigned && has_holder {
                StatusCategory::Assigned
            } else {
                StatusCategory::Used
            }
        }
    }
}

impl RepairsService {
    pub fn new(repository: Repository, events: EventBus, vouchers: VoucherStore) -> Self {
        Self {
            repository,
            events,
            vouchers,
        }
    }

    pub async fn stats(&self) -> AppResult<RepairStats> {
        self.repository.repairs.stats().await
    }

    /// Repairs filtered by `in-progress` / `completed`; blank or `all` lists both
    pub async fn list(&self, status: Option<&str>) -> AppResult<Vec<Repair>> {
        let status = match status.map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(
                RepairStatus::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown repair status '{}'", raw)))?,
            ),
        };
        self.repository.repairs.list(status).await
    }

    pub async fn history(&self, oracle_number: &str) -> AppResult<Vec<Repair>> {
        self.repository.repairs.for_asset(oracle_number).await
    }

    pub async fn under_repair_oracle_numbers(&self) -> AppResult<OracleNumberList> {
        let oracle_numbers = self.repository.repairs.open_oracle_numbers().await?;
        Ok(OracleNumberList {
            count: oracle_numbers.len(),
            oracle_numbers,
        })
    }

    /// Send an asset to the workshop
    pub async fn request(&self, data: CreateRepairRequest) -> AppResult<Repair> {
        let oracle_number = data.oracle_number.trim().to_string();

        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, &oracle_number).await?;

        if self.repository.repairs.find_open(&mut *tx, &oracle_number).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Asset {} is already under repair",
                oracle_number
            )));
        }

        let from = lifecycle::transition_category(&asset);
        lifecycle::validate_transition(from, StatusCategory::UnderRepair)?;

        let repair = self.repository.repairs.open(&mut *tx, &asset, &data).await?;
        let update = AssetLifecycleUpdate::status_only(&asset, lifecycle::STATUS_UNDER_REPAIR);
        self.repository
            .assets
            .update_lifecycle(&mut *tx, &oracle_number, &update)
            .await?;

        let activity = NewActivity::for_asset(ActivityType::RepairRequested, &asset)
            .employee(
                non_blank(data.employee_name.clone()).or_else(|| asset.assigned_to.clone()),
                non_blank(data.department.clone()),
            )
            .remarks(data.repair_description.clone());
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        tracing::info!(oracle_number = %oracle_number, from = %from, "Repair requested");
        self.events.publish(
            LifecycleEvent::new(EventKind::RepairRequested, &oracle_number)
                .transition(from, StatusCategory::UnderRepair),
        );

        Ok(repair)
    }

    /// Close the open repair of an asset
    pub async fn complete(
        &self,
        data: CompleteRepair,
        voucher: Option<VoucherUpload>,
    ) -> AppResult<Repair> {
        let outcome = RepairOutcome::parse(&data.is_fixed).ok_or_else(|| {
            AppError::Validation(format!("is_fixed must be 'fixed' or 'not_fixed', got '{}'", data.is_fixed))
        })?;
        let completion_date = parse_optional_date("completion_date", data.completion_date.as_deref())?
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or_else(Utc::now);
        let return_date = parse_optional_date("return_date", data.return_date.as_deref())?;

        let voucher_path = self.vouchers.save_optional(voucher.as_ref()).await?;
        let completion = RepairCompletion {
            repair_description: data.repair_description.trim().to_string(),
            is_fixed: outcome.as_str().to_string(),
            completion_date,
            return_date,
            technician: non_blank(data.technician),
            cost: data.repair_cost,
            notes: non_blank(data.notes),
            vendor_name: non_blank(data.vendor_name),
            voucher_path: voucher_path.clone(),
        };

        match self.close(data.oracle_number.trim(), outcome, &completion).await {
            Ok((repair, from, to)) => {
                tracing::info!(oracle_number = %repair.oracle_number, outcome = %outcome, to = %to, "Repair completed");
                self.events.publish(
                    LifecycleEvent::new(EventKind::RepairCompleted, &repair.oracle_number).transition(from, to),
                );
                Ok(repair)
            }
            Err(e) => {
                self.vouchers.discard(voucher_path.as_deref()).await;
                Err(e)
            }
        }
    }

    async fn close(
        &self,
        oracle_number: &str,
        outcome: RepairOutcome,
        completion: &RepairCompletion,
    ) -> AppResult<(Repair, StatusCategory, StatusCategory)> {
        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, oracle_number).await?;
        let open = self
            .repository
            .repairs
            .find_open(&mut *tx, oracle_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No open repair for asset {}", oracle_number)))?;

        let from = lifecycle::transition_category(&asset);
        let to = completion_target(outcome, open.previous_status.as_deref(), asset.assigned_to.as_deref());
        lifecycle::validate_transition(from, to)?;

        let update = self.restore(&mut *tx, &asset, to, completion).await?;
        let updated = self
            .repository
            .assets
            .update_lifecycle(&mut *tx, oracle_number, &update)
            .await?;
        let repair = self.repository.repairs.complete(&mut *tx, open.id, completion).await?;

        let activity = NewActivity::for_asset(ActivityType::RepairCompleted, &updated)
            .employee(asset.assigned_to.clone(), open.department.clone())
            .remarks(outcome.to_string());
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        Ok((repair, from, to))
    }

    /// Asset fields after the repair; a damaged asset leaves its holder
    async fn restore(
        &self,
        conn: &mut PgConnection,
        asset: &Asset,
        to: StatusCategory,
        completion: &RepairCompletion,
    ) -> AppResult<AssetLifecycleUpdate> {
        let update = match to {
            StatusCategory::Assigned => AssetLifecycleUpdate::status_only(asset, lifecycle::STATUS_ASSIGNED),
            StatusCategory::Damaged => {
                let closed_on = completion
                    .return_date
                    .unwrap_or_else(|| completion.completion_date.date_naive());
                self.repository
                    .assignments
                    .close_active(conn, &asset.oracle_number, AssignmentStatus::Returned, closed_on)
                    .await?;
                AssetLifecycleUpdate::released(lifecycle::STATUS_DAMAGED, asset.return_type.clone())
            }
            _ => AssetLifecycleUpdate::released(lifecycle::STATUS_USED, asset.return_type.clone()),
        };
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_asset_goes_back_to_its_holder() {
        assert_eq!(
            completion_target(RepairOutcome::Fixed, Some("assigned"), Some("Jane Doe")),
            StatusCategory::Assigned
        );
    }

    #[test]
    fn fixed_stock_asset_becomes_used() {
        assert_eq!(completion_target(RepairOutcome::Fixed, Some("new"), None), StatusCategory::Used);
        assert_eq!(completion_target(RepairOutcome::Fixed, Some("used"), None), StatusCategory::Used);
        assert_eq!(completion_target(RepairOutcome::Fixed, None, None), StatusCategory::Used);
    }

    #[test]
    fn assigned_before_but_holder_gone_becomes_used() {
        assert_eq!(
            completion_target(RepairOutcome::Fixed, Some("assigned"), Some("  ")),
            StatusCategory::Used
        );
    }

    #[test]
    fn unfixed_asset_is_damaged() {
        assert_eq!(
            completion_target(RepairOutcome::NotFixed, Some("assigned"), Some("Jane Doe")),
            StatusCategory::Damaged
        );
        assert_eq!(completion_target(RepairOutcome::NotFixed, Some("new"), None), StatusCategory::Damaged);
    }

    #[test]
    fn every_completion_target_is_reachable_from_the_workshop() {
        for outcome in [RepairOutcome::Fixed, RepairOutcome::NotFixed] {
            for previous in [Some("new"), Some("used"), Some("assigned"), None] {
                let to = completion_target(outcome, previous, Some("Jane Doe"));
                assert!(lifecycle::can_transition(StatusCategory::UnderRepair, to));
            }
        }
    }
}
