//! Return flow: assigned assets coming back to inventory, bought back or damaged

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, ReturnType, StatusCategory},
    models::{
        activity::NewActivity,
        dates::parse_date,
        enums::{ActivityType, AssignmentStatus},
        return_record::{CreateReturn, ReturnRecord, ReturnStats, ReturnView},
    },
    repository::{assets::AssetLifecycleUpdate, returns::NewReturn, Repository},
};

use super::events::{EventBus, EventKind, LifecycleEvent};
use super::non_blank;
use super::vouchers::{VoucherStore, VoucherUpload};

#[derive(Clone)]
pub struct ReturnsService {
    repository: Repository,
    events: EventBus,
    vouchers: VoucherStore,
}

impl ReturnsService {
    pub fn new(repository: Repository, events: EventBus, vouchers: VoucherStore) -> Self {
        Self {
            repository,
            events,
            vouchers,
        }
    }

    pub async fn stats(&self) -> AppResult<ReturnStats> {
        self.repository.returns.stats().await
    }

    pub async fn total_count(&self) -> AppResult<i64> {
        self.repository.returns.total_count().await
    }

    pub async fn list(&self) -> AppResult<Vec<ReturnView>> {
        self.repository.returns.list().await
    }

    pub async fn for_asset(&self, oracle_number: &str) -> AppResult<Vec<ReturnView>> {
        self.repository.returns.for_asset(oracle_number).await
    }

    /// Record a return and release the asset from its holder
    pub async fn create(
        &self,
        data: CreateReturn,
        voucher: Option<VoucherUpload>,
    ) -> AppResult<ReturnRecord> {
        let return_type = ReturnType::from_return_option(&data.return_option).ok_or_else(|| {
            AppError::Validation(format!("Invalid return_option '{}'", data.return_option))
        })?;
        let record = NewReturn {
            oracle_number: data.oracle_number.trim().to_string(),
            return_type: return_type.as_str().to_string(),
            return_date: parse_date("return_date", &data.return_date)?,
            reason: non_blank(data.reason),
            notes: non_blank(data.notes),
        };

        let voucher_path = self.vouchers.save_optional(voucher.as_ref()).await?;

        match self.record(&record, return_type, voucher_path.as_deref()).await {
            Ok((created, from, to)) => {
                tracing::info!(
                    oracle_number = %created.oracle_number,
                    return_type = %return_type,
                    "Asset returned"
                );
                self.events.publish(
                    LifecycleEvent::new(EventKind::ReturnRecorded, &created.oracle_number).transition(from, to),
                );
                Ok(created)
            }
            Err(e) => {
                self.vouchers.discard(voucher_path.as_deref()).await;
                Err(e)
            }
        }
    }

    async fn record(
        &self,
        record: &NewReturn,
        return_type: ReturnType,
        voucher_path: Option<&str>,
    ) -> AppResult<(ReturnRecord, StatusCategory, StatusCategory)> {
        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, &record.oracle_number).await?;

        let from = lifecycle::transition_category(&asset);
        let open_repair = self
            .repository
            .repairs
            .find_open(&mut *tx, &record.oracle_number)
            .await?;
        if from == StatusCategory::UnderRepair || open_repair.is_some() {
            return Err(AppError::BusinessRule(format!(
                "Asset {} is currently under repair and cannot be returned",
                record.oracle_number
            )));
        }

        let to = return_type.target_category();
        lifecycle::validate_transition(from, to)?;
        let target_status = to
            .status()
            .ok_or_else(|| AppError::Internal(format!("No status for category {}", to)))?;

        let created = self.repository.returns.create(&mut *tx, record, voucher_path).await?;
        let closed = self
            .repository
            .assignments
            .close_active(&mut *tx, &record.oracle_number, AssignmentStatus::Returned, record.return_date)
            .await?;
        let update = AssetLifecycleUpdate::released(target_status.as_str(), Some(record.return_type.clone()));
        let updated = self
            .repository
            .assets
            .update_lifecycle(&mut *tx, &record.oracle_number, &update)
            .await?;

        let (employee, department) = match closed {
            Some(assignment) => (Some(assignment.employee_name), assignment.department),
            None => (asset.assigned_to.clone(), None),
        };
        let activity = NewActivity::for_asset(ActivityType::Returned, &updated)
            .employee(employee, department)
            .remarks(return_type.as_str());
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        Ok((created, from, to))
    }

    /// Attach or replace the voucher of an existing return
    pub async fn attach_voucher(&self, id: i32, voucher: VoucherUpload) -> AppResult<ReturnRecord> {
        let key = self.vouchers.save(&voucher).await?;
        match self.repository.returns.set_voucher(id, &key).await {
            Ok(record) => {
                tracing::info!(return_id = id, key = %key, "Return voucher attached");
                Ok(record)
            }
            Err(e) => {
                self.vouchers.discard(Some(&key)).await;
                Err(e)
            }
        }
    }
}
