//! Assignment service: handing assets to employees

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, StatusCategory},
    models::{
        activity::NewActivity,
        assignment::{Assignment, AssignmentView, CreateAssignment},
        dates::parse_date,
        enums::ActivityType,
    },
    repository::{
        assets::AssetLifecycleUpdate,
        assignments::NewAssignment,
        Repository,
    },
};

use super::events::{EventBus, EventKind, LifecycleEvent};
use super::non_blank;
use super::vouchers::{VoucherStore, VoucherUpload};

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
    events: EventBus,
    vouchers: VoucherStore,
}

impl AssignmentsService {
    pub fn new(repository: Repository, events: EventBus, vouchers: VoucherStore) -> Self {
        Self {
            repository,
            events,
            vouchers,
        }
    }

    /// Active assignments with the classification of their asset
    pub async fn list_active(&self) -> AppResult<Vec<AssignmentView>> {
        let mut rows = self.repository.assignments.list_active().await?;
        for row in rows.iter_mut() {
            row.classification = Some(lifecycle::classify(&*row));
        }
        Ok(rows)
    }

    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.assignments.count_active().await
    }

    /// Assign an asset to an employee, storing the allocation voucher if given
    pub async fn create(
        &self,
        data: CreateAssignment,
        voucher: Option<VoucherUpload>,
    ) -> AppResult<Assignment> {
        let assignment_date = parse_date("assignment_date", &data.assignment_date)?;
        let expected_return_date = parse_date("expected_return_date", &data.expected_return_date)?;
        if expected_return_date < assignment_date {
            return Err(AppError::Validation(
                "expected_return_date must not be before assignment_date".to_string(),
            ));
        }

        let voucher_path = self.vouchers.save_optional(voucher.as_ref()).await?;

        let new_assignment = NewAssignment {
            oracle_number: data.oracle_number.trim().to_string(),
            employee_name: data.employee_name.trim().to_string(),
            designation: data.designation.trim().to_string(),
            department: data.department.trim().to_string(),
            assignment_date,
            expected_return_date,
            notes: non_blank(data.notes),
            allocation_voucher_path: voucher_path.clone(),
        };

        match self.assign(&new_assignment).await {
            Ok((assignment, from)) => {
                tracing::info!(
                    oracle_number = %assignment.oracle_number,
                    employee = %assignment.employee_name,
                    "Asset assigned"
                );
                self.events.publish(
                    LifecycleEvent::new(EventKind::AssignmentCreated, &assignment.oracle_number)
                        .transition(from, StatusCategory::Assigned),
                );
                Ok(assignment)
            }
            Err(e) => {
                self.vouchers.discard(voucher_path.as_deref()).await;
                Err(e)
            }
        }
    }

    async fn assign(&self, data: &NewAssignment) -> AppResult<(Assignment, StatusCategory)> {
        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, &data.oracle_number).await?;

        let mut active = HashSet::new();
        if let Some(existing) = self
            .repository
            .assignments
            .find_active(&mut *tx, &asset.oracle_number)
            .await?
        {
            active.insert(existing.oracle_number);
        }

        let classification = lifecycle::classify(&asset);
        if !lifecycle::is_assignable(&asset, &active, None) {
            return Err(AppError::BusinessRule(format!(
                "Asset {} is not available for assignment (status: {})",
                asset.oracle_number, classification.label
            )));
        }
        lifecycle::validate_transition(lifecycle::transition_category(&asset), StatusCategory::Assigned)?;

        let assignment = self.repository.assignments.create(&mut *tx, data).await?;
        let update = AssetLifecycleUpdate {
            status: lifecycle::STATUS_ASSIGNED.to_string(),
            assigned_to: Some(data.employee_name.clone()),
            assignment_date: Some(data.assignment_date),
            expected_return_date: Some(data.expected_return_date),
            return_type: None,
        };
        let updated = self
            .repository
            .assets
            .update_lifecycle(&mut *tx, &asset.oracle_number, &update)
            .await?;

        let activity = NewActivity::for_asset(ActivityType::Assigned, &updated)
            .employee(Some(data.employee_name.clone()), Some(data.department.clone()));
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        Ok((assignment, classification.category))
    }
}
