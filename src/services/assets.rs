//! Asset register service

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, LifecycleRecord, StatusCategory, StatusClassification},
    models::{
        activity::NewActivity,
        asset::{
            AddBrand, Asset, AssetDetails, AssetQuery, AssetView, AvailableAsset, CreateAsset,
            NewAsset, UpdateAssetStatus,
        },
        assignment::{AssignmentDetails, AssignmentHistoryEntry},
        dates::{parse_optional_date, parse_warranty_expiry},
        device_brand::DeviceBrandMapping,
        enums::{ActivityType, AssignmentStatus},
    },
    repository::{assets::AssetLifecycleUpdate, Repository},
};

use super::events::{EventBus, EventKind, LifecycleEvent};
use super::non_blank;

#[derive(Clone)]
pub struct AssetsService {
    repository: Repository,
    events: EventBus,
}

/// Derived list filters, resolved once per request
#[derive(Debug, Default)]
struct DerivedFilters {
    category: Option<StatusCategory>,
    stock: bool,
    new: bool,
    unassigned: bool,
}

impl DerivedFilters {
    fn from_query(query: &AssetQuery) -> AppResult<Self> {
        let category = match query.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(
                StatusCategory::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown status category '{}'", raw)))?,
            ),
        };

        Ok(Self {
            category,
            stock: query.stock.unwrap_or(false),
            new: query.new.unwrap_or(false),
            unassigned: query.unassigned.unwrap_or(false),
        })
    }

    fn matches<A: LifecycleRecord>(&self, asset: &A, classification: &StatusClassification) -> bool {
        let category = classification.category;
        let unassigned = asset.assigned_to().map(|a| a.trim().is_empty()).unwrap_or(true);

        if let Some(wanted) = self.category {
            if category != wanted {
                return false;
            }
        }
        if self.unassigned && !unassigned {
            return false;
        }
        if self.stock
            && !(unassigned
                && matches!(
                    category,
                    StatusCategory::New | StatusCategory::Used | StatusCategory::UnderRepair
                ))
        {
            return false;
        }
        if self.new
            && !(unassigned
                && !matches!(
                    category,
                    StatusCategory::UnderRepair | StatusCategory::Damaged | StatusCategory::Auctioned
                ))
        {
            return false;
        }
        true
    }
}

/// Merge catalogue brands with brands seen on assets, case-insensitively,
/// keeping the catalogue order first.
fn merge_brands(catalogue: Vec<String>, in_use: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    catalogue
        .into_iter()
        .chain(in_use)
        .filter(|b| !b.trim().is_empty())
        .filter(|b| seen.insert(b.trim().to_lowercase()))
        .collect()
}

impl AssetsService {
    pub fn new(repository: Repository, events: EventBus) -> Self {
        Self { repository, events }
    }

    /// List assets with filters, each enriched with its classification and holder
    pub async fn list(&self, query: &AssetQuery) -> AppResult<Vec<AssetView>> {
        let filters = DerivedFilters::from_query(query)?;
        let assets = self.repository.assets.search(query).await?;
        let holders: HashMap<String, String> = self
            .repository
            .assignments
            .current_holders()
            .await?
            .into_iter()
            .collect();

        let views = assets
            .into_iter()
            .filter_map(|asset| {
                let classification = lifecycle::classify(&asset);
                if !filters.matches(&asset, &classification) {
                    return None;
                }
                let current_holder = holders.get(&asset.oracle_number).cloned();
                Some(AssetView {
                    asset,
                    classification,
                    current_holder,
                })
            })
            .collect();

        Ok(views)
    }

    pub async fn get(&self, oracle_number: &str) -> AppResult<AssetDetails> {
        let asset = self.repository.assets.get_by_oracle_number(oracle_number).await?;
        let active_assignment = self.repository.assignments.get_active(oracle_number).await?;
        let classification = lifecycle::classify(&asset);

        Ok(AssetDetails {
            asset,
            classification,
            active_assignment,
        })
    }

    /// Register a new asset with status `new`
    pub async fn create(&self, data: CreateAsset) -> AppResult<Asset> {
        let oracle_number = data.oracle_number.trim().to_string();
        let serial_number = non_blank(data.serial_number);

        if self.repository.assets.oracle_number_exists(&oracle_number).await? {
            return Err(AppError::Conflict("Oracle Number already exists".to_string()));
        }
        if let Some(serial) = serial_number.as_deref() {
            if self.repository.assets.serial_number_exists(serial).await? {
                return Err(AppError::Conflict("Serial Number already exists".to_string()));
            }
        }

        let new_asset = NewAsset {
            oracle_number,
            device_type: data.device_type.trim().to_string(),
            brand_name: non_blank(data.brand_name),
            model_name: non_blank(data.model_name),
            serial_number,
            unit_price: data.unit_price,
            purchase_date: parse_optional_date("purchase_date", data.purchase_date.as_deref())?,
            warranty_expiry: parse_warranty_expiry(
                data.warranty_expiry.as_deref(),
                Utc::now().date_naive(),
            )?,
            vendor_name: non_blank(data.vendor_name),
            tender_number: non_blank(data.tender_number),
            notes: non_blank(data.notes),
        };

        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.create(&mut *tx, &new_asset).await?;
        self.repository
            .activity
            .record(&mut *tx, &NewActivity::for_asset(ActivityType::Added, &asset))
            .await?;
        tx.commit().await?;

        tracing::info!(oracle_number = %asset.oracle_number, device_type = %asset.device_type, "Asset registered");
        self.events
            .publish(LifecycleEvent::new(EventKind::AssetCreated, &asset.oracle_number));

        Ok(asset)
    }

    /// Change an asset's status along a legal transition
    pub async fn update_status(&self, data: UpdateAssetStatus) -> AppResult<Asset> {
        let target = StatusCategory::parse(&data.status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", data.status)))?;
        let target_status = target
            .status()
            .ok_or_else(|| AppError::Validation("Status 'Other' cannot be assigned".to_string()))?;

        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, &data.oracle_number).await?;
        let from = lifecycle::transition_category(&asset);
        check_direct_change(from, target)?;

        let update = match target {
            StatusCategory::Assigned => {
                if non_blank(asset.assigned_to.clone()).is_none() {
                    return Err(AppError::BusinessRule(
                        "Assets without a holder are assigned through the assignment form".to_string(),
                    ));
                }
                AssetLifecycleUpdate::status_only(&asset, target_status.as_str())
            }
            _ => {
                let closing = if target == StatusCategory::Auctioned {
                    AssignmentStatus::Auctioned
                } else {
                    AssignmentStatus::Returned
                };
                self.repository
                    .assignments
                    .close_active(&mut *tx, &asset.oracle_number, closing, Utc::now().date_naive())
                    .await?;
                let return_type = match target {
                    StatusCategory::Buyback => Some(lifecycle::ReturnType::Buyback.as_str().to_string()),
                    _ => asset.return_type.clone(),
                };
                AssetLifecycleUpdate::released(target_status.as_str(), return_type)
            }
        };

        let updated = self
            .repository
            .assets
            .update_lifecycle(&mut *tx, &asset.oracle_number, &update)
            .await?;
        let activity = NewActivity::for_asset(ActivityType::StatusChanged, &updated)
            .employee(asset.assigned_to.clone(), None)
            .remarks(format!("{} -> {}", from.label(), target.label()));
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        tracing::info!(oracle_number = %updated.oracle_number, from = %from, to = %target, "Asset status changed");
        self.events.publish(
            LifecycleEvent::new(EventKind::AssetStatusChanged, &updated.oracle_number).transition(from, target),
        );

        Ok(updated)
    }

    pub async fn exists_oracle(&self, oracle_number: &str) -> AppResult<bool> {
        self.repository.assets.oracle_number_exists(oracle_number).await
    }

    pub async fn exists_serial(&self, serial_number: &str) -> AppResult<bool> {
        self.repository.assets.serial_number_exists(serial_number).await
    }

    pub async fn device_types(&self) -> AppResult<Vec<String>> {
        let mappings = self.repository.device_brands.list().await?;
        Ok(mappings.into_iter().map(|m| m.device_type).collect())
    }

    /// Catalogue brands for a device type plus brands recorded on assets
    pub async fn brands_for(&self, device_type: &str) -> AppResult<Vec<String>> {
        let catalogue = self
            .repository
            .device_brands
            .find(device_type)
            .await?
            .map(|m| m.brands)
            .unwrap_or_default();
        let in_use = self.repository.assets.brands_in_use(device_type).await?;
        Ok(merge_brands(catalogue, in_use))
    }

    pub async fn add_brand(&self, data: AddBrand) -> AppResult<DeviceBrandMapping> {
        let mapping = self
            .repository
            .device_brands
            .add_brand(data.device_type.trim(), data.brand_name.trim())
            .await?;
        tracing::info!(device_type = %mapping.device_type, brand = %data.brand_name.trim(), "Brand added to catalogue");
        Ok(mapping)
    }

    /// Assets of a device type that can be handed out now
    pub async fn available(&self, device_type: &str) -> AppResult<Vec<AvailableAsset>> {
        let assets = self.repository.assets.list_by_device_type(device_type).await?;
        let active: HashSet<String> = self
            .repository
            .assignments
            .active_oracle_numbers()
            .await?
            .into_iter()
            .collect();

        Ok(assets
            .iter()
            .filter(|asset| lifecycle::is_assignable(*asset, &active, Some(device_type)))
            .map(AvailableAsset::from)
            .collect())
    }

    pub async fn assigned_oracle_numbers(&self) -> AppResult<Vec<String>> {
        self.repository.assignments.assigned_oracle_numbers().await
    }

    pub async fn assignment_history(&self, oracle_number: &str) -> AppResult<Vec<AssignmentHistoryEntry>> {
        self.repository.assignments.history(oracle_number).await
    }

    pub async fn assignment_details(&self, oracle_number: &str) -> AppResult<AssignmentDetails> {
        self.repository.assignments.details(oracle_number).await
    }
}

/// Validate a status change made outside the repair workflow.
///
/// Entering or leaving `UnderRepair` opens or closes a repair record, so
/// those moves only happen through the repair endpoints.
fn check_direct_change(from: StatusCategory, target: StatusCategory) -> AppResult<()> {
    lifecycle::validate_transition(from, target)?;
    if target == StatusCategory::UnderRepair {
        return Err(AppError::BusinessRule(
            "Send the asset to the workshop through /repairs/request".to_string(),
        ));
    }
    if from == StatusCategory::UnderRepair {
        return Err(AppError::BusinessRule(
            "Assets under repair leave the workshop through /repairs/complete".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{classify, AssetSnapshot};

    fn snapshot(status: &str, assigned_to: Option<&str>) -> AssetSnapshot {
        AssetSnapshot {
            oracle_number: "ORA-1".to_string(),
            device_type: "Laptop".to_string(),
            status: Some(status.to_string()),
            assigned_to: assigned_to.map(String::from),
            return_type: None,
        }
    }

    fn passes(filters: &DerivedFilters, asset: &AssetSnapshot) -> bool {
        filters.matches(asset, &classify(asset))
    }

    #[test]
    fn workshop_moves_go_through_repairs() {
        use StatusCategory::*;

        for (from, to) in [(New, UnderRepair), (Used, UnderRepair), (Assigned, UnderRepair)] {
            match check_direct_change(from, to) {
                Err(AppError::BusinessRule(msg)) => assert!(msg.contains("/repairs/request"), "{msg}"),
                other => panic!("{from} -> {to}: {other:?}"),
            }
        }
        for to in [Assigned, Used, Damaged] {
            match check_direct_change(UnderRepair, to) {
                Err(AppError::BusinessRule(msg)) => assert!(msg.contains("/repairs/complete"), "{msg}"),
                other => panic!("UnderRepair -> {to}: {other:?}"),
            }
        }
    }

    #[test]
    fn direct_changes_follow_the_transition_graph() {
        use StatusCategory::*;

        assert!(check_direct_change(Assigned, Used).is_ok());
        assert!(check_direct_change(Assigned, Buyback).is_ok());
        assert!(check_direct_change(Damaged, Auctioned).is_ok());
        assert!(check_direct_change(New, Assigned).is_ok());
        assert!(matches!(check_direct_change(Auctioned, Used), Err(AppError::Lifecycle(_))));
        assert!(matches!(check_direct_change(Other, UnderRepair), Err(AppError::Lifecycle(_))));
    }

    #[test]
    fn stock_filter_keeps_unassigned_new_used_and_repairing() {
        let filters = DerivedFilters {
            stock: true,
            ..Default::default()
        };
        assert!(passes(&filters, &snapshot("new", None)));
        assert!(passes(&filters, &snapshot("used", Some(""))));
        assert!(passes(&filters, &snapshot("under_repair", None)));
        assert!(!passes(&filters, &snapshot("under_repair", Some("Jane Doe"))));
        assert!(!passes(&filters, &snapshot("damaged", None)));
        assert!(!passes(&filters, &snapshot("buyback", None)));
        assert!(!passes(&filters, &snapshot("assigned", Some("Jane Doe"))));
    }

    #[test]
    fn new_filter_excludes_workshop_and_disposed_assets() {
        let filters = DerivedFilters {
            new: true,
            ..Default::default()
        };
        assert!(passes(&filters, &snapshot("new", None)));
        assert!(passes(&filters, &snapshot("used", None)));
        assert!(!passes(&filters, &snapshot("under repair", None)));
        assert!(!passes(&filters, &snapshot("auctioned", None)));
        assert!(!passes(&filters, &snapshot("new", Some("Jane Doe"))));
    }

    #[test]
    fn category_filter_uses_classification() {
        let query = AssetQuery {
            category: Some("under_repair".to_string()),
            ..Default::default()
        };
        let filters = DerivedFilters::from_query(&query).unwrap();
        assert!(passes(&filters, &snapshot("under repair", Some("Jane Doe"))));
        assert!(!passes(&filters, &snapshot("damaged", None)));

        let mut buyback = snapshot("used", None);
        buyback.return_type = Some("buyback".to_string());
        let filters = DerivedFilters::from_query(&AssetQuery {
            category: Some("Buyback".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(passes(&filters, &buyback));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let query = AssetQuery {
            category: Some("lost".to_string()),
            ..Default::default()
        };
        assert!(matches!(DerivedFilters::from_query(&query), Err(AppError::Validation(_))));

        let all = AssetQuery {
            category: Some("All".to_string()),
            ..Default::default()
        };
        assert!(DerivedFilters::from_query(&all).unwrap().category.is_none());
    }

    #[test]
    fn brands_are_merged_without_duplicates() {
        let merged = merge_brands(
            vec!["Dell".into(), "HP".into(), "Lenovo".into()],
            vec!["hp".into(), "Apple".into(), " ".into()],
        );
        assert_eq!(merged, vec!["Dell", "HP", "Lenovo", "Apple"]);
    }
}
