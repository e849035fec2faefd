//! Dashboard statistics and the recent-activity feed

use crate::{
    error::AppResult,
    lifecycle::{classify, LifecycleRecord, StatusCategory},
    models::{
        activity::ActivityLog,
        dashboard::{CategoryCount, DashboardStats, DepartmentCount},
    },
    repository::Repository,
};

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
const MAX_ACTIVITY_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

/// Count assets per lifecycle category.
///
/// Every figure comes from [`classify`], so the dashboard agrees with the
/// badges shown in the asset lists.
pub fn compute_dashboard<A: LifecycleRecord>(
    assets: &[A],
    departments: Vec<DepartmentCount>,
) -> DashboardStats {
    let mut counts = [0i64; StatusCategory::ALL.len()];
    let mut unassigned_total = 0;
    let mut under_repair_unassigned = 0;

    for asset in assets {
        let category = classify(asset).category;
        if let Some(slot) = StatusCategory::ALL.iter().position(|c| *c == category) {
            counts[slot] += 1;
        }
        let unassigned = asset.assigned_to().map(|a| a.trim().is_empty()).unwrap_or(true);
        if unassigned {
            unassigned_total += 1;
        }
        if category == StatusCategory::UnderRepair && unassigned {
            under_repair_unassigned += 1;
        }
    }

    let count_of = |category: StatusCategory| {
        StatusCategory::ALL
            .iter()
            .position(|c| *c == category)
            .map(|slot| counts[slot])
            .unwrap_or(0)
    };

    let total_assets = assets.len() as i64;
    let assigned = count_of(StatusCategory::Assigned);
    let available = count_of(StatusCategory::New) + count_of(StatusCategory::Used);

    DashboardStats {
        total_assets,
        assigned,
        unassigned: unassigned_total,
        under_repair: count_of(StatusCategory::UnderRepair),
        damaged: count_of(StatusCategory::Damaged),
        auctioned: count_of(StatusCategory::Auctioned),
        buyback: count_of(StatusCategory::Buyback),
        available,
        under_repair_unassigned,
        stock_count: available + under_repair_unassigned,
        categories: StatusCategory::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                label: category.label().to_string(),
                count: count_of(*category),
            })
            .collect(),
        departments,
    }
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let assets = self.repository.assets.list_all().await?;
        let departments = self.repository.assignments.department_counts().await?;
        Ok(compute_dashboard(&assets, departments))
    }

    pub async fn recent_activities(&self, limit: Option<i64>) -> AppResult<Vec<ActivityLog>> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        self.repository.activity.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::AssetSnapshot;

    fn asset(n: u32, status: &str, assigned_to: Option<&str>, return_type: Option<&str>) -> AssetSnapshot {
        AssetSnapshot {
            oracle_number: format!("ORA-{}", n),
            device_type: "Laptop".to_string(),
            status: Some(status.to_string()),
            assigned_to: assigned_to.map(String::from),
            return_type: return_type.map(String::from),
        }
    }

    fn fleet() -> Vec<AssetSnapshot> {
        vec![
            asset(1, "new", None, None),
            asset(2, "new", None, None),
            asset(3, "used", None, Some("returned_to_inventory")),
            asset(4, "assigned", Some("Jane Doe"), None),
            asset(5, "under_repair", Some("John Roe"), None),
            asset(6, "under repair", None, None),
            asset(7, "damaged", None, Some("damaged")),
            asset(8, "buyback", None, Some("buyback")),
            asset(9, "auctioned", None, None),
            asset(10, "lost", None, None),
        ]
    }

    #[test]
    fn counts_follow_classification() {
        let stats = compute_dashboard(&fleet(), Vec::new());

        assert_eq!(stats.total_assets, 10);
        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.unassigned, 8);
        assert_eq!(stats.under_repair, 2);
        assert_eq!(stats.damaged, 1);
        assert_eq!(stats.buyback, 1);
        assert_eq!(stats.auctioned, 1);
        assert_eq!(stats.available, 3);
        assert_eq!(stats.under_repair_unassigned, 1);
        assert_eq!(stats.stock_count, 4);
    }

    #[test]
    fn held_asset_under_repair_is_not_unassigned() {
        let assets = vec![
            asset(1, "under_repair", Some("John Roe"), None),
            asset(2, "under_repair", Some("  "), None),
            asset(3, "new", None, None),
        ];
        let stats = compute_dashboard(&assets, Vec::new());

        assert_eq!(stats.assigned, 0);
        assert_eq!(stats.unassigned, 2);
        assert_eq!(stats.under_repair_unassigned, 1);
        assert_eq!(stats.stock_count, 2);
    }

    #[test]
    fn category_counts_cover_every_asset() {
        let stats = compute_dashboard(&fleet(), Vec::new());

        assert_eq!(stats.categories.len(), StatusCategory::ALL.len());
        let sum: i64 = stats.categories.iter().map(|c| c.count).sum();
        assert_eq!(sum, stats.total_assets);

        let other = stats
            .categories
            .iter()
            .find(|c| c.category == StatusCategory::Other)
            .unwrap();
        assert_eq!(other.count, 1);
        let repair = stats
            .categories
            .iter()
            .find(|c| c.category == StatusCategory::UnderRepair)
            .unwrap();
        assert_eq!(repair.label, "Under Repair");
    }

    #[test]
    fn buyback_return_wins_over_used_status() {
        let assets = vec![asset(1, "used", None, Some("buyback"))];
        let stats = compute_dashboard(&assets, Vec::new());
        assert_eq!(stats.buyback, 1);
        assert_eq!(stats.available, 0);
    }

    #[test]
    fn empty_register() {
        let stats = compute_dashboard::<AssetSnapshot>(&[], Vec::new());
        assert_eq!(stats.total_assets, 0);
        assert_eq!(stats.stock_count, 0);
        assert!(stats.departments.is_empty());
    }

    #[test]
    fn departments_are_passed_through() {
        let departments = vec![DepartmentCount {
            department: "Finance".to_string(),
            count: 3,
        }];
        let stats = compute_dashboard(&fleet(), departments.clone());
        assert_eq!(stats.departments, departments);
    }
}
