//! Business logic services

pub mod assets;
pub mod assignments;
pub mod auctions;
pub mod dashboard;
pub mod events;
pub mod repairs;
pub mod returns;
pub mod vouchers;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub assets: assets::AssetsService,
    pub assignments: assignments::AssignmentsService,
    pub repairs: repairs::RepairsService,
    pub returns: returns::ReturnsService,
    pub auctions: auctions::AuctionsService,
    pub dashboard: dashboard::DashboardService,
    pub events: events::EventBus,
    pub vouchers: vouchers::VoucherStore,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let events = events::EventBus::new(config.events.capacity);
        let vouchers = vouchers::VoucherStore::new(&config.storage.upload_dir);

        Self {
            assets: assets::AssetsService::new(repository.clone(), events.clone()),
            assignments: assignments::AssignmentsService::new(
                repository.clone(),
                events.clone(),
                vouchers.clone(),
            ),
            repairs: repairs::RepairsService::new(repository.clone(), events.clone(), vouchers.clone()),
            returns: returns::ReturnsService::new(repository.clone(), events.clone(), vouchers.clone()),
            auctions: auctions::AuctionsService::new(repository.clone(), events.clone()),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            events,
            vouchers,
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping_database(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.repository.pool)
            .await
            .is_ok()
    }
}

/// Trimmed value, or `None` when missing or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
