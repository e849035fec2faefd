//! Auction disposal

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, StatusCategory},
    models::{
        activity::NewActivity,
        auction::{Auction, CreateAuction},
        dates::parse_date,
        enums::{ActivityType, AssignmentStatus},
        repair::OracleNumberList,
    },
    repository::{assets::AssetLifecycleUpdate, Repository},
};

use super::events::{EventBus, EventKind, LifecycleEvent};

#[derive(Clone)]
pub struct AuctionsService {
    repository: Repository,
    events: EventBus,
}

impl AuctionsService {
    pub fn new(repository: Repository, events: EventBus) -> Self {
        Self { repository, events }
    }

    pub async fn list(&self) -> AppResult<Vec<Auction>> {
        self.repository.auctions.list().await
    }

    pub async fn for_asset(&self, oracle_number: &str) -> AppResult<Vec<Auction>> {
        self.repository.auctions.for_asset(oracle_number).await
    }

    pub async fn auctioned_oracle_numbers(&self) -> AppResult<OracleNumberList> {
        let oracle_numbers = self.repository.assets.auctioned_oracle_numbers().await?;
        Ok(OracleNumberList {
            count: oracle_numbers.len(),
            oracle_numbers,
        })
    }

    /// Sell an asset at auction; the asset leaves the lifecycle for good
    pub async fn create(&self, data: CreateAuction) -> AppResult<Auction> {
        if data.price <= Decimal::ZERO {
            return Err(AppError::Validation("price must be greater than zero".to_string()));
        }
        let auction_date = parse_date("auction_date", &data.auction_date)?;
        let oracle_number = data.oracle_number.trim();

        let mut tx = self.repository.pool.begin().await?;
        let asset = self.repository.assets.lock(&mut *tx, oracle_number).await?;

        if self.repository.repairs.find_open(&mut *tx, oracle_number).await?.is_some() {
            return Err(AppError::BusinessRule(format!(
                "Asset {} is currently under repair and cannot be sent for auction",
                oracle_number
            )));
        }

        let from = lifecycle::transition_category(&asset);
        lifecycle::validate_transition(from, StatusCategory::Auctioned)?;

        let auction = self
            .repository
            .auctions
            .create(&mut *tx, &asset, data.price, auction_date)
            .await?;
        self.repository
            .assignments
            .close_active(&mut *tx, oracle_number, AssignmentStatus::Auctioned, auction_date)
            .await?;
        let update = AssetLifecycleUpdate::released(lifecycle::STATUS_AUCTIONED, asset.return_type.clone());
        let updated = self
            .repository
            .assets
            .update_lifecycle(&mut *tx, oracle_number, &update)
            .await?;

        let activity = NewActivity::for_asset(ActivityType::Auctioned, &updated)
            .remarks(format!("Sold for {}", data.price));
        self.repository.activity.record(&mut *tx, &activity).await?;
        tx.commit().await?;

        tracing::info!(oracle_number = %oracle_number, price = %data.price, from = %from, "Asset auctioned");
        self.events.publish(
            LifecycleEvent::new(EventKind::AuctionRecorded, oracle_number)
                .transition(from, StatusCategory::Auctioned),
        );

        Ok(auction)
    }
}
