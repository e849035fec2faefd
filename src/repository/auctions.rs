//! Auctions repository for database operations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{asset::Asset, auction::Auction},
};

#[derive(Clone)]
pub struct AuctionsRepository {
    pool: Pool<Postgres>,
}

impl AuctionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Auctions, excluding assets with an open repair
    pub async fn list(&self) -> AppResult<Vec<Auction>> {
        let auctions = sqlx::query_as::<_, Auction>(
            r#"
            SELECT au.* FROM auctions au
            WHERE NOT EXISTS (
                SELECT 1 FROM repairs r
                WHERE r.oracle_number = au.oracle_number AND r.status = 'in-progress'
            )
            ORDER BY au.created_at DESC, au.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(auctions)
    }

    pub async fn for_asset(&self, oracle_number: &str) -> AppResult<Vec<Auction>> {
        let auctions = sqlx::query_as::<_, Auction>(
            "SELECT * FROM auctions WHERE oracle_number = $1 ORDER BY auction_date DESC, id DESC",
        )
        .bind(oracle_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(auctions)
    }

    /// Record a sale with a snapshot of the asset description
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        asset: &Asset,
        price: Decimal,
        auction_date: NaiveDate,
    ) -> AppResult<Auction> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            INSERT INTO auctions (
                oracle_number, asset_type, brand_name, model_name, serial_number, price, auction_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&asset.oracle_number)
        .bind(&asset.device_type)
        .bind(&asset.brand_name)
        .bind(&asset.model_name)
        .bind(&asset.serial_number)
        .bind(price)
        .bind(auction_date)
        .fetch_one(conn)
        .await?;
        Ok(auction)
    }
}
