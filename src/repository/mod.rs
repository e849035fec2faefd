//! Repository layer for database operations

pub mod activity;
pub mod assets;
pub mod assignments;
pub mod auctions;
pub mod device_brands;
pub mod repairs;
pub mod returns;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub assets: assets::AssetsRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub repairs: repairs::RepairsRepository,
    pub returns: returns::ReturnsRepository,
    pub auctions: auctions::AuctionsRepository,
    pub activity: activity::ActivityRepository,
    pub device_brands: device_brands::DeviceBrandsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            assets: assets::AssetsRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            repairs: repairs::RepairsRepository::new(pool.clone()),
            returns: returns::ReturnsRepository::new(pool.clone()),
            auctions: auctions::AuctionsRepository::new(pool.clone()),
            activity: activity::ActivityRepository::new(pool.clone()),
            device_brands: device_brands::DeviceBrandsRepository::new(pool.clone()),
            pool,
        }
    }
}
