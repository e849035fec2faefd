//! Data models for the asset management server

pub mod activity;
pub mod asset;
pub mod assignment;
pub mod auction;
pub mod dashboard;
pub mod dates;
pub mod device_brand;
pub mod enums;
pub mod repair;
pub mod return_record;

// Re-export commonly used types
pub use activity::{ActivityLog, NewActivity};
pub use asset::{Asset, AssetDetails, AssetView, AvailableAsset};
pub use assignment::{Assignment, AssignmentDetails, AssignmentHistoryEntry, AssignmentView};
pub use auction::Auction;
pub use dashboard::DashboardStats;
pub use enums::{ActivityType, AssignmentStatus, RepairOutcome, RepairStatus};
pub use repair::Repair;
pub use return_record::{ReturnRecord, ReturnView};
