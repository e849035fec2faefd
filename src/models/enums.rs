//! Record-level enums stored as text columns
//!
//! Asset statuses and return dispositions live in [`crate::lifecycle`];
//! these describe the state of the assignment, repair and activity rows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

/// State of an assignment row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Asset currently held by the employee
    Assigned,
    /// Closed by the return flow
    Returned,
    /// Closed because the asset was auctioned while held
    Auctioned,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Returned => "returned",
            AssignmentStatus::Auctioned => "auctioned",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RepairStatus
// ---------------------------------------------------------------------------

/// Two-phase repair record state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RepairStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::InProgress => "in-progress",
            RepairStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in-progress" | "in_progress" | "under_repair" => Some(RepairStatus::InProgress),
            "completed" => Some(RepairStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RepairOutcome
// ---------------------------------------------------------------------------

/// Result recorded when a repair is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RepairOutcome {
    Fixed,
    NotFixed,
}

impl RepairOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairOutcome::Fixed => "fixed",
            RepairOutcome::NotFixed => "not_fixed",
        }
    }

    /// Accepts the form values (`fixed`, `not_fixed`, `Fixed`, `Not Fixed`) and booleans.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "fixed" | "true" | "yes" => Some(RepairOutcome::Fixed),
            "not_fixed" | "false" | "no" => Some(RepairOutcome::NotFixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepairOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RepairOutcome::Fixed => "Fixed",
            RepairOutcome::NotFixed => "Not Fixed",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ActivityType
// ---------------------------------------------------------------------------

/// Kind of entry in the recent-activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActivityType {
    Added,
    Assigned,
    Returned,
    RepairRequested,
    RepairCompleted,
    Auctioned,
    StatusChanged,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActivityType::Added => "Added",
            ActivityType::Assigned => "Assigned",
            ActivityType::Returned => "Returned",
            ActivityType::RepairRequested => "Repair Requested",
            ActivityType::RepairCompleted => "Repair Completed",
            ActivityType::Auctioned => "Auctioned",
            ActivityType::StatusChanged => "Status Changed",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_outcome_accepts_form_spellings() {
        assert_eq!(RepairOutcome::parse("fixed"), Some(RepairOutcome::Fixed));
        assert_eq!(RepairOutcome::parse("Not Fixed"), Some(RepairOutcome::NotFixed));
        assert_eq!(RepairOutcome::parse("not-fixed"), Some(RepairOutcome::NotFixed));
        assert_eq!(RepairOutcome::parse("false"), Some(RepairOutcome::NotFixed));
        assert_eq!(RepairOutcome::parse("maybe"), None);
    }

    #[test]
    fn repair_status_round_trips_through_text() {
        assert_eq!(RepairStatus::parse(RepairStatus::InProgress.as_str()), Some(RepairStatus::InProgress));
        assert_eq!(RepairStatus::parse("completed"), Some(RepairStatus::Completed));
        assert_eq!(RepairStatus::parse("all"), None);
    }
}
