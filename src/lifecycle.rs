//! Asset lifecycle engine.
//!
//! Owns the canonical status model for assets: which raw statuses exist, how a
//! raw asset record maps to a display category (label, severity, badge color),
//! which assets may be handed out, and which category transitions are legal.
//!
//! Everything here is pure and synchronous. The HTTP handlers, the dashboard
//! counters and every mutating service go through these functions so that an
//! asset is classified the same way everywhere it is shown.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Raw statuses
// ---------------------------------------------------------------------------

pub const STATUS_NEW: &str = "new";
pub const STATUS_USED: &str = "used";
pub const STATUS_ASSIGNED: &str = "assigned";
pub const STATUS_UNDER_REPAIR: &str = "under_repair";
pub const STATUS_DAMAGED: &str = "damaged";
pub const STATUS_BUYBACK: &str = "buyback";
pub const STATUS_AUCTIONED: &str = "auctioned";

/// Spelling written by older deployments for assets in the repair workshop.
const LEGACY_STATUS_UNDER_REPAIR: &str = "under repair";

/// Raw status stored on an asset row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    New,
    Used,
    Assigned,
    UnderRepair,
    Damaged,
    Buyback,
    Auctioned,
}

impl AssetStatus {
    /// Parse a raw status value. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            STATUS_NEW => Some(AssetStatus::New),
            STATUS_USED => Some(AssetStatus::Used),
            STATUS_ASSIGNED => Some(AssetStatus::Assigned),
            STATUS_UNDER_REPAIR | LEGACY_STATUS_UNDER_REPAIR => Some(AssetStatus::UnderRepair),
            STATUS_DAMAGED => Some(AssetStatus::Damaged),
            STATUS_BUYBACK => Some(AssetStatus::Buyback),
            STATUS_AUCTIONED => Some(AssetStatus::Auctioned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::New => STATUS_NEW,
            AssetStatus::Used => STATUS_USED,
            AssetStatus::Assigned => STATUS_ASSIGNED,
            AssetStatus::UnderRepair => STATUS_UNDER_REPAIR,
            AssetStatus::Damaged => STATUS_DAMAGED,
            AssetStatus::Buyback => STATUS_BUYBACK,
            AssetStatus::Auctioned => STATUS_AUCTIONED,
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposition chosen when an assigned asset comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    ReturnedToInventory,
    Buyback,
    Damaged,
}

impl ReturnType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "returned_to_inventory" => Some(ReturnType::ReturnedToInventory),
            "buyback" => Some(ReturnType::Buyback),
            "damaged" => Some(ReturnType::Damaged),
            _ => None,
        }
    }

    /// Map a return-form option to a disposition.
    ///
    /// The return form submits `employee_buyback` and `marked_as_damaged`;
    /// the canonical names are accepted as well.
    pub fn from_return_option(option: &str) -> Option<Self> {
        match option.trim().to_ascii_lowercase().as_str() {
            "employee_buyback" => Some(ReturnType::Buyback),
            "marked_as_damaged" => Some(ReturnType::Damaged),
            other => Self::parse(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnType::ReturnedToInventory => "returned_to_inventory",
            ReturnType::Buyback => "buyback",
            ReturnType::Damaged => "damaged",
        }
    }

    /// Category the asset moves to once the return is recorded.
    pub fn target_category(&self) -> StatusCategory {
        match self {
            ReturnType::ReturnedToInventory => StatusCategory::Used,
            ReturnType::Buyback => StatusCategory::Buyback,
            ReturnType::Damaged => StatusCategory::Damaged,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Derived display category of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StatusCategory {
    Buyback,
    UnderRepair,
    Damaged,
    Assigned,
    Auctioned,
    Used,
    New,
    Other,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 8] = [
        StatusCategory::Buyback,
        StatusCategory::UnderRepair,
        StatusCategory::Damaged,
        StatusCategory::Assigned,
        StatusCategory::Auctioned,
        StatusCategory::Used,
        StatusCategory::New,
        StatusCategory::Other,
    ];

    /// Parse the serialized name (`UnderRepair`) or the snake_case status
    /// spelling (`under_repair`).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| match AssetStatus::parse(trimmed)? {
                AssetStatus::New => Some(StatusCategory::New),
                AssetStatus::Used => Some(StatusCategory::Used),
                AssetStatus::Assigned => Some(StatusCategory::Assigned),
                AssetStatus::UnderRepair => Some(StatusCategory::UnderRepair),
                AssetStatus::Damaged => Some(StatusCategory::Damaged),
                AssetStatus::Buyback => Some(StatusCategory::Buyback),
                AssetStatus::Auctioned => Some(StatusCategory::Auctioned),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Buyback => "Buyback",
            StatusCategory::UnderRepair => "UnderRepair",
            StatusCategory::Damaged => "Damaged",
            StatusCategory::Assigned => "Assigned",
            StatusCategory::Auctioned => "Auctioned",
            StatusCategory::Used => "Used",
            StatusCategory::New => "New",
            StatusCategory::Other => "Other",
        }
    }

    /// Human-readable badge label. `Other` has no fixed label.
    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::UnderRepair => "Under Repair",
            other => other.as_str(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            StatusCategory::Buyback | StatusCategory::Auctioned | StatusCategory::New => Severity::Info,
            StatusCategory::UnderRepair => Severity::Warning,
            StatusCategory::Damaged => Severity::Danger,
            StatusCategory::Assigned => Severity::Success,
            StatusCategory::Used | StatusCategory::Other => Severity::Neutral,
        }
    }

    pub fn color(&self) -> BadgeColor {
        match self {
            StatusCategory::Buyback => BadgeColor::Teal,
            StatusCategory::UnderRepair => BadgeColor::Yellow,
            StatusCategory::Damaged => BadgeColor::Red,
            StatusCategory::Assigned => BadgeColor::Green,
            StatusCategory::Auctioned => BadgeColor::Purple,
            StatusCategory::New => BadgeColor::Blue,
            StatusCategory::Used | StatusCategory::Other => BadgeColor::Gray,
        }
    }

    /// Raw status written when an asset enters this category.
    pub fn status(&self) -> Option<AssetStatus> {
        match self {
            StatusCategory::Buyback => Some(AssetStatus::Buyback),
            StatusCategory::UnderRepair => Some(AssetStatus::UnderRepair),
            StatusCategory::Damaged => Some(AssetStatus::Damaged),
            StatusCategory::Assigned => Some(AssetStatus::Assigned),
            StatusCategory::Auctioned => Some(AssetStatus::Auctioned),
            StatusCategory::Used => Some(AssetStatus::Used),
            StatusCategory::New => Some(AssetStatus::New),
            StatusCategory::Other => None,
        }
    }

    /// Categories that keep an asset out of the stock pool.
    pub fn blocks_assignment(&self) -> bool {
        matches!(
            self,
            StatusCategory::Assigned
                | StatusCategory::UnderRepair
                | StatusCategory::Damaged
                | StatusCategory::Buyback
                | StatusCategory::Auctioned
        )
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Badge severity; each view maps it onto its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Palette hint. Buyback, Auctioned and New share the `info` severity but
/// are drawn in different colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Teal,
    Yellow,
    Red,
    Green,
    Purple,
    Gray,
    Blue,
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusClassification {
    pub category: StatusCategory,
    pub label: String,
    pub severity: Severity,
    pub color: BadgeColor,
}

impl StatusClassification {
    fn of(category: StatusCategory) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            severity: category.severity(),
            color: category.color(),
        }
    }

    fn other(raw_status: Option<&str>) -> Self {
        let label = match raw_status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => capitalize(raw),
            None => "Unknown".to_string(),
        };
        Self {
            category: StatusCategory::Other,
            label,
            severity: Severity::Neutral,
            color: BadgeColor::Gray,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The fields of an asset record the engine looks at.
pub trait LifecycleRecord {
    fn oracle_number(&self) -> &str;
    fn device_type(&self) -> &str;
    fn status(&self) -> Option<&str>;
    fn assigned_to(&self) -> Option<&str>;
    fn return_type(&self) -> Option<&str>;
}

/// Loosely-typed asset record, as received from clients or other services.
///
/// Accepts both snake_case and camelCase keys; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetSnapshot {
    #[serde(default, alias = "oracleNumber")]
    pub oracle_number: String,
    #[serde(default, alias = "deviceType")]
    pub device_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<String>,
    #[serde(default, alias = "returnType")]
    pub return_type: Option<String>,
}

impl LifecycleRecord for AssetSnapshot {
    fn oracle_number(&self) -> &str {
        &self.oracle_number
    }

    fn device_type(&self) -> &str {
        &self.device_type
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot move asset from {from} to {to} (allowed: {allowed})")]
    IllegalTransition {
        from: StatusCategory,
        to: StatusCategory,
        allowed: String,
    },
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Uppercase the first character, leave the rest untouched.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Classify an asset record. First matching rule wins:
///
/// 1. buyback return or `buyback` status
/// 2. `under_repair`
/// 3. `damaged`
/// 4. `assigned`
/// 5. `auctioned`
/// 6. unassigned and `used`
/// 7. unassigned and `new`
/// 8. anything else, labelled with the capitalized raw status
pub fn classify<A: LifecycleRecord + ?Sized>(asset: &A) -> StatusClassification {
    let raw_status = asset.status();
    let status = raw_status.and_then(AssetStatus::parse);
    let returned_as_buyback = asset
        .return_type()
        .and_then(ReturnType::parse)
        .is_some_and(|r| r == ReturnType::Buyback);
    let unassigned = is_blank(asset.assigned_to());

    let category = match status {
        _ if returned_as_buyback => StatusCategory::Buyback,
        Some(AssetStatus::Buyback) => StatusCategory::Buyback,
        Some(AssetStatus::UnderRepair) => StatusCategory::UnderRepair,
        Some(AssetStatus::Damaged) => StatusCategory::Damaged,
        Some(AssetStatus::Assigned) => StatusCategory::Assigned,
        Some(AssetStatus::Auctioned) => StatusCategory::Auctioned,
        Some(AssetStatus::Used) if unassigned => StatusCategory::Used,
        Some(AssetStatus::New) if unassigned => StatusCategory::New,
        _ => return StatusClassification::other(raw_status),
    };

    StatusClassification::of(category)
}

/// Category a lifecycle change starts from.
///
/// Same as [`classify`], except that stock which never had its status
/// filled in counts as `New`, and a `new` or `used` record that still names
/// a holder keeps its stock category. These are exactly the records
/// [`is_assignable`] accepts, so an assignable asset can always move to
/// `Assigned`.
pub fn transition_category<A: LifecycleRecord + ?Sized>(asset: &A) -> StatusCategory {
    let category = classify(asset).category;
    if category != StatusCategory::Other {
        return category;
    }

    match asset.status() {
        raw if is_blank(raw) => StatusCategory::New,
        raw => match raw.and_then(AssetStatus::parse) {
            Some(AssetStatus::New) => StatusCategory::New,
            Some(AssetStatus::Used) => StatusCategory::Used,
            _ => StatusCategory::Other,
        },
    }
}

/// [`classify`] for callers holding a possibly missing record.
pub fn try_classify<A: LifecycleRecord + ?Sized>(
    asset: Option<&A>,
) -> Result<StatusClassification, LifecycleError> {
    asset
        .map(classify)
        .ok_or_else(|| LifecycleError::InvalidInput("asset record is null".to_string()))
}

/// Classify a raw JSON record. `null` and non-object values are rejected.
pub fn classify_value(value: &serde_json::Value) -> Result<StatusClassification, LifecycleError> {
    let record = record_from_value(value)?;
    try_classify(record.as_ref())
}

/// Decode a raw JSON record. `null` decodes to `None`; any other
/// non-object value is rejected.
pub fn record_from_value(value: &serde_json::Value) -> Result<Option<AssetSnapshot>, LifecycleError> {
    if value.is_null() {
        return Ok(None);
    }
    if !value.is_object() {
        return Err(LifecycleError::InvalidInput(format!(
            "asset record must be an object, got {}",
            value
        )));
    }
    AssetSnapshot::deserialize(value)
        .map(Some)
        .map_err(|e| LifecycleError::InvalidInput(e.to_string()))
}

/// Whether an asset can be offered for a new assignment.
///
/// The status must be `new`, `used` or absent, the oracle number must not
/// appear in `active_assignments`, and when `requested_device_type` is given
/// the device type must match it (case-insensitively).
pub fn is_assignable<A: LifecycleRecord + ?Sized>(
    asset: &A,
    active_assignments: &HashSet<String>,
    requested_device_type: Option<&str>,
) -> bool {
    if classify(asset).category.blocks_assignment() {
        return false;
    }

    let stock_status = match asset.status() {
        None => true,
        Some(raw) if raw.trim().is_empty() => true,
        Some(raw) => matches!(
            AssetStatus::parse(raw),
            Some(AssetStatus::New) | Some(AssetStatus::Used)
        ),
    };
    if !stock_status || active_assignments.contains(asset.oracle_number()) {
        return false;
    }

    match requested_device_type.map(str::trim).filter(|d| !d.is_empty()) {
        Some(wanted) => asset.device_type().trim().eq_ignore_ascii_case(wanted),
        None => true,
    }
}

/// [`is_assignable`] for callers holding a possibly missing record.
pub fn try_is_assignable<A: LifecycleRecord + ?Sized>(
    asset: Option<&A>,
    active_assignments: &HashSet<String>,
    requested_device_type: Option<&str>,
) -> Result<bool, LifecycleError> {
    asset
        .map(|a| is_assignable(a, active_assignments, requested_device_type))
        .ok_or_else(|| LifecycleError::InvalidInput("asset record is null".to_string()))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Categories reachable from `from` in one step.
///
/// - `New`         -> `Assigned`, `UnderRepair`
/// - `Used`        -> `Assigned`, `UnderRepair`, `Auctioned`
/// - `Assigned`    -> `UnderRepair`, `Used`, `Buyback`, `Damaged`
/// - `UnderRepair` -> `Assigned`, `Used` (fixed), `Damaged` (not fixed)
/// - `Damaged`     -> `Auctioned`
/// - `Auctioned`, `Buyback`, `Other` -> nothing
pub fn allowed_transitions(from: StatusCategory) -> &'static [StatusCategory] {
    use StatusCategory::*;

    match from {
        New => &[Assigned, UnderRepair],
        Used => &[Assigned, UnderRepair, Auctioned],
        Assigned => &[UnderRepair, Used, Buyback, Damaged],
        UnderRepair => &[Assigned, Used, Damaged],
        Damaged => &[Auctioned],
        Auctioned | Buyback | Other => &[],
    }
}

pub fn can_transition(from: StatusCategory, to: StatusCategory) -> bool {
    allowed_transitions(from).contains(&to)
}

/// [`can_transition`] with a descriptive error.
pub fn validate_transition(from: StatusCategory, to: StatusCategory) -> Result<(), LifecycleError> {
    if can_transition(from, to) {
        return Ok(());
    }
    let allowed = allowed_transitions(from);
    let allowed = if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
    };
    Err(LifecycleError::IllegalTransition { from, to, allowed })
}

/// One row of the transition graph.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransitionRule {
    pub from: StatusCategory,
    pub to: Vec<StatusCategory>,
    pub terminal: bool,
}

/// The full transition graph, one row per category.
pub fn transition_table() -> Vec<TransitionRule> {
    StatusCategory::ALL
        .into_iter()
        .map(|from| {
            let to = allowed_transitions(from).to_vec();
            TransitionRule {
                from,
                terminal: to.is_empty(),
                to,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(status: Option<&str>, assigned_to: Option<&str>, return_type: Option<&str>) -> AssetSnapshot {
        AssetSnapshot {
            oracle_number: "ORA-1001".to_string(),
            device_type: "Laptop".to_string(),
            status: status.map(String::from),
            assigned_to: assigned_to.map(String::from),
            return_type: return_type.map(String::from),
        }
    }

    fn no_active() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn new_unassigned_asset_is_new() {
        let c = classify(&asset(Some("new"), None, None));
        assert_eq!(c.category, StatusCategory::New);
        assert_eq!(c.severity, Severity::Info);
        assert_eq!(c.color, BadgeColor::Blue);
        assert_eq!(c.label, "New");
    }

    #[test]
    fn assigned_asset_is_assigned() {
        let c = classify(&asset(Some("assigned"), Some("E123"), None));
        assert_eq!(c.category, StatusCategory::Assigned);
        assert_eq!(c.severity, Severity::Success);
    }

    #[test]
    fn buyback_return_overrides_status() {
        for status in ["assigned", "damaged", "under_repair", "new", "used", "auctioned", "weird"] {
            let c = classify(&asset(Some(status), Some("E123"), Some("buyback")));
            assert_eq!(c.category, StatusCategory::Buyback, "status {status}");
            assert_eq!(c.severity, Severity::Info);
            assert_eq!(c.color, BadgeColor::Teal);
        }
        let c = classify(&asset(None, None, Some("buyback")));
        assert_eq!(c.category, StatusCategory::Buyback);
    }

    #[test]
    fn buyback_status_without_return_type_is_buyback() {
        let c = classify(&asset(Some("buyback"), None, None));
        assert_eq!(c.category, StatusCategory::Buyback);
    }

    #[test]
    fn under_repair_wins_over_assignment() {
        let c = classify(&asset(Some("under_repair"), Some("E123"), None));
        assert_eq!(c.category, StatusCategory::UnderRepair);
        assert_eq!(c.severity, Severity::Warning);
        assert_eq!(c.label, "Under Repair");
    }

    #[test]
    fn legacy_under_repair_spelling_is_accepted() {
        let c = classify(&asset(Some("under repair"), None, None));
        assert_eq!(c.category, StatusCategory::UnderRepair);
    }

    #[test]
    fn damaged_and_auctioned() {
        let c = classify(&asset(Some("damaged"), None, Some("damaged")));
        assert_eq!(c.category, StatusCategory::Damaged);
        assert_eq!(c.severity, Severity::Danger);

        let c = classify(&asset(Some("auctioned"), None, None));
        assert_eq!(c.category, StatusCategory::Auctioned);
        assert_eq!(c.severity, Severity::Info);
        assert_eq!(c.color, BadgeColor::Purple);
    }

    #[test]
    fn used_unassigned_asset_is_used_and_assignable() {
        let a = asset(Some("used"), None, None);
        let c = classify(&a);
        assert_eq!(c.category, StatusCategory::Used);
        assert_eq!(c.severity, Severity::Neutral);
        assert!(is_assignable(&a, &no_active(), None));
    }

    #[test]
    fn blank_assignee_counts_as_unassigned() {
        let c = classify(&asset(Some("used"), Some("  "), None));
        assert_eq!(c.category, StatusCategory::Used);
    }

    #[test]
    fn stock_status_with_holder_falls_through() {
        let c = classify(&asset(Some("new"), Some("E123"), None));
        assert_eq!(c.category, StatusCategory::Other);
        assert_eq!(c.label, "New");
    }

    #[test]
    fn unknown_status_is_capitalized_other() {
        let c = classify(&asset(Some("weirdvalue"), None, None));
        assert_eq!(c.category, StatusCategory::Other);
        assert_eq!(c.label, "Weirdvalue");
        assert_eq!(c.severity, Severity::Neutral);
    }

    #[test]
    fn missing_status_is_unknown_other() {
        let c = classify(&asset(None, None, None));
        assert_eq!(c.category, StatusCategory::Other);
        assert_eq!(c.label, "Unknown");
    }

    #[test]
    fn missing_record_is_invalid_input() {
        let missing: Option<&AssetSnapshot> = None;
        assert!(matches!(try_classify(missing), Err(LifecycleError::InvalidInput(_))));
        assert!(matches!(
            try_is_assignable(missing, &no_active(), None),
            Err(LifecycleError::InvalidInput(_))
        ));
    }

    #[test]
    fn json_records_are_classified() {
        let c = classify_value(&json!({
            "oracleNumber": "ORA-7",
            "status": "assigned",
            "assignedTo": "E123",
            "returnType": "buyback"
        }))
        .unwrap();
        assert_eq!(c.category, StatusCategory::Buyback);

        let c = classify_value(&json!({ "status": null })).unwrap();
        assert_eq!(c.category, StatusCategory::Other);
    }

    #[test]
    fn json_null_decodes_to_no_record() {
        assert!(record_from_value(&serde_json::Value::Null).unwrap().is_none());
        let record = record_from_value(&json!({ "oracleNumber": "ORA-9", "status": "used" }))
            .unwrap()
            .unwrap();
        assert_eq!(record.oracle_number, "ORA-9");
        assert!(matches!(record_from_value(&json!([1, 2])), Err(LifecycleError::InvalidInput(_))));
    }

    #[test]
    fn json_null_and_scalars_are_rejected() {
        assert!(matches!(
            classify_value(&serde_json::Value::Null),
            Err(LifecycleError::InvalidInput(_))
        ));
        assert!(matches!(classify_value(&json!("new")), Err(LifecycleError::InvalidInput(_))));
        assert!(matches!(
            classify_value(&json!({ "status": 42 })),
            Err(LifecycleError::InvalidInput(_))
        ));
    }

    #[test]
    fn every_record_gets_a_category() {
        let statuses = [None, Some(""), Some("new"), Some("used"), Some("assigned"), Some("under_repair"),
            Some("damaged"), Some("buyback"), Some("auctioned"), Some("lost")];
        let holders = [None, Some(""), Some("E1")];
        let returns = [None, Some("returned_to_inventory"), Some("buyback"), Some("damaged"), Some("x")];
        for s in statuses {
            for h in holders {
                for r in returns {
                    let c = classify(&asset(s, h, r));
                    assert!(StatusCategory::ALL.contains(&c.category));
                    assert!(!c.label.is_empty());
                }
            }
        }
    }

    #[test]
    fn assignability_agrees_with_classification() {
        let statuses = [None, Some("new"), Some("used"), Some("assigned"), Some("under repair"),
            Some("under_repair"), Some("damaged"), Some("buyback"), Some("auctioned"), Some("odd")];
        let holders = [None, Some("E1")];
        let returns = [None, Some("returned_to_inventory"), Some("buyback"), Some("damaged")];
        for s in statuses {
            for h in holders {
                for r in returns {
                    let a = asset(s, h, r);
                    if classify(&a).category.blocks_assignment() {
                        assert!(!is_assignable(&a, &no_active(), None), "{a:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn active_assignment_blocks_stock_asset() {
        let a = asset(Some("new"), None, None);
        let active: HashSet<String> = ["ORA-1001".to_string()].into_iter().collect();
        assert!(is_assignable(&a, &no_active(), None));
        assert!(!is_assignable(&a, &active, None));
    }

    #[test]
    fn device_type_filter() {
        let a = asset(Some("new"), None, None);
        assert!(is_assignable(&a, &no_active(), Some("laptop")));
        assert!(is_assignable(&a, &no_active(), Some("")));
        assert!(!is_assignable(&a, &no_active(), Some("Printer")));
    }

    #[test]
    fn missing_status_is_assignable() {
        assert!(is_assignable(&asset(None, None, None), &no_active(), None));
        assert!(!is_assignable(&asset(Some("lost"), None, None), &no_active(), None));
    }

    #[test]
    fn stock_without_status_starts_as_new() {
        for status in [None, Some(""), Some("  ")] {
            let a = asset(status, None, None);
            assert!(is_assignable(&a, &no_active(), Some("Laptop")));
            assert_eq!(transition_category(&a), StatusCategory::New);
            assert!(validate_transition(transition_category(&a), StatusCategory::Assigned).is_ok());
            assert!(validate_transition(transition_category(&a), StatusCategory::UnderRepair).is_ok());
        }
        assert_eq!(transition_category(&asset(Some("lost"), None, None)), StatusCategory::Other);
        assert_eq!(
            transition_category(&asset(None, None, Some("buyback"))),
            StatusCategory::Buyback
        );
    }

    #[test]
    fn assignable_records_can_move_to_assigned() {
        let statuses = [None, Some(""), Some("new"), Some("NEW"), Some("used"), Some("assigned"),
            Some("under_repair"), Some("damaged"), Some("buyback"), Some("auctioned"), Some("lost")];
        let holders = [None, Some(""), Some("E1")];
        let returns = [None, Some("returned_to_inventory"), Some("buyback"), Some("damaged")];
        for s in statuses {
            for h in holders {
                for r in returns {
                    let a = asset(s, h, r);
                    if is_assignable(&a, &no_active(), None) {
                        assert!(
                            can_transition(transition_category(&a), StatusCategory::Assigned),
                            "{a:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn held_stock_keeps_its_stock_category() {
        let a = asset(Some("used"), Some("E1"), None);
        assert_eq!(classify(&a).category, StatusCategory::Other);
        assert_eq!(transition_category(&a), StatusCategory::Used);
    }

    #[test]
    fn transition_graph() {
        use StatusCategory::*;

        assert!(can_transition(New, Assigned));
        assert!(can_transition(New, UnderRepair));
        assert!(can_transition(Used, Assigned));
        assert!(can_transition(Used, UnderRepair));
        assert!(can_transition(Assigned, UnderRepair));
        assert!(can_transition(Assigned, Used));
        assert!(can_transition(Assigned, Buyback));
        assert!(can_transition(Assigned, Damaged));
        assert!(can_transition(UnderRepair, Assigned));
        assert!(can_transition(UnderRepair, Used));
        assert!(can_transition(UnderRepair, Damaged));
        assert!(can_transition(Used, Auctioned));
        assert!(can_transition(Damaged, Auctioned));

        assert!(!can_transition(New, Auctioned));
        assert!(!can_transition(UnderRepair, Auctioned));
        assert!(!can_transition(Assigned, Auctioned));
        assert!(!can_transition(Damaged, Assigned));
    }

    #[test]
    fn terminal_categories_have_no_exits() {
        for to in StatusCategory::ALL {
            assert!(!can_transition(StatusCategory::Auctioned, to));
            assert!(!can_transition(StatusCategory::Buyback, to));
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for c in StatusCategory::ALL {
            assert!(!can_transition(c, c), "{c:?}");
        }
    }

    #[test]
    fn validate_transition_lists_allowed_targets() {
        let err = validate_transition(StatusCategory::Damaged, StatusCategory::Assigned).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot move asset from Damaged to Assigned (allowed: Auctioned)"
        );
        let err = validate_transition(StatusCategory::Auctioned, StatusCategory::Used).unwrap_err();
        assert!(err.to_string().ends_with("(allowed: none)"));
        assert!(validate_transition(StatusCategory::New, StatusCategory::Assigned).is_ok());
    }

    #[test]
    fn transition_table_marks_terminals() {
        let table = transition_table();
        assert_eq!(table.len(), StatusCategory::ALL.len());
        let terminal: Vec<_> = table.iter().filter(|r| r.terminal).map(|r| r.from).collect();
        assert_eq!(
            terminal,
            vec![StatusCategory::Buyback, StatusCategory::Auctioned, StatusCategory::Other]
        );
    }

    #[test]
    fn return_options_map_to_dispositions() {
        assert_eq!(ReturnType::from_return_option("employee_buyback"), Some(ReturnType::Buyback));
        assert_eq!(ReturnType::from_return_option("Marked_As_Damaged"), Some(ReturnType::Damaged));
        assert_eq!(
            ReturnType::from_return_option("returned_to_inventory"),
            Some(ReturnType::ReturnedToInventory)
        );
        assert_eq!(ReturnType::from_return_option("lost"), None);
        assert_eq!(ReturnType::Buyback.target_category(), StatusCategory::Buyback);
    }

    #[test]
    fn category_parsing() {
        assert_eq!(StatusCategory::parse("UnderRepair"), Some(StatusCategory::UnderRepair));
        assert_eq!(StatusCategory::parse("under_repair"), Some(StatusCategory::UnderRepair));
        assert_eq!(StatusCategory::parse("new"), Some(StatusCategory::New));
        assert_eq!(StatusCategory::parse("nope"), None);
    }

    #[test]
    fn serialized_shape() {
        let c = classify(&asset(Some("under_repair"), None, None));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["category"], "UnderRepair");
        assert_eq!(v["severity"], "warning");
        assert_eq!(v["color"], "yellow");
    }
}
