//! Lifecycle event bus
//!
//! Every committed mutation publishes a [`LifecycleEvent`] naming the views a
//! client must refetch. Delivery goes through a `tokio::sync::broadcast`
//! channel; a subscriber that falls behind gets `RecvError::Lagged` and
//! should refresh everything.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::lifecycle::StatusCategory;

/// Client-side views whose data an event makes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Assets,
    Assignments,
    Repairs,
    Returns,
    Auctions,
    Dashboard,
    Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum EventKind {
    #[serde(rename = "asset.created")]
    AssetCreated,
    #[serde(rename = "asset.status_changed")]
    AssetStatusChanged,
    #[serde(rename = "assignment.created")]
    AssignmentCreated,
    #[serde(rename = "return.recorded")]
    ReturnRecorded,
    #[serde(rename = "repair.requested")]
    RepairRequested,
    #[serde(rename = "repair.completed")]
    RepairCompleted,
    #[serde(rename = "auction.recorded")]
    AuctionRecorded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AssetCreated => "asset.created",
            EventKind::AssetStatusChanged => "asset.status_changed",
            EventKind::AssignmentCreated => "assignment.created",
            EventKind::ReturnRecorded => "return.recorded",
            EventKind::RepairRequested => "repair.requested",
            EventKind::RepairCompleted => "repair.completed",
            EventKind::AuctionRecorded => "auction.recorded",
        }
    }

    /// Views to refetch after this kind of change
    pub fn invalidates(&self) -> Vec<View> {
        use View::*;

        match self {
            EventKind::AssetCreated => vec![Assets, Dashboard, Reports],
            EventKind::AssetStatusChanged => vec![Assets, Assignments, Dashboard, Reports],
            EventKind::AssignmentCreated => vec![Assets, Assignments, Dashboard, Reports],
            EventKind::ReturnRecorded => vec![Assets, Assignments, Returns, Dashboard, Reports],
            EventKind::RepairRequested | EventKind::RepairCompleted => {
                vec![Assets, Assignments, Repairs, Dashboard, Reports]
            }
            EventKind::AuctionRecorded => {
                vec![Assets, Assignments, Repairs, Auctions, Dashboard, Reports]
            }
        }
    }
}

/// A committed lifecycle change
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LifecycleEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub oracle_number: String,
    pub from: Option<StatusCategory>,
    pub to: Option<StatusCategory>,
    pub invalidates: Vec<View>,
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(kind: EventKind, oracle_number: impl Into<String>) -> Self {
        Self {
            kind,
            oracle_number: oracle_number.into(),
            from: None,
            to: None,
            invalidates: kind.invalidates(),
            timestamp: Utc::now(),
        }
    }

    pub fn transition(mut self, from: StatusCategory, to: StatusCategory) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event; dropped when nobody is listening.
    pub fn publish(&self, event: LifecycleEvent) {
        tracing::debug!(
            kind = event.kind.as_str(),
            oracle_number = %event.oracle_number,
            "Publishing lifecycle event"
        );
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(
            LifecycleEvent::new(EventKind::AssignmentCreated, "ORA-1001")
                .transition(StatusCategory::New, StatusCategory::Assigned),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::AssignmentCreated);
        assert_eq!(event.oracle_number, "ORA-1001");
        assert_eq!(event.to, Some(StatusCategory::Assigned));
        assert!(event.invalidates.contains(&View::Dashboard));
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(LifecycleEvent::new(EventKind::AssetCreated, "ORA-1"));
    }

    #[tokio::test]
    async fn slow_subscriber_is_told_it_lagged() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for i in 0..5 {
            bus.publish(LifecycleEvent::new(EventKind::AssetCreated, format!("ORA-{}", i)));
        }

        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(skipped)) => assert!(skipped > 0),
            other => panic!("expected Lagged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_event() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(LifecycleEvent::new(EventKind::AuctionRecorded, "ORA-7"));

        assert_eq!(first.recv().await.unwrap().oracle_number, "ORA-7");
        assert_eq!(second.recv().await.unwrap().oracle_number, "ORA-7");
    }

    #[test]
    fn serializes_dotted_type_and_views() {
        let event = LifecycleEvent::new(EventKind::RepairCompleted, "ORA-9")
            .transition(StatusCategory::UnderRepair, StatusCategory::Used);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "repair.completed");
        assert_eq!(json["from"], "UnderRepair");
        assert_eq!(json["to"], "Used");
        assert!(json["invalidates"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == "repairs"));
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn auctions_invalidate_the_auction_view() {
        assert!(EventKind::AuctionRecorded.invalidates().contains(&View::Auctions));
        assert!(!EventKind::AssetCreated.invalidates().contains(&View::Auctions));
    }
}
