//! Live lifecycle events over Server-Sent Events

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};

use crate::services::events::LifecycleEvent;

fn to_sse(message: Result<LifecycleEvent, BroadcastStreamRecvError>) -> Event {
    match message {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Event::default().event(event.kind.as_str()).data(data)
        }
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::debug!(missed, "Event subscriber lagged");
            Event::default()
                .event("lagged")
                .data(format!(r#"{{"missed":{}}}"#, missed))
        }
    }
}

/// Stream lifecycle events
///
/// Each event names the views it invalidates. A client that falls behind
/// receives a `lagged` event and should refresh everything.
#[utoipa::path(
    get,
    path = "/events/stream",
    tag = "events",
    responses(
        (status = 200, description = "SSE stream of lifecycle events")
    )
)]
pub async fn event_stream(
    State(state): State<crate::AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.services.events.subscribe();
    tracing::debug!(
        subscribers = state.services.events.subscriber_count(),
        "Event stream opened"
    );

    let connected = tokio_stream::once(Event::default().event("connected").data(r#"{"status":"ok"}"#));
    let stream = connected
        .chain(BroadcastStream::new(receiver).map(to_sse))
        .map(Ok::<_, Infallible>);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
