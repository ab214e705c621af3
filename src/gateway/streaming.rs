use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};

use crate::gateway::state::HandlerState;
use crate::lifecycle::ModelEvent;

/// Streams model lifecycle events as server-sent events.
///
/// The current status is sent first so late subscribers see where the load stands.
/// Events are named after their state (`downloading`, `ready`, ...) and carry the
/// event as JSON. Events dropped because the client fell behind are skipped.
pub async fn model_events_handler(
    State(state): State<HandlerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let receiver = state.service.model_events();
    let current = state.service.model_status();
    debug!(state = %current.state, "Model event subscriber connected");

    let initial = ModelEvent::new(current.state, current.message, current.progress);
    let updates = BroadcastStream::new(receiver).filter_map(|item| async move {
        match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "Model event subscriber lagged");
                None
            }
        }
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .filter_map(|event| async move { to_sse(&event).map(Ok) });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse(event: &ModelEvent) -> Option<Event> {
    match Event::default().event(event.state.as_str()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            warn!(error = %e, "Failed to encode model event");
            None
        }
    }
}
