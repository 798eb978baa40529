use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Marker type identifying the terminal event subscription.
pub struct TerminalEvents;

/// Subscribe to terminal input, mapping each event to an optional message.
///
/// Returning `None` from `map` drops the event. The crossterm
/// [`EventStream`] is created inside the spawned task rather than here:
/// `subscriptions()` runs after every update, and constructing a stream
/// eagerly each time would fight the running one for crossterm's global
/// reader.
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| {
            let handle = tokio::spawn(async move {
                let mut events = EventStream::new();
                while let Some(event) = events.next().await {
                    let Ok(event) = event else {
                        tracing::warn!("terminal event stream error");
                        continue;
                    };
                    let Some(msg) = TerminalEvent::from_crossterm(event).and_then(|e| map(e))
                    else {
                        continue;
                    };
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}
