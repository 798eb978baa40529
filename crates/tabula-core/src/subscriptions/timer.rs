use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// A repeating timer.
///
/// Two `Every` sources with the same `id` are the same subscription, so the
/// interval can be declared on every update without restarting it.
pub struct Every {
    pub interval: Duration,
    pub id: &'static str,
}

impl Every {
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Box::pin(
            tokio_stream::wrappers::IntervalStream::new(interval).map(|tick| tick.into_std()),
        )
    }
}
