use std::{borrow::Cow, convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{stream, Stream, StreamExt};
use rand::Rng;
use serde::Serialize;
use shared::protocol::StreamUpdate;
use tokio::{sync::broadcast, time::Instant};
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};

pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Typed fan-out of push events to SSE subscribers.
///
/// The channel is bounded; a subscriber that lags loses the oldest events
/// and keeps receiving newer ones.
#[derive(Clone)]
pub struct Broadcaster<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Broadcaster<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Having no subscribers is not an error.
    pub fn send(&self, value: T) {
        let _ = self.tx.send(value);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn subscribe_stream(&self) -> impl Stream<Item = T> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|res| async move { res.ok() })
    }

    /// Long-lived SSE response with a constant `event:` name and JSON data.
    pub fn sse_named(
        &self,
        event_name: impl Into<Cow<'static, str>>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
    where
        T: Serialize,
    {
        let event_name = event_name.into();
        let stream = self
            .subscribe_stream()
            .map(move |msg| {
                Ok::<_, Infallible>(json_event(Event::default().event(&event_name), &msg))
            });
        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(KEEPALIVE_INTERVAL)
                .text("keepalive"),
        )
    }
}

/// `updates` unnamed events, one per `interval`, after which the stream ends.
pub fn update_stream(
    updates: u32,
    interval: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let ticker = IntervalStream::new(tokio::time::interval_at(Instant::now() + interval, interval));
    ticker
        .zip(stream::iter(1..=updates))
        .map(|(_, count)| {
            let update = StreamUpdate::new(count, rand::rng().random_range(1..=100));
            Ok::<_, Infallible>(json_event(Event::default(), &update))
        })
}

fn json_event<T: Serialize>(event: Event, payload: &T) -> Event {
    event
        .json_data(payload)
        .unwrap_or_else(|_| Event::default().data("serialization_error"))
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
