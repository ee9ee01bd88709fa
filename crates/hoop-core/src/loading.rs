//! Status messages shown while a plan is being generated.
//!
//! Purely cosmetic: nothing here observes the generation itself. Front-ends
//! either consume [`loading_messages`] directly or run a [`LoadingTicker`]
//! that publishes the current message on a watch channel.

use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const LOADING_MESSAGES: [&str; 10] = [
    "Analyzing your basketball superpower...",
    "Optimizing dribble sequences...",
    "Calculating your shooting arc...",
    "Designing your path to the NBA...",
    "Mixing the secret sauce ingredients...",
    "Channeling the spirit of Lebron James...",
    "Consulting with Coach AI...",
    "Crafting your basketball destiny...",
    "Perfecting your slam dunk potential...",
    "Building your championship mindset...",
];

/// How long each message stays up.
pub const MESSAGE_INTERVAL: Duration = Duration::from_secs(3);

/// Endless stream of loading messages, one per `period`, starting with the
/// first message immediately and wrapping around after the last.
pub fn loading_messages(period: Duration) -> Pin<Box<dyn Stream<Item = &'static str> + Send>> {
    let stream = async_stream::stream! {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(ticker);
        let mut index = 0usize;
        while ticks.next().await.is_some() {
            yield LOADING_MESSAGES[index % LOADING_MESSAGES.len()];
            index += 1;
        }
    };
    Box::pin(stream)
}

/// Background task that pushes loading messages into a watch channel until
/// stopped or until every receiver is gone.
#[derive(Debug)]
pub struct LoadingTicker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl LoadingTicker {
    pub fn spawn(period: Duration, tx: watch::Sender<&'static str>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut messages = loading_messages(period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    next = messages.next() => {
                        let Some(message) = next else { break };
                        if tx.send(message).is_err() {
                            debug!("loading message receivers dropped");
                            break;
                        }
                    }
                }
            }
        });
        Self { cancel, handle }
    }

    /// Signal the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the task and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stream_starts_with_first_message_and_cycles() {
        let messages: Vec<_> = loading_messages(MESSAGE_INTERVAL).take(12).collect().await;
        assert_eq!(messages[0], LOADING_MESSAGES[0]);
        assert_eq!(messages[9], LOADING_MESSAGES[9]);
        assert_eq!(messages[10], LOADING_MESSAGES[0]);
        assert_eq!(messages[11], LOADING_MESSAGES[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn first_message_is_immediate() {
        let start = tokio::time::Instant::now();
        let mut messages = loading_messages(MESSAGE_INTERVAL);
        messages.next().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        messages.next().await;
        assert_eq!(start.elapsed(), MESSAGE_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_until_stopped() {
        let (tx, mut rx) = watch::channel("");
        let ticker = LoadingTicker::spawn(MESSAGE_INTERVAL, tx);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), LOADING_MESSAGES[0]);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), LOADING_MESSAGES[1]);

        ticker.stop().await;
        assert!(rx.changed().await.is_err());
    }
}
