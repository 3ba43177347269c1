//! Cancellation and time bounds for outbound calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;

/// A flag that flips once and wakes everyone waiting on it.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so this only ends by cancellation.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// How a bounded call ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Bounded<T> {
    Completed(T),
    TimedOut,
    Cancelled,
}

/// Runs `future` until it finishes, `limit` elapses or `token` is cancelled,
/// whichever happens first. The losing future is dropped.
pub async fn bounded<F, T>(future: F, limit: Duration, token: &CancellationToken) -> Bounded<T>
where
    F: Future<Output = T>,
{
    if token.is_cancelled() {
        return Bounded::Cancelled;
    }
    tokio::select! {
        result = timeout(limit, future) => match result {
            Ok(value) => Bounded::Completed(value),
            Err(_) => Bounded::TimedOut,
        },
        _ = token.cancelled() => Bounded::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_when_fast_enough() {
        let token = CancellationToken::new();
        let result = bounded(async { 7 }, Duration::from_secs(1), &token).await;
        assert_eq!(result, Bounded::Completed(7));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_on_a_hung_future() {
        let token = CancellationToken::new();
        let result = bounded(
            std::future::pending::<()>(),
            Duration::from_millis(50),
            &token,
        )
        .await;
        assert_eq!(result, Bounded::TimedOut);
    }

    #[tokio::test]
    async fn cancellation_wins_over_a_pending_call() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = tokio::spawn(async move {
            bounded(
                std::future::pending::<()>(),
                Duration::from_secs(60),
                &token,
            )
            .await
        });

        tokio::task::yield_now().await;
        canceller.cancel();
        assert_eq!(handle.await.expect("task completes"), Bounded::Cancelled);
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_the_call() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        let result = bounded(async { 1 }, Duration::from_secs(1), &token).await;
        assert_eq!(result, Bounded::Cancelled);
    }
}
