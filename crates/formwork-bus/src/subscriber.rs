//! # Action Subscriber
//!
//! Defines the subscription side of the action bus.

use formwork_actions::{ActionFilter, FormAction};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The action bus was closed.
    #[error("Action bus closed")]
    Closed,
}

/// A subscription handle for receiving actions.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<FormAction>,

    /// Filter for this subscription.
    filter: ActionFilter,

    /// Reference to subscription tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Filter key for this subscription.
    filter_key: String,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<FormAction>,
        filter: ActionFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        filter_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            filter_key,
        }
    }

    /// Receive the next action that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(action)` - The next matching action
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<FormAction> {
        loop {
            let action = match self.receiver.recv().await {
                Ok(a) => a,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some actions dropped");
                    continue;
                }
            };

            if self.filter.matches(&action) {
                return Some(action);
            }
            // Action doesn't match filter, continue waiting
        }
    }

    /// Try to receive the next action without blocking.
    ///
    /// # Errors
    ///
    /// - `Ok(Some(action))` - An action was available and matched
    /// - `Ok(None)` - No action available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<FormAction>, SubscriptionError> {
        loop {
            let action = match self.receiver.try_recv() {
                Ok(a) => a,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&action) {
                return Ok(Some(action));
            }
            // Action doesn't match filter, try again
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &ActionFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Decrement subscription count
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.filter_key) else {
            debug!(filter = %self.filter_key, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.filter_key);
        }
        debug!(filter = %self.filter_key, "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct ActionStream {
    subscription: Subscription,
}

impl ActionStream {
    /// Create a new action stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &ActionFilter {
        self.subscription.filter()
    }
}

impl Stream for ActionStream {
    type Item = FormAction;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Use try_recv for non-blocking check
        match self.subscription.try_recv() {
            Ok(Some(action)) => Poll::Ready(Some(action)),
            Ok(None) => {
                // No action ready, need to wait
                // Register waker and return pending
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
