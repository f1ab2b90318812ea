//! # Action Publisher
//!
//! Defines the publishing side of the action bus.

use crate::subscriber::{ActionStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use formwork_actions::{ActionFilter, FormAction};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing actions to the bus.
///
/// Callers, the store, and the orchestrators all dispatch through this
/// interface; nothing mutates form state any other way.
#[async_trait]
pub trait ActionPublisher: Send + Sync {
    /// Publish an action to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the action.
    async fn publish(&self, action: FormAction) -> usize;

    /// Get the total number of actions published.
    fn actions_published(&self) -> u64;
}

/// In-memory implementation of the action bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics with a single publish order. One bus instance backs one
/// engine; there is no global singleton.
pub struct ActionBus {
    /// Broadcast sender for actions.
    sender: broadcast::Sender<FormAction>,

    /// Active subscription count by filter key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total actions published.
    actions_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl ActionBus {
    /// Create a new in-memory action bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory action bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            actions_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to actions matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive
    /// actions. Only actions published after this call are observed.
    #[must_use]
    pub fn subscribe(&self, filter: ActionFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let filter_key = format!("{:?}/{:?}", filter.topics, filter.action_types);

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(filter_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(topics = ?filter.topics, action_types = ?filter.action_types, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), filter_key)
    }

    /// Get a stream of actions matching a filter.
    ///
    /// This is a convenience method that returns an `ActionStream`.
    #[must_use]
    pub fn action_stream(&self, filter: ActionFilter) -> ActionStream {
        ActionStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActionBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionPublisher for ActionBus {
    async fn publish(&self, action: FormAction) -> usize {
        let topic = action.topic();

        // Always increment counter (dispatch was attempted)
        self.actions_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(action) {
            Ok(receiver_count) => {
                debug!(
                    topic = ?topic,
                    receivers = receiver_count,
                    "Action published"
                );
                receiver_count
            }
            Err(e) => {
                // No receivers - action is dropped
                warn!(
                    topic = ?topic,
                    error = %e,
                    "Action dropped (no receivers)"
                );
                0
            }
        }
    }

    fn actions_published(&self) -> u64 {
        self.actions_published.load(Ordering::Relaxed)
    }
}
