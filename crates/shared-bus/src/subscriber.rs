//! # Subscribers
//!
//! Defines the subscriber bag held by the owner and the subscription handle
//! held by the consumer.

use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The owner dropped the topic.
    #[error("Subscription closed")]
    Closed,
}

/// Generation-stamped subscriber token.
///
/// Issued from a monotonically increasing counter and never reused within
/// the bag that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered set of subscribers for one topic.
pub struct SubscriberBag<T> {
    next_generation: u64,
    subscribers: BTreeMap<SubscriptionToken, mpsc::UnboundedSender<T>>,
}

impl<T: Clone> SubscriberBag<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_generation: 0,
            subscribers: BTreeMap::new(),
        }
    }

    /// Skip ahead so the next token is at least `generation`. Never moves
    /// backwards.
    pub fn advance_to(&mut self, generation: u64) {
        self.next_generation = self.next_generation.max(generation);
    }

    /// Generation the next subscriber will get.
    #[must_use]
    pub fn next_generation(&self) -> u64 {
        self.next_generation
    }

    /// Register a subscriber and deliver `initial` to it before returning.
    pub fn subscribe(&mut self, initial: T) -> (SubscriptionToken, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        // The receiver is alive here, so this cannot fail.
        let _ = sender.send(initial);

        let token = SubscriptionToken(self.next_generation);
        self.next_generation += 1;
        self.subscribers.insert(token, sender);
        (token, receiver)
    }

    /// Remove a subscriber. Returns `false` when the token is unknown.
    pub fn remove(&mut self, token: SubscriptionToken) -> bool {
        self.subscribers.remove(&token).is_some()
    }

    /// Send `value` to every live subscriber, pruning closed ones.
    ///
    /// Returns the number of subscribers that received the value.
    pub fn publish(&mut self, value: &T) -> usize {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|_, sender| sender.send(value.clone()).is_ok());

        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            debug!(pruned, "Pruned closed subscribers");
        }
        self.subscribers.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T: Clone> Default for SubscriberBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

type UnsubscribeHook = Box<dyn FnOnce(SubscriptionToken) + Send>;

/// A subscription handle for receiving values.
///
/// When dropped, the unsubscribe hook runs with this subscription's token.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    token: SubscriptionToken,
    unsubscribe: Option<UnsubscribeHook>,
}

impl<T> Subscription<T> {
    /// Wrap a receiver with an unsubscribe hook.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<T>,
        token: SubscriptionToken,
        unsubscribe: impl FnOnce(SubscriptionToken) + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            token,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Receive the next value.
    ///
    /// # Returns
    ///
    /// - `Some(value)` - The next published value
    /// - `None` - The owner dropped the topic
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Try to receive the next value without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` - A value was queued
    /// - `Ok(None)` - Nothing queued
    /// - `Err(SubscriptionError::Closed)` - The owner dropped the topic
    pub fn try_recv(&mut self) -> Result<Option<T>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    #[must_use]
    pub fn token(&self) -> SubscriptionToken {
        self.token
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe(self.token);
        }
        debug!(token = %self.token, "Subscription dropped");
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
