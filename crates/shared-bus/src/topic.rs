//! # Topics
//!
//! A topic pairs a cached value with its subscriber bag. Updates are
//! equality-gated: the value is stored and broadcast only when it changed.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::mpsc;
use tracing::trace;

use crate::subscriber::{SubscriberBag, SubscriptionToken};

/// A single cached value with its subscribers.
pub struct Topic<V> {
    value: V,
    subscribers: SubscriberBag<V>,
}

impl<V: Clone + PartialEq> Topic<V> {
    pub fn new(initial: V) -> Self {
        Self {
            value: initial,
            subscribers: SubscriberBag::new(),
        }
    }

    /// Subscribe; the current value is queued on the returned receiver.
    pub fn subscribe(&mut self) -> (SubscriptionToken, mpsc::UnboundedReceiver<V>) {
        self.subscribers.subscribe(self.value.clone())
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.subscribers.remove(token)
    }

    /// Store and broadcast `value` if it differs from the cached one.
    ///
    /// Returns the number of subscribers notified (zero when unchanged).
    pub fn update(&mut self, value: V) -> usize {
        if value == self.value {
            return 0;
        }
        self.value = value;
        self.subscribers.publish(&self.value)
    }

    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Parameterized topics, materialized on first subscribe and evicted after
/// the last unsubscribe.
///
/// Tokens come from one counter shared by every key, so a token is never
/// reissued after its topic was evicted and materialized again.
pub struct KeyedTopics<K, V> {
    topics: HashMap<K, Topic<V>>,
    next_generation: u64,
}

impl<K, V> KeyedTopics<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Subscribe to `key`, computing its value only if the topic is not
    /// materialized yet.
    pub fn subscribe(
        &mut self,
        key: K,
        compute: impl FnOnce(&K) -> V,
    ) -> (SubscriptionToken, mpsc::UnboundedReceiver<V>) {
        let topic = self
            .topics
            .entry(key)
            .or_insert_with_key(|key| Topic::new(compute(key)));
        topic.subscribers.advance_to(self.next_generation);
        let (token, receiver) = topic.subscribe();
        self.next_generation = token.generation() + 1;
        (token, receiver)
    }

    /// Remove a subscriber; evicts the topic when it was the last one.
    pub fn unsubscribe(&mut self, key: &K, token: SubscriptionToken) -> bool {
        let Some(topic) = self.topics.get_mut(key) else {
            return false;
        };
        let removed = topic.unsubscribe(token);
        if topic.subscriber_count() == 0 {
            self.topics.remove(key);
            trace!("Evicted keyed topic");
        }
        removed
    }

    /// Recompute every materialized topic and broadcast the changed ones.
    ///
    /// Topics left without live subscribers are evicted. Returns the total
    /// number of notifications sent.
    pub fn refresh(&mut self, mut compute: impl FnMut(&K) -> V) -> usize {
        let mut notified = 0;
        for (key, topic) in &mut self.topics {
            notified += topic.update(compute(key));
        }
        self.topics.retain(|_, topic| topic.subscriber_count() > 0);
        notified
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.topics.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.topics.get(key).map(Topic::value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Subscribers across all topics.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.topics.values().map(Topic::subscriber_count).sum()
    }
}

impl<K, V> Default for KeyedTopics<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
