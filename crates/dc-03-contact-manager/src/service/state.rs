//! Cached contact state and its topics
//!
//! Owned by the serial task. A rebuild replaces the snapshot and every
//! derived index in one step, then recomputes the topics.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dc_01_contact_source::ContactSnapshot;
use dc_02_contact_index::{basic_data_for_number, build, search, DerivedIndices};
use shared_bus::{KeyedTopics, SubscriptionToken, Topic};
use shared_types::{BasicContactData, ContactId, ImportableContactData, NormalizedPhoneNumber};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::ports::{BasicDataMap, ImportableMap, NumberMatches, ReferenceMap};

/// Which topic a subscription belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicKey {
    BasicData,
    Number(NormalizedPhoneNumber),
    Importable,
    References,
}

pub struct ContactState {
    indices: DerivedIndices,
    basic: Topic<BasicDataMap>,
    importable: Topic<ImportableMap>,
    references: Topic<ReferenceMap>,
    numbers: KeyedTopics<NormalizedPhoneNumber, NumberMatches>,
}

impl ContactState {
    /// Empty state; every topic starts out empty.
    pub fn new() -> Self {
        Self {
            indices: DerivedIndices::default(),
            basic: Topic::new(Arc::default()),
            importable: Topic::new(Arc::default()),
            references: Topic::new(Arc::default()),
            numbers: KeyedTopics::new(),
        }
    }

    /// Replace the snapshot, rebuild the indices and notify changed topics.
    ///
    /// Returns the number of notifications sent.
    pub fn apply(&mut self, snapshot: ContactSnapshot) -> usize {
        let ContactSnapshot { basic, references } = snapshot;
        self.indices = build(&basic);

        let mut notified = self.basic.update(Arc::new(basic));
        notified += self
            .importable
            .update(Arc::new(self.indices.importable.clone()));
        notified += self.references.update(Arc::new(references));

        let basic = self.basic.value();
        let indices = &self.indices;
        notified += self
            .numbers
            .refresh(|number| basic_data_for_number(basic, indices, number));

        debug!(
            contacts = basic.len(),
            numbers = indices.number_index.len(),
            notified,
            "Applied contact snapshot"
        );
        notified
    }

    pub fn subscribe_basic_data(&mut self) -> (SubscriptionToken, UnboundedReceiver<BasicDataMap>) {
        self.basic.subscribe()
    }

    pub fn subscribe_importable(
        &mut self,
    ) -> (SubscriptionToken, UnboundedReceiver<ImportableMap>) {
        self.importable.subscribe()
    }

    pub fn subscribe_references(
        &mut self,
    ) -> (SubscriptionToken, UnboundedReceiver<ReferenceMap>) {
        self.references.subscribe()
    }

    /// Subscribe to one number, computing its matches on first use.
    pub fn subscribe_number(
        &mut self,
        number: NormalizedPhoneNumber,
    ) -> (SubscriptionToken, UnboundedReceiver<NumberMatches>) {
        let basic = self.basic.value();
        let indices = &self.indices;
        self.numbers
            .subscribe(number, |number| basic_data_for_number(basic, indices, number))
    }

    pub fn unsubscribe(&mut self, topic: &TopicKey, token: SubscriptionToken) -> bool {
        let removed = match topic {
            TopicKey::BasicData => self.basic.unsubscribe(token),
            TopicKey::Number(number) => self.numbers.unsubscribe(number, token),
            TopicKey::Importable => self.importable.unsubscribe(token),
            TopicKey::References => self.references.unsubscribe(token),
        };
        debug!(?topic, %token, removed, "Unsubscribed");
        removed
    }

    pub fn search(&self, query: &str) -> BTreeMap<ContactId, BasicContactData> {
        search(self.basic.value(), query)
    }

    pub fn basic_data_for_id(&self, id: &ContactId) -> Option<BasicContactData> {
        self.basic.value().get(id).cloned()
    }

    pub fn basic_data(&self) -> &BasicDataMap {
        self.basic.value()
    }

    pub fn importable(&self) -> &HashMap<String, ImportableContactData> {
        &self.indices.importable
    }

    /// Whether a per-number topic is currently materialized.
    pub fn has_number_topic(&self, number: &NormalizedPhoneNumber) -> bool {
        self.numbers.contains_key(number)
    }

    /// Live subscriptions across every topic.
    pub fn subscriber_count(&self) -> usize {
        self.basic.subscriber_count()
            + self.importable.subscriber_count()
            + self.references.subscriber_count()
            + self.numbers.subscriber_count()
    }
}

impl Default for ContactState {
    fn default() -> Self {
        Self::new()
    }
}
