//! Serial context
//!
//! One task owns the contact state. Facade commands, the access signal and
//! store-change notifications are handled here one at a time, so every read
//! observes a fully rebuilt snapshot. Blocking store calls run on the
//! blocking pool and are awaited before the next event is taken.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dc_01_contact_source::{
    with_app_specific_reference, ContactBackend, ContactSnapshot, ContactSource,
    DeviceContactStore, StoreChange,
};
use shared_bus::SubscriptionToken;
use shared_types::{
    AccessStatus, BasicContactData, ContactId, ExtendedContactData, NormalizedPhoneNumber,
    PeerId, PersonNameOrder, PhoneNumberEntry,
};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use super::state::{ContactState, TopicKey};
use crate::config::ManagerConfig;
use crate::metrics::MetricsRecorder;
use crate::ports::{BasicDataMap, ImportableMap, NumberMatches, ReferenceMap};

pub(crate) type Reply<T> = oneshot::Sender<T>;
pub(crate) type SubscribeReply<T> = Reply<(SubscriptionToken, mpsc::UnboundedReceiver<T>)>;

/// Requests marshalled onto the serial context.
pub(crate) enum Command {
    PersonNameOrder(Reply<PersonNameOrder>),
    SubscribeBasicData(SubscribeReply<BasicDataMap>),
    SubscribeNumber {
        number: NormalizedPhoneNumber,
        reply: SubscribeReply<NumberMatches>,
    },
    SubscribeImportable(SubscribeReply<ImportableMap>),
    SubscribeReferences(SubscribeReply<ReferenceMap>),
    Unsubscribe {
        topic: TopicKey,
        token: SubscriptionToken,
    },
    Search {
        query: String,
        reply: Reply<BTreeMap<ContactId, BasicContactData>>,
    },
    BasicDataForId {
        id: ContactId,
        reply: Reply<Option<BasicContactData>>,
    },
    ExtendedData {
        id: ContactId,
        reply: Reply<Option<ExtendedContactData>>,
    },
    AppendContactData {
        data: ExtendedContactData,
        to: ContactId,
        reply: Reply<Option<ExtendedContactData>>,
    },
    AppendPhoneNumber {
        phone: PhoneNumberEntry,
        to: ContactId,
        reply: Reply<Option<ExtendedContactData>>,
    },
    CreateContact {
        data: ExtendedContactData,
        peer: Option<PeerId>,
        reply: Reply<Option<(ContactId, ExtendedContactData)>>,
    },
    DeleteByReference {
        peer: PeerId,
        reply: Reply<bool>,
    },
    Ready(Reply<AccessStatus>),
    Shutdown(Reply<()>),
}

pub(crate) struct Worker {
    store: Arc<dyn DeviceContactStore>,
    config: ManagerConfig,
    metrics: Arc<dyn MetricsRecorder>,
    backend: Option<Arc<ContactBackend>>,
    state: ContactState,
    /// `None` until initialization ran
    access: Option<AccessStatus>,
    waiting: Vec<Reply<AccessStatus>>,
}

impl Worker {
    pub(crate) fn new(
        store: Arc<dyn DeviceContactStore>,
        config: ManagerConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            store,
            config,
            metrics,
            backend: None,
            state: ContactState::new(),
            access: None,
            waiting: Vec::new(),
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let mut access = request_access(self.store.clone(), self.config.authorization_delay);
        let mut changes: Option<broadcast::Receiver<StoreChange>> = None;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command).await {
                            break;
                        }
                    }
                    None => break,
                },
                signal = access.changed(), if self.access.is_none() => {
                    let status = match signal {
                        Ok(()) => *access.borrow_and_update(),
                        // The requester went away without an answer.
                        Err(_) => AccessStatus::Denied,
                    };
                    if status.is_definite() {
                        changes = self.initialize(status).await;
                    }
                }
                change = next_change(&mut changes) => match change {
                    Ok(StoreChange { revision }) => {
                        let coalesced = drain_changes(&mut changes);
                        debug!(revision, coalesced, "Resyncing after store change");
                        self.resync().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Store change notifications lagged");
                        self.resync().await;
                    }
                    Err(RecvError::Closed) => {
                        warn!("Store change notifications closed");
                        changes = None;
                    }
                },
            }
        }

        info!("Contact data manager stopped");
    }

    /// Handle one command. Returns `false` when the worker should stop.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::PersonNameOrder(reply) => {
                let order = self
                    .call_backend(|backend| backend.person_name_order())
                    .await
                    .unwrap_or_default();
                let _ = reply.send(order);
            }
            Command::SubscribeBasicData(reply) => {
                let subscription = self.state.subscribe_basic_data();
                self.reply_subscription(TopicKey::BasicData, reply, subscription);
            }
            Command::SubscribeNumber { number, reply } => {
                let subscription = self.state.subscribe_number(number.clone());
                self.reply_subscription(TopicKey::Number(number), reply, subscription);
            }
            Command::SubscribeImportable(reply) => {
                let subscription = self.state.subscribe_importable();
                self.reply_subscription(TopicKey::Importable, reply, subscription);
            }
            Command::SubscribeReferences(reply) => {
                let subscription = self.state.subscribe_references();
                self.reply_subscription(TopicKey::References, reply, subscription);
            }
            Command::Unsubscribe { topic, token } => {
                self.state.unsubscribe(&topic, token);
                self.metrics
                    .set_active_subscriptions(self.state.subscriber_count());
            }
            Command::Search { query, reply } => {
                let _ = reply.send(self.state.search(&query));
            }
            Command::BasicDataForId { id, reply } => {
                let _ = reply.send(self.state.basic_data_for_id(&id));
            }
            Command::ExtendedData { id, reply } => {
                let data = self
                    .call_backend(move |backend| backend.get_extended(&id))
                    .await
                    .flatten();
                let _ = reply.send(data);
            }
            Command::AppendContactData { data, to, reply } => {
                let updated = self
                    .call_backend(move |backend| backend.append_contact_data(&data, &to))
                    .await
                    .flatten();
                self.finish_write(updated.is_some()).await;
                let _ = reply.send(updated);
            }
            Command::AppendPhoneNumber { phone, to, reply } => {
                let updated = self
                    .call_backend(move |backend| backend.append_phone_number(&phone, &to))
                    .await
                    .flatten();
                self.finish_write(updated.is_some()).await;
                let _ = reply.send(updated);
            }
            Command::CreateContact { data, peer, reply } => {
                let data = match peer {
                    Some(peer) => with_app_specific_reference(data, peer),
                    None => data,
                };
                let created = self
                    .call_backend(move |backend| backend.create(&data))
                    .await
                    .flatten();
                self.finish_write(created.is_some()).await;
                let _ = reply.send(created);
            }
            Command::DeleteByReference { peer, reply } => {
                let deleted = self
                    .call_backend(move |backend| backend.delete_by_reference(peer))
                    .await
                    .unwrap_or(false);
                self.finish_write(deleted).await;
                let _ = reply.send(deleted);
            }
            Command::Ready(reply) => match self.access {
                Some(status) => {
                    let _ = reply.send(status);
                }
                None => self.waiting.push(reply),
            },
            Command::Shutdown(reply) => {
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    /// Runs once, with the first definite access status.
    async fn initialize(&mut self, status: AccessStatus) -> Option<broadcast::Receiver<StoreChange>> {
        self.access = Some(status);
        info!(?status, "Contacts access determined");

        let changes = if status.is_allowed() {
            let backend = Arc::new(ContactBackend::select(
                self.config.capabilities,
                self.store.clone(),
            ));
            // Subscribe before the first read so no change slips in between.
            let changes = backend.subscribe_changes();
            self.backend = Some(backend);
            self.resync().await;
            Some(changes)
        } else {
            self.apply_snapshot(ContactSnapshot::default(), Instant::now());
            None
        };

        for waiter in self.waiting.drain(..) {
            let _ = waiter.send(status);
        }
        changes
    }

    async fn resync(&mut self) {
        let started = Instant::now();
        if let Some(snapshot) = self
            .call_backend(|backend| backend.retrieve_snapshot())
            .await
        {
            self.apply_snapshot(snapshot, started);
        }
    }

    fn apply_snapshot(&mut self, snapshot: ContactSnapshot, started: Instant) {
        let contacts = snapshot.basic.len();
        let notified = self.state.apply(snapshot);
        self.metrics.record_rebuild(started.elapsed(), contacts);
        self.metrics.record_notifications(notified);
        self.metrics
            .set_active_subscriptions(self.state.subscriber_count());
    }

    async fn finish_write(&mut self, succeeded: bool) {
        self.metrics.record_write(succeeded);
        if succeeded {
            self.resync().await;
        }
    }

    fn reply_subscription<T>(
        &mut self,
        topic: TopicKey,
        reply: SubscribeReply<T>,
        (token, receiver): (SubscriptionToken, mpsc::UnboundedReceiver<T>),
    ) {
        debug!(?topic, %token, "Subscribed");
        if reply.send((token, receiver)).is_err() {
            // Caller went away before receiving the handle.
            self.state.unsubscribe(&topic, token);
        }
        self.metrics
            .set_active_subscriptions(self.state.subscriber_count());
    }

    /// Run `op` against the backend on the blocking pool.
    ///
    /// `None` when there is no backend (access not granted) or the call
    /// panicked.
    async fn call_backend<R, F>(&self, op: F) -> Option<R>
    where
        F: FnOnce(&ContactBackend) -> R + Send + 'static,
        R: Send + 'static,
    {
        let backend = self.backend.clone()?;
        match tokio::task::spawn_blocking(move || op(&backend)).await {
            Ok(result) => Some(result),
            Err(e) => {
                error!(error = %e, "Contact backend call failed");
                None
            }
        }
    }
}

/// Ask for contacts access after `delay`; the answer lands on the returned
/// signal.
fn request_access(
    store: Arc<dyn DeviceContactStore>,
    delay: Duration,
) -> watch::Receiver<AccessStatus> {
    let (sender, receiver) = watch::channel(AccessStatus::NotDetermined);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match tokio::task::spawn_blocking(move || store.request_access()).await {
            Ok(status) => {
                let _ = sender.send(status);
            }
            Err(e) => error!(error = %e, "Contacts access request failed"),
        }
    });
    receiver
}

async fn next_change(
    changes: &mut Option<broadcast::Receiver<StoreChange>>,
) -> Result<StoreChange, RecvError> {
    match changes {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

/// Discard queued notifications; one resync covers them all.
fn drain_changes(changes: &mut Option<broadcast::Receiver<StoreChange>>) -> usize {
    let Some(receiver) = changes else {
        return 0;
    };
    let mut drained = 0;
    loop {
        match receiver.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => drained += 1,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    drained
}
