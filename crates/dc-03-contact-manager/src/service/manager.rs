//! Device contact data manager
//!
//! Cheap-to-clone facade over the serial worker. Every method posts a
//! command and awaits the worker's reply.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dc_01_contact_source::DeviceContactStore;
use shared_bus::Subscription;
use shared_types::{
    AccessStatus, BasicContactData, ContactId, ExtendedContactData, NormalizedPhoneNumber,
    PeerId, PersonNameOrder, PhoneNumberEntry,
};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::state::TopicKey;
use super::worker::{Command, SubscribeReply, Worker};
use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BasicDataMap, ContactDataApi, ImportableMap, NumberMatches, ReferenceMap};

/// Device contact data manager.
///
/// Clones share one worker. The worker stops on `shutdown` or once every
/// clone and every subscription has been dropped.
#[derive(Clone)]
pub struct DeviceContactDataManager {
    commands: mpsc::UnboundedSender<Command>,
}

impl DeviceContactDataManager {
    /// Start the manager on the current tokio runtime.
    ///
    /// Access is requested after `config.authorization_delay`; until then
    /// every topic holds an empty value.
    pub fn new(
        store: Arc<dyn DeviceContactStore>,
        config: ManagerConfig,
    ) -> Result<Self, ManagerError> {
        Self::with_metrics(store, config, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(
        store: Arc<dyn DeviceContactStore>,
        config: ManagerConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, ManagerError> {
        config.validate()?;
        info!(
            delay_ms = config.authorization_delay.as_millis() as u64,
            modern_store_api = config.capabilities.modern_store_api,
            "Starting contact data manager"
        );

        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(Worker::new(store, config, metrics).run(receiver));
        Ok(Self { commands })
    }

    /// Wait until initialization ran and return the access status it used.
    pub async fn ready(&self) -> Result<AccessStatus, ManagerError> {
        self.request(Command::Ready).await
    }

    /// Stop the worker. Later calls fail with `ManagerError::Closed`.
    pub async fn shutdown(&self) -> Result<(), ManagerError> {
        self.request(Command::Shutdown).await
    }

    async fn request<R, F>(&self, command: F) -> Result<R, ManagerError>
    where
        F: FnOnce(oneshot::Sender<R>) -> Command + Send,
        R: Send,
    {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| ManagerError::Closed)?;
        response.await.map_err(|_| ManagerError::Closed)
    }

    async fn subscribe<T, F>(&self, topic: TopicKey, command: F) -> Result<Subscription<T>, ManagerError>
    where
        F: FnOnce(SubscribeReply<T>) -> Command + Send,
        T: Send + 'static,
    {
        let (token, receiver) = self.request(command).await?;
        let commands = self.commands.clone();
        Ok(Subscription::new(receiver, token, move |token| {
            // A stopped worker has nothing left to unsubscribe from.
            let _ = commands.send(Command::Unsubscribe { topic, token });
        }))
    }
}

#[async_trait]
impl ContactDataApi for DeviceContactDataManager {
    async fn person_name_order(&self) -> Result<PersonNameOrder, ManagerError> {
        self.request(Command::PersonNameOrder).await
    }

    async fn basic_data(&self) -> Result<Subscription<BasicDataMap>, ManagerError> {
        self.subscribe(TopicKey::BasicData, Command::SubscribeBasicData)
            .await
    }

    async fn basic_data_for_normalized_phone_number(
        &self,
        number: NormalizedPhoneNumber,
    ) -> Result<Subscription<NumberMatches>, ManagerError> {
        let topic = TopicKey::Number(number.clone());
        self.subscribe(topic, |reply| Command::SubscribeNumber { number, reply })
            .await
    }

    async fn importable(&self) -> Result<Subscription<ImportableMap>, ManagerError> {
        self.subscribe(TopicKey::Importable, Command::SubscribeImportable)
            .await
    }

    async fn app_specific_references(&self) -> Result<Subscription<ReferenceMap>, ManagerError> {
        self.subscribe(TopicKey::References, Command::SubscribeReferences)
            .await
    }

    async fn search(
        &self,
        query: &str,
    ) -> Result<BTreeMap<ContactId, BasicContactData>, ManagerError> {
        let query = query.to_string();
        self.request(|reply| Command::Search { query, reply }).await
    }

    async fn basic_data_for_id(
        &self,
        id: &ContactId,
    ) -> Result<Option<BasicContactData>, ManagerError> {
        let id = id.clone();
        self.request(|reply| Command::BasicDataForId { id, reply })
            .await
    }

    async fn extended_data(
        &self,
        id: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError> {
        let id = id.clone();
        self.request(|reply| Command::ExtendedData { id, reply }).await
    }

    async fn append_contact_data(
        &self,
        data: ExtendedContactData,
        to: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError> {
        let to = to.clone();
        self.request(|reply| Command::AppendContactData { data, to, reply })
            .await
    }

    async fn append_phone_number(
        &self,
        phone: PhoneNumberEntry,
        to: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError> {
        let to = to.clone();
        self.request(|reply| Command::AppendPhoneNumber { phone, to, reply })
            .await
    }

    async fn create_contact_with_data(
        &self,
        data: ExtendedContactData,
        peer: Option<PeerId>,
    ) -> Result<Option<(ContactId, ExtendedContactData)>, ManagerError> {
        self.request(|reply| Command::CreateContact { data, peer, reply })
            .await
    }

    async fn delete_contact_with_app_specific_reference(
        &self,
        peer: PeerId,
    ) -> Result<bool, ManagerError> {
        self.request(|reply| Command::DeleteByReference { peer, reply })
            .await
    }
}
