//! # Contact Flows
//!
//! The manager driven through its public API against an in-memory device
//! store, including changes made behind its back.
//!
//! ## Flows Tested:
//!
//! 1. **External store change → rebuild → subscribers**
//! 2. **Concurrent writers**: commands from many tasks are applied one at a time
//! 3. **Store failure**: collapsed to absent results, recovered afterwards
//! 4. **Stream consumption**: subscriptions used as `Stream`s
//! 5. **Worker lifetime**: shutdown, or the last facade and subscription dropped

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dc_01_contact_source::{InMemoryDeviceStore, RecordKey, StoreError};
    use dc_03_contact_manager::{
        ContactDataApi, DeviceContactDataManager, ManagerConfig, Metrics, MetricsRecorder,
    };
    use futures::StreamExt;
    use shared_types::{AccessStatus, ContactId, NormalizedPhoneNumber, PhoneNumberEntry};
    use tokio::time::timeout;

    use crate::fixtures::device_data;

    const WAIT: Duration = Duration::from_secs(5);

    fn config() -> ManagerConfig {
        ManagerConfig::default().with_authorization_delay(Duration::ZERO)
    }

    async fn manager_for(
        store: &Arc<InMemoryDeviceStore>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> DeviceContactDataManager {
        let manager =
            DeviceContactDataManager::with_metrics(store.clone(), config(), metrics).unwrap();
        assert_eq!(manager.ready().await.unwrap(), AccessStatus::Allowed);
        manager
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_external_changes_reach_number_subscribers() {
        let store = Arc::new(InMemoryDeviceStore::new());
        store.insert_with_identifier("A", device_data("Al", "", &["+1-555-0100"]));
        let manager = manager_for(&store, Arc::new(Metrics::new())).await;

        let number = NormalizedPhoneNumber::new("+1 555 0100").unwrap();
        let mut matches = manager
            .basic_data_for_normalized_phone_number(number)
            .await
            .unwrap();
        let initial = timeout(WAIT, matches.next()).await.unwrap().unwrap();
        assert_eq!(initial.len(), 1);

        store.insert_with_identifier("B", device_data("Bo", "", &["(+1) 555-0100"]));
        let grown = timeout(WAIT, matches.next()).await.unwrap().unwrap();
        let ids: Vec<&str> = grown.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        store.remove(&RecordKey::Identifier("A".into()));
        let shrunk = timeout(WAIT, matches.next()).await.unwrap().unwrap();
        assert_eq!(shrunk.len(), 1);
        assert_eq!(shrunk[0].0.as_str(), "B");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_are_serialized() {
        let store = Arc::new(InMemoryDeviceStore::new());
        store.insert_with_identifier("A", device_data("Al", "", &[]));
        let manager = manager_for(&store, Arc::new(Metrics::new())).await;

        let writers: Vec<_> = (0..20)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    let phone = PhoneNumberEntry::new("mobile", format!("+1-555-{:04}", i));
                    manager
                        .append_phone_number(phone, &ContactId::new("A"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for writer in writers {
            assert!(writer.await.unwrap().is_some());
        }

        let extended = manager
            .extended_data(&ContactId::new("A"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(extended.basic.phone_numbers.len(), 20);

        let cached = manager
            .basic_data_for_id(&ContactId::new("A"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.phone_numbers.len(), 20);
    }

    #[tokio::test]
    async fn test_store_failure_collapses_and_recovers() {
        let store = Arc::new(InMemoryDeviceStore::new());
        store.insert_with_identifier("A", device_data("Al", "", &["1"]));
        let metrics = Arc::new(Metrics::new());
        let manager = manager_for(&store, metrics.clone()).await;

        store.set_failure(Some(StoreError::Unavailable("locked".into())));
        let id = ContactId::new("A");
        assert_eq!(manager.extended_data(&id).await.unwrap(), None);
        assert_eq!(
            manager
                .append_phone_number(PhoneNumberEntry::new("home", "2"), &id)
                .await
                .unwrap(),
            None
        );
        assert_eq!(metrics.snapshot().writes_failed, 1);
        // The cached snapshot is still served.
        assert!(manager.basic_data_for_id(&id).await.unwrap().is_some());

        store.set_failure(None);
        let updated = manager
            .append_phone_number(PhoneNumberEntry::new("home", "2"), &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.basic.phone_numbers.len(), 2);
        assert_eq!(metrics.snapshot().writes_succeeded, 1);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_current_snapshot() {
        let store = Arc::new(InMemoryDeviceStore::new());
        for i in 0..10 {
            store.insert(device_data(&format!("Contact{}", i), "", &[]));
        }
        let manager = manager_for(&store, Arc::new(Metrics::new())).await;

        let first = manager.basic_data().await.unwrap();
        let second = manager.basic_data().await.unwrap();
        let sizes: Vec<usize> = futures::future::join_all([first, second].map(|mut sub| async move {
            sub.next().await.map(|snapshot| snapshot.len()).unwrap_or(0)
        }))
        .await;
        assert_eq!(sizes, vec![10, 10]);
    }

    #[tokio::test]
    async fn test_shutdown_ends_subscription_streams() {
        let store = Arc::new(InMemoryDeviceStore::new());
        let manager = manager_for(&store, Arc::new(Metrics::new())).await;
        let mut basic = manager.basic_data().await.unwrap();
        assert!(basic.next().await.unwrap().is_empty());

        manager.shutdown().await.unwrap();
        // The worker dropped every topic, so the stream ends.
        assert!(timeout(WAIT, basic.next()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_worker_outlives_facade_until_last_subscription_drops() {
        let store = Arc::new(InMemoryDeviceStore::new());
        let manager = manager_for(&store, Arc::new(Metrics::new())).await;
        let mut basic = manager.basic_data().await.unwrap();
        assert!(basic.next().await.unwrap().is_empty());

        // The subscription still holds a handle to the worker.
        drop(manager);
        store.insert_with_identifier("A", device_data("Al", "", &["1"]));
        let updated = timeout(WAIT, basic.next()).await.unwrap().unwrap();
        assert_eq!(updated.len(), 1);

        // With the last handle gone the worker exits and releases the store.
        drop(basic);
        timeout(WAIT, async {
            while Arc::strong_count(&store) > 1 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
