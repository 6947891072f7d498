//! Data session
//!
//! The API boundary used by the rest of the application. Two states:
//! uninitialized until `init` registers a handler, ready afterwards.
//! Mutations issued before `init` still reach the store but notify nobody.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::record::{Ack, Record};
use crate::store::{remove_by_id, upsert, RecordStore};
use crate::Result;

/// Receives the complete collection after every change
pub trait ChangeHandler: Send + Sync {
    fn on_data_changed(&self, records: &[Record]);
}

impl<F> ChangeHandler for F
where
    F: Fn(&[Record]) + Send + Sync,
{
    fn on_data_changed(&self, records: &[Record]) {
        self(records)
    }
}

pub struct DataSdk {
    store: RecordStore,
    /// At most one handler; a later `init` replaces it
    handler: Arc<RwLock<Option<Arc<dyn ChangeHandler>>>>,
}

impl DataSdk {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            handler: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.handler.read().is_some()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Register the change handler and immediately deliver the current collection to it
    pub async fn init<H: ChangeHandler + 'static>(&self, handler: H) -> Result<Ack> {
        let handler: Arc<dyn ChangeHandler> = Arc::new(handler);
        let replaced = self.handler.write().replace(Arc::clone(&handler)).is_some();

        let records = self.store.load_all();

        tracing::info!(
            key = %self.store.key(),
            record_count = records.len(),
            replaced,
            "Data session initialized"
        );

        handler.on_data_changed(&records);
        Ok(Ack::ok())
    }

    pub async fn create(&self, record: Record) -> Result<Ack> {
        self.upsert_record("create", record).await
    }

    pub async fn update(&self, record: Record) -> Result<Ack> {
        self.upsert_record("update", record).await
    }

    /// Remove the record carrying `record.id`; other fields are ignored
    pub async fn delete(&self, record: &Record) -> Result<Ack> {
        self.delete_by_id(&record.id).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<Ack> {
        let mut records = self.store.load_all();
        tokio::task::yield_now().await;

        let removed = remove_by_id(&mut records, id);
        tracing::debug!(record_id = %id, removed, "Deleting record");

        self.commit("delete", id, records)
    }

    /// Current collection, read straight from the store without notifying
    pub fn records(&self) -> Vec<Record> {
        self.store.load_all()
    }

    async fn upsert_record(&self, operation: &'static str, record: Record) -> Result<Ack> {
        let mut records = self.store.load_all();
        // Suspension point between load and save. Overlapping unawaited
        // calls race here and the last save wins.
        tokio::task::yield_now().await;

        let id = record.id.clone();
        upsert(&mut records, record);

        self.commit(operation, &id, records)
    }

    fn commit(&self, operation: &'static str, id: &str, records: Vec<Record>) -> Result<Ack> {
        self.store.save_all(&records)?;

        tracing::debug!(
            operation,
            record_id = %id,
            record_count = records.len(),
            "Persisted records"
        );

        self.notify(&records);
        Ok(Ack::ok())
    }

    fn notify(&self, records: &[Record]) {
        // Clone out so the handler may call back into the session
        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            handler.on_data_changed(records);
        }
    }
}

impl Clone for DataSdk {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealplan_storage::{Medium, MemoryMedium};
    use parking_lot::Mutex;
    use std::collections::HashSet;

    use crate::store::DEFAULT_STORAGE_KEY;

    /// Handler that keeps every notification it receives
    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Vec<Record>>>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<Vec<Record>> {
            self.calls.lock().clone()
        }

        fn last(&self) -> Option<Vec<Record>> {
            self.calls.lock().last().cloned()
        }
    }

    impl ChangeHandler for Recorder {
        fn on_data_changed(&self, records: &[Record]) {
            self.calls.lock().push(records.to_vec());
        }
    }

    fn sdk() -> (DataSdk, MemoryMedium) {
        let medium = MemoryMedium::new();
        (DataSdk::new(RecordStore::new(medium.clone())), medium)
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_init_delivers_current_collection() {
        let (sdk, _) = sdk();
        sdk.store()
            .save_all(&[Record::new("recipe_1"), Record::new("plan_1")])
            .unwrap();

        let recorder = Recorder::default();
        assert!(!sdk.is_ready());
        let ack = sdk.init(recorder.clone()).await.unwrap();

        assert!(ack.is_ok);
        assert!(sdk.is_ready());
        assert_eq!(recorder.calls().len(), 1);
        assert_eq!(ids(&recorder.last().unwrap()), vec!["recipe_1", "plan_1"]);
    }

    #[tokio::test]
    async fn test_init_recovers_from_corrupt_blob() {
        let (sdk, medium) = sdk();
        medium.set_item(DEFAULT_STORAGE_KEY, "[{broken").unwrap();

        let recorder = Recorder::default();
        let ack = sdk.init(recorder.clone()).await.unwrap();

        assert!(ack.is_ok);
        assert_eq!(recorder.calls(), vec![Vec::<Record>::new()]);
    }

    #[tokio::test]
    async fn test_create_update_delete_scenario() {
        let (sdk, _) = sdk();
        let recorder = Recorder::default();
        sdk.init(recorder.clone()).await.unwrap();

        sdk.create(Record::new("recipe_7").with_field("title", "Soup"))
            .await
            .unwrap();
        let persisted = sdk.records();
        assert_eq!(
            persisted,
            vec![Record::new("recipe_7").with_field("title", "Soup")]
        );
        assert_eq!(recorder.last().unwrap(), persisted);

        sdk.update(Record::new("recipe_7").with_field("title", "Stew"))
            .await
            .unwrap();
        let persisted = sdk.records();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].get_str("title"), Some("Stew"));

        sdk.delete(&Record::new("recipe_7")).await.unwrap();
        assert!(sdk.records().is_empty());
        assert!(recorder.last().unwrap().is_empty());

        // init + three mutations
        assert_eq!(recorder.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_ids_stay_unique() {
        let (sdk, _) = sdk();
        let ops = ["a", "b", "a", "c", "b", "a"];
        for (n, id) in ops.iter().enumerate() {
            let record = Record::new(*id).with_field("n", n as u64);
            if n % 2 == 0 {
                sdk.create(record).await.unwrap();
            } else {
                sdk.update(record).await.unwrap();
            }
        }

        let records = sdk.records();
        let unique: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), records.len());
        assert_eq!(ids(&records), vec!["a", "b", "c"]);
        assert_eq!(records[0].get("n"), Some(&serde_json::json!(5)));
    }

    #[tokio::test]
    async fn test_id_cannot_change_after_create() {
        let (sdk, _) = sdk();
        let recorder = Recorder::default();
        sdk.init(recorder.clone()).await.unwrap();

        let mut renamed = Record::new("recipe_a").with_field("title", "Soup");
        renamed.set("id", "recipe_b");
        sdk.create(renamed).await.unwrap();
        sdk.create(Record::new("recipe_b")).await.unwrap();

        let records = sdk.records();
        assert_eq!(ids(&records), vec!["recipe_a", "recipe_b"]);
        assert_eq!(records[0].get_str("title"), Some("Soup"));
        assert_eq!(recorder.last().unwrap(), records);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let (once, _) = sdk();
        let (twice, _) = sdk();
        let record = Record::new("mealSel_1").with_field("day", "Mon");

        once.create(record.clone()).await.unwrap();
        twice.create(record.clone()).await.unwrap();
        twice.update(record).await.unwrap();

        assert_eq!(once.records(), twice.records());
    }

    #[tokio::test]
    async fn test_delete_only_touches_matching_id() {
        let (sdk, _) = sdk();
        for id in ["recipe_1", "plan_1", "recipe_2", "x"] {
            sdk.create(Record::new(id).with_field("k", id)).await.unwrap();
        }

        sdk.delete_by_id("plan_1").await.unwrap();

        let records = sdk.records();
        assert_eq!(ids(&records), vec!["recipe_1", "recipe_2", "x"]);
        assert!(records.iter().all(|r| r.get_str("k") == Some(r.id.as_str())));
    }

    #[tokio::test]
    async fn test_delete_missing_id_still_notifies() {
        let (sdk, _) = sdk();
        let recorder = Recorder::default();
        sdk.create(Record::new("recipe_1")).await.unwrap();
        sdk.init(recorder.clone()).await.unwrap();

        let ack = sdk.delete_by_id("nope").await.unwrap();
        assert!(ack.is_ok);
        assert_eq!(recorder.calls().len(), 2);
        assert_eq!(ids(&recorder.last().unwrap()), vec!["recipe_1"]);
    }

    #[tokio::test]
    async fn test_mutations_before_init_are_silent() {
        let (sdk, _) = sdk();
        sdk.create(Record::new("recipe_1")).await.unwrap();

        let recorder = Recorder::default();
        sdk.init(recorder.clone()).await.unwrap();

        // Only the initial delivery, which already includes the earlier write
        assert_eq!(recorder.calls().len(), 1);
        assert_eq!(ids(&recorder.last().unwrap()), vec!["recipe_1"]);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let (sdk, _) = sdk();
        let first = Recorder::default();
        let second = Recorder::default();

        sdk.init(first.clone()).await.unwrap();
        sdk.init(second.clone()).await.unwrap();
        sdk.create(Record::new("plan_1")).await.unwrap();

        assert_eq!(first.calls().len(), 1);
        assert_eq!(second.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let (sdk, _) = sdk();
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);

        sdk.init(move |records: &[Record]| {
            *counter.lock() = records.len();
        })
        .await
        .unwrap();
        sdk.create(Record::new("a")).await.unwrap();
        sdk.create(Record::new("b")).await.unwrap();

        assert_eq!(*seen.lock(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_and_skips_notification() {
        let (sdk, medium) = sdk();
        let recorder = Recorder::default();
        sdk.init(recorder.clone()).await.unwrap();

        medium.set_read_only(true);
        let result = sdk.create(Record::new("recipe_1")).await;

        assert!(result.is_err());
        assert_eq!(recorder.calls().len(), 1);
        assert!(sdk.records().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_calls_observe_previous_writes() {
        let (sdk, _) = sdk();
        sdk.create(Record::new("a")).await.unwrap();
        sdk.create(Record::new("b")).await.unwrap();
        assert_eq!(ids(&sdk.records()), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_overlapping_calls_lose_an_update() {
        let (sdk, _) = sdk();
        let (a, b) = tokio::join!(sdk.create(Record::new("a")), sdk.create(Record::new("b")));
        assert!(a.unwrap().is_ok && b.unwrap().is_ok);

        // Both loaded the empty collection before either saved
        assert_eq!(sdk.records().len(), 1);
    }
}
