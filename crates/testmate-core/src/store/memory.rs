use super::{TurnRecord, TurnStore};
use crate::error::TestmateError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process store. Records keep insertion order.
#[derive(Default)]
pub struct MemoryTurnStore {
    records: RwLock<Vec<TurnRecord>>,
    unavailable: AtomicBool,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TurnRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate an outage: every subsequent call fails until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<TurnRecord> {
        self.records.read().await.clone()
    }

    fn check_available(&self) -> Result<(), TestmateError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TestmateError::StorageUnavailable(
                "in-memory store is offline".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TurnStore for MemoryTurnStore {
    async fn put(&self, record: &TurnRecord) -> Result<(), TestmateError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn query_by_owner(&self, owner: &str) -> Result<Vec<TurnRecord>, TestmateError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.owner == owner).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    #[tokio::test]
    async fn test_put_then_query_filters_owner() {
        let store = MemoryTurnStore::new();
        store
            .put(&TurnRecord::new("alice", "use-case-1", "q1", Message::assistant("a1")))
            .await
            .unwrap();
        store
            .put(&TurnRecord::new("bob", "use-case-1", "q2", Message::assistant("a2")))
            .await
            .unwrap();

        let alice = store.query_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].question, "q1");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_put_same_id_overwrites() {
        let store = MemoryTurnStore::new();
        let mut record = TurnRecord::new("alice", "use-case-1", "q", Message::assistant("a"));
        store.put(&record).await.unwrap();
        record.question = "q-again".into();
        store.put(&record).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.all().await[0].question, "q-again");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryTurnStore::new();
        store.set_unavailable(true);
        let err = store.query_by_owner("alice").await.unwrap_err();
        assert!(matches!(err, TestmateError::StorageUnavailable(_)));

        store.set_unavailable(false);
        assert!(store.query_by_owner("alice").await.unwrap().is_empty());
    }
}
