use crate::error::{Result, TestmateError};
use crate::store::{TurnRecord, TurnStore};
use std::cmp::Ordering;
use std::sync::Arc;

/// Reads back a user's persisted turns, newest first.
pub struct HistoryReader {
    store: Arc<dyn TurnStore>,
}

impl HistoryReader {
    pub fn new(store: Arc<dyn TurnStore>) -> Self {
        Self { store }
    }

    pub async fn list_history(&self, identity: &str) -> Result<Vec<TurnRecord>> {
        let mut records = self
            .store
            .query_by_owner(identity)
            .await
            .map_err(|e| match e {
                e @ TestmateError::StorageUnavailable(_) => e,
                other => TestmateError::StorageUnavailable(other.to_string()),
            })?;

        // Stores filter on owner already; a misbehaving one must not leak rows.
        records.retain(|r| r.owner == identity);
        sort_newest_first(&mut records);
        Ok(records)
    }

    pub async fn list_recent(&self, identity: &str, limit: usize) -> Result<Vec<TurnRecord>> {
        let mut records = self.list_history(identity).await?;
        records.truncate(limit);
        Ok(records)
    }
}

/// Stable sort by timestamp, descending. Ties keep storage order.
/// Unparsable timestamps go last, ordered among themselves as strings.
pub fn sort_newest_first(records: &mut [TurnRecord]) {
    records.sort_by(|a, b| match (a.parsed_timestamp(), b.parsed_timestamp()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.timestamp.cmp(&a.timestamp),
    });
}
