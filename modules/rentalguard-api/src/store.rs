use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use rentalguard_common::{CheckRecord, NewCheck, RentalGuardError};

/// Persistence for submitted checks. The binary wires the in-memory store;
/// a database-backed implementation slots in behind the same trait.
#[async_trait]
pub trait CheckStore: Send + Sync {
    async fn insert(&self, check: NewCheck) -> Result<CheckRecord, RentalGuardError>;
}

/// Rows kept by the in-memory store before the oldest are evicted.
const MAX_ROWS: usize = 10_000;

pub struct MemoryCheckStore {
    rows: RwLock<VecDeque<CheckRecord>>,
    max_rows: usize,
}

impl Default for MemoryCheckStore {
    fn default() -> Self {
        Self::with_max_rows(MAX_ROWS)
    }
}

impl MemoryCheckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            rows: RwLock::new(VecDeque::new()),
            max_rows: max_rows.max(1),
        }
    }

    #[cfg(test)]
    pub async fn rows(&self) -> Vec<CheckRecord> {
        self.rows.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl CheckStore for MemoryCheckStore {
    async fn insert(&self, check: NewCheck) -> Result<CheckRecord, RentalGuardError> {
        let record = CheckRecord::from_new(check);
        let mut rows = self.rows.write().await;
        // Oldest-first eviction when we hit the limit
        while rows.len() >= self.max_rows {
            rows.pop_front();
        }
        rows.push_back(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentalguard_common::Verdict;

    fn check(score: f64) -> NewCheck {
        NewCheck {
            score,
            red_flags: Vec::new(),
            top_signals: Vec::new(),
            advice: Vec::new(),
            recommendation: String::new(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_risk_level() {
        let store = MemoryCheckStore::new();
        let first = store.insert(check(15.0)).await.unwrap();
        let second = store.insert(check(45.0)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.risk_level, Verdict::NoScam);
        assert_eq!(second.risk_level, Verdict::Uncertain);
        assert_eq!(store.rows().await, vec![first, second]);
    }

    #[tokio::test]
    async fn insert_past_capacity_evicts_oldest() {
        let store = MemoryCheckStore::with_max_rows(3);
        let mut ids = Vec::new();
        for score in [10.0, 30.0, 50.0, 70.0, 90.0] {
            ids.push(store.insert(check(score)).await.unwrap().id);
        }

        let rows = store.rows().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            ids[2..].to_vec()
        );
    }
}
