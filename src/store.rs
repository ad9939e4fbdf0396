use dashmap::DashMap;
use thiserror::Error;

use crate::heat::HeatRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    // raised by shared backends; the in-process store cannot fail
    #[allow(dead_code)]
    #[error("Heat store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for heat records.
///
/// `update` is the only read-modify-write entry point and must run `apply`
/// with exclusive access to that one key. Different keys must not block
/// each other beyond what the backing store needs.
pub trait HeatStore: Send + Sync {
    fn get(&self, client_id: &str) -> Result<Option<HeatRecord>, StoreError>;

    // seeding and migration hook, the tracker itself only goes through `update`
    #[allow(dead_code)]
    fn set(&self, client_id: &str, record: HeatRecord) -> Result<(), StoreError>;

    // Atomic update-by-key, creating from `init` when absent
    fn update(
        &self,
        client_id: &str,
        init: HeatRecord,
        apply: &mut dyn FnMut(&mut HeatRecord),
    ) -> Result<HeatRecord, StoreError>;

    // Keep records matching `keep`, returns how many were dropped
    fn retain(&self, keep: &dyn Fn(&str, &HeatRecord) -> bool) -> Result<usize, StoreError>;

    fn len(&self) -> usize;
}

// In-process store - client id -> HeatRecord
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, HeatRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeatStore for MemoryStore {
    fn get(&self, client_id: &str) -> Result<Option<HeatRecord>, StoreError> {
        Ok(self.records.get(client_id).map(|entry| entry.value().clone()))
    }

    fn set(&self, client_id: &str, record: HeatRecord) -> Result<(), StoreError> {
        self.records.insert(client_id.to_string(), record);
        Ok(())
    }

    fn update(
        &self,
        client_id: &str,
        init: HeatRecord,
        apply: &mut dyn FnMut(&mut HeatRecord),
    ) -> Result<HeatRecord, StoreError> {
        // shard write guard is held until `entry` drops
        let mut entry = self
            .records
            .entry(client_id.to_string())
            .or_insert(init);
        apply(entry.value_mut());
        Ok(entry.value().clone())
    }

    fn retain(&self, keep: &dyn Fn(&str, &HeatRecord) -> bool) -> Result<usize, StoreError> {
        let before = self.records.len();
        self.records.retain(|key, record| keep(key, record));
        Ok(before.saturating_sub(self.records.len()))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
