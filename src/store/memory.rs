/*!
 * Volatile in-memory store
 *
 * Keeps the current key and its history in process memory. Nothing
 * survives a restart; intended for tests and ephemeral deployments.
 */

use std::sync::Mutex;

use crate::error::{KeyError, KeyResult};
use crate::record::KeyRecord;
use crate::store::KeyStore;

/// Key store backed by process memory
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    current: Option<KeyRecord>,
    // demoted keys, oldest first
    history: Vec<KeyRecord>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for InMemoryStore {
    fn save(&self, record: &KeyRecord) -> KeyResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(previous) = state.current.replace(record.clone()) {
            state.history.push(previous);
        }
        Ok(())
    }

    fn current(&self) -> KeyResult<KeyRecord> {
        let state = self.state.lock().unwrap();
        state
            .current
            .clone()
            .ok_or_else(|| KeyError::not_found("current key in memory store"))
    }

    fn recent(&self, quantity: usize) -> KeyResult<Vec<KeyRecord>> {
        let state = self.state.lock().unwrap();

        // Current first, then history youngest first; the stable sort
        // keeps that order within equal creation dates
        let mut records: Vec<KeyRecord> = state
            .current
            .iter()
            .chain(state.history.iter().rev())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        records.truncate(quantity);
        Ok(records)
    }

    fn clear(&self) -> KeyResult<()> {
        let mut state = self.state.lock().unwrap();
        let removed = state.history.len() + usize::from(state.current.is_some());
        *state = StoreState::default();
        log::info!("Cleared {} key records from memory store", removed);
        Ok(())
    }
}
