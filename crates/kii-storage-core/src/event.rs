use crate::address::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Notifications emitted after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    AddedAddress { address: Address },
    KiiPrivateInfoUpdated { kii_private_info: String },
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::AddedAddress { .. } => "AddedAddress",
            StoreEvent::KiiPrivateInfoUpdated { .. } => "KiiPrivateInfoUpdated",
        }
    }
}

/// Receiver for store notifications.
///
/// The store calls `emit` while it still holds its state lock, so events
/// arrive in commit order. Implementations must not call back into the store.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &StoreEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &StoreEvent) {}
}

/// One entry of an [`EventLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub event: StoreEvent,
}

/// Append-only in-memory event recorder. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.lock().iter().map(|r| r.event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EventRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: &StoreEvent) {
        let mut records = self.lock();
        let sequence = records.len() as u64;
        records.push(EventRecord {
            id: Uuid::new_v4(),
            sequence,
            emitted_at: Utc::now(),
            event: event.clone(),
        });
    }
}
