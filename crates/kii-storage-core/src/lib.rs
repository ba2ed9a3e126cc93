//! Single-owner storage for one private string.
//!
//! [`PrivateInfoStorage`] resolves every caller to a [`Role`]: the owner,
//! a whitelisted user, or nobody. Only the owner may grow the whitelist or
//! replace the stored value; the owner and whitelisted users may read it.
//! The whitelist is bounded by [`WHITELIST_CAPACITY`] slots, the owner's
//! included, and never holds an address twice.

pub mod address;
pub mod config;
pub mod error;
pub mod event;
pub mod operation;
pub mod role;
pub mod snapshot;
pub mod store;
pub mod whitelist;

pub use address::{Address, AddressParseError};
pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use event::{EventLog, EventRecord, EventSink, NullSink, StoreEvent};
pub use operation::Operation;
pub use role::Role;
pub use snapshot::{SnapshotError, SnapshotLock, StoreSnapshot};
pub use store::PrivateInfoStorage;
pub use whitelist::{Whitelist, WHITELIST_CAPACITY};
