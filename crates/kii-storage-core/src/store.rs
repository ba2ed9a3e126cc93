use crate::address::Address;
use crate::error::StoreError;
use crate::event::{EventSink, NullSink, StoreEvent};
use crate::role::Role;
use crate::whitelist::{Whitelist, WHITELIST_CAPACITY};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub(crate) struct State {
    pub(crate) whitelist: Whitelist,
    pub(crate) kii_private_info: String,
}

/// Single-owner store guarding one private string behind a whitelist.
///
/// The owner is fixed at construction and always occupies the first
/// whitelist slot. Gated operations take the caller's identity explicitly.
/// Whitelist and private info share one lock, so each call is atomic and
/// events reach the sink in commit order.
pub struct PrivateInfoStorage {
    owner: Address,
    state: Mutex<State>,
    sink: Box<dyn EventSink>,
}

impl PrivateInfoStorage {
    /// Deploys a store owned by `owner` with the default capacity.
    ///
    /// The whitelist becomes `[owner, wallets..]`. Fails if that exceeds the
    /// capacity or contains the same address twice.
    pub fn new(
        owner: Address,
        kii_private_info: impl Into<String>,
        wallets: impl IntoIterator<Item = Address>,
    ) -> Result<Self, StoreError> {
        Self::with_capacity(owner, WHITELIST_CAPACITY, kii_private_info, wallets)
    }

    pub fn with_capacity(
        owner: Address,
        capacity: usize,
        kii_private_info: impl Into<String>,
        wallets: impl IntoIterator<Item = Address>,
    ) -> Result<Self, StoreError> {
        let whitelist =
            Whitelist::from_members(capacity, std::iter::once(owner).chain(wallets))?;
        info!(
            owner = %owner,
            members = whitelist.len(),
            capacity,
            "private info storage deployed"
        );
        Ok(Self::from_parts(owner, whitelist, kii_private_info.into()))
    }

    pub(crate) fn from_parts(owner: Address, whitelist: Whitelist, kii_private_info: String) -> Self {
        Self {
            owner,
            state: Mutex::new(State {
                whitelist,
                kii_private_info,
            }),
            sink: Box::new(NullSink),
        }
    }

    /// Routes notifications to `sink` instead of discarding them.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn capacity(&self) -> usize {
        self.lock().whitelist.capacity()
    }

    /// Resolves the caller's access level.
    pub fn authenticate(&self, caller: &Address) -> Result<Role, StoreError> {
        let state = self.lock();
        self.resolve_role(&state, caller)
            .inspect_err(|e| self.denied("authenticate", caller, e))
    }

    /// Whitelisted addresses in insertion order, owner first. Ungated.
    pub fn get_whitelist(&self) -> Vec<Address> {
        self.lock().whitelist.members().to_vec()
    }

    pub fn add_address(&self, caller: &Address, address: Address) -> Result<(), StoreError> {
        let mut state = self.lock();
        self.require_owner(caller)
            .and_then(|()| state.whitelist.insert(address))
            .inspect_err(|e| self.denied("add_address", caller, e))?;
        self.emit(&StoreEvent::AddedAddress { address });
        Ok(())
    }

    pub fn get_kii_private_info(&self, caller: &Address) -> Result<String, StoreError> {
        let state = self.lock();
        let role = self
            .resolve_role(&state, caller)
            .inspect_err(|e| self.denied("get_kii_private_info", caller, e))?;
        debug!(caller = %caller, role = %role, "private info read");
        Ok(state.kii_private_info.clone())
    }

    pub fn set_kii_private_info(
        &self,
        caller: &Address,
        kii_private_info: impl Into<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        self.require_owner(caller)
            .inspect_err(|e| self.denied("set_kii_private_info", caller, e))?;
        let kii_private_info = kii_private_info.into();
        state.kii_private_info.clone_from(&kii_private_info);
        self.emit(&StoreEvent::KiiPrivateInfoUpdated { kii_private_info });
        Ok(())
    }

    fn resolve_role(&self, state: &State, caller: &Address) -> Result<Role, StoreError> {
        if *caller == self.owner {
            Ok(Role::Owner)
        } else if state.whitelist.contains(caller) {
            Ok(Role::User)
        } else {
            Err(StoreError::AddressNotWhitelisted(*caller))
        }
    }

    fn require_owner(&self, caller: &Address) -> Result<(), StoreError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(StoreError::NotOwner(*caller))
        }
    }

    fn emit(&self, event: &StoreEvent) {
        info!(event = event.name(), "store event emitted");
        self.sink.emit(event);
    }

    fn denied(&self, operation: &str, caller: &Address, err: &StoreError) {
        warn!(operation, caller = %caller, code = err.code(), "store call rejected");
    }

    // State is only written after every check passes, so a poisoned lock
    // still guards a consistent value.
    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PrivateInfoStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("PrivateInfoStorage")
            .field("owner", &self.owner)
            .field("whitelist", &state.whitelist)
            .finish_non_exhaustive()
    }
}
