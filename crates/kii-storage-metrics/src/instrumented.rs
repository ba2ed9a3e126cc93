use crate::StoreMetrics;
use kii_storage_core::{Address, Operation, PrivateInfoStorage, Role, StoreError};

/// Borrows a store and records every call on `metrics`.
pub struct InstrumentedStore<'a> {
    store: &'a PrivateInfoStorage,
    metrics: &'a StoreMetrics,
}

impl<'a> InstrumentedStore<'a> {
    pub fn new(store: &'a PrivateInfoStorage, metrics: &'a StoreMetrics) -> Self {
        metrics.observe_whitelist(store);
        Self { store, metrics }
    }

    pub fn authenticate(&self, caller: &Address) -> Result<Role, StoreError> {
        let result = self.store.authenticate(caller);
        self.metrics.observe(Operation::Authenticate, &result);
        result
    }

    pub fn get_whitelist(&self) -> Vec<Address> {
        let whitelist = self.store.get_whitelist();
        self.metrics.observe::<()>(Operation::GetWhitelist, &Ok(()));
        whitelist
    }

    pub fn add_address(&self, caller: &Address, address: Address) -> Result<(), StoreError> {
        let result = self.store.add_address(caller, address);
        self.metrics.observe(Operation::AddAddress, &result);
        if result.is_ok() {
            self.metrics.observe_whitelist(self.store);
        }
        result
    }

    pub fn get_kii_private_info(&self, caller: &Address) -> Result<String, StoreError> {
        let result = self.store.get_kii_private_info(caller);
        self.metrics.observe(Operation::GetKiiPrivateInfo, &result);
        result
    }

    pub fn set_kii_private_info(
        &self,
        caller: &Address,
        kii_private_info: impl Into<String>,
    ) -> Result<(), StoreError> {
        let result = self.store.set_kii_private_info(caller, kii_private_info);
        self.metrics.observe(Operation::SetKiiPrivateInfo, &result);
        result
    }
}
