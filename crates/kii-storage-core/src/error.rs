use crate::address::Address;
use thiserror::Error;

/// Precondition violations reported by the store.
///
/// Every variant is raised before any state change, so a failed call never
/// leaves a partial update or an emitted event behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("caller {0} is not the owner")]
    NotOwner(Address),
    #[error("address {0} is not whitelisted")]
    AddressNotWhitelisted(Address),
    #[error("whitelist capacity reached: max addresses={0}")]
    WhitelistCapacityReached(usize),
    #[error("address {0} is already whitelisted")]
    AddressAlreadyWhitelisted(Address),
}

impl StoreError {
    /// Stable identifier for the failure, independent of its payload.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotOwner(_) => "NotOwner",
            StoreError::AddressNotWhitelisted(_) => "AddressNotWhitelisted",
            StoreError::WhitelistCapacityReached(_) => "WhitelistCapacityReached",
            StoreError::AddressAlreadyWhitelisted(_) => "AddressAlreadyWhitelisted",
        }
    }
}
