use crate::address::Address;
use crate::error::StoreError;

/// Total whitelist slots, the owner's included.
pub const WHITELIST_CAPACITY: usize = 10;

/// Insertion-ordered, duplicate-free, capacity-bounded set of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    capacity: usize,
    members: Vec<Address>,
}

impl Whitelist {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity.min(WHITELIST_CAPACITY)),
        }
    }

    /// Builds a whitelist from `members` in order, applying the same checks
    /// as [`Whitelist::insert`] to every entry.
    pub fn from_members<I>(capacity: usize, members: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut whitelist = Self::with_capacity(capacity);
        for address in members {
            whitelist.insert(address)?;
        }
        Ok(whitelist)
    }

    /// Validates an insertion without performing it.
    pub fn check_insert(&self, address: &Address) -> Result<(), StoreError> {
        if self.is_full() {
            return Err(StoreError::WhitelistCapacityReached(self.capacity));
        }
        if self.contains(address) {
            return Err(StoreError::AddressAlreadyWhitelisted(*address));
        }
        Ok(())
    }

    pub fn insert(&mut self, address: Address) -> Result<(), StoreError> {
        self.check_insert(&address)?;
        self.members.push(address);
        Ok(())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }
}
