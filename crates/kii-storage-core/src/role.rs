use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level resolved for a caller.
///
/// Callers that are neither the owner nor whitelisted have no role; role
/// resolution fails with `StoreError::AddressNotWhitelisted` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    User,
}

impl Role {
    /// Numeric access level: `0` for the owner, `1` for whitelisted users.
    pub fn code(self) -> u8 {
        match self {
            Role::Owner => 0,
            Role::User => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => f.write_str("owner"),
            Role::User => f.write_str("user"),
        }
    }
}
