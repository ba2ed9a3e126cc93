use serde::{Deserialize, Serialize};
use std::fmt;

/// The operations a store exposes, used for labelling metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Authenticate,
    GetWhitelist,
    AddAddress,
    GetKiiPrivateInfo,
    SetKiiPrivateInfo,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Authenticate,
        Operation::GetWhitelist,
        Operation::AddAddress,
        Operation::GetKiiPrivateInfo,
        Operation::SetKiiPrivateInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Authenticate => "authenticate",
            Operation::GetWhitelist => "get_whitelist",
            Operation::AddAddress => "add_address",
            Operation::GetKiiPrivateInfo => "get_kii_private_info",
            Operation::SetKiiPrivateInfo => "set_kii_private_info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
