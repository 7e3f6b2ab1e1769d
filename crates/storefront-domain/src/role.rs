//! Staff role domain type.

use serde::{Deserialize, Serialize};

/// Permission level carried in the gateway's role header.
///
/// Wire format: `u8` (0 = Customer, 1 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Customer = 0,
    Admin = 1,
}

impl StaffRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Customer),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
