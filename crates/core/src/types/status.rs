//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed order.
///
/// Mirrors the `status` field of the CMS `order` document. Orders are
/// created as [`OrderStatus::Pending`]; later transitions happen in the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received, not yet confirmed.
    #[default]
    Pending,
    /// Confirmed by the store.
    Success,
    /// Handed to the carrier.
    Dispatch,
}

impl OrderStatus {
    /// The value stored in the CMS document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Dispatch => "dispatch",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Studio-entered values have been seen with trailing whitespace
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "dispatch" => Ok(Self::Dispatch),
            other => Err(format!("invalid order status: {other}")),
        }
    }
}
