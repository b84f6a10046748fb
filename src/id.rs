//! Identifiers and the inbound call context.

use alloc::string::String;
use core::fmt;

/// Smallest-denomination monetary amount.
pub type Amount = u128;

/// An opaque 20-byte account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; 20]);

    /// Builds an address whose low eight bytes hold `value` (big-endian).
    #[must_use]
    pub const fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        let low = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = low[i];
            i += 1;
        }
        Self(bytes)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::from_low_u64(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Caller-chosen name of a game, unique per dealer while the game is live.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameKey(pub String);

impl From<&str> for GameKey {
    fn from(key: &str) -> Self {
        Self(String::from(key))
    }
}

impl From<String> for GameKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Engine-assigned handle of a game. Handles grow in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Context of an inbound operation: who calls, what value is attached, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    /// Caller identity.
    pub sender: Address,
    /// Value attached to the call.
    pub value: Amount,
    /// Time of the call in seconds.
    pub timestamp: u64,
}

impl Call {
    /// Creates a call from `sender` with no attached value at time zero.
    #[must_use]
    pub const fn new(sender: Address) -> Self {
        Self {
            sender,
            value: 0,
            timestamp: 0,
        }
    }

    /// Attaches `value` to the call.
    #[must_use]
    pub const fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    /// Sets the call time.
    #[must_use]
    pub const fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
