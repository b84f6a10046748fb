//! Round outcome types.

use alloc::vec::Vec;

use crate::id::{Address, Amount, GameId};

/// Criterion a player won a round on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WinType {
    /// The winning number was among the player's numbers.
    Number,
    /// The player's high/low call matched.
    HighLow,
    /// The player's odd/even call matched.
    OddEven,
}

/// A single payout of a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payout {
    /// The winning player.
    pub player: Address,
    /// What the player won on.
    pub win_type: WinType,
    /// Amount owed at full multiplier.
    pub owed: Amount,
    /// Amount actually credited to the player's stack.
    pub paid: Amount,
}

/// Audit entry recorded for every winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinRecord {
    /// Game the round belongs to.
    pub game: GameId,
    /// Round number (1-based).
    pub round: u32,
    /// The winning player.
    pub winner: Address,
    /// What the player won on.
    pub win_type: WinType,
    /// Amount credited.
    pub amount: Amount,
    /// The winner's stack after the credit.
    pub stack: Amount,
}

/// Result of resolving a round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    /// Game the round belongs to.
    pub game: GameId,
    /// Round number (1-based).
    pub round: u32,
    /// The number the wheel landed on.
    pub winning_number: u8,
    /// Payouts in seat order.
    pub payouts: Vec<Payout>,
    /// Contributions of players who matched nothing.
    pub forfeited: Amount,
    /// Amount moved to the dealer's fee balance.
    pub dealer_fee: Amount,
}

impl RoundResult {
    /// Total credited to winners.
    #[must_use]
    pub fn total_paid(&self) -> Amount {
        self.payouts.iter().map(|p| p.paid).sum()
    }

    /// Whether payouts were scaled down because the pot fell short.
    #[must_use]
    pub fn scaled(&self) -> bool {
        self.payouts.iter().any(|p| p.paid < p.owed)
    }
}
