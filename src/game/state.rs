//! Game status and read-only snapshots.

use core::fmt;

use crate::id::{Address, Amount, GameId, GameKey};

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Accepting players.
    WaitingForPlayers,
    /// Rounds are being played.
    InProgress,
    /// The dealer closed the game; stacks are withdrawable.
    Ended,
    /// The dealer withdrew the game before anyone else joined.
    Cancelled,
}

impl GameStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WaitingForPlayers => "Waiting for players",
            Self::InProgress => "In progress",
            Self::Ended => "Ended",
            Self::Cancelled => "Cancelled",
        })
    }
}

/// Sub-state of the current round of an in-progress game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundPhase {
    /// Players are submitting picks.
    #[default]
    Open,
    /// The wheel was spun; waiting on the oracle.
    Resolving,
}

/// Handle returned by game creation and listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameHandle {
    /// Engine-assigned id.
    pub id: GameId,
    /// The dealer.
    pub dealer: Address,
    /// Caller-chosen key.
    pub key: GameKey,
}

/// Summary of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameInfo {
    /// Engine-assigned id.
    pub id: GameId,
    /// The dealer.
    pub dealer: Address,
    /// Caller-chosen key.
    pub key: GameKey,
    /// Stake unit.
    pub ante: Amount,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Round sub-state.
    pub phase: RoundPhase,
    /// Value escrowed for the game: stacks plus reserve.
    pub pot_amount: Amount,
    /// Seated players.
    pub player_count: usize,
    /// Current round; 0 until the game is in progress.
    pub current_round: u32,
    /// Creation time.
    pub start_time: u64,
}

/// A seated player and their stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInfo {
    /// The player.
    pub address: Address,
    /// Escrowed balance.
    pub stack: Amount,
    /// Join time.
    pub joined_at: u64,
}
