//! Notifications emitted by state transitions.

use alloc::vec::Vec;

use crate::game::GameStatus;
use crate::id::{Address, Amount, GameId, GameKey};
use crate::result::WinType;
use crate::wheel::{HighLow, OddEven};

/// Something observable that happened in the engine.
///
/// Events accumulate in emission order until drained with
/// [`Roulette::drain_events`](crate::Roulette::drain_events).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A dealer opened a game.
    GameStarted {
        /// The game.
        game: GameId,
        /// The dealer.
        dealer: Address,
        /// Caller-chosen key.
        key: GameKey,
        /// Stake unit.
        ante: Amount,
        /// Creation time.
        timestamp: u64,
    },
    /// A game changed status.
    StatusChanged {
        /// The game.
        game: GameId,
        /// The new status.
        status: GameStatus,
    },
    /// A player took a seat.
    PlayerJoined {
        /// The game.
        game: GameId,
        /// The player.
        player: Address,
        /// Join time.
        timestamp: u64,
    },
    /// A player submitted picks.
    PicksSubmitted {
        /// The game.
        game: GameId,
        /// Round number.
        round: u32,
        /// The player.
        player: Address,
        /// High/low call.
        high_low: HighLow,
        /// Odd/even call.
        odd_even: OddEven,
        /// Numbers kept.
        numbers: Vec<u8>,
        /// Stack left after staking the round.
        stack: Amount,
    },
    /// The dealer spun and a randomness request went out.
    RandomnessRequested {
        /// The game.
        game: GameId,
        /// Round number.
        round: u32,
    },
    /// The oracle answered and the round settled.
    RoundResolved {
        /// The game.
        game: GameId,
        /// Round number.
        round: u32,
        /// Where the wheel landed.
        winning_number: u8,
    },
    /// A player won a round.
    Winner {
        /// The game.
        game: GameId,
        /// Round number.
        round: u32,
        /// The player.
        player: Address,
        /// Winning criterion.
        win_type: WinType,
        /// Amount credited.
        amount: Amount,
    },
    /// Funds left the engine.
    Withdrawal {
        /// Recipient.
        to: Address,
        /// Amount released.
        amount: Amount,
    },
}
