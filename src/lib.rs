//! A multiplayer roulette engine with escrowed stakes and optional `no_std`
//! support.
//!
//! The crate provides a [`Roulette`] type hosting any number of games. A
//! dealer opens a game with an ante, players join by paying a fee that
//! becomes their stack, and each round every player stakes one ante on a
//! high/low call, an odd/even call and a handful of numbers. The wheel's
//! result comes from an asynchronous [`RandomnessOracle`]; when it is
//! delivered the round is settled against the game's reserve.
//!
//! # Example
//!
//! ```
//! use roulette_engine::{
//!     Address, Call, ChaChaOracle, HighLow, OddEven, Roulette, RouletteOptions,
//! };
//!
//! let coordinator = Address::from_low_u64(2);
//! let engine = Roulette::new(
//!     RouletteOptions::default(),
//!     Address::from_low_u64(1),
//!     coordinator,
//!     ChaChaOracle::new(42),
//! );
//!
//! let dealer = Address::from_low_u64(10);
//! let player = Address::from_low_u64(11);
//! let game = engine
//!     .create_game(Call::new(dealer).with_value(100), "table", 100, false)
//!     .unwrap()
//!     .id;
//! engine.join(Call::new(player).with_value(1_000), game).unwrap();
//! engine.set_in_progress(Call::new(dealer), game).unwrap();
//! engine
//!     .submit_picks(Call::new(player), game, 1, HighLow::Low, OddEven::Odd, &[7])
//!     .unwrap();
//! engine.spin_wheel(Call::new(dealer), game).unwrap();
//!
//! let (key, value) = engine.oracle().fulfill_next().unwrap();
//! let result = engine
//!     .deliver_randomness(Call::new(coordinator), key, value)
//!     .unwrap();
//! assert_eq!(engine.winning_number(game, 1).unwrap(), result.winning_number);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod error;
pub mod event;
pub mod game;
pub mod id;
pub mod ledger;
pub mod options;
pub mod oracle;
pub mod picks;
pub mod result;
mod sync;
pub mod wheel;

// Re-export main types
pub use error::{DeliveryError, GameError, LedgerError};
pub use event::Event;
pub use game::settlement::{Settlement, multiplier, settle};
pub use game::{GameHandle, GameInfo, GameStatus, PlayerInfo, Roulette, RoundPhase};
pub use id::{Address, Amount, Call, GameId, GameKey};
pub use ledger::{Account, Ledger};
pub use options::RouletteOptions;
pub use oracle::{ChaChaOracle, RandomnessOracle, RoundKey, WORDS_PER_REQUEST};
pub use picks::Picks;
pub use result::{Payout, RoundResult, WinRecord, WinType};
pub use wheel::{HighLow, MAX_NUMBER, MIN_NUMBER, OddEven, UNRESOLVED};
