//! Error types for engine operations.

use thiserror::Error;

/// Errors raised by balance bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The account holds less than the requested amount.
    #[error("insufficient balance")]
    InsufficientBalance,
    /// The operation would overflow a balance.
    #[error("balance overflow")]
    Overflow,
    /// The account has nothing to withdraw.
    #[error("nothing to withdraw")]
    NothingToWithdraw,
}

/// Errors that can occur during game lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// No game is registered under this handle.
    #[error("unknown game")]
    UnknownGame,
    /// The dealer already runs a game that has not ended.
    #[error("dealer already has an active game")]
    DuplicateActiveGame,
    /// The ante must be positive.
    #[error("ante is zero")]
    ZeroAnte,
    /// The game is no longer accepting players.
    #[error("game is not joinable")]
    GameNotJoinable,
    /// Every seat is taken.
    #[error("game is full")]
    GameFull,
    /// The caller is already seated in this game.
    #[error("player already joined")]
    AlreadyJoined,
    /// The attached value does not match the required amount.
    #[error("wrong fee amount")]
    WrongFeeAmount,
    /// Only the dealer may perform this operation.
    #[error("caller is not the dealer")]
    NotDealer,
    /// Only the engine owner may perform this operation.
    #[error("caller is not the owner")]
    NotOwner,
    /// Invalid game state for this operation.
    #[error("invalid game state for this operation")]
    InvalidState,
    /// The player already submitted picks for this round.
    #[error("picks already submitted for this round")]
    AlreadySubmitted,
    /// The caller never joined this game.
    #[error("unknown player")]
    UnknownPlayer,
    /// A picked number is outside the wheel.
    #[error("picked number outside 1..=36")]
    InvalidPick,
    /// Some seated player has not submitted picks for the current round.
    #[error("not all picks submitted")]
    NotAllPicksSubmitted,
    /// A balance operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors that can occur when the oracle delivers randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The caller is not the configured coordinator.
    #[error("untrusted oracle")]
    UntrustedOracle,
    /// No request is pending for this round.
    #[error("unknown randomness request")]
    UnknownRequest,
    /// The round already has a winning number.
    #[error("randomness already delivered")]
    DuplicateDelivery,
    /// Settlement failed to balance.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
