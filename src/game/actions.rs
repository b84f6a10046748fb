use alloc::vec::Vec;

use crate::error::{GameError, LedgerError};
use crate::event::Event;
use crate::id::{Call, GameId};
use crate::ledger::Account;
use crate::picks::Picks;
use crate::wheel::{HighLow, OddEven};

use super::{GameStatus, Player, RoundPhase, Roulette};

impl<O> Roulette<O> {
    /// Seats the caller in a game.
    ///
    /// The attached value must equal the player fee (`ante` times the fee
    /// multiplier) and becomes the player's stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown, the fee is wrong, the game is
    /// no longer waiting for players, every seat is taken, or the caller is
    /// already seated.
    pub fn join(&self, call: Call, id: GameId) -> Result<(), GameError> {
        let player = call.sender;

        self.table.with(|t| {
            let game = t.registry.get(id)?;
            let fee = self
                .options
                .player_fee(game.ante)
                .ok_or(LedgerError::Overflow)?;
            if call.value != fee {
                return Err(GameError::WrongFeeAmount);
            }
            if game.status != GameStatus::WaitingForPlayers {
                return Err(GameError::GameNotJoinable);
            }
            if game.players.len() >= self.options.max_players {
                return Err(GameError::GameFull);
            }
            if game.is_seated(player) {
                return Err(GameError::AlreadyJoined);
            }

            t.ledger.credit(game.stack_account(player), fee)?;

            let game = t.registry.get_mut(id)?;
            game.players.push(Player {
                address: player,
                joined_at: call.timestamp,
            });
            game.escrowed += fee;
            let seats = game.players.len();

            t.emit(Event::PlayerJoined {
                game: id,
                player,
                timestamp: call.timestamp,
            });
            t.verify_pot(id);

            tracing::debug!(game = %id, player = %player, fee, seats, "player joined");
            Ok(())
        })
    }

    /// Starts play. Only the dealer may call this, once at least one player
    /// is seated. Round 1 opens.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown, the caller is not the dealer,
    /// or the game is not waiting for players or has nobody seated.
    pub fn set_in_progress(&self, call: Call, id: GameId) -> Result<(), GameError> {
        self.table.with(|t| {
            let game = t.registry.get_mut(id)?;
            game.ensure_dealer(call.sender)?;
            if game.status != GameStatus::WaitingForPlayers || game.players.is_empty() {
                return Err(GameError::InvalidState);
            }

            game.status = GameStatus::InProgress;
            game.phase = RoundPhase::Open;
            game.current_round = 1;
            let players = game.players.len();

            t.emit(Event::StatusChanged {
                game: id,
                status: GameStatus::InProgress,
            });
            tracing::info!(game = %id, players, "game in progress");
            Ok(())
        })
    }

    /// Submits the caller's picks for `round`, staking one ante from their
    /// stack.
    ///
    /// Numbers past the configured maximum are dropped rather than rejected.
    /// Returns the picks as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown or not in progress, `round` is
    /// not the current round, the caller is not seated or already submitted
    /// for this round, a number is off the wheel, or the stack cannot cover
    /// the ante.
    pub fn submit_picks(
        &self,
        call: Call,
        id: GameId,
        round: u32,
        high_low: HighLow,
        odd_even: OddEven,
        numbers: &[u8],
    ) -> Result<Picks, GameError> {
        let player = call.sender;

        self.table.with(|t| {
            let game = t.registry.get(id)?;
            if game.status != GameStatus::InProgress || round != game.current_round {
                return Err(GameError::InvalidState);
            }
            if !game.is_seated(player) {
                return Err(GameError::UnknownPlayer);
            }
            if game.has_submitted(round, player) {
                return Err(GameError::AlreadySubmitted);
            }
            let picks = Picks::new(high_low, odd_even, numbers, self.options.max_numbers)?;

            let stack = game.stack_account(player);
            t.ledger.transfer(stack, Account::Pot(id), game.ante)?;
            let remaining = t.ledger.balance(&stack);

            let game = t.registry.get_mut(id)?;
            game.picks.insert((round, player), picks.clone());

            t.emit(Event::PicksSubmitted {
                game: id,
                round,
                player,
                high_low,
                odd_even,
                numbers: picks.numbers().to_vec(),
                stack: remaining,
            });
            t.verify_pot(id);

            tracing::debug!(
                game = %id,
                round,
                player = %player,
                ?high_low,
                ?odd_even,
                numbers = picks.numbers().len(),
                stack = remaining,
                "picks submitted"
            );
            Ok(picks)
        })
    }

    /// Ends a game. Only the dealer may call this.
    ///
    /// Contributions to a round the oracle has not resolved go back to their
    /// players and the pending request is dropped. What is left in the
    /// reserve moves to the dealer's fee balance, so afterwards the pot holds
    /// exactly the players' stacks, all withdrawable.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown, the caller is not the dealer,
    /// or the game already ended or was cancelled.
    pub fn end_game(&self, call: Call, id: GameId) -> Result<(), GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            game.ensure_dealer(call.sender)?;
            if game.status.is_terminal() {
                return Err(GameError::InvalidState);
            }

            let round = game.current_round;
            let unresolved = game.status == GameStatus::InProgress
                && !game.winning_numbers.contains_key(&round);
            let refunds: Vec<Account> = if unresolved {
                game.players
                    .iter()
                    .filter(|p| game.has_submitted(round, p.address))
                    .map(|p| game.stack_account(p.address))
                    .collect()
            } else {
                Vec::new()
            };
            let ante = game.ante;
            let dealer = game.dealer;

            let residual = t.ledger.atomic(|ledger| {
                for &stack in &refunds {
                    ledger.transfer(Account::Pot(id), stack, ante)?;
                }
                let residual = ledger.balance(&Account::Pot(id));
                ledger.transfer(Account::Pot(id), Account::DealerFees(dealer), residual)?;
                Ok::<_, LedgerError>(residual)
            })?;

            let game = t.registry.get_mut(id)?;
            game.skimmed += residual;
            game.status = GameStatus::Ended;
            game.phase = RoundPhase::Open;
            t.registry.retire(dealer);
            t.pending.retain(|key| key.game != id);

            t.emit(Event::StatusChanged {
                game: id,
                status: GameStatus::Ended,
            });
            t.verify_pot(id);

            tracing::info!(
                game = %id,
                round,
                refunded = refunds.len(),
                residual,
                "game ended"
            );
            Ok(())
        })
    }
}
