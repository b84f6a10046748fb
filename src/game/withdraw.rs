use crate::error::GameError;
use crate::event::Event;
use crate::id::{Amount, Call, GameId};
use crate::ledger::Account;

use super::Roulette;

impl<O> Roulette<O> {
    /// Pays out the caller's whole stack in a finished game.
    ///
    /// Stacks of games that were cleared from the registry stay withdrawable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if the game is still running, or
    /// a ledger error if the stack is empty.
    pub fn withdraw_stack(&self, call: Call, id: GameId) -> Result<Amount, GameError> {
        let player = call.sender;

        self.table.with(|t| {
            if let Ok(game) = t.registry.get(id) {
                if !game.status.is_terminal() {
                    return Err(GameError::InvalidState);
                }
            }

            let amount = t.ledger.withdraw(Account::Stack { game: id, player })?;
            if let Ok(game) = t.registry.get_mut(id) {
                game.released += amount;
            }

            t.emit(Event::Withdrawal { to: player, amount });
            if t.registry.contains(id) {
                t.verify_pot(id);
            }

            tracing::info!(game = %id, player = %player, amount, "stack withdrawn");
            Ok(amount)
        })
    }

    /// Pays out the fees the calling dealer has accrued.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if there is nothing to withdraw.
    pub fn withdraw_dealer_fees(&self, call: Call) -> Result<Amount, GameError> {
        let dealer = call.sender;

        self.table.with(|t| {
            let amount = t.ledger.withdraw(Account::DealerFees(dealer))?;
            t.emit(Event::Withdrawal { to: dealer, amount });
            tracing::info!(dealer = %dealer, amount, "dealer fees withdrawn");
            Ok(amount)
        })
    }

    /// Sweeps the whole pool to the owner. Every registered game must have
    /// ended or been cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotOwner`] if the caller is not the owner,
    /// [`GameError::InvalidState`] while a game is still live, or a ledger
    /// error if the pool is empty.
    pub fn withdraw_all(&self, call: Call) -> Result<Amount, GameError> {
        if call.sender != self.owner {
            tracing::warn!(caller = %call.sender, "withdraw_all by non-owner");
            return Err(GameError::NotOwner);
        }

        self.table.with(|t| {
            if t.registry.has_live_games() {
                return Err(GameError::InvalidState);
            }

            let amount = t.ledger.withdraw_all()?;
            for game in t.registry.iter_mut() {
                game.released = game.escrowed - game.skimmed;
            }

            t.emit(Event::Withdrawal {
                to: self.owner,
                amount,
            });
            tracing::info!(owner = %self.owner, amount, "pool withdrawn");
            Ok(amount)
        })
    }
}
