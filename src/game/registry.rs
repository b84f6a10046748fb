use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::{GameError, LedgerError};
use crate::event::Event;
use crate::id::{Address, Amount, Call, GameId, GameKey};
use crate::ledger::Account;

use super::{GameHandle, GameRecord, GameStatus, Player, Roulette};

/// Games indexed by id, in creation order.
#[derive(Debug, Default)]
pub(super) struct Registry {
    games: BTreeMap<GameId, GameRecord>,
    /// The one non-terminal game of each dealer.
    live: BTreeMap<Address, GameId>,
    next_id: u64,
}

impl Registry {
    pub(super) fn get(&self, id: GameId) -> Result<&GameRecord, GameError> {
        self.games.get(&id).ok_or(GameError::UnknownGame)
    }

    pub(super) fn get_mut(&mut self, id: GameId) -> Result<&mut GameRecord, GameError> {
        self.games.get_mut(&id).ok_or(GameError::UnknownGame)
    }

    pub(super) fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    pub(super) fn iter(&self) -> impl DoubleEndedIterator<Item = &GameRecord> {
        self.games.values()
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameRecord> {
        self.games.values_mut()
    }

    pub(super) fn live_game(&self, dealer: Address) -> Option<GameId> {
        self.live.get(&dealer).copied()
    }

    pub(super) fn has_live_games(&self) -> bool {
        !self.live.is_empty()
    }

    const fn next_id(&self) -> GameId {
        GameId(self.next_id)
    }

    pub(super) fn insert(&mut self, game: GameRecord) {
        self.next_id += 1;
        self.live.insert(game.dealer, game.id);
        self.games.insert(game.id, game);
    }

    /// Drops the dealer's live entry once their game reaches a terminal status.
    pub(super) fn retire(&mut self, dealer: Address) {
        self.live.remove(&dealer);
    }

    /// Removes every terminal game and returns their ids.
    fn clear_terminal(&mut self) -> Vec<GameId> {
        let cleared: Vec<GameId> = self
            .games
            .values()
            .filter(|g| g.status.is_terminal())
            .map(|g| g.id)
            .collect();
        for id in &cleared {
            self.games.remove(id);
        }
        cleared
    }
}

impl<O> Roulette<O> {
    /// Opens a new game for the calling dealer.
    ///
    /// The attached value must equal [`Roulette::opening_stake`]. The ante is
    /// escrowed into the game's reserve; with `dealer_auto_joins` the dealer
    /// is also seated as the first player with the player fee as their stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the ante is zero, the dealer already runs a game
    /// that has not ended or been cancelled, or the attached value is wrong.
    pub fn create_game(
        &self,
        call: Call,
        key: impl Into<GameKey>,
        ante: Amount,
        dealer_auto_joins: bool,
    ) -> Result<GameHandle, GameError> {
        let key = key.into();
        let dealer = call.sender;

        self.table.with(|t| {
            if t.registry.live_game(dealer).is_some() {
                return Err(GameError::DuplicateActiveGame);
            }
            if ante == 0 {
                return Err(GameError::ZeroAnte);
            }
            let fee = self.options.player_fee(ante).ok_or(LedgerError::Overflow)?;
            let stake = self
                .options
                .opening_stake(ante, dealer_auto_joins)
                .ok_or(LedgerError::Overflow)?;
            if call.value != stake {
                return Err(GameError::WrongFeeAmount);
            }
            if dealer_auto_joins && self.options.max_players == 0 {
                return Err(GameError::GameFull);
            }

            let id = t.registry.next_id();
            t.ledger.atomic(|ledger| {
                ledger.credit(Account::Pot(id), ante)?;
                if dealer_auto_joins {
                    ledger.credit(Account::Stack { game: id, player: dealer }, fee)?;
                }
                Ok::<_, LedgerError>(())
            })?;

            let mut game = GameRecord::open(id, dealer, key.clone(), ante, call.timestamp);
            game.escrowed = stake;
            if dealer_auto_joins {
                game.players.push(Player {
                    address: dealer,
                    joined_at: call.timestamp,
                });
            }
            let handle = game.handle();
            t.registry.insert(game);

            t.emit(Event::GameStarted {
                game: id,
                dealer,
                key,
                ante,
                timestamp: call.timestamp,
            });
            t.emit(Event::StatusChanged {
                game: id,
                status: GameStatus::WaitingForPlayers,
            });
            if dealer_auto_joins {
                t.emit(Event::PlayerJoined {
                    game: id,
                    player: dealer,
                    timestamp: call.timestamp,
                });
            }
            t.verify_pot(id);

            tracing::info!(
                game = %id,
                dealer = %dealer,
                key = %handle.key,
                ante,
                dealer_auto_joins,
                "game created"
            );
            Ok(handle)
        })
    }

    /// Lists registered games in creation order.
    ///
    /// With `active_only` the list leaves out ended and cancelled games. The
    /// result is a snapshot; call again to observe later changes.
    pub fn games(&self, active_only: bool) -> Vec<GameHandle> {
        self.table.with(|t| {
            t.registry
                .iter()
                .filter(|g| !active_only || !g.status.is_terminal())
                .map(GameRecord::handle)
                .collect()
        })
    }

    /// Removes every ended or cancelled game from the registry. Only the
    /// engine owner may call this.
    ///
    /// Balances are untouched: stacks of cleared games stay withdrawable.
    /// Winner records of cleared games are dropped. Returns how many games
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotOwner`] if the caller is not the owner.
    pub fn clear_terminal_games(&self, call: Call) -> Result<usize, GameError> {
        if call.sender != self.owner {
            tracing::warn!(caller = %call.sender, "clear_terminal_games by non-owner");
            return Err(GameError::NotOwner);
        }

        self.table.with(|t| {
            let cleared = t.registry.clear_terminal();
            t.winners.retain(|w| !cleared.contains(&w.game));
            tracing::info!(count = cleared.len(), "terminal games cleared");
            Ok(cleared.len())
        })
    }

    /// Cancels a game nobody but the dealer has joined.
    ///
    /// Refunds the ante, plus the dealer's stack if they were seated, and
    /// returns the amount to release to the dealer.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown, the caller is not the dealer,
    /// the game is past `WaitingForPlayers`, or another player has joined.
    pub fn cancel_game(&self, call: Call, id: GameId) -> Result<Amount, GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            game.ensure_dealer(call.sender)?;
            if game.status != GameStatus::WaitingForPlayers {
                return Err(GameError::InvalidState);
            }
            if game.players.iter().any(|p| p.address != game.dealer) {
                return Err(GameError::InvalidState);
            }

            let dealer = game.dealer;
            let stack = game.stack_account(dealer);
            let ante = t.ledger.balance(&Account::Pot(id));
            let seated = t.ledger.balance(&stack);
            let refund = ante.checked_add(seated).ok_or(LedgerError::Overflow)?;
            t.ledger.atomic(|ledger| {
                ledger.debit(Account::Pot(id), ante)?;
                ledger.debit(stack, seated)
            })?;

            let game = t.registry.get_mut(id)?;
            game.released += refund;
            game.status = GameStatus::Cancelled;
            t.registry.retire(dealer);

            t.emit(Event::StatusChanged {
                game: id,
                status: GameStatus::Cancelled,
            });
            t.emit(Event::Withdrawal {
                to: dealer,
                amount: refund,
            });
            t.verify_pot(id);

            tracing::info!(game = %id, dealer = %dealer, refund, "game cancelled");
            Ok(refund)
        })
    }
}
