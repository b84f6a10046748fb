//! Game engine and state management.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::error::{GameError, LedgerError};
use crate::event::Event;
use crate::id::{Address, Amount, GameId, GameKey};
use crate::ledger::{Account, Ledger};
use crate::options::RouletteOptions;
use crate::oracle::{RandomnessOracle, RoundKey};
use crate::picks::Picks;
use crate::result::WinRecord;
use crate::sync::Mutex;
use crate::wheel::UNRESOLVED;

mod actions;
mod registry;
pub mod settlement;
mod spin;
pub mod state;
mod withdraw;

use registry::Registry;
pub use state::{GameHandle, GameInfo, GameStatus, PlayerInfo, RoundPhase};

/// A seat in a game.
#[derive(Debug, Clone, Copy)]
struct Player {
    address: Address,
    joined_at: u64,
}

/// Everything the engine knows about one game.
#[derive(Debug)]
struct GameRecord {
    id: GameId,
    dealer: Address,
    key: GameKey,
    ante: Amount,
    status: GameStatus,
    phase: RoundPhase,
    current_round: u32,
    start_time: u64,
    players: Vec<Player>,
    picks: BTreeMap<(u32, Address), Picks>,
    winning_numbers: BTreeMap<u32, u8>,
    /// Value received for the game.
    escrowed: Amount,
    /// Value released back out through refunds and withdrawals.
    released: Amount,
    /// Value moved to the dealer's fee balance.
    skimmed: Amount,
}

impl GameRecord {
    /// A fresh game waiting for players, with nothing escrowed yet.
    const fn open(id: GameId, dealer: Address, key: GameKey, ante: Amount, start_time: u64) -> Self {
        Self {
            id,
            dealer,
            key,
            ante,
            status: GameStatus::WaitingForPlayers,
            phase: RoundPhase::Open,
            current_round: 0,
            start_time,
            players: Vec::new(),
            picks: BTreeMap::new(),
            winning_numbers: BTreeMap::new(),
            escrowed: 0,
            released: 0,
            skimmed: 0,
        }
    }

    fn handle(&self) -> GameHandle {
        GameHandle {
            id: self.id,
            dealer: self.dealer,
            key: self.key.clone(),
        }
    }

    fn is_seated(&self, player: Address) -> bool {
        self.players.iter().any(|p| p.address == player)
    }

    fn has_submitted(&self, round: u32, player: Address) -> bool {
        self.picks.contains_key(&(round, player))
    }

    /// Whether `player` still has to submit before the wheel can spin.
    ///
    /// Players whose stack cannot cover the ante sit the round out.
    fn owes_picks(&self, ledger: &Ledger, player: Address) -> bool {
        !self.has_submitted(self.current_round, player)
            && ledger.balance(&self.stack_account(player)) >= self.ante
    }

    /// Contributions minus refunds, withdrawals and dealer fees.
    const fn pot_amount(&self) -> Amount {
        self.escrowed - self.released - self.skimmed
    }

    const fn stack_account(&self, player: Address) -> Account {
        Account::Stack {
            game: self.id,
            player,
        }
    }

    fn ensure_dealer(&self, caller: Address) -> Result<(), GameError> {
        if caller == self.dealer {
            Ok(())
        } else {
            Err(GameError::NotDealer)
        }
    }
}

/// State guarded by the engine lock.
#[derive(Debug)]
struct Table {
    registry: Registry,
    ledger: Ledger,
    pending: BTreeSet<RoundKey>,
    winners: Vec<WinRecord>,
    events: VecDeque<Event>,
    event_capacity: usize,
}

impl Table {
    fn new(event_capacity: usize) -> Self {
        Self {
            registry: Registry::default(),
            ledger: Ledger::new(),
            pending: BTreeSet::new(),
            winners: Vec::new(),
            events: VecDeque::new(),
            event_capacity,
        }
    }

    /// Checks that the game's pot matches what the ledger holds for it.
    fn verify_pot(&self, id: GameId) {
        let Ok(game) = self.registry.get(id) else {
            return;
        };
        let held = self.ledger.game_total(id);
        if held != game.pot_amount() {
            tracing::error!(
                game = %id,
                pot = game.pot_amount(),
                held,
                "pot out of balance with ledger"
            );
        }
    }

    /// Buffers an event, dropping the oldest once the buffer is full.
    fn emit(&mut self, event: Event) {
        if self.event_capacity == 0 {
            return;
        }
        if self.events.len() >= self.event_capacity {
            self.events.pop_front();
            tracing::debug!(capacity = self.event_capacity, "event buffer full, oldest dropped");
        }
        self.events.push_back(event);
    }
}

/// A roulette engine hosting any number of games.
///
/// Every state-mutating operation runs to completion under one lock and is
/// all-or-nothing: when it fails, nothing changed. Randomness is requested
/// from the oracle `O` without waiting; the answer comes back through
/// [`Roulette::deliver_randomness`].
///
/// Events are buffered until [`Roulette::drain_events`] takes them; the
/// buffer keeps at most [`RouletteOptions::max_buffered_events`] and drops
/// the oldest beyond that. Winner records live as long as their game is
/// registered, so [`Roulette::clear_terminal_games`] bounds them.
///
/// # Example
///
/// ```
/// use roulette_engine::{Address, Call, ChaChaOracle, Roulette, RouletteOptions};
///
/// let owner = Address::from_low_u64(1);
/// let coordinator = Address::from_low_u64(2);
/// let engine = Roulette::new(RouletteOptions::default(), owner, coordinator, ChaChaOracle::new(7));
///
/// let dealer = Address::from_low_u64(10);
/// let handle = engine
///     .create_game(Call::new(dealer).with_value(100), "table-1", 100, false)
///     .unwrap();
/// assert_eq!(engine.player_fee(handle.id).unwrap(), 1_000);
/// ```
pub struct Roulette<O> {
    /// Engine options.
    pub options: RouletteOptions,
    owner: Address,
    coordinator: Address,
    oracle: O,
    table: Mutex<Table>,
}

impl<O: RandomnessOracle> Roulette<O> {
    /// Creates an engine owned by `owner` that accepts randomness only from
    /// `coordinator`.
    #[must_use]
    pub fn new(
        options: RouletteOptions,
        owner: Address,
        coordinator: Address,
        oracle: O,
    ) -> Self {
        let table = Table::new(options.max_buffered_events);
        Self {
            options,
            owner,
            coordinator,
            oracle,
            table: Mutex::new(table),
        }
    }
}

impl<O> Roulette<O> {
    /// Returns the engine owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the only address allowed to deliver randomness.
    pub const fn coordinator(&self) -> Address {
        self.coordinator
    }

    /// Returns the randomness oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Value a dealer attaches to [`Roulette::create_game`].
    ///
    /// Returns `None` if the amount overflows.
    pub const fn opening_stake(&self, ante: Amount, dealer_auto_joins: bool) -> Option<Amount> {
        self.options.opening_stake(ante, dealer_auto_joins)
    }

    /// Returns the status of a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn game_status(&self, id: GameId) -> Result<GameStatus, GameError> {
        self.table.with(|t| t.registry.get(id).map(|g| g.status))
    }

    /// Returns a summary of a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn game_info(&self, id: GameId) -> Result<GameInfo, GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            Ok(GameInfo {
                id: game.id,
                dealer: game.dealer,
                key: game.key.clone(),
                ante: game.ante,
                status: game.status,
                phase: game.phase,
                pot_amount: game.pot_amount(),
                player_count: game.players.len(),
                current_round: game.current_round,
                start_time: game.start_time,
            })
        })
    }

    /// Returns the seated players with their stacks, in seat order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn game_players(&self, id: GameId) -> Result<Vec<PlayerInfo>, GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            Ok(game
                .players
                .iter()
                .map(|p| PlayerInfo {
                    address: p.address,
                    stack: t.ledger.balance(&game.stack_account(p.address)),
                    joined_at: p.joined_at,
                })
                .collect())
        })
    }

    /// Returns what `player` submitted for `round`, if anything.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn player_picks(
        &self,
        id: GameId,
        round: u32,
        player: Address,
    ) -> Result<Option<Picks>, GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            Ok(game.picks.get(&(round, player)).cloned())
        })
    }

    /// Returns the fee a player attaches to join a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn player_fee(&self, id: GameId) -> Result<Amount, GameError> {
        let ante = self.table.with(|t| t.registry.get(id).map(|g| g.ante))?;
        self.options
            .player_fee(ante)
            .ok_or(GameError::Ledger(LedgerError::Overflow))
    }

    /// Returns the winning number of a round, or [`UNRESOLVED`] if the oracle
    /// has not answered yet.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownGame`] if the game is not registered.
    pub fn winning_number(&self, id: GameId, round: u32) -> Result<u8, GameError> {
        self.table.with(|t| {
            let game = t.registry.get(id)?;
            Ok(game
                .winning_numbers
                .get(&round)
                .copied()
                .unwrap_or(UNRESOLVED))
        })
    }

    /// Returns every winner recorded for registered games, in payout order.
    pub fn winners_and_amounts(&self) -> Vec<WinRecord> {
        self.table.with(|t| t.winners.clone())
    }

    /// Returns the total value held by the engine.
    pub fn pool_balance(&self) -> Amount {
        self.table.with(|t| t.ledger.pool_balance())
    }

    /// Returns the fees accrued by `dealer`.
    pub fn dealer_fee_balance(&self, dealer: Address) -> Amount {
        self.table
            .with(|t| t.ledger.balance(&Account::DealerFees(dealer)))
    }

    /// Returns the keys of the registered games `dealer` opened, oldest first.
    pub fn dealer_game_keys(&self, dealer: Address) -> Vec<GameKey> {
        self.table.with(|t| {
            t.registry
                .iter()
                .filter(|g| g.dealer == dealer)
                .map(|g| g.key.clone())
                .collect()
        })
    }

    /// Looks up the most recent registered game `dealer` opened under `key`.
    pub fn find_game(&self, dealer: Address, key: &GameKey) -> Option<GameId> {
        self.table.with(|t| {
            t.registry
                .iter()
                .rev()
                .find(|g| g.dealer == dealer && &g.key == key)
                .map(|g| g.id)
        })
    }

    /// Takes the buffered events, oldest first.
    ///
    /// Callers that consume events should drain regularly: once the buffer
    /// holds [`RouletteOptions::max_buffered_events`], each new event evicts
    /// the oldest.
    pub fn drain_events(&self) -> Vec<Event> {
        self.table.with(|t| t.events.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_pot_is_logged_without_panicking() {
        let mut table = Table::new(4);
        let mut game = GameRecord::open(GameId(0), Address::from_low_u64(1), "t".into(), 10, 0);
        // Escrow recorded with nothing credited to the ledger.
        game.escrowed = 10;
        table.registry.insert(game);

        table.verify_pot(GameId(0));
        assert_eq!(table.ledger.game_total(GameId(0)), 0);
        assert_eq!(table.registry.get(GameId(0)).unwrap().pot_amount(), 10);
    }

    #[test]
    fn zero_capacity_keeps_no_events() {
        let mut table = Table::new(0);
        table.emit(Event::RandomnessRequested {
            game: GameId(0),
            round: 1,
        });
        assert!(table.events.is_empty());
    }
}
