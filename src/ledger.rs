//! Balance bookkeeping.
//!
//! The ledger holds every escrowed amount: player stacks, each game's pot
//! reserve and dealer fee balances. Their sum is the pool balance, the value
//! held on behalf of all participants. Amounts enter through [`Ledger::credit`],
//! move through [`Ledger::transfer`] and leave through [`Ledger::debit`] or a
//! withdrawal. No balance is ever allowed to go negative or overflow.

use alloc::vec::Vec;
use core::mem;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::id::{Address, Amount, GameId};

/// A balance holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Account {
    /// A player's stack within one game.
    Stack {
        /// The game.
        game: GameId,
        /// The player.
        player: Address,
    },
    /// A game's reserve: antes and forfeited contributions awaiting winners.
    Pot(GameId),
    /// Fees accrued by a dealer across games.
    DealerFees(Address),
}

impl Account {
    /// Returns the game this account is scoped to, if any.
    #[must_use]
    pub const fn game(&self) -> Option<GameId> {
        match *self {
            Self::Stack { game, .. } | Self::Pot(game) => Some(game),
            Self::DealerFees(_) => None,
        }
    }
}

#[derive(Debug)]
struct Journal {
    writes: Vec<(Account, Amount)>,
    pool: Amount,
}

/// Per-account balances with checked arithmetic.
#[derive(Debug)]
pub struct Ledger {
    balances: HashMap<Account, Amount>,
    pool: Amount,
    journal: Option<Journal>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            pool: 0,
            journal: None,
        }
    }

    /// Returns the balance of `account`.
    #[must_use]
    pub fn balance(&self, account: &Account) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Returns the total held across all accounts.
    #[must_use]
    pub const fn pool_balance(&self) -> Amount {
        self.pool
    }

    /// Sums the balances scoped to `game` (its pot and every stack).
    #[must_use]
    pub fn game_total(&self, game: GameId) -> Amount {
        self.balances
            .iter()
            .filter(|(account, _)| account.game() == Some(game))
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn set(&mut self, account: Account, amount: Amount) -> Amount {
        let previous = if amount == 0 {
            self.balances.remove(&account)
        } else {
            self.balances.insert(account, amount)
        };
        previous.unwrap_or(0)
    }

    fn put(&mut self, account: Account, amount: Amount) {
        let previous = self.set(account, amount);
        if let Some(journal) = self.journal.as_mut() {
            journal.writes.push((account, previous));
        }
    }

    /// Adds value arriving from outside the engine.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the account or pool would overflow.
    pub fn credit(&mut self, account: Account, amount: Amount) -> Result<(), LedgerError> {
        let balance = self
            .balance(&account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let pool = self.pool.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.put(account, balance);
        self.pool = pool;
        Ok(())
    }

    /// Removes value leaving the engine.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the account holds less
    /// than `amount`.
    pub fn debit(&mut self, account: Account, amount: Amount) -> Result<(), LedgerError> {
        let balance = self
            .balance(&account)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let pool = self
            .pool
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        self.put(account, balance);
        self.pool = pool;
        Ok(())
    }

    /// Moves `amount` between accounts. Either both sides apply or neither.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less than
    /// `amount`, or [`LedgerError::Overflow`] if `to` would overflow.
    pub fn transfer(
        &mut self,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if from == to {
            return if self.balance(&from) >= amount {
                Ok(())
            } else {
                Err(LedgerError::InsufficientBalance)
            };
        }

        let source = self
            .balance(&from)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let target = self
            .balance(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.put(from, source);
        self.put(to, target);
        Ok(())
    }

    /// Zeroes `account` and returns what it held, for release to the payment rail.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NothingToWithdraw`] if the balance is zero.
    pub fn withdraw(&mut self, account: Account) -> Result<Amount, LedgerError> {
        let amount = self.balance(&account);
        if amount == 0 {
            return Err(LedgerError::NothingToWithdraw);
        }
        self.debit(account, amount)?;
        Ok(amount)
    }

    /// Zeroes every account and returns the whole pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NothingToWithdraw`] if the pool is empty.
    pub fn withdraw_all(&mut self) -> Result<Amount, LedgerError> {
        if self.pool == 0 {
            return Err(LedgerError::NothingToWithdraw);
        }

        let accounts: Vec<Account> = self.balances.keys().copied().collect();
        for account in accounts {
            self.put(account, 0);
        }
        Ok(mem::take(&mut self.pool))
    }

    /// Runs `f` as one unit: if it fails, every balance it touched is restored.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn atomic<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let outer = self.journal.replace(Journal {
            writes: Vec::new(),
            pool: self.pool,
        });

        let result = f(self);

        let Some(journal) = mem::replace(&mut self.journal, outer) else {
            return result;
        };

        if result.is_err() {
            for (account, amount) in journal.writes.into_iter().rev() {
                self.set(account, amount);
            }
            self.pool = journal.pool;
        } else if let Some(outer) = self.journal.as_mut() {
            outer.writes.extend(journal.writes);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: GameId = GameId(1);

    fn stack(n: u64) -> Account {
        Account::Stack {
            game: GAME,
            player: Address::from_low_u64(n),
        }
    }

    #[test]
    fn credit_debit_track_pool() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 100).unwrap();
        ledger.credit(Account::Pot(GAME), 50).unwrap();
        assert_eq!(ledger.pool_balance(), 150);

        ledger.debit(stack(1), 40).unwrap();
        assert_eq!(ledger.balance(&stack(1)), 60);
        assert_eq!(ledger.pool_balance(), 110);
        assert_eq!(
            ledger.debit(stack(1), 61).unwrap_err(),
            LedgerError::InsufficientBalance
        );
    }

    #[test]
    fn credit_rejects_overflow() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), Amount::MAX).unwrap();
        assert_eq!(
            ledger.credit(stack(2), 1).unwrap_err(),
            LedgerError::Overflow
        );
        assert_eq!(ledger.balance(&stack(2)), 0);
    }

    #[test]
    fn transfer_keeps_pool_constant() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 100).unwrap();
        ledger.transfer(stack(1), Account::Pot(GAME), 30).unwrap();
        assert_eq!(ledger.balance(&stack(1)), 70);
        assert_eq!(ledger.balance(&Account::Pot(GAME)), 30);
        assert_eq!(ledger.pool_balance(), 100);
        assert_eq!(ledger.game_total(GAME), 100);

        assert_eq!(
            ledger
                .transfer(stack(1), Account::Pot(GAME), 71)
                .unwrap_err(),
            LedgerError::InsufficientBalance
        );
        assert_eq!(ledger.balance(&stack(1)), 70);
    }

    #[test]
    fn withdraw_zeroes_once() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 25).unwrap();
        assert_eq!(ledger.withdraw(stack(1)).unwrap(), 25);
        assert_eq!(
            ledger.withdraw(stack(1)).unwrap_err(),
            LedgerError::NothingToWithdraw
        );
        assert_eq!(ledger.pool_balance(), 0);
    }

    #[test]
    fn withdraw_all_sweeps_everything() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 25).unwrap();
        ledger
            .credit(Account::DealerFees(Address::from_low_u64(9)), 5)
            .unwrap();
        assert_eq!(ledger.withdraw_all().unwrap(), 30);
        assert_eq!(ledger.balance(&stack(1)), 0);
        assert_eq!(
            ledger.withdraw_all().unwrap_err(),
            LedgerError::NothingToWithdraw
        );
    }

    #[test]
    fn atomic_rolls_back_on_error() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 100).unwrap();

        let result: Result<(), LedgerError> = ledger.atomic(|tx| {
            tx.transfer(stack(1), Account::Pot(GAME), 60)?;
            tx.credit(stack(2), 10)?;
            tx.transfer(stack(1), Account::Pot(GAME), 60)
        });

        assert_eq!(result.unwrap_err(), LedgerError::InsufficientBalance);
        assert_eq!(ledger.balance(&stack(1)), 100);
        assert_eq!(ledger.balance(&stack(2)), 0);
        assert_eq!(ledger.balance(&Account::Pot(GAME)), 0);
        assert_eq!(ledger.pool_balance(), 100);
    }

    #[test]
    fn nested_atomic_rolls_back_with_outer() {
        let mut ledger = Ledger::new();
        ledger.credit(stack(1), 100).unwrap();

        let result: Result<(), LedgerError> = ledger.atomic(|tx| {
            tx.atomic(|inner| inner.transfer(stack(1), stack(2), 40))?;
            tx.debit(stack(2), 41)
        });

        assert!(result.is_err());
        assert_eq!(ledger.balance(&stack(1)), 100);
        assert_eq!(ledger.balance(&stack(2)), 0);
    }
}
