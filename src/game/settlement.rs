//! Payout computation for a resolved round.
//!
//! Each player wins on at most one criterion: an exact number hit, else a
//! matching high/low call, else a matching odd/even call. A winner is owed
//! the criterion's multiplier times the ante. Contributions of players who
//! matched nothing stay in the reserve, minus the dealer's cut.
//!
//! Winners are paid out of the reserve after the dealer's cut. When the
//! reserve cannot cover everything owed, every winner is paid
//! `owed * available / total_owed`, rounded down; the rounding remainder
//! stays in the reserve for later rounds.

use alloc::vec::Vec;

use crate::error::LedgerError;
use crate::id::{Address, Amount};
use crate::options::RouletteOptions;
use crate::picks::Picks;
use crate::result::{Payout, WinType};

const BPS_DENOMINATOR: Amount = 10_000;

/// Money movements a resolved round calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Payouts in submission order given to [`settle`].
    pub payouts: Vec<Payout>,
    /// Contributions of players who matched nothing.
    pub forfeited: Amount,
    /// Amount moved from the reserve to the dealer.
    pub dealer_fee: Amount,
}

/// Payout multiple for a win type.
#[must_use]
pub const fn multiplier(options: &RouletteOptions, win_type: WinType) -> Amount {
    match win_type {
        WinType::Number => options.number_multiplier,
        WinType::HighLow => options.high_low_multiplier,
        WinType::OddEven => options.odd_even_multiplier,
    }
}

/// Computes the payouts of a round.
///
/// `stake` is what each entry contributed to `reserve` for this round.
///
/// # Errors
///
/// Returns [`LedgerError::Overflow`] if an amount overflows, or
/// [`LedgerError::InsufficientBalance`] if the reserve cannot cover the
/// dealer's cut.
pub fn settle(
    options: &RouletteOptions,
    winning_number: u8,
    stake: Amount,
    reserve: Amount,
    entries: &[(Address, &Picks)],
) -> Result<Settlement, LedgerError> {
    let mut winners = Vec::new();
    let mut losers: Amount = 0;
    for &(player, picks) in entries {
        match picks.win_type(winning_number) {
            Some(win_type) => winners.push((player, win_type)),
            None => losers += 1,
        }
    }

    let forfeited = stake.checked_mul(losers).ok_or(LedgerError::Overflow)?;
    let dealer_fee = forfeited
        .checked_mul(Amount::from(options.dealer_fee_bps))
        .ok_or(LedgerError::Overflow)?
        / BPS_DENOMINATOR;
    let available = reserve
        .checked_sub(dealer_fee)
        .ok_or(LedgerError::InsufficientBalance)?;

    let mut owed = Vec::with_capacity(winners.len());
    let mut total_owed: Amount = 0;
    for &(player, win_type) in &winners {
        let amount = multiplier(options, win_type)
            .checked_mul(stake)
            .ok_or(LedgerError::Overflow)?;
        total_owed = total_owed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        owed.push((player, win_type, amount));
    }

    let payouts = owed
        .into_iter()
        .map(|(player, win_type, owed)| {
            let paid = if total_owed <= available {
                owed
            } else {
                owed.checked_mul(available).ok_or(LedgerError::Overflow)? / total_owed
            };
            Ok(Payout {
                player,
                win_type,
                owed,
                paid,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(Settlement {
        payouts,
        forfeited,
        dealer_fee,
    })
}
