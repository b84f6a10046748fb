use alloc::vec::Vec;

use crate::error::{DeliveryError, GameError, LedgerError};
use crate::event::Event;
use crate::id::{Address, Call, GameId};
use crate::ledger::Account;
use crate::oracle::{RandomnessOracle, RoundKey, WORDS_PER_REQUEST};
use crate::picks::Picks;
use crate::result::{RoundResult, WinRecord};
use crate::wheel::normalize;

use super::settlement::settle;
use super::{GameStatus, RoundPhase, Roulette};

impl<O: RandomnessOracle> Roulette<O> {
    /// Spins the wheel for the current round. Only the dealer may call this.
    ///
    /// Issues one randomness request to the oracle and returns its key
    /// without waiting; the round resolves when the oracle delivers. The
    /// request is issued after the engine lock is released, so an oracle
    /// may deliver from inside [`RandomnessOracle::request_randomness`].
    ///
    /// # Errors
    ///
    /// Returns an error if the game is unknown, the caller is not the dealer,
    /// the game is not in progress or already waiting on the oracle, or a
    /// seated player who can cover the ante has not submitted picks.
    pub fn spin_wheel(&self, call: Call, id: GameId) -> Result<RoundKey, GameError> {
        let key = self.table.with(|t| {
            let game = t.registry.get(id)?;
            game.ensure_dealer(call.sender)?;
            if game.status != GameStatus::InProgress || game.phase == RoundPhase::Resolving {
                return Err(GameError::InvalidState);
            }

            let round = game.current_round;
            let submitted = game
                .players
                .iter()
                .filter(|p| game.has_submitted(round, p.address))
                .count();
            let outstanding = game
                .players
                .iter()
                .any(|p| game.owes_picks(&t.ledger, p.address));
            if submitted == 0 || outstanding {
                return Err(GameError::NotAllPicksSubmitted);
            }

            let key = RoundKey::new(id, round);
            t.pending.insert(key);
            t.registry.get_mut(id)?.phase = RoundPhase::Resolving;

            t.emit(Event::RandomnessRequested { game: id, round });
            tracing::info!(game = %id, round, submitted, "wheel spun");
            Ok::<_, GameError>(key)
        })?;

        self.oracle.request_randomness(key, WORDS_PER_REQUEST);
        Ok(key)
    }
}

impl<O> Roulette<O> {
    /// Oracle callback: resolves the round `key` with `random_value`.
    ///
    /// The winning number is `random_value % 36 + 1`. Payouts are settled,
    /// winners recorded, and the game moves to the next round.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not the coordinator, the round was
    /// already resolved, or no request is pending for it. A rejected delivery
    /// changes nothing.
    pub fn deliver_randomness(
        &self,
        call: Call,
        key: RoundKey,
        random_value: u64,
    ) -> Result<RoundResult, DeliveryError> {
        if call.sender != self.coordinator {
            tracing::warn!(%key, sender = %call.sender, "randomness from untrusted caller");
            return Err(DeliveryError::UntrustedOracle);
        }

        self.table.with(|t| {
            let id = key.game;
            let Ok(game) = t.registry.get(id) else {
                tracing::warn!(%key, "randomness for unknown game");
                return Err(DeliveryError::UnknownRequest);
            };
            if game.winning_numbers.contains_key(&key.round) {
                tracing::warn!(%key, "duplicate randomness delivery");
                return Err(DeliveryError::DuplicateDelivery);
            }
            if !t.pending.contains(&key) {
                tracing::warn!(%key, "randomness without a pending request");
                return Err(DeliveryError::UnknownRequest);
            }

            let winning_number = normalize(random_value);
            let entries: Vec<(Address, &Picks)> = game
                .players
                .iter()
                .filter_map(|p| {
                    game.picks
                        .get(&(key.round, p.address))
                        .map(|picks| (p.address, picks))
                })
                .collect();
            let reserve = t.ledger.balance(&Account::Pot(id));
            let settlement = settle(&self.options, winning_number, game.ante, reserve, &entries)?;

            let dealer = game.dealer;
            t.ledger.atomic(|ledger| {
                ledger.transfer(
                    Account::Pot(id),
                    Account::DealerFees(dealer),
                    settlement.dealer_fee,
                )?;
                for payout in &settlement.payouts {
                    let stack = Account::Stack {
                        game: id,
                        player: payout.player,
                    };
                    ledger.transfer(Account::Pot(id), stack, payout.paid)?;
                }
                Ok::<_, LedgerError>(())
            })?;

            let game = t
                .registry
                .get_mut(id)
                .map_err(|_| DeliveryError::UnknownRequest)?;
            game.skimmed += settlement.dealer_fee;
            game.winning_numbers.insert(key.round, winning_number);
            game.current_round += 1;
            game.phase = RoundPhase::Open;
            t.pending.remove(&key);

            t.emit(Event::RoundResolved {
                game: id,
                round: key.round,
                winning_number,
            });
            for payout in &settlement.payouts {
                let stack = t.ledger.balance(&Account::Stack {
                    game: id,
                    player: payout.player,
                });
                t.winners.push(WinRecord {
                    game: id,
                    round: key.round,
                    winner: payout.player,
                    win_type: payout.win_type,
                    amount: payout.paid,
                    stack,
                });
                t.emit(Event::Winner {
                    game: id,
                    round: key.round,
                    player: payout.player,
                    win_type: payout.win_type,
                    amount: payout.paid,
                });
                tracing::debug!(
                    game = %id,
                    round = key.round,
                    player = %payout.player,
                    win_type = ?payout.win_type,
                    owed = payout.owed,
                    paid = payout.paid,
                    stack,
                    "winner paid"
                );
            }
            t.verify_pot(id);

            let result = RoundResult {
                game: id,
                round: key.round,
                winning_number,
                payouts: settlement.payouts,
                forfeited: settlement.forfeited,
                dealer_fee: settlement.dealer_fee,
            };
            tracing::info!(
                game = %id,
                round = key.round,
                winning_number,
                winners = result.payouts.len(),
                paid = result.total_paid(),
                dealer_fee = result.dealer_fee,
                scaled = result.scaled(),
                "round resolved"
            );
            Ok(result)
        })
    }
}
