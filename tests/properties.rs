//! Property tests over fees, picks, dealer sequences and money conservation.

use proptest::prelude::*;
use roulette_engine::{
    Address, Amount, Call, ChaChaOracle, GameError, GameId, HighLow, OddEven, Roulette,
    RouletteOptions,
};

const OWNER: Address = Address::from_low_u64(1);
const COORDINATOR: Address = Address::from_low_u64(2);

fn engine() -> Roulette<ChaChaOracle> {
    Roulette::new(
        RouletteOptions::default(),
        OWNER,
        COORDINATOR,
        ChaChaOracle::new(11),
    )
}

fn dealer(n: u8) -> Address {
    Address::from_low_u64(10 + u64::from(n))
}

fn player(n: usize) -> Address {
    Address::from_low_u64(100 + n as u64)
}

fn high_low(high: bool) -> HighLow {
    if high { HighLow::High } else { HighLow::Low }
}

fn odd_even(odd: bool) -> OddEven {
    if odd { OddEven::Odd } else { OddEven::Even }
}

#[derive(Debug, Clone)]
enum DealerOp {
    Create(u8),
    End(u8),
    Cancel(u8),
}

fn dealer_op() -> impl Strategy<Value = DealerOp> {
    prop_oneof![
        (0u8..3).prop_map(DealerOp::Create),
        (0u8..3).prop_map(DealerOp::End),
        (0u8..3).prop_map(DealerOp::Cancel),
    ]
}

#[derive(Debug, Clone)]
struct Entry {
    high: bool,
    odd: bool,
    numbers: Vec<u8>,
}

fn entry() -> impl Strategy<Value = Entry> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(1u8..=36, 0..=12),
    )
        .prop_map(|(high, odd, numbers)| Entry { high, odd, numbers })
}

/// Pool equals every registered pot plus unwithdrawn dealer fees.
fn assert_pool_conserved(engine: &Roulette<ChaChaOracle>, dealers: &[Address]) {
    let pots: Amount = engine
        .games(false)
        .iter()
        .map(|g| engine.game_info(g.id).unwrap().pot_amount)
        .sum();
    let fees: Amount = dealers.iter().map(|&d| engine.dealer_fee_balance(d)).sum();
    assert_eq!(engine.pool_balance(), pots + fees);
}

proptest! {
    #[test]
    fn join_accepts_only_the_exact_fee(ante in 1u128..1_000_000, sent in 0u128..20_000_000) {
        let engine = engine();
        let id = engine
            .create_game(Call::new(dealer(0)).with_value(ante), "fee", ante, false)
            .unwrap()
            .id;

        let result = engine.join(Call::new(player(1)).with_value(sent), id);
        if sent == ante * 10 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(engine.game_players(id).unwrap().len(), 1);
        } else {
            prop_assert_eq!(result.unwrap_err(), GameError::WrongFeeAmount);
            prop_assert!(engine.game_players(id).unwrap().is_empty());
        }
    }

    #[test]
    fn submitted_picks_keep_the_first_ten(
        high in any::<bool>(),
        odd in any::<bool>(),
        numbers in prop::collection::vec(1u8..=36, 0..=20),
    ) {
        let engine = engine();
        let id = engine
            .create_game(Call::new(dealer(0)).with_value(10), "picks", 10, false)
            .unwrap()
            .id;
        engine.join(Call::new(player(1)).with_value(100), id).unwrap();
        engine.set_in_progress(Call::new(dealer(0)), id).unwrap();

        let picks = engine
            .submit_picks(Call::new(player(1)), id, 1, high_low(high), odd_even(odd), &numbers)
            .unwrap();

        let mut expected: Vec<u8> = Vec::new();
        for &n in numbers.iter().take(10) {
            if !expected.contains(&n) {
                expected.push(n);
            }
        }
        prop_assert_eq!(picks.numbers(), expected.as_slice());
        prop_assert_eq!(picks.high_low, high_low(high));
        prop_assert_eq!(picks.odd_even, odd_even(odd));
    }

    #[test]
    fn dealers_never_hold_two_live_games(ops in prop::collection::vec(dealer_op(), 1..40)) {
        let engine = engine();
        let mut live: [Option<GameId>; 3] = [None; 3];

        for op in ops {
            match op {
                DealerOp::Create(d) => {
                    let result = engine.create_game(
                        Call::new(dealer(d)).with_value(5),
                        "seq",
                        5,
                        false,
                    );
                    match live[usize::from(d)] {
                        Some(_) => {
                            prop_assert_eq!(result.unwrap_err(), GameError::DuplicateActiveGame);
                        }
                        None => live[usize::from(d)] = Some(result.unwrap().id),
                    }
                }
                DealerOp::End(d) => {
                    if let Some(id) = live[usize::from(d)].take() {
                        engine.end_game(Call::new(dealer(d)), id).unwrap();
                    }
                }
                DealerOp::Cancel(d) => {
                    if let Some(id) = live[usize::from(d)].take() {
                        engine.cancel_game(Call::new(dealer(d)), id).unwrap();
                    }
                }
            }

            let active = engine.games(true);
            for d in 0..3 {
                let count = active.iter().filter(|g| g.dealer == dealer(d)).count();
                prop_assert!(count <= 1);
            }
        }
    }

    #[test]
    fn every_unit_is_accounted_for(
        ante in 1u128..10_000,
        rounds in prop::collection::vec(
            (prop::collection::vec(entry(), 1..=6), any::<u64>()),
            1..5,
        ),
    ) {
        let engine = engine();
        let house = dealer(0);
        let seats = rounds.iter().map(|(entries, _)| entries.len()).max().unwrap_or(1);
        let players: Vec<Address> = (0..seats).map(player).collect();

        let id = engine
            .create_game(Call::new(house).with_value(ante), "cons", ante, false)
            .unwrap()
            .id;
        let fee = engine.player_fee(id).unwrap();
        for &p in &players {
            engine.join(Call::new(p).with_value(fee), id).unwrap();
        }
        engine.set_in_progress(Call::new(house), id).unwrap();

        for (round, (entries, word)) in (1u32..).zip(&rounds) {
            let mut submitted = 0;
            for (i, &p) in players.iter().enumerate() {
                let e = &entries[i % entries.len()];
                let result = engine.submit_picks(
                    Call::new(p),
                    id,
                    round,
                    high_low(e.high),
                    odd_even(e.odd),
                    &e.numbers,
                );
                if result.is_ok() {
                    submitted += 1;
                }
            }
            if submitted == 0 {
                break;
            }
            let key = engine.spin_wheel(Call::new(house), id).unwrap();
            engine
                .deliver_randomness(Call::new(COORDINATOR), key, *word)
                .unwrap();
            assert_pool_conserved(&engine, &[house]);
        }

        engine.end_game(Call::new(house), id).unwrap();
        assert_pool_conserved(&engine, &[house]);

        for &p in &players {
            let stack = engine
                .game_players(id)
                .unwrap()
                .into_iter()
                .find(|info| info.address == p)
                .map_or(0, |info| info.stack);
            if stack > 0 {
                prop_assert_eq!(engine.withdraw_stack(Call::new(p), id).unwrap(), stack);
            }
        }
        if engine.dealer_fee_balance(house) > 0 {
            engine.withdraw_dealer_fees(Call::new(house)).unwrap();
        }
        prop_assert_eq!(engine.pool_balance(), 0);
    }
}
