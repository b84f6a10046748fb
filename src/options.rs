//! Engine configuration options.

use crate::id::Amount;

/// Configuration options for the roulette engine.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use roulette_engine::RouletteOptions;
///
/// let options = RouletteOptions::default()
///     .with_max_players(4)
///     .with_dealer_fee_bps(250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouletteOptions {
    /// Player fee as a multiple of the ante.
    pub fee_multiplier: Amount,
    /// Maximum number of seated players.
    pub max_players: usize,
    /// Numbers kept per submission; extra entries are dropped.
    pub max_numbers: usize,
    /// Payout multiple of the ante for an exact number hit.
    pub number_multiplier: Amount,
    /// Payout multiple of the ante for a high/low hit.
    pub high_low_multiplier: Amount,
    /// Payout multiple of the ante for an odd/even hit.
    pub odd_even_multiplier: Amount,
    /// Share of forfeited contributions credited to the dealer, in basis points.
    pub dealer_fee_bps: u16,
    /// Events held until drained; the oldest are dropped beyond this. Read
    /// once, when the engine is built.
    pub max_buffered_events: usize,
}

impl Default for RouletteOptions {
    fn default() -> Self {
        Self {
            fee_multiplier: 10,
            max_players: 6,
            max_numbers: 10,
            number_multiplier: 8,
            high_low_multiplier: 3,
            odd_even_multiplier: 2,
            dealer_fee_bps: 500,
            max_buffered_events: 1024,
        }
    }
}

impl RouletteOptions {
    /// Sets the player fee multiple.
    ///
    /// # Example
    ///
    /// ```
    /// use roulette_engine::RouletteOptions;
    ///
    /// let options = RouletteOptions::default().with_fee_multiplier(5);
    /// assert_eq!(options.fee_multiplier, 5);
    /// ```
    #[must_use]
    pub const fn with_fee_multiplier(mut self, multiplier: Amount) -> Self {
        self.fee_multiplier = multiplier;
        self
    }

    /// Sets the maximum number of seated players.
    #[must_use]
    pub const fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    /// Sets how many numbers a submission keeps.
    #[must_use]
    pub const fn with_max_numbers(mut self, max: usize) -> Self {
        self.max_numbers = max;
        self
    }

    /// Sets the payout multiples for number, high/low and odd/even hits.
    ///
    /// # Example
    ///
    /// ```
    /// use roulette_engine::RouletteOptions;
    ///
    /// let options = RouletteOptions::default().with_multipliers(12, 4, 2);
    /// assert_eq!(options.number_multiplier, 12);
    /// assert_eq!(options.high_low_multiplier, 4);
    /// ```
    #[must_use]
    pub const fn with_multipliers(
        mut self,
        number: Amount,
        high_low: Amount,
        odd_even: Amount,
    ) -> Self {
        self.number_multiplier = number;
        self.high_low_multiplier = high_low;
        self.odd_even_multiplier = odd_even;
        self
    }

    /// Sets the dealer's cut of forfeited contributions, in basis points.
    #[must_use]
    pub const fn with_dealer_fee_bps(mut self, bps: u16) -> Self {
        self.dealer_fee_bps = bps;
        self
    }

    /// Sets how many undrained events the engine keeps. Zero disables the
    /// event log.
    #[must_use]
    pub const fn with_max_buffered_events(mut self, max: usize) -> Self {
        self.max_buffered_events = max;
        self
    }

    /// Fee a player attaches to join a game with the given ante.
    #[must_use]
    pub const fn player_fee(&self, ante: Amount) -> Option<Amount> {
        ante.checked_mul(self.fee_multiplier)
    }

    /// Value a dealer attaches to open a game with the given ante.
    ///
    /// A dealer who is seated at creation also pays the player fee.
    #[must_use]
    pub const fn opening_stake(&self, ante: Amount, dealer_auto_joins: bool) -> Option<Amount> {
        if !dealer_auto_joins {
            return Some(ante);
        }
        match self.player_fee(ante) {
            Some(fee) => ante.checked_add(fee),
            None => None,
        }
    }
}
