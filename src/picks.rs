//! A player's per-round submission.

use alloc::vec::Vec;

use crate::error::GameError;
use crate::result::WinType;
use crate::wheel::{HighLow, OddEven, is_on_wheel};

/// The calls a player makes for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Picks {
    /// High/low call.
    pub high_low: HighLow,
    /// Odd/even call.
    pub odd_even: OddEven,
    /// Picked numbers, in submission order, without duplicates.
    numbers: Vec<u8>,
}

impl Picks {
    /// Builds a submission, keeping at most `max_numbers` entries.
    ///
    /// Entries past `max_numbers` are dropped before validation. Repeated
    /// numbers keep their first position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidPick`] if a kept number is outside `1..=36`.
    pub fn new(
        high_low: HighLow,
        odd_even: OddEven,
        numbers: &[u8],
        max_numbers: usize,
    ) -> Result<Self, GameError> {
        let kept = &numbers[..numbers.len().min(max_numbers)];
        if !kept.iter().all(|&n| is_on_wheel(n)) {
            return Err(GameError::InvalidPick);
        }

        let mut unique = Vec::with_capacity(kept.len());
        for &number in kept {
            if !unique.contains(&number) {
                unique.push(number);
            }
        }

        Ok(Self {
            high_low,
            odd_even,
            numbers: unique,
        })
    }

    /// Returns the picked numbers.
    #[must_use]
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    /// Returns the best criterion these picks win on, if any.
    ///
    /// An exact number beats high/low, which beats odd/even.
    #[must_use]
    pub fn win_type(&self, winning_number: u8) -> Option<WinType> {
        if self.numbers.contains(&winning_number) {
            Some(WinType::Number)
        } else if HighLow::of(winning_number) == Some(self.high_low) {
            Some(WinType::HighLow)
        } else if OddEven::of(winning_number) == Some(self.odd_even) {
            Some(WinType::OddEven)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_before_validating() {
        let numbers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 99];
        let picks = Picks::new(HighLow::High, OddEven::Odd, &numbers, 10).unwrap();
        assert_eq!(picks.numbers(), &numbers[..10]);
    }

    #[test]
    fn rejects_numbers_off_the_wheel() {
        assert_eq!(
            Picks::new(HighLow::Low, OddEven::Even, &[0, 5], 10).unwrap_err(),
            GameError::InvalidPick
        );
        assert_eq!(
            Picks::new(HighLow::Low, OddEven::Even, &[5, 37], 10).unwrap_err(),
            GameError::InvalidPick
        );
    }

    #[test]
    fn drops_repeated_numbers() {
        let picks = Picks::new(HighLow::Low, OddEven::Even, &[4, 9, 4, 2, 9], 10).unwrap();
        assert_eq!(picks.numbers(), &[4, 9, 2]);
    }

    #[test]
    fn win_precedence() {
        let picks = Picks::new(HighLow::Low, OddEven::Odd, &[7], 10).unwrap();
        assert_eq!(picks.win_type(7), Some(WinType::Number));
        assert_eq!(picks.win_type(9), Some(WinType::HighLow));
        assert_eq!(picks.win_type(21), Some(WinType::OddEven));
        assert_eq!(picks.win_type(22), None);
    }
}
