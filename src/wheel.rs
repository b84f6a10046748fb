//! Wheel numbers and their classifications.

/// Lowest number on the wheel.
pub const MIN_NUMBER: u8 = 1;

/// Highest number on the wheel.
pub const MAX_NUMBER: u8 = 36;

/// Winning-number sentinel of a round the oracle has not resolved.
pub const UNRESOLVED: u8 = 0;

/// High/low call. 1–18 is low, 19–36 is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighLow {
    /// 19 through 36.
    High,
    /// 1 through 18.
    Low,
}

impl HighLow {
    /// Classifies a wheel number. Returns `None` for values off the wheel.
    #[must_use]
    pub const fn of(number: u8) -> Option<Self> {
        match number {
            1..=18 => Some(Self::Low),
            19..=36 => Some(Self::High),
            _ => None,
        }
    }

    /// Decodes the wire code (`0` = high, `1` = low).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::High),
            1 => Some(Self::Low),
            _ => None,
        }
    }
}

/// Odd/even call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OddEven {
    /// Odd numbers.
    Odd,
    /// Even numbers.
    Even,
}

impl OddEven {
    /// Classifies a wheel number. Returns `None` for values off the wheel.
    #[must_use]
    pub const fn of(number: u8) -> Option<Self> {
        match number {
            MIN_NUMBER..=MAX_NUMBER if number % 2 == 1 => Some(Self::Odd),
            MIN_NUMBER..=MAX_NUMBER => Some(Self::Even),
            _ => None,
        }
    }

    /// Decodes the wire code (`0` = odd, `1` = even).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Odd),
            1 => Some(Self::Even),
            _ => None,
        }
    }
}

/// Maps an oracle word onto the wheel (`1..=36`).
#[must_use]
pub const fn normalize(random_value: u64) -> u8 {
    (random_value % MAX_NUMBER as u64) as u8 + MIN_NUMBER
}

/// Returns whether `number` is a pocket on the wheel.
#[must_use]
pub const fn is_on_wheel(number: u8) -> bool {
    number >= MIN_NUMBER && number <= MAX_NUMBER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_splits_wheel_in_halves() {
        assert_eq!(HighLow::of(1), Some(HighLow::Low));
        assert_eq!(HighLow::of(18), Some(HighLow::Low));
        assert_eq!(HighLow::of(19), Some(HighLow::High));
        assert_eq!(HighLow::of(36), Some(HighLow::High));
        assert_eq!(HighLow::of(UNRESOLVED), None);
        assert_eq!(OddEven::of(7), Some(OddEven::Odd));
        assert_eq!(OddEven::of(36), Some(OddEven::Even));
        assert_eq!(OddEven::of(UNRESOLVED), None);
        assert_eq!(OddEven::of(37), None);
    }

    #[test]
    fn normalize_stays_on_wheel() {
        assert_eq!(normalize(0), 1);
        assert_eq!(normalize(6), 7);
        assert_eq!(normalize(35), 36);
        assert_eq!(normalize(36), 1);
        assert!(is_on_wheel(normalize(u64::MAX)));
    }

    #[test]
    fn wire_codes_match_script_encoding() {
        assert_eq!(HighLow::from_code(0), Some(HighLow::High));
        assert_eq!(HighLow::from_code(1), Some(HighLow::Low));
        assert_eq!(OddEven::from_code(0), Some(OddEven::Odd));
        assert_eq!(OddEven::from_code(1), Some(OddEven::Even));
        assert_eq!(OddEven::from_code(2), None);
    }
}
