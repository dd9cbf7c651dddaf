//! Four-valued logic for set membership tests.

use std::ops::{BitAnd, BitOr, Not};

/// Subset of `{true, false}` as an interval of booleans.
///
/// `Unknown` is `{true, false}`, `Empty` is `{}`. The set operators `&`
/// (intersection) and `|` (union) differ from the logical [`and`](Self::and)
/// and [`or`](Self::or).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoolInterval {
    True,
    False,
    Unknown,
    Empty,
}

impl BoolInterval {
    #[inline]
    fn bits(self) -> u8 {
        match self {
            Self::Empty => 0b00,
            Self::True => 0b01,
            Self::False => 0b10,
            Self::Unknown => 0b11,
        }
    }

    #[inline]
    fn from_bits(b: u8) -> Self {
        match b & 0b11 {
            0b00 => Self::Empty,
            0b01 => Self::True,
            0b10 => Self::False,
            _ => Self::Unknown,
        }
    }

    /// Logical conjunction, applied element-wise to the possible values.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, _) | (_, Self::Empty) => Self::Empty,
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Logical disjunction, applied element-wise to the possible values.
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, _) | (_, Self::Empty) => Self::Empty,
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    pub fn is_certain(self) -> bool {
        matches!(self, Self::True | Self::False)
    }
}

impl From<bool> for BoolInterval {
    fn from(b: bool) -> Self {
        if b {
            Self::True
        } else {
            Self::False
        }
    }
}

impl BitAnd for BoolInterval {
    type Output = BoolInterval;
    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits(self.bits() & rhs.bits())
    }
}

impl BitOr for BoolInterval {
    type Output = BoolInterval;
    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits() | rhs.bits())
    }
}

impl Not for BoolInterval {
    type Output = BoolInterval;
    fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            other => other,
        }
    }
}
