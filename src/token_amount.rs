use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Amount of the smallest token unit (uccat).
///
/// Serialized as a decimal string so that values above 2^53 survive JSON
/// consumers that parse numbers as doubles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    /// Number of decimals between uccat and CCAT.
    pub const DECIMALS: u32 = 6;

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Floor division by a plain count. `None` when `divisor` is zero.
    pub fn checked_quo(self, divisor: u64) -> Option<TokenAmount> {
        self.0.checked_div(divisor as u128).map(TokenAmount)
    }

    pub fn checked_rem(self, divisor: u64) -> Option<TokenAmount> {
        self.0.checked_rem(divisor as u128).map(TokenAmount)
    }

    pub fn saturating_sub(self, other: TokenAmount) -> TokenAmount {
        TokenAmount(self.0.saturating_sub(other.0))
    }

    /// `self * times`, used to scale the base reward by a unit count.
    pub fn times(self, times: u64) -> TokenAmount {
        TokenAmount(self.0 * times as u128)
    }

    /// Human readable whole-token rendering, truncated to two decimals.
    pub fn display_tokens(self) -> String {
        let scale = 10u128.pow(Self::DECIMALS);
        let whole = self.0 / scale;
        let cents = (self.0 % scale) / 10u128.pow(Self::DECIMALS - 2);
        format!("{}.{:02}", whole, cents)
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl Add for TokenAmount {
    type Output = TokenAmount;

    fn add(self, rhs: TokenAmount) -> TokenAmount {
        TokenAmount(self.0 + rhs.0)
    }
}

impl AddAssign for TokenAmount {
    fn add_assign(&mut self, rhs: TokenAmount) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for TokenAmount {
    fn sum<I: Iterator<Item = TokenAmount>>(iter: I) -> Self {
        iter.fold(TokenAmount::ZERO, |acc, amount| acc + amount)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str(s).map(TokenAmount)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => TokenAmount::from_str(&text).map_err(serde::de::Error::custom),
            Repr::Number(number) => Ok(TokenAmount::from(number)),
        }
    }
}
