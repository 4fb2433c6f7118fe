//! Monetary loss amount (whole currency units, always positive).

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Characters accepted as thousand separators in free-text input.
const SEPARATORS: [char; 5] = [' ', '\u{a0}', '\u{202f}', ',', '\''];

/// Loss amount in whole currency units.
///
/// Compared by value; the zero amount is not representable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parse free-text user input into an amount.
    ///
    /// Surrounding whitespace and thousand separators (plain/narrow/no-break
    /// spaces, commas, apostrophes) are stripped before parsing; whatever
    /// remains must be a positive decimal integer.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let digits: String = input
            .trim()
            .chars()
            .filter(|c| !SEPARATORS.contains(c))
            .collect();

        if digits.is_empty() {
            return Err(DomainError::validation("amount is empty"));
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| DomainError::validation(format!("not a number: {input}")))?;
        Self::new(value)
    }

    /// Render with space-grouped thousands, e.g. `1250000` -> `"1 250 000"`.
    pub fn grouped(&self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u64> for Amount {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
