//! Strongly-typed identifiers used across the domain.
//!
//! Row identifiers (`ManagerId`, `RestaurantId`, `IncidentId`) are assigned
//! by the backing store (serial columns), so they wrap `i64` rather than a
//! generated UUID. `ConversationId` is the transport's chat key.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a field manager (reference data).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerId(i64);

/// Identifier of a restaurant (reference data).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(i64);

/// Identifier of a persisted incident row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(i64);

/// Identifier of one ongoing conversation (one session at most).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(i64);

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = i64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_i64_newtype!(ManagerId, "ManagerId");
impl_i64_newtype!(RestaurantId, "RestaurantId");
impl_i64_newtype!(IncidentId, "IncidentId");
impl_i64_newtype!(ConversationId, "ConversationId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_decimal_string() {
        let id: IncidentId = "42".parse().unwrap();
        assert_eq!(id, IncidentId::new(42));
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "seven".parse::<ManagerId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn display_round_trips() {
        let id = RestaurantId::new(10);
        assert_eq!(id.to_string().parse::<RestaurantId>().unwrap(), id);
    }
}
