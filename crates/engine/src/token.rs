//! Discrete selection tokens.
//!
//! Every option the engine offers carries an opaque stable token; the
//! transport echoes the token back when the user picks the option. The
//! engine mints and parses tokens itself — human-readable labels are never
//! parsed. Wire shapes are stable (`mgr:3`, `day:2025-08-06`, ...) so a
//! transport may persist them across redeliveries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lossdesk_core::{IncidentId, ManagerId, RestaurantId};
use lossdesk_incidents::{CloseMode, LossReason};

/// Opaque stable selection token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What a token means to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meaning {
    NewIncident,
    CloseIncident,
    MainMenu,
    Back,
    Cancel,
    Manager(ManagerId),
    Restaurant(RestaurantId),
    Day(NaiveDate),
    Hour(u32),
    Minute(u32),
    CloseMode(CloseMode),
    Reason(LossReason),
    AmountPreset(u64),
    AmountOther,
    ConfirmYes,
    ConfirmNo,
    Incident(IncidentId),
}

/// Mint the stable token for a meaning.
pub(crate) fn mint(meaning: Meaning) -> Token {
    let value = match meaning {
        Meaning::NewIncident => "flow:new".to_string(),
        Meaning::CloseIncident => "flow:close".to_string(),
        Meaning::MainMenu => "menu".to_string(),
        Meaning::Back => "back".to_string(),
        Meaning::Cancel => "cancel".to_string(),
        Meaning::Manager(id) => format!("mgr:{id}"),
        Meaning::Restaurant(id) => format!("rest:{id}"),
        Meaning::Day(day) => format!("day:{}", day.format("%Y-%m-%d")),
        Meaning::Hour(h) => format!("hour:{h}"),
        Meaning::Minute(m) => format!("min:{m}"),
        Meaning::CloseMode(CloseMode::Now) => "mode:now".to_string(),
        Meaning::CloseMode(CloseMode::Later) => "mode:later".to_string(),
        Meaning::Reason(reason) => format!("reason:{}", reason.code()),
        Meaning::AmountPreset(v) => format!("amount:{v}"),
        Meaning::AmountOther => "amount:other".to_string(),
        Meaning::ConfirmYes => "confirm:yes".to_string(),
        Meaning::ConfirmNo => "confirm:no".to_string(),
        Meaning::Incident(id) => format!("pick:{id}"),
    };
    Token(value)
}

/// Parse a token back into its meaning; `None` for anything the engine never
/// minted (a forged or truncated token behaves like any other bad input).
pub(crate) fn parse(token: &Token) -> Option<Meaning> {
    match token.as_str() {
        "flow:new" => return Some(Meaning::NewIncident),
        "flow:close" => return Some(Meaning::CloseIncident),
        "menu" => return Some(Meaning::MainMenu),
        "back" => return Some(Meaning::Back),
        "cancel" => return Some(Meaning::Cancel),
        "mode:now" => return Some(Meaning::CloseMode(CloseMode::Now)),
        "mode:later" => return Some(Meaning::CloseMode(CloseMode::Later)),
        "amount:other" => return Some(Meaning::AmountOther),
        "confirm:yes" => return Some(Meaning::ConfirmYes),
        "confirm:no" => return Some(Meaning::ConfirmNo),
        _ => {}
    }

    let (kind, rest) = token.as_str().split_once(':')?;
    match kind {
        "mgr" => rest.parse().ok().map(Meaning::Manager),
        "rest" => rest.parse().ok().map(Meaning::Restaurant),
        "pick" => rest.parse().ok().map(Meaning::Incident),
        "day" => NaiveDate::parse_from_str(rest, "%Y-%m-%d")
            .ok()
            .map(Meaning::Day),
        "hour" => rest
            .parse::<u32>()
            .ok()
            .filter(|h| *h < 24)
            .map(Meaning::Hour),
        "min" => rest
            .parse::<u32>()
            .ok()
            .filter(|m| *m < 60)
            .map(Meaning::Minute),
        "reason" => LossReason::from_code(rest).ok().map(Meaning::Reason),
        "amount" => rest
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .map(Meaning::AmountPreset),
        _ => None,
    }
}
