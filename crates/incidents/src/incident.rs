//! Incident record shapes and the reason/status enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lossdesk_core::{Amount, DomainError, IncidentId, ManagerId, RestaurantId};

/// Stored comment when the reporter had nothing to say.
pub const COMMENT_PLACEHOLDER: &str = "—";

/// Why sales were lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    External,
    Internal,
    StaffShortage,
    NoProduct,
}

impl LossReason {
    /// All reasons, in presentation order.
    pub const ALL: [LossReason; 4] = [
        LossReason::External,
        LossReason::Internal,
        LossReason::StaffShortage,
        LossReason::NoProduct,
    ];

    /// Stable storage/wire code.
    pub fn code(&self) -> &'static str {
        match self {
            LossReason::External => "external",
            LossReason::Internal => "internal",
            LossReason::StaffShortage => "staff_shortage",
            LossReason::NoProduct => "no_product",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            LossReason::External => "External losses",
            LossReason::Internal => "Internal losses",
            LossReason::StaffShortage => "Staff shortage",
            LossReason::NoProduct => "Product unavailable",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| DomainError::validation(format!("unknown loss reason: {code}")))
    }
}

/// Incident lifecycle status, keyed off the presence of an end timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Open,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "open" => Ok(IncidentStatus::Open),
            "closed" => Ok(IncidentStatus::Closed),
            other => Err(DomainError::validation(format!(
                "unknown incident status: {other}"
            ))),
        }
    }
}

/// Normalize a free-text comment.
///
/// Empty input and the placeholder dashes (`-`, `—`) collapse to
/// [`COMMENT_PLACEHOLDER`]; everything else is kept verbatim (trimmed).
pub fn normalize_comment(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == COMMENT_PLACEHOLDER {
        COMMENT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A validated incident ready for insertion (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncident {
    pub manager_id: ManagerId,
    pub restaurant_id: RestaurantId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub reason: LossReason,
    pub comment: String,
    pub amount: Amount,
}

impl NewIncident {
    /// Status is derived: closed iff an end timestamp is present.
    pub fn status(&self) -> IncidentStatus {
        if self.ended_at.is_some() {
            IncidentStatus::Closed
        } else {
            IncidentStatus::Open
        }
    }
}

/// A persisted incident row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub manager_id: ManagerId,
    pub restaurant_id: RestaurantId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub reason: LossReason,
    pub comment: String,
    pub amount: Amount,
    pub status: IncidentStatus,
}

impl Incident {
    /// Whole minutes between start and end; `None` while the incident is open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.ended_at
            .map(|end| super::local_time::duration_minutes(self.started_at, end))
    }
}

/// Row shape for the open-incident listing (store-side join with names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub id: IncidentId,
    pub started_at: DateTime<Utc>,
    pub reason: LossReason,
    pub amount: Amount,
    pub restaurant_name: String,
    pub manager_name: String,
}
