//! Transient per-session drafts.
//!
//! A draft accumulates wizard choices in strict order. Every setter clears
//! the fields that come after it, so a later field can never be populated
//! while an earlier required one is unset — going back and changing an
//! answer always forces the later steps to be walked again.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use lossdesk_core::{Amount, DomainError, ManagerId, RestaurantId};

use crate::incident::{IncidentSummary, LossReason, NewIncident};
use crate::local_time;

/// Close-now / close-later choice in the create wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseMode {
    Now,
    Later,
}

/// Accumulates create-flow choices.
///
/// Display names are captured alongside the ids at selection time so the
/// confirmation screen renders without another directory fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDraft {
    manager: Option<(ManagerId, String)>,
    restaurant: Option<(RestaurantId, String)>,
    day: Option<NaiveDate>,
    start_hour: Option<u32>,
    start_minute: Option<u32>,
    close_mode: Option<CloseMode>,
    end_hour: Option<u32>,
    end_minute: Option<u32>,
    reason: Option<LossReason>,
    comment: Option<String>,
    amount: Option<Amount>,
}

impl IncidentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manager(&self) -> Option<(ManagerId, &str)> {
        self.manager.as_ref().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn restaurant(&self) -> Option<(RestaurantId, &str)> {
        self.restaurant
            .as_ref()
            .map(|(id, name)| (*id, name.as_str()))
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn start_hour(&self) -> Option<u32> {
        self.start_hour
    }

    pub fn start_minute(&self) -> Option<u32> {
        self.start_minute
    }

    pub fn close_mode(&self) -> Option<CloseMode> {
        self.close_mode
    }

    pub fn end_hour(&self) -> Option<u32> {
        self.end_hour
    }

    pub fn end_minute(&self) -> Option<u32> {
        self.end_minute
    }

    pub fn reason(&self) -> Option<LossReason> {
        self.reason
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn set_manager(&mut self, id: ManagerId, name: impl Into<String>) {
        self.manager = Some((id, name.into()));
        self.restaurant = None;
        self.clear_from_day();
    }

    pub fn set_restaurant(&mut self, id: RestaurantId, name: impl Into<String>) {
        self.restaurant = Some((id, name.into()));
        self.clear_from_day();
    }

    pub fn set_day(&mut self, day: NaiveDate) {
        self.day = Some(day);
        self.start_hour = None;
        self.start_minute = None;
        self.clear_from_close_mode();
    }

    pub fn set_start_hour(&mut self, hour: u32) {
        self.start_hour = Some(hour);
        self.start_minute = None;
        self.clear_from_close_mode();
    }

    pub fn set_start_minute(&mut self, minute: u32) {
        self.start_minute = Some(minute);
        self.clear_from_close_mode();
    }

    pub fn set_close_mode(&mut self, mode: CloseMode) {
        self.close_mode = Some(mode);
        self.end_hour = None;
        self.end_minute = None;
        self.clear_from_reason();
    }

    pub fn set_end_hour(&mut self, hour: u32) {
        self.end_hour = Some(hour);
        self.end_minute = None;
        self.clear_from_reason();
    }

    pub fn set_end_minute(&mut self, minute: u32) {
        self.end_minute = Some(minute);
        self.clear_from_reason();
    }

    pub fn set_reason(&mut self, reason: LossReason) {
        self.reason = Some(reason);
        self.comment = None;
        self.amount = None;
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
        self.amount = None;
    }

    pub fn set_amount(&mut self, amount: Amount) {
        self.amount = Some(amount);
    }

    fn clear_from_day(&mut self) {
        self.day = None;
        self.start_hour = None;
        self.start_minute = None;
        self.clear_from_close_mode();
    }

    fn clear_from_close_mode(&mut self) {
        self.close_mode = None;
        self.end_hour = None;
        self.end_minute = None;
        self.clear_from_reason();
    }

    fn clear_from_reason(&mut self) {
        self.reason = None;
        self.comment = None;
        self.amount = None;
    }

    /// Build the persistable record from a complete draft.
    ///
    /// Start and (for close-now) end are combined on the chosen day in `tz`;
    /// an end earlier than the start rolls forward one day.
    pub fn into_record(&self, tz: Tz) -> Result<NewIncident, DomainError> {
        let (manager_id, _) = self.manager().ok_or_else(|| missing("manager"))?;
        let (restaurant_id, _) = self.restaurant().ok_or_else(|| missing("restaurant"))?;
        let day = self.day.ok_or_else(|| missing("day"))?;
        let start_hour = self.start_hour.ok_or_else(|| missing("start hour"))?;
        let start_minute = self.start_minute.ok_or_else(|| missing("start minute"))?;
        let close_mode = self.close_mode.ok_or_else(|| missing("close mode"))?;
        let reason = self.reason.ok_or_else(|| missing("reason"))?;
        let comment = self.comment.clone().ok_or_else(|| missing("comment"))?;
        let amount = self.amount.ok_or_else(|| missing("amount"))?;

        let started_at = local_time::combine(tz, day, start_hour, start_minute)?;
        let ended_at = match close_mode {
            CloseMode::Later => None,
            CloseMode::Now => {
                let end_hour = self.end_hour.ok_or_else(|| missing("end hour"))?;
                let end_minute = self.end_minute.ok_or_else(|| missing("end minute"))?;
                let end = local_time::combine(tz, day, end_hour, end_minute)?;
                Some(local_time::roll_forward_overnight(started_at, end))
            }
        };

        Ok(NewIncident {
            manager_id,
            restaurant_id,
            started_at,
            ended_at,
            reason,
            comment,
            amount,
        })
    }
}

/// Accumulates close-flow choices: first the picked open incident, then the
/// end day/hour/minute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseDraft {
    picked: Option<IncidentSummary>,
    day: Option<NaiveDate>,
    end_hour: Option<u32>,
    end_minute: Option<u32>,
}

impl CloseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&mut self, picked: IncidentSummary) {
        self.picked = Some(picked);
        self.day = None;
        self.end_hour = None;
        self.end_minute = None;
    }

    pub fn picked(&self) -> Option<&IncidentSummary> {
        self.picked.as_ref()
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn end_hour(&self) -> Option<u32> {
        self.end_hour
    }

    pub fn end_minute(&self) -> Option<u32> {
        self.end_minute
    }

    pub fn set_day(&mut self, day: NaiveDate) {
        self.day = Some(day);
        self.end_hour = None;
        self.end_minute = None;
    }

    pub fn set_end_hour(&mut self, hour: u32) {
        self.end_hour = Some(hour);
        self.end_minute = None;
    }

    pub fn set_end_minute(&mut self, minute: u32) {
        self.end_minute = Some(minute);
    }

    /// Resolve the end timestamp from a complete draft, rolling an end that
    /// precedes the picked incident's start forward one day.
    pub fn end_timestamp(&self, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
        let picked = self.picked.as_ref().ok_or_else(|| missing("incident"))?;
        let day = self.day.ok_or_else(|| missing("end day"))?;
        let hour = self.end_hour.ok_or_else(|| missing("end hour"))?;
        let minute = self.end_minute.ok_or_else(|| missing("end minute"))?;
        let end = local_time::combine(tz, day, hour, minute)?;
        Ok(local_time::roll_forward_overnight(picked.started_at, end))
    }
}

fn missing(field: &str) -> DomainError {
    DomainError::invariant(format!("draft is missing {field}"))
}
