//! Pure prompt rendering.
//!
//! Every function here maps already-fetched data to a [`Prompt`]; no I/O
//! happens in this module, so rendering is testable independently of the
//! transition logic that decides *which* prompt comes next.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use lossdesk_core::{Amount, IncidentId};
use lossdesk_directory::{Manager, Restaurant};
use lossdesk_incidents::{
    IncidentDraft, IncidentStatus, IncidentSummary, NewIncident, local_time,
};

use crate::prompt::Prompt;
use crate::token::{Meaning, mint};

/// Quick-pick amounts, in presentation order.
pub(crate) const AMOUNT_PRESETS: [u64; 7] =
    [10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000];

/// Today plus the 7 previous days, newest first.
pub(crate) fn day_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..8).map(|n| today - Duration::days(n)).collect()
}

fn local(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%d.%m %H:%M").to_string()
}

fn with_menu(text: impl Into<String>) -> Prompt {
    Prompt::new(text)
        .option("New incident", mint(Meaning::NewIncident))
        .option("Close an incident", mint(Meaning::CloseIncident))
}

pub(crate) fn main_menu() -> Prompt {
    with_menu("What would you like to do?")
}

pub(crate) fn no_managers() -> Prompt {
    with_menu("There are no managers configured yet.")
}

pub(crate) fn no_open_incidents() -> Prompt {
    with_menu("No open incidents.")
}

pub(crate) fn cancelled() -> Prompt {
    with_menu("Cancelled.")
}

pub(crate) fn saved(id: IncidentId, status: IncidentStatus) -> Prompt {
    match status {
        IncidentStatus::Open => with_menu(format!("Incident #{id} saved as OPEN.")),
        IncidentStatus::Closed => with_menu(format!("Incident #{id} saved and CLOSED.")),
    }
}

pub(crate) fn closed(id: IncidentId) -> Prompt {
    with_menu(format!("Incident #{id} closed."))
}

pub(crate) fn already_closed(id: IncidentId) -> Prompt {
    with_menu(format!("Incident #{id} is already closed."))
}

pub(crate) fn manager_list(managers: &[Manager]) -> Prompt {
    let mut prompt = Prompt::new("Pick the manager:");
    for manager in managers {
        prompt = prompt.option(manager.name.clone(), mint(Meaning::Manager(manager.id)));
    }
    prompt.option("Cancel", mint(Meaning::Cancel))
}

pub(crate) fn restaurant_list(restaurants: &[Restaurant]) -> Prompt {
    let mut prompt = Prompt::new("Pick the restaurant:");
    for restaurant in restaurants {
        prompt = prompt.option(
            restaurant.name.clone(),
            mint(Meaning::Restaurant(restaurant.id)),
        );
    }
    prompt.option("Back", mint(Meaning::Back))
}

pub(crate) fn day_options(today: NaiveDate) -> Prompt {
    let mut prompt = Prompt::new("Which day?");
    for (n, day) in day_window(today).into_iter().enumerate() {
        let label = match n {
            0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            _ => day.format("%a %d.%m").to_string(),
        };
        prompt = prompt.option(label, mint(Meaning::Day(day)));
    }
    prompt.option("Back", mint(Meaning::Back))
}

pub(crate) fn hours(text: &str) -> Prompt {
    let mut prompt = Prompt::new(text);
    for h in 0..24 {
        prompt = prompt.option(format!("{h:02}"), mint(Meaning::Hour(h)));
    }
    prompt.option("Back", mint(Meaning::Back))
}

pub(crate) fn minutes(text: &str) -> Prompt {
    let mut prompt = Prompt::new(text);
    for m in [0u32, 15, 30, 45] {
        prompt = prompt.option(format!("{m:02}"), mint(Meaning::Minute(m)));
    }
    prompt.option("Back", mint(Meaning::Back))
}

pub(crate) fn close_mode() -> Prompt {
    Prompt::new("When does the incident end?")
        .option(
            "Close now",
            mint(Meaning::CloseMode(lossdesk_incidents::CloseMode::Now)),
        )
        .option(
            "Close later",
            mint(Meaning::CloseMode(lossdesk_incidents::CloseMode::Later)),
        )
        .option("Back", mint(Meaning::Back))
}

pub(crate) fn reasons() -> Prompt {
    let mut prompt = Prompt::new("Loss reason:");
    for reason in lossdesk_incidents::LossReason::ALL {
        prompt = prompt.option(reason.label(), mint(Meaning::Reason(reason)));
    }
    prompt.option("Back", mint(Meaning::Back))
}

pub(crate) fn comment_prompt() -> Prompt {
    Prompt::new("Comment (type text, or \"—\" for none):").option("Back", mint(Meaning::Back))
}

pub(crate) fn amounts() -> Prompt {
    let mut prompt = Prompt::new("Loss amount:");
    for preset in AMOUNT_PRESETS {
        let label = Amount::new(preset).map(|a| a.grouped()).unwrap_or_default();
        prompt = prompt.option(label, mint(Meaning::AmountPreset(preset)));
    }
    prompt
        .option("Other amount", mint(Meaning::AmountOther))
        .option("Back", mint(Meaning::Back))
}

pub(crate) fn amount_free_entry() -> Prompt {
    Prompt::new("Type the amount as a number:").option("Back", mint(Meaning::Back))
}

pub(crate) fn confirm_create(draft: &IncidentDraft, record: &NewIncident, tz: Tz) -> Prompt {
    let manager = draft.manager().map(|(_, name)| name).unwrap_or("?");
    let restaurant = draft.restaurant().map(|(_, name)| name).unwrap_or("?");

    let (end, duration) = match record.ended_at {
        Some(end) => (
            local(end, tz),
            local_time::format_duration(local_time::duration_minutes(record.started_at, end)),
        ),
        None => ("—".to_string(), "—".to_string()),
    };

    let text = format!(
        "Confirm the incident\n\
         Manager: {manager}\n\
         Restaurant: {restaurant}\n\
         Start: {start}\n\
         End: {end}\n\
         Duration: {duration}\n\
         Reason: {reason}\n\
         Comment: {comment}\n\
         Amount: {amount}",
        start = local(record.started_at, tz),
        reason = record.reason.label(),
        comment = record.comment,
        amount = record.amount.grouped(),
    );

    Prompt::new(text)
        .option("Yes, save", mint(Meaning::ConfirmYes))
        .option("Cancel", mint(Meaning::ConfirmNo))
        .option("Back", mint(Meaning::Back))
}

pub(crate) fn open_incident_list(open: &[IncidentSummary]) -> Prompt {
    if open.is_empty() {
        return Prompt::new("No open incidents.").option("Cancel", mint(Meaning::Cancel));
    }
    let mut prompt = Prompt::new("Pick the open incident:");
    for summary in open {
        let label = format!(
            "#{} • {} • {} • {}",
            summary.id,
            summary.restaurant_name,
            summary.reason.label(),
            summary.amount.grouped(),
        );
        prompt = prompt.option(label, mint(Meaning::Incident(summary.id)));
    }
    prompt.option("Cancel", mint(Meaning::Cancel))
}

pub(crate) fn confirm_close(picked: &IncidentSummary, end: DateTime<Utc>, tz: Tz) -> Prompt {
    let text = format!(
        "Close incident #{} ({}) at {}?",
        picked.id,
        picked.restaurant_name,
        local(end, tz),
    );
    Prompt::new(text)
        .option("Yes, close", mint(Meaning::ConfirmYes))
        .option("Cancel", mint(Meaning::ConfirmNo))
        .option("Back", mint(Meaning::Back))
}
