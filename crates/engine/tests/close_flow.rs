//! Black-box walkthroughs of the close flow against in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Almaty;

use lossdesk_core::{Amount, ConversationId, IncidentId, ManagerId, RestaurantId};
use lossdesk_engine::{Engine, EngineConfig, FixedClock, InboundEvent, Prompt, SessionStore};
use lossdesk_incidents::{COMMENT_PLACEHOLDER, IncidentStatus, LossReason, NewIncident};
use lossdesk_infra::{IncidentStore, InMemoryDirectory, InMemoryIncidentStore};

/// Clock pinned to 2025-03-10 12:00 in the business zone (Asia/Almaty).
fn fixtures() -> (Engine, Arc<InMemoryIncidentStore>) {
    let mut dir = InMemoryDirectory::new();
    dir.add_manager(ManagerId::new(1), "Ivanov");
    dir.add_restaurant(RestaurantId::new(10), "Restaurant-1");
    dir.assign(ManagerId::new(1), RestaurantId::new(10));

    let directory = Arc::new(dir);
    let incidents = Arc::new(InMemoryIncidentStore::new(directory.clone()));
    let engine = Engine::new(
        EngineConfig::default(),
        directory,
        incidents.clone(),
        Arc::new(SessionStore::new()),
    )
    .with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap(),
    )));
    (engine, incidents)
}

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Almaty
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Seed one open incident started yesterday 18:00 local; returns its id.
async fn seed_open(incidents: &InMemoryIncidentStore) -> IncidentId {
    incidents
        .insert(NewIncident {
            manager_id: ManagerId::new(1),
            restaurant_id: RestaurantId::new(10),
            started_at: local(2025, 3, 9, 18, 0),
            ended_at: None,
            reason: LossReason::External,
            comment: COMMENT_PLACEHOLDER.to_string(),
            amount: Amount::new(50_000).unwrap(),
        })
        .await
        .unwrap()
}

async fn send(engine: &Engine, chat: ConversationId, event: InboundEvent) -> Prompt {
    engine.handle_event(chat, event).await.unwrap()
}

async fn pick(engine: &Engine, chat: ConversationId, prompt: &Prompt, label: &str) -> Prompt {
    let option = prompt
        .find_option(label)
        .unwrap_or_else(|| panic!("prompt {:?} has no option {label:?}", prompt.text));
    send(engine, chat, InboundEvent::select(option.token.clone())).await
}

/// Pick an option whose label starts with `prefix` (the incident rows carry
/// composite labels).
async fn pick_starting(
    engine: &Engine,
    chat: ConversationId,
    prompt: &Prompt,
    prefix: &str,
) -> Prompt {
    let option = prompt
        .options
        .iter()
        .find(|o| o.label.starts_with(prefix))
        .unwrap_or_else(|| panic!("prompt {:?} has no option {prefix:?}…", prompt.text));
    send(engine, chat, InboundEvent::select(option.token.clone())).await
}

/// Drive one conversation to the close confirmation for incident `prefix`.
async fn drive_to_confirm(
    engine: &Engine,
    chat: ConversationId,
    prefix: &str,
    day_label: &str,
    hour: &str,
    minute: &str,
) -> Prompt {
    let menu = send(engine, chat, InboundEvent::text("hi")).await;
    let list = pick(engine, chat, &menu, "Close an incident").await;
    let days = pick_starting(engine, chat, &list, prefix).await;
    let hours = pick(engine, chat, &days, day_label).await;
    let minutes = pick(engine, chat, &hours, hour).await;
    pick(engine, chat, &minutes, minute).await
}

#[tokio::test]
async fn closing_sets_the_end_and_flips_the_status() {
    let (engine, incidents) = fixtures();
    let id = seed_open(&incidents).await;
    let chat = ConversationId::new(1);

    let confirm = drive_to_confirm(&engine, chat, "#1", "Today", "01", "00").await;
    assert!(confirm.text.contains("Close incident #1"));
    assert!(confirm.text.contains("10.03 01:00"));

    let done = pick(&engine, chat, &confirm, "Yes, close").await;
    assert!(done.text.contains("closed"));
    assert!(engine.sessions().is_empty());

    let row = incidents.get(id).unwrap();
    assert_eq!(row.status, IncidentStatus::Closed);
    // Started yesterday 18:00, ended today 01:00: a 7-hour overnight run.
    assert_eq!(row.ended_at, Some(local(2025, 3, 10, 1, 0)));
    assert_eq!(row.duration_minutes(), Some(7 * 60));
}

#[tokio::test]
async fn end_chosen_before_the_start_rolls_forward_one_day() {
    let (engine, incidents) = fixtures();
    let id = seed_open(&incidents).await;
    let chat = ConversationId::new(1);

    // Yesterday 01:00 is before yesterday's 18:00 start; the engine rolls it
    // to 01:00 the next day instead of producing a negative duration.
    let confirm = drive_to_confirm(&engine, chat, "#1", "Yesterday", "01", "00").await;
    assert!(confirm.text.contains("10.03 01:00"));

    pick(&engine, chat, &confirm, "Yes, close").await;
    let row = incidents.get(id).unwrap();
    assert_eq!(row.ended_at, Some(local(2025, 3, 10, 1, 0)));
    assert_eq!(row.duration_minutes(), Some(7 * 60));
}

#[tokio::test]
async fn losing_the_close_race_reports_already_closed() {
    let (engine, incidents) = fixtures();
    seed_open(&incidents).await;
    let first = ConversationId::new(1);
    let second = ConversationId::new(2);

    let confirm_a = drive_to_confirm(&engine, first, "#1", "Today", "01", "00").await;
    let confirm_b = drive_to_confirm(&engine, second, "#1", "Today", "02", "00").await;

    let won = pick(&engine, first, &confirm_a, "Yes, close").await;
    assert!(won.text.contains("Incident #1 closed"));

    let lost = pick(&engine, second, &confirm_b, "Yes, close").await;
    assert!(lost.text.contains("already closed"));
    assert!(engine.sessions().is_empty());

    // The winner's timestamp stuck.
    let row = incidents.get(IncidentId::new(1)).unwrap();
    assert_eq!(row.ended_at, Some(local(2025, 3, 10, 1, 0)));
}

#[tokio::test]
async fn stale_pick_re_renders_a_fresh_list() {
    let (engine, incidents) = fixtures();
    let first = seed_open(&incidents).await;
    let second = incidents
        .insert(NewIncident {
            manager_id: ManagerId::new(1),
            restaurant_id: RestaurantId::new(10),
            started_at: local(2025, 3, 10, 8, 0),
            ended_at: None,
            reason: LossReason::NoProduct,
            comment: COMMENT_PLACEHOLDER.to_string(),
            amount: Amount::new(25_000).unwrap(),
        })
        .await
        .unwrap();
    let chat = ConversationId::new(1);

    let menu = send(&engine, chat, InboundEvent::text("hi")).await;
    let list = pick(&engine, chat, &menu, "Close an incident").await;
    assert_eq!(list.options.len(), 2 + 1); // two rows + cancel

    // Incident #1 gets closed by someone else while the list is on screen.
    assert!(incidents.close(first, local(2025, 3, 10, 9, 0)).await.unwrap());

    let refreshed = pick_starting(&engine, chat, &list, "#1").await;
    assert!(refreshed.text.contains("no longer open"));
    let labels: Vec<&str> = refreshed
        .options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert!(labels.iter().any(|l| l.starts_with("#2")));
    assert!(!labels.iter().any(|l| l.starts_with("#1")));

    // The surviving row still closes normally.
    let days = pick_starting(&engine, chat, &refreshed, "#2").await;
    let hours = pick(&engine, chat, &days, "Today").await;
    let minutes = pick(&engine, chat, &hours, "11").await;
    let confirm = pick(&engine, chat, &minutes, "15").await;
    pick(&engine, chat, &confirm, "Yes, close").await;
    assert_eq!(
        incidents.get(second).unwrap().status,
        IncidentStatus::Closed
    );
}

#[tokio::test]
async fn back_walks_to_a_fresh_open_listing() {
    let (engine, incidents) = fixtures();
    seed_open(&incidents).await;
    let chat = ConversationId::new(1);

    let menu = send(&engine, chat, InboundEvent::text("hi")).await;
    let list = pick(&engine, chat, &menu, "Close an incident").await;
    let days = pick_starting(&engine, chat, &list, "#1").await;
    let hours = pick(&engine, chat, &days, "Today").await;

    let days_again = pick(&engine, chat, &hours, "Back").await;
    assert!(days_again.text.contains("Which day?"));
    let list_again = pick(&engine, chat, &days_again, "Back").await;
    assert!(list_again.text.contains("Pick the open incident:"));
}

#[tokio::test]
async fn declining_the_confirmation_leaves_the_incident_open() {
    let (engine, incidents) = fixtures();
    let id = seed_open(&incidents).await;
    let chat = ConversationId::new(1);

    let confirm = drive_to_confirm(&engine, chat, "#1", "Today", "01", "00").await;
    let done = pick(&engine, chat, &confirm, "Cancel").await;
    assert!(done.text.contains("Cancelled"));
    assert!(engine.sessions().is_empty());
    assert_eq!(incidents.get(id).unwrap().status, IncidentStatus::Open);
}

#[tokio::test]
async fn no_open_incidents_refuses_flow_entry() {
    let (engine, _) = fixtures();
    let chat = ConversationId::new(1);

    let menu = send(&engine, chat, InboundEvent::text("hi")).await;
    let refused = pick(&engine, chat, &menu, "Close an incident").await;
    assert!(refused.text.contains("No open incidents"));
    assert!(engine.sessions().is_empty());
}
