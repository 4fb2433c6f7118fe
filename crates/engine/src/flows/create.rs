//! Create-flow transitions.

use lossdesk_core::Amount;
use lossdesk_incidents::{CloseMode, IncidentDraft, normalize_comment};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::event::InboundEvent;
use crate::prompt::Prompt;
use crate::render;
use crate::session::Flow;
use crate::state::CreateState;
use crate::token::Meaning;

use super::{
    END_HOUR_TEXT, END_MINUTE_TEXT, QUARTER_MINUTES, START_HOUR_TEXT, START_MINUTE_TEXT, Step,
    USE_OPTIONS_HINT, selection,
};

fn stay(state: CreateState, draft: IncidentDraft, prompt: Prompt) -> Step {
    Step::Stay(Flow::Create { state, draft }, prompt)
}

/// The state immediately before `state`, given the path the draft took.
///
/// The reason step is reached either from the end-minute step (close now)
/// or straight from the close-mode step (close later).
fn previous(state: CreateState, draft: &IncidentDraft) -> Option<CreateState> {
    use CreateState::*;
    match state {
        ChoosingManager => None,
        ChoosingRestaurant => Some(ChoosingManager),
        ChoosingDay => Some(ChoosingRestaurant),
        ChoosingStartHour => Some(ChoosingDay),
        ChoosingStartMinute => Some(ChoosingStartHour),
        ChoosingCloseMode => Some(ChoosingStartMinute),
        ChoosingEndHour => Some(ChoosingCloseMode),
        ChoosingEndMinute => Some(ChoosingEndHour),
        ChoosingReason => Some(match draft.close_mode() {
            Some(CloseMode::Now) => ChoosingEndMinute,
            _ => ChoosingCloseMode,
        }),
        EnteringComment => Some(ChoosingReason),
        ChoosingAmount => Some(EnteringComment),
        Confirming => Some(ChoosingAmount),
    }
}

impl Engine {
    pub(crate) async fn advance_create(
        &self,
        state: CreateState,
        mut draft: IncidentDraft,
        event: &InboundEvent,
    ) -> Result<Step, EngineError> {
        use CreateState::*;

        match selection(event) {
            Some(Meaning::Cancel) => {
                tracing::info!("create flow cancelled");
                return Ok(Step::End(render::cancelled()));
            }
            Some(Meaning::Back) => {
                return match previous(state, &draft) {
                    Some(prev) => {
                        let prompt = self.render_create(prev, &draft).await?;
                        Ok(stay(prev, draft, prompt))
                    }
                    // Nothing before the first step; re-issue its prompt.
                    None => {
                        let prompt = self.render_create(state, &draft).await?;
                        Ok(stay(state, draft, prompt))
                    }
                };
            }
            _ => {}
        }

        match state {
            ChoosingManager => {
                if let Some(Meaning::Manager(id)) = selection(event) {
                    // Membership is checked against a fresh fetch; a stale
                    // selection falls out naturally.
                    let managers = self.directory().list_managers().await?;
                    if let Some(manager) = managers.iter().find(|m| m.id == id) {
                        let restaurants = self.directory().list_restaurants(id).await?;
                        if restaurants.is_empty() {
                            let prompt = render::manager_list(&managers)
                                .hinted("That manager has no restaurants assigned.");
                            return Ok(stay(state, draft, prompt));
                        }
                        draft.set_manager(manager.id, manager.name.clone());
                        let prompt = render::restaurant_list(&restaurants);
                        return Ok(stay(ChoosingRestaurant, draft, prompt));
                    }
                    let prompt = render::manager_list(&managers).hinted(USE_OPTIONS_HINT);
                    return Ok(stay(state, draft, prompt));
                }
                self.reject_create(state, draft).await
            }

            ChoosingRestaurant => {
                let manager_id = draft
                    .manager()
                    .map(|(id, _)| id)
                    .ok_or_else(|| EngineError::inconsistent("restaurant step without a manager"))?;
                if let Some(Meaning::Restaurant(id)) = selection(event) {
                    let restaurants = self.directory().list_restaurants(manager_id).await?;
                    if let Some(restaurant) = restaurants.iter().find(|r| r.id == id) {
                        draft.set_restaurant(restaurant.id, restaurant.name.clone());
                        let prompt = render::day_options(self.today());
                        return Ok(stay(ChoosingDay, draft, prompt));
                    }
                    let prompt = render::restaurant_list(&restaurants).hinted(USE_OPTIONS_HINT);
                    return Ok(stay(state, draft, prompt));
                }
                self.reject_create(state, draft).await
            }

            ChoosingDay => {
                if let Some(Meaning::Day(day)) = selection(event)
                    && render::day_window(self.today()).contains(&day)
                {
                    draft.set_day(day);
                    return Ok(stay(ChoosingStartHour, draft, render::hours(START_HOUR_TEXT)));
                }
                self.reject_create(state, draft).await
            }

            ChoosingStartHour => {
                if let Some(Meaning::Hour(hour)) = selection(event) {
                    draft.set_start_hour(hour);
                    let prompt = render::minutes(START_MINUTE_TEXT);
                    return Ok(stay(ChoosingStartMinute, draft, prompt));
                }
                self.reject_create(state, draft).await
            }

            ChoosingStartMinute => {
                if let Some(Meaning::Minute(minute)) = selection(event)
                    && QUARTER_MINUTES.contains(&minute)
                {
                    draft.set_start_minute(minute);
                    return Ok(stay(ChoosingCloseMode, draft, render::close_mode()));
                }
                self.reject_create(state, draft).await
            }

            ChoosingCloseMode => {
                if let Some(Meaning::CloseMode(mode)) = selection(event) {
                    draft.set_close_mode(mode);
                    return Ok(match mode {
                        CloseMode::Now => {
                            stay(ChoosingEndHour, draft, render::hours(END_HOUR_TEXT))
                        }
                        CloseMode::Later => stay(ChoosingReason, draft, render::reasons()),
                    });
                }
                self.reject_create(state, draft).await
            }

            ChoosingEndHour => {
                if let Some(Meaning::Hour(hour)) = selection(event) {
                    draft.set_end_hour(hour);
                    let prompt = render::minutes(END_MINUTE_TEXT);
                    return Ok(stay(ChoosingEndMinute, draft, prompt));
                }
                self.reject_create(state, draft).await
            }

            ChoosingEndMinute => {
                if let Some(Meaning::Minute(minute)) = selection(event)
                    && QUARTER_MINUTES.contains(&minute)
                {
                    draft.set_end_minute(minute);
                    return Ok(stay(ChoosingReason, draft, render::reasons()));
                }
                self.reject_create(state, draft).await
            }

            ChoosingReason => {
                if let Some(Meaning::Reason(reason)) = selection(event) {
                    draft.set_reason(reason);
                    return Ok(stay(EnteringComment, draft, render::comment_prompt()));
                }
                self.reject_create(state, draft).await
            }

            EnteringComment => {
                if let InboundEvent::Text(text) = event {
                    draft.set_comment(normalize_comment(text));
                    return Ok(stay(ChoosingAmount, draft, render::amounts()));
                }
                self.reject_create(state, draft).await
            }

            ChoosingAmount => match (selection(event), event) {
                (Some(Meaning::AmountPreset(value)), _) => match Amount::new(value) {
                    Ok(amount) => Ok(self.accept_amount(draft, amount)),
                    Err(err) => {
                        Ok(stay(state, draft, render::amounts().hinted(&err.to_string())))
                    }
                },
                (Some(Meaning::AmountOther), _) => {
                    Ok(stay(state, draft, render::amount_free_entry()))
                }
                (None, InboundEvent::Text(text)) => match Amount::parse(text) {
                    Ok(amount) => Ok(self.accept_amount(draft, amount)),
                    Err(_) => {
                        let prompt = render::amounts().hinted("Enter a positive whole number.");
                        Ok(stay(state, draft, prompt))
                    }
                },
                _ => self.reject_create(state, draft).await,
            },

            Confirming => match selection(event) {
                Some(Meaning::ConfirmYes) => {
                    let record = draft
                        .into_record(self.tz())
                        .map_err(|e| EngineError::inconsistent(e.to_string()))?;
                    let status = record.status();
                    let id = self.incidents().insert(record).await?;
                    tracing::info!(incident = %id, status = status.as_str(), "incident saved");
                    Ok(Step::End(render::saved(id, status)))
                }
                Some(Meaning::ConfirmNo) => {
                    tracing::info!("create flow cancelled at confirmation");
                    Ok(Step::End(render::cancelled()))
                }
                _ => self.reject_create(state, draft).await,
            },
        }
    }

    /// Accept the amount and move to confirmation.
    ///
    /// The record is built on a probe copy first: if the drafted times turn
    /// out not to exist in the business zone, the event is rejected and the
    /// draft stays as it was.
    fn accept_amount(&self, draft: IncidentDraft, amount: Amount) -> Step {
        let mut next = draft.clone();
        next.set_amount(amount);
        match next.into_record(self.tz()) {
            Ok(record) => {
                let prompt = render::confirm_create(&next, &record, self.tz());
                stay(CreateState::Confirming, next, prompt)
            }
            Err(err) => stay(
                CreateState::ChoosingAmount,
                draft,
                render::amounts().hinted(&err.to_string()),
            ),
        }
    }

    /// Reject the event: same state, same draft, same prompt plus a hint.
    async fn reject_create(
        &self,
        state: CreateState,
        draft: IncidentDraft,
    ) -> Result<Step, EngineError> {
        let prompt = self.render_create(state, &draft).await?.hinted(USE_OPTIONS_HINT);
        Ok(stay(state, draft, prompt))
    }

    /// Render the prompt a state presents, from current draft values.
    ///
    /// Only lists that depend on earlier choices are (re-)fetched: managers
    /// always, restaurants per the drafted manager.
    pub(crate) async fn render_create(
        &self,
        state: CreateState,
        draft: &IncidentDraft,
    ) -> Result<Prompt, EngineError> {
        use CreateState::*;
        Ok(match state {
            ChoosingManager => render::manager_list(&self.directory().list_managers().await?),
            ChoosingRestaurant => {
                let manager_id = draft
                    .manager()
                    .map(|(id, _)| id)
                    .ok_or_else(|| EngineError::inconsistent("restaurant step without a manager"))?;
                render::restaurant_list(&self.directory().list_restaurants(manager_id).await?)
            }
            ChoosingDay => render::day_options(self.today()),
            ChoosingStartHour => render::hours(START_HOUR_TEXT),
            ChoosingStartMinute => render::minutes(START_MINUTE_TEXT),
            ChoosingCloseMode => render::close_mode(),
            ChoosingEndHour => render::hours(END_HOUR_TEXT),
            ChoosingEndMinute => render::minutes(END_MINUTE_TEXT),
            ChoosingReason => render::reasons(),
            EnteringComment => render::comment_prompt(),
            ChoosingAmount => render::amounts(),
            Confirming => {
                let record = draft
                    .into_record(self.tz())
                    .map_err(|e| EngineError::inconsistent(e.to_string()))?;
                render::confirm_create(draft, &record, self.tz())
            }
        })
    }
}
