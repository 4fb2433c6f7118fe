//! Close-flow transitions.

use lossdesk_incidents::CloseDraft;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::event::InboundEvent;
use crate::prompt::Prompt;
use crate::render;
use crate::session::Flow;
use crate::state::CloseState;
use crate::token::Meaning;

use super::{END_HOUR_TEXT, END_MINUTE_TEXT, QUARTER_MINUTES, Step, USE_OPTIONS_HINT, selection};

fn stay(state: CloseState, draft: CloseDraft, prompt: Prompt) -> Step {
    Step::Stay(Flow::Close { state, draft }, prompt)
}

fn previous(state: CloseState) -> Option<CloseState> {
    use CloseState::*;
    match state {
        PickingOpenIncident => None,
        ChoosingEndDay => Some(PickingOpenIncident),
        ChoosingEndHour => Some(ChoosingEndDay),
        ChoosingEndMinute => Some(ChoosingEndHour),
        Confirming => Some(ChoosingEndMinute),
    }
}

impl Engine {
    pub(crate) async fn advance_close(
        &self,
        state: CloseState,
        mut draft: CloseDraft,
        event: &InboundEvent,
    ) -> Result<Step, EngineError> {
        use CloseState::*;

        match selection(event) {
            Some(Meaning::Cancel) => {
                tracing::info!("close flow cancelled");
                return Ok(Step::End(render::cancelled()));
            }
            Some(Meaning::Back) => {
                return match previous(state) {
                    Some(prev) => {
                        let prompt = self.render_close(prev, &draft).await?;
                        Ok(stay(prev, draft, prompt))
                    }
                    None => {
                        let prompt = self.render_close(state, &draft).await?;
                        Ok(stay(state, draft, prompt))
                    }
                };
            }
            _ => {}
        }

        match state {
            PickingOpenIncident => {
                if let Some(Meaning::Incident(id)) = selection(event) {
                    // Always a fresh listing: an incident closed by another
                    // session in the meantime must not be selectable.
                    let open = self.incidents().list_open(self.open_limit()).await?;
                    if let Some(summary) = open.iter().find(|s| s.id == id) {
                        draft.pick(summary.clone());
                        let prompt = render::day_options(self.today());
                        return Ok(stay(ChoosingEndDay, draft, prompt));
                    }
                    if open.is_empty() {
                        return Ok(Step::End(render::no_open_incidents()));
                    }
                    let prompt = render::open_incident_list(&open)
                        .hinted("That incident is no longer open.");
                    return Ok(stay(state, draft, prompt));
                }
                self.reject_close(state, draft).await
            }

            ChoosingEndDay => {
                if let Some(Meaning::Day(day)) = selection(event)
                    && render::day_window(self.today()).contains(&day)
                {
                    draft.set_day(day);
                    return Ok(stay(ChoosingEndHour, draft, render::hours(END_HOUR_TEXT)));
                }
                self.reject_close(state, draft).await
            }

            ChoosingEndHour => {
                if let Some(Meaning::Hour(hour)) = selection(event) {
                    draft.set_end_hour(hour);
                    let prompt = render::minutes(END_MINUTE_TEXT);
                    return Ok(stay(ChoosingEndMinute, draft, prompt));
                }
                self.reject_close(state, draft).await
            }

            ChoosingEndMinute => {
                if let Some(Meaning::Minute(minute)) = selection(event)
                    && QUARTER_MINUTES.contains(&minute)
                {
                    // Probe copy: reject without touching the draft when the
                    // chosen wall-clock time does not exist in the zone.
                    let mut next = draft.clone();
                    next.set_end_minute(minute);
                    return Ok(match next.end_timestamp(self.tz()) {
                        Ok(end) => {
                            let picked = next.picked().cloned().ok_or_else(|| {
                                EngineError::inconsistent("end step without a picked incident")
                            })?;
                            let prompt = render::confirm_close(&picked, end, self.tz());
                            stay(Confirming, next, prompt)
                        }
                        Err(err) => stay(
                            state,
                            draft,
                            render::minutes(END_MINUTE_TEXT).hinted(&err.to_string()),
                        ),
                    });
                }
                self.reject_close(state, draft).await
            }

            Confirming => match selection(event) {
                Some(Meaning::ConfirmYes) => {
                    let end = draft
                        .end_timestamp(self.tz())
                        .map_err(|e| EngineError::inconsistent(e.to_string()))?;
                    let id = draft
                        .picked()
                        .map(|s| s.id)
                        .ok_or_else(|| EngineError::inconsistent("confirm without a picked incident"))?;

                    if self.incidents().close(id, end).await? {
                        tracing::info!(incident = %id, "incident closed");
                        Ok(Step::End(render::closed(id)))
                    } else {
                        // Lost the race: someone else closed it first.
                        tracing::warn!(incident = %id, "close refused, row no longer open");
                        Ok(Step::End(render::already_closed(id)))
                    }
                }
                Some(Meaning::ConfirmNo) => {
                    tracing::info!("close flow cancelled at confirmation");
                    Ok(Step::End(render::cancelled()))
                }
                _ => self.reject_close(state, draft).await,
            },
        }
    }

    async fn reject_close(
        &self,
        state: CloseState,
        draft: CloseDraft,
    ) -> Result<Step, EngineError> {
        let prompt = self.render_close(state, &draft).await?.hinted(USE_OPTIONS_HINT);
        Ok(stay(state, draft, prompt))
    }

    /// Render the prompt a close-flow state presents.
    ///
    /// Entering the picking state always re-fetches the open listing.
    pub(crate) async fn render_close(
        &self,
        state: CloseState,
        draft: &CloseDraft,
    ) -> Result<Prompt, EngineError> {
        use CloseState::*;
        Ok(match state {
            PickingOpenIncident => {
                let open = self.incidents().list_open(self.open_limit()).await?;
                render::open_incident_list(&open)
            }
            ChoosingEndDay => render::day_options(self.today()),
            ChoosingEndHour => render::hours(END_HOUR_TEXT),
            ChoosingEndMinute => render::minutes(END_MINUTE_TEXT),
            Confirming => {
                let end = draft
                    .end_timestamp(self.tz())
                    .map_err(|e| EngineError::inconsistent(e.to_string()))?;
                let picked = draft.picked().ok_or_else(|| {
                    EngineError::inconsistent("confirm without a picked incident")
                })?;
                render::confirm_close(picked, end, self.tz())
            }
        })
    }
}
