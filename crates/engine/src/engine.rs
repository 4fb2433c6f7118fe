//! The workflow engine.
//!
//! One `Engine` serves every conversation. Stores and the session registry
//! are handed in as explicit components; the engine itself holds no lock
//! across an await point and relies on the transport delivering one event at
//! a time per conversation.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use lossdesk_core::ConversationId;
use lossdesk_incidents::{CloseDraft, IncidentDraft};
use lossdesk_infra::{Directory, IncidentStore};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::InboundEvent;
use crate::flows::{Step, selection};
use crate::prompt::Prompt;
use crate::render;
use crate::session::{Flow, Session, SessionStore};
use crate::state::{CloseState, CreateState};
use crate::token::Meaning;

pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    directory: Arc<dyn Directory>,
    incidents: Arc<dyn IncidentStore>,
    sessions: Arc<SessionStore>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        directory: Arc<dyn Directory>,
        incidents: Arc<dyn IncidentStore>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            directory,
            incidents,
            sessions,
        }
    }

    /// Replace the time source (tests pin it).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(crate) fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    pub(crate) fn incidents(&self) -> &Arc<dyn IncidentStore> {
        &self.incidents
    }

    pub(crate) fn tz(&self) -> Tz {
        self.config.timezone
    }

    pub(crate) fn open_limit(&self) -> usize {
        self.config.open_list_limit
    }

    /// Today in the business time zone.
    pub(crate) fn today(&self) -> NaiveDate {
        self.clock
            .now_utc()
            .with_timezone(&self.config.timezone)
            .date_naive()
    }

    /// Handle one inbound event for a conversation and return the next
    /// prompt to present.
    ///
    /// Recoverable input problems answer with a re-prompt; a store failure
    /// tears the session down first and then propagates, so no dangling
    /// session survives a failed commit.
    pub async fn handle_event(
        &self,
        conversation: ConversationId,
        event: InboundEvent,
    ) -> Result<Prompt, EngineError> {
        // Flow-entry and menu tokens win over whatever session exists
        // (last-writer-wins; no session survives a fresh flow entry).
        match selection(&event) {
            Some(Meaning::NewIncident) => return self.start_create(conversation).await,
            Some(Meaning::CloseIncident) => return self.start_close(conversation).await,
            Some(Meaning::MainMenu) => {
                self.sessions.remove(conversation);
                return Ok(render::main_menu());
            }
            _ => {}
        }

        let Some(mut session) = self.sessions.get(conversation) else {
            // No session and not a flow entry: offer the menu.
            return Ok(render::main_menu());
        };

        let result = match session.flow().clone() {
            Flow::Create { state, draft } => self.advance_create(state, draft, &event).await,
            Flow::Close { state, draft } => self.advance_close(state, draft, &event).await,
        };

        match result {
            Ok(Step::Stay(flow, prompt)) => {
                session.set_flow(flow);
                session.touch(self.clock.now_utc());
                self.sessions.put(session);
                Ok(prompt)
            }
            Ok(Step::End(prompt)) => {
                self.sessions.remove(conversation);
                Ok(prompt)
            }
            Err(err) => {
                // Never leave a half-advanced session behind a failure.
                self.sessions.remove(conversation);
                tracing::error!(
                    conversation = %conversation,
                    session = %session.id(),
                    error = %err,
                    "event handling failed, session discarded"
                );
                Err(err)
            }
        }
    }

    async fn start_create(&self, conversation: ConversationId) -> Result<Prompt, EngineError> {
        self.sessions.remove(conversation);

        let managers = self.directory.list_managers().await?;
        if managers.is_empty() {
            return Ok(render::no_managers());
        }

        let session = Session::new(
            conversation,
            Flow::Create {
                state: CreateState::ChoosingManager,
                draft: IncidentDraft::new(),
            },
            self.clock.now_utc(),
        );
        tracing::info!(conversation = %conversation, session = %session.id(), "create flow started");
        self.sessions.put(session);
        Ok(render::manager_list(&managers))
    }

    async fn start_close(&self, conversation: ConversationId) -> Result<Prompt, EngineError> {
        self.sessions.remove(conversation);

        let open = self.incidents.list_open(self.config.open_list_limit).await?;
        if open.is_empty() {
            return Ok(render::no_open_incidents());
        }

        let session = Session::new(
            conversation,
            Flow::Close {
                state: CloseState::PickingOpenIncident,
                draft: CloseDraft::new(),
            },
            self.clock.now_utc(),
        );
        tracing::info!(conversation = %conversation, session = %session.id(), "close flow started");
        self.sessions.put(session);
        Ok(render::open_incident_list(&open))
    }
}
