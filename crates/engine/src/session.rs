//! Sessions and the session store.
//!
//! A session is the live state-machine instance plus draft for one ongoing
//! conversation. The store is an explicit component handed to the engine —
//! no ambient global state — keyed by conversation id with last-writer-wins
//! replacement on a fresh flow entry.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use lossdesk_core::ConversationId;
use lossdesk_incidents::{CloseDraft, IncidentDraft};

use crate::state::{CloseState, CreateState};

/// Which workflow a session is running, with its state and draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Create {
        state: CreateState,
        draft: IncidentDraft,
    },
    Close {
        state: CloseState,
        draft: CloseDraft,
    },
}

/// The live state-machine instance for one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    conversation: ConversationId,
    flow: Flow,
    last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(conversation: ConversationId, flow: Flow, now: DateTime<Utc>) -> Self {
        Self {
            // Instance id for log correlation only (v7: time-ordered).
            id: Uuid::now_v7(),
            conversation,
            flow,
            last_seen: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation(&self) -> ConversationId {
        self.conversation
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn set_flow(&mut self, flow: Flow) {
        self.flow = flow;
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }
}

/// Process-wide session registry, keyed by conversation.
///
/// The engine never expires sessions on its own; an embedding process that
/// wants eviction calls [`SessionStore::purge_idle`] on its own schedule.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<ConversationId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, conversation: ConversationId) -> Option<Session> {
        self.inner.read().unwrap().get(&conversation).cloned()
    }

    /// Insert or replace the conversation's session; returns the replaced one.
    pub fn put(&self, session: Session) -> Option<Session> {
        self.inner
            .write()
            .unwrap()
            .insert(session.conversation(), session)
    }

    pub fn remove(&self, conversation: ConversationId) -> Option<Session> {
        self.inner.write().unwrap().remove(&conversation)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle for longer than `max_idle`; returns how many went.
    pub fn purge_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut inner = self.inner.write().unwrap();
        let before = inner.len();
        inner.retain(|_, session| now - session.last_seen() <= max_idle);
        before - inner.len()
    }
}
