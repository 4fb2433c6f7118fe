//! `lossdesk-incidents` — the sales-loss incident domain.
//!
//! Record shapes, the wizard drafts that accumulate user choices, and the
//! local-time arithmetic used to turn wizard choices into timestamps.

pub mod draft;
pub mod incident;
pub mod local_time;

pub use draft::{CloseDraft, CloseMode, IncidentDraft};
pub use incident::{
    COMMENT_PLACEHOLDER, Incident, IncidentStatus, IncidentSummary, LossReason, NewIncident,
    normalize_comment,
};
