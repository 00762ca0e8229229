//! Campaign core: pure state machine, recipient handling and view-model helpers.
mod campaign;
mod effect;
mod error;
mod guard;
mod msg;
mod poller;
mod projector;
mod recipients;
mod state;
mod update;
mod view_model;

pub use campaign::{
    CampaignHandle, CampaignId, CampaignRequest, TaskId, TaskState, TaskStatus, TestEmailRequest,
};
pub use effect::Effect;
pub use error::{CampaignError, SubmissionContext};
pub use guard::{can_submit, Limits, SubmitVerdict, DEFAULT_MAX_RECIPIENTS, DEFAULT_WARN_THRESHOLD};
pub use msg::{FormField, Msg};
pub use poller::{PollPhase, PollSession, PollStep, Transition, DEFAULT_POLL_INTERVAL};
pub use projector::{project, LogLine, LogSeverity, ProjectorEvent, UiState};
pub use recipients::{extract, extract_with, is_valid_address, ExtractionStrategy, RecipientSet};
pub use state::{AppState, CoreSettings};
pub use update::{update, update_at};
pub use view_model::{AppViewModel, SessionView};
