use crate::{CampaignId, LogLine, PollPhase, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionView {
    #[default]
    Idle,
    Submitting,
    Tracking {
        task_id: TaskId,
        campaign_id: CampaignId,
        phase: PollPhase,
    },
}

impl SessionView {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionView::Tracking { phase, .. } if phase.is_terminal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub recipient_count: usize,
    pub recipient_label: String,
    pub send_enabled: bool,
    pub test_enabled: bool,
    pub form_enabled: bool,
    pub percent: u8,
    pub sent: u64,
    pub failed: u64,
    /// Newest first.
    pub log: Vec<LogLine>,
    pub notice: Option<String>,
    pub confirmation: Option<String>,
    pub test_pending: bool,
    pub session: SessionView,
    pub dirty: bool,
}
