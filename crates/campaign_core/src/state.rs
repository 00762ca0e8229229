use std::time::Duration;

use chrono::NaiveTime;

use crate::view_model::{AppViewModel, SessionView};
use crate::{
    extract_with, project, CampaignRequest, ExtractionStrategy, FormField, Limits, PollPhase,
    PollSession, ProjectorEvent, RecipientSet, TestEmailRequest, UiState, DEFAULT_POLL_INTERVAL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub limits: Limits,
    pub poll_interval: Duration,
    pub strategy: ExtractionStrategy,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            strategy: ExtractionStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Form {
    pub(crate) sender_email: String,
    pub(crate) sender_name: String,
    pub(crate) subject: String,
    pub(crate) body: String,
    pub(crate) is_html: bool,
    pub(crate) recipients_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Campaign {
    #[default]
    Idle,
    /// Request sent, waiting for the task id.
    Submitting,
    Tracking(PollSession),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) settings: CoreSettings,
    pub(crate) form: Form,
    pub(crate) recipients: RecipientSet,
    pub(crate) ui: UiState,
    pub(crate) campaign: Campaign,
    pub(crate) pending_confirmation: Option<usize>,
    pub(crate) pending_test: Option<String>,
    /// Inline validation message; never logged.
    pub(crate) notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn recipients(&self) -> &RecipientSet {
        &self.recipients
    }

    pub fn poll_phase(&self) -> Option<PollPhase> {
        match &self.campaign {
            Campaign::Tracking(session) => Some(session.phase()),
            Campaign::Idle | Campaign::Submitting => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let count = self.recipients.len();
        let over_limit = count > self.settings.limits.max_recipients;
        let mut recipient_label = format!("{count} emails detected");
        if over_limit {
            recipient_label.push_str(" - Exceeds limit!");
        }
        let session = match &self.campaign {
            Campaign::Idle => SessionView::Idle,
            Campaign::Submitting => SessionView::Submitting,
            Campaign::Tracking(session) => SessionView::Tracking {
                task_id: session.handle().task_id.clone(),
                campaign_id: session.handle().campaign_id,
                phase: session.phase(),
            },
        };
        let form_enabled = self.ui.form_enabled;
        let awaiting_answer = self.pending_confirmation.is_some();

        AppViewModel {
            recipient_count: count,
            recipient_label,
            send_enabled: form_enabled && !over_limit && !awaiting_answer,
            test_enabled: form_enabled && self.pending_test.is_none(),
            form_enabled,
            percent: self.ui.percent,
            sent: self.ui.sent,
            failed: self.ui.failed,
            log: self.ui.log.iter().cloned().collect(),
            notice: self.notice.clone(),
            confirmation: self
                .pending_confirmation
                .map(|n| format!("You are about to send {n} emails. Continue?")),
            test_pending: self.pending_test.is_some(),
            session,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn apply(&mut self, event: ProjectorEvent, at: NaiveTime) {
        let prior = std::mem::take(&mut self.ui);
        self.ui = project(prior, event, at);
        self.mark_dirty();
    }

    pub(crate) fn edit(&mut self, field: FormField) {
        match field {
            FormField::SenderEmail(value) => self.form.sender_email = value,
            FormField::SenderName(value) => self.form.sender_name = value,
            FormField::Subject(value) => self.form.subject = value,
            FormField::Body(value) => self.form.body = value,
            FormField::IsHtml(value) => self.form.is_html = value,
            FormField::Recipients(value) => {
                self.recipients = extract_with(&value, self.settings.strategy);
                self.form.recipients_text = value;
            }
        }
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn campaign_request(&self) -> CampaignRequest {
        CampaignRequest {
            sender_email: self.form.sender_email.clone(),
            sender_name: self.form.sender_name.clone(),
            recipients: self.form.recipients_text.clone(),
            subject: self.form.subject.clone(),
            content: self.form.body.clone(),
            is_html: self.form.is_html,
        }
    }

    pub(crate) fn test_request(&self, recipient_email: String) -> TestEmailRequest {
        TestEmailRequest {
            sender_email: self.form.sender_email.clone(),
            sender_name: self.form.sender_name.clone(),
            recipient_email,
            subject: self.form.subject.clone(),
            content: self.form.body.clone(),
            is_html: self.form.is_html,
        }
    }
}
