use std::collections::VecDeque;

use chrono::NaiveTime;

use crate::{CampaignError, SubmissionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Local time at which the line was projected.
    pub at: NaiveTime,
    pub text: String,
    pub severity: LogSeverity,
}

/// Everything the campaign panel shows. Only [`project`] produces new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Recipient count pinned when the campaign was submitted.
    pub total: u64,
    pub percent: u8,
    pub sent: u64,
    pub failed: u64,
    /// Newest first.
    pub log: VecDeque<LogLine>,
    pub form_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            total: 0,
            percent: 0,
            sent: 0,
            failed: 0,
            log: VecDeque::new(),
            form_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectorEvent {
    Submitted { total: u64 },
    ProgressUpdate { current: u64, sent: u64, failed: u64 },
    Completed,
    Failed { status: String },
    Errored { message: String },
    SubmissionFailed { message: String },
    StatusLine { text: String, severity: LogSeverity },
}

impl ProjectorEvent {
    /// Terminal events hand the form back to the user.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProjectorEvent::Completed
                | ProjectorEvent::Failed { .. }
                | ProjectorEvent::Errored { .. }
                | ProjectorEvent::SubmissionFailed { .. }
        )
    }
}

pub fn project(prior: UiState, event: ProjectorEvent, at: NaiveTime) -> UiState {
    let mut next = prior;
    match event {
        ProjectorEvent::Submitted { total } => {
            next.total = total;
            next.percent = 0;
            next.sent = 0;
            next.failed = 0;
            next.form_enabled = false;
            push_line(
                &mut next,
                at,
                format!("Starting bulk email send to {total} recipients..."),
                LogSeverity::Info,
            );
        }
        ProjectorEvent::ProgressUpdate {
            current,
            sent,
            failed,
        } => {
            next.percent = percent_of(current, next.total);
            next.sent = sent;
            next.failed = failed;
        }
        ProjectorEvent::Completed => {
            next.form_enabled = true;
            push_line(&mut next, at, "Bulk email send completed!".to_string(), LogSeverity::Info);
            let summary = format!(
                "Successfully sent {} emails with {} failures.",
                next.sent, next.failed
            );
            push_line(&mut next, at, summary, LogSeverity::Info);
        }
        ProjectorEvent::Failed { status } => {
            next.form_enabled = true;
            push_line(
                &mut next,
                at,
                format!("Bulk email send failed: {status}"),
                LogSeverity::Error,
            );
        }
        ProjectorEvent::Errored { message } => {
            next.form_enabled = true;
            let text = CampaignError::Polling(message).to_string();
            push_line(&mut next, at, text, LogSeverity::Error);
        }
        ProjectorEvent::SubmissionFailed { message } => {
            next.form_enabled = true;
            let text = CampaignError::Submission {
                context: SubmissionContext::Campaign,
                message,
            }
            .to_string();
            push_line(&mut next, at, text, LogSeverity::Error);
        }
        ProjectorEvent::StatusLine { text, severity } => {
            push_line(&mut next, at, text, severity);
        }
    }
    next
}

fn push_line(state: &mut UiState, at: NaiveTime, text: String, severity: LogSeverity) {
    state.log.push_front(LogLine { at, text, severity });
}

/// Rounded share of `total`, capped at 100.
fn percent_of(current: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (current as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}
