use chrono::{Local, NaiveTime};

use crate::state::Campaign;
use crate::{
    can_submit, is_valid_address, AppState, CampaignError, Effect, LogSeverity, Msg, PollSession,
    PollStep, ProjectorEvent, SubmissionContext, SubmitVerdict, Transition,
};

/// Pure update function: applies a message to state and returns any effects.
/// Log lines are stamped with the local wall clock.
pub fn update(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    update_at(state, msg, Local::now().time())
}

/// Like [`update`], with log lines stamped at `at`.
pub fn update_at(mut state: AppState, msg: Msg, at: NaiveTime) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormEdited(field) => {
            // A disabled form cannot be edited; the submitted request is frozen.
            if state.ui.form_enabled && state.pending_confirmation.is_none() {
                state.edit(field);
            }
            Vec::new()
        }
        Msg::SendClicked => {
            if !state.ui.form_enabled || state.pending_confirmation.is_some() {
                return (state, Vec::new());
            }
            let count = state.recipients.len();
            match can_submit(count, &state.settings.limits) {
                SubmitVerdict::NoRecipients => {
                    state.notice = Some(CampaignError::no_recipients().to_string());
                    state.mark_dirty();
                    Vec::new()
                }
                SubmitVerdict::ExceedsMax { count, max } => {
                    state.notice = Some(CampaignError::LimitExceeded { count, max }.to_string());
                    state.mark_dirty();
                    Vec::new()
                }
                SubmitVerdict::NeedsConfirmation { count } => {
                    state.pending_confirmation = Some(count);
                    state.mark_dirty();
                    Vec::new()
                }
                SubmitVerdict::Clear { count } => start_submission(&mut state, count, at),
            }
        }
        Msg::ConfirmationAnswered { confirmed } => match state.pending_confirmation.take() {
            Some(count) => {
                state.mark_dirty();
                if confirmed {
                    start_submission(&mut state, count, at)
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        },
        Msg::TestEmailRequested { recipient } => {
            if !state.ui.form_enabled || state.pending_test.is_some() {
                return (state, Vec::new());
            }
            let mut recipient = recipient.trim().to_string();
            if recipient.is_empty() {
                recipient = state.form.sender_email.trim().to_string();
            }
            if !is_valid_address(&recipient) {
                state.notice = Some(CampaignError::invalid_test_address().to_string());
                state.mark_dirty();
                return (state, Vec::new());
            }
            state.notice = None;
            state.pending_test = Some(recipient.clone());
            state.apply(
                ProjectorEvent::StatusLine {
                    text: format!("Sending test email to {recipient}..."),
                    severity: LogSeverity::Info,
                },
                at,
            );
            vec![Effect::SendTestEmail {
                request: state.test_request(recipient),
            }]
        }
        Msg::TestEmailSent { recipient } => {
            if state.pending_test.take().is_some() {
                state.apply(
                    ProjectorEvent::StatusLine {
                        text: format!("Test email sent successfully to {recipient}"),
                        severity: LogSeverity::Info,
                    },
                    at,
                );
            }
            Vec::new()
        }
        Msg::TestEmailFailed { message, .. } => {
            if state.pending_test.take().is_some() {
                let text = CampaignError::Submission {
                    context: SubmissionContext::TestEmail,
                    message,
                }
                .to_string();
                state.apply(
                    ProjectorEvent::StatusLine {
                        text,
                        severity: LogSeverity::Error,
                    },
                    at,
                );
            }
            Vec::new()
        }
        Msg::CampaignCreated { handle } => {
            if state.campaign != Campaign::Submitting {
                return (state, Vec::new());
            }
            let mut session = PollSession::new(handle);
            let step = session.begin();
            state.campaign = Campaign::Tracking(session);
            state.mark_dirty();
            step_effects(step)
        }
        Msg::CampaignRejected { message } => {
            if state.campaign != Campaign::Submitting {
                return (state, Vec::new());
            }
            state.campaign = Campaign::Idle;
            state.apply(ProjectorEvent::SubmissionFailed { message }, at);
            Vec::new()
        }
        Msg::TaskStatusReceived { task_id, status } => {
            let interval = state.settings.poll_interval;
            match &mut state.campaign {
                Campaign::Tracking(session) if session.is_tracking(&task_id) => {
                    let transition = session.on_status(&status, interval);
                    apply_transition(&mut state, transition, at)
                }
                _ => Vec::new(),
            }
        }
        Msg::TaskStatusFailed { task_id, message } => match &mut state.campaign {
            Campaign::Tracking(session) if session.is_tracking(&task_id) => {
                let transition = session.on_error(&message);
                apply_transition(&mut state, transition, at)
            }
            _ => Vec::new(),
        },
        Msg::EngineStopped { message } => {
            if state.pending_test.take().is_some() {
                let text = CampaignError::Submission {
                    context: SubmissionContext::TestEmail,
                    message: message.clone(),
                }
                .to_string();
                state.apply(
                    ProjectorEvent::StatusLine {
                        text,
                        severity: LogSeverity::Error,
                    },
                    at,
                );
            }
            if state.campaign == Campaign::Submitting {
                state.campaign = Campaign::Idle;
                state.apply(ProjectorEvent::SubmissionFailed { message }, at);
                Vec::new()
            } else if let Campaign::Tracking(session) = &mut state.campaign {
                let transition = session.on_error(&message);
                apply_transition(&mut state, transition, at)
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn start_submission(state: &mut AppState, count: usize, at: NaiveTime) -> Vec<Effect> {
    state.notice = None;
    state.campaign = Campaign::Submitting;
    state.apply(
        ProjectorEvent::Submitted {
            total: count as u64,
        },
        at,
    );
    vec![Effect::SubmitCampaign {
        request: state.campaign_request(),
    }]
}

fn apply_transition(state: &mut AppState, transition: Transition, at: NaiveTime) -> Vec<Effect> {
    let Transition { events, next } = transition;
    for event in events {
        state.apply(event, at);
    }
    state.mark_dirty();
    step_effects(next)
}

fn step_effects(step: PollStep) -> Vec<Effect> {
    match step {
        PollStep::Schedule { task_id, delay } => vec![Effect::PollTask { task_id, delay }],
        PollStep::Stop => Vec::new(),
    }
}
