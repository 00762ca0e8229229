use std::sync::Once;
use std::time::Duration;

use campaign_core::{
    update_at, AppState, CampaignHandle, Effect, FormField, LogSeverity, Msg, PollPhase,
    SessionView, TaskStatus, DEFAULT_POLL_INTERVAL,
};
use chrono::NaiveTime;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

fn step(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    update_at(state, msg, noon())
}

fn addresses(count: usize) -> String {
    (0..count)
        .map(|i| format!("user{i}@example.com"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn composed(recipients: &str) -> AppState {
    let edits = [
        FormField::SenderEmail("news@example.com".to_string()),
        FormField::SenderName("Newsroom".to_string()),
        FormField::Subject("Hello".to_string()),
        FormField::Body("<p>Hi</p>".to_string()),
        FormField::IsHtml(true),
        FormField::Recipients(recipients.to_string()),
    ];
    edits.into_iter().fold(AppState::new(), |state, field| {
        step(state, Msg::FormEdited(field)).0
    })
}

fn handle() -> CampaignHandle {
    CampaignHandle {
        task_id: "T1".to_string(),
        campaign_id: 7,
    }
}

/// Submits 200 recipients and lets the backend accept them as task `T1`.
fn polling_campaign() -> AppState {
    let (state, _) = step(composed(&addresses(200)), Msg::SendClicked);
    let (state, _) = step(state, Msg::CampaignCreated { handle: handle() });
    state
}

fn status(state: AppState, status: TaskStatus) -> (AppState, Vec<Effect>) {
    step(
        state,
        Msg::TaskStatusReceived {
            task_id: "T1".to_string(),
            status,
        },
    )
}

#[test]
fn submit_emits_request_and_disables_form() {
    init_logging();
    let recipients = addresses(200);
    let (state, effects) = step(composed(&recipients), Msg::SendClicked);

    match effects.as_slice() {
        [Effect::SubmitCampaign { request }] => {
            assert_eq!(request.sender_email, "news@example.com");
            assert_eq!(request.sender_name, "Newsroom");
            assert_eq!(request.recipients, recipients);
            assert_eq!(request.subject, "Hello");
            assert_eq!(request.content, "<p>Hi</p>");
            assert!(request.is_html);
        }
        other => panic!("unexpected effects {other:?}"),
    }

    let view = state.view();
    assert!(!view.form_enabled);
    assert!(!view.send_enabled);
    assert_eq!(view.session, SessionView::Submitting);
    assert_eq!(view.log[0].text, "Starting bulk email send to 200 recipients...");
    assert_eq!(state.ui().total, 200);
}

#[test]
fn created_campaign_issues_first_poll_immediately() {
    let (state, _) = step(composed(&addresses(3)), Msg::SendClicked);
    let (state, effects) = step(state, Msg::CampaignCreated { handle: handle() });

    assert_eq!(
        effects,
        vec![Effect::PollTask {
            task_id: "T1".to_string(),
            delay: Duration::ZERO,
        }]
    );
    assert_eq!(state.poll_phase(), Some(PollPhase::Polling));
    assert!(!state.view().form_enabled);
}

#[test]
fn progress_then_success_completes_and_reenables() {
    init_logging();
    let state = polling_campaign();

    let (state, effects) = status(state, TaskStatus::progress(50, 48, 2, "Sent 50 of 200"));
    let view = state.view();
    assert_eq!(view.percent, 25);
    assert_eq!(view.sent, 48);
    assert_eq!(view.failed, 2);
    assert!(!view.form_enabled);
    assert_eq!(view.log[0].text, "Sent 50 of 200");
    assert_eq!(
        effects,
        vec![Effect::PollTask {
            task_id: "T1".to_string(),
            delay: DEFAULT_POLL_INTERVAL,
        }]
    );

    let (state, effects) = status(state, TaskStatus::success(200, 195, 5));
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), Some(PollPhase::Completed));
    let view = state.view();
    assert!(view.form_enabled);
    assert!(view.send_enabled);
    assert_eq!(view.percent, 100);
    assert_eq!(view.log[0].text, "Successfully sent 195 emails with 5 failures.");
    assert_eq!(view.log[1].text, "Bulk email send completed!");
    assert!(view.session.is_finished());
}

#[test]
fn queued_state_keeps_polling_quietly() {
    let state = polling_campaign();
    let log_len = state.view().log.len();

    let (state, effects) = status(state, TaskStatus::queued());
    assert_eq!(state.poll_phase(), Some(PollPhase::Polling));
    assert_eq!(state.view().log.len(), log_len);
    assert_eq!(state.view().percent, 0);
    assert_eq!(effects.len(), 1);
}

#[test]
fn failure_reports_server_text_and_stops() {
    init_logging();
    let state = polling_campaign();

    let (state, effects) = status(state, TaskStatus::failure("SMTP quota exceeded"));
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), Some(PollPhase::Failed));
    let view = state.view();
    assert!(view.form_enabled);
    assert!(view.log[0].text.contains("SMTP quota exceeded"));
    assert_eq!(view.log[0].severity, LogSeverity::Error);
}

#[test]
fn transport_failure_while_polling_is_terminal() {
    init_logging();
    let state = polling_campaign();

    let (state, effects) = step(
        state,
        Msg::TaskStatusFailed {
            task_id: "T1".to_string(),
            message: "network error".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), Some(PollPhase::Errored));
    let view = state.view();
    assert!(view.form_enabled);
    assert_eq!(view.log[0].text, "Error checking progress: network error");
}

#[test]
fn stopped_engine_ends_polling_with_status_line() {
    let state = polling_campaign();

    let (state, effects) = step(
        state,
        Msg::EngineStopped {
            message: "campaign engine has stopped".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), Some(PollPhase::Errored));
    let view = state.view();
    assert!(view.form_enabled);
    assert!(view.session.is_finished());
    assert_eq!(
        view.log[0].text,
        "Error checking progress: campaign engine has stopped"
    );
    assert_eq!(view.log[0].severity, LogSeverity::Error);
}

#[test]
fn stopped_engine_during_submission_restores_form() {
    let (state, _) = step(composed(&addresses(2)), Msg::SendClicked);
    let (state, effects) = step(
        state,
        Msg::EngineStopped {
            message: "campaign engine has stopped".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.form_enabled);
    assert_eq!(view.session, SessionView::Idle);
    assert_eq!(
        view.log[0].text,
        "Failed to start email campaign: campaign engine has stopped"
    );
}

#[test]
fn rejected_submission_restores_form() {
    let (state, _) = step(composed(&addresses(2)), Msg::SendClicked);
    let (state, effects) = step(
        state,
        Msg::CampaignRejected {
            message: "Missing required fields".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.form_enabled);
    assert_eq!(view.session, SessionView::Idle);
    assert_eq!(
        view.log[0].text,
        "Failed to start email campaign: Missing required fields"
    );
}

#[test]
fn percent_uses_client_total_even_when_server_disagrees() {
    let state = polling_campaign();
    let (state, _) = status(state, TaskStatus::progress(100, 100, 0, ""));
    assert_eq!(state.view().percent, 50);
    assert_eq!(state.ui().total, 200);
}

#[test]
fn poll_interval_follows_settings() {
    let settings = campaign_core::CoreSettings {
        poll_interval: Duration::from_millis(250),
        ..Default::default()
    };
    let state = AppState::with_settings(settings);
    let (state, _) = step(
        state,
        Msg::FormEdited(FormField::Recipients("a@x.com".to_string())),
    );
    let (state, _) = step(state, Msg::SendClicked);
    let (state, _) = step(state, Msg::CampaignCreated { handle: handle() });
    let (_, effects) = status(state, TaskStatus::progress(0, 0, 0, ""));
    assert_eq!(
        effects,
        vec![Effect::PollTask {
            task_id: "T1".to_string(),
            delay: Duration::from_millis(250),
        }]
    );
}

#[test]
fn form_stays_enabled_after_terminal_until_next_submission() {
    let state = polling_campaign();
    let (state, _) = status(state, TaskStatus::failure("boom"));
    assert!(state.view().form_enabled);

    let late = [
        Msg::TaskStatusReceived {
            task_id: "T1".to_string(),
            status: TaskStatus::progress(10, 10, 0, "late"),
        },
        Msg::TaskStatusFailed {
            task_id: "T1".to_string(),
            message: "late".to_string(),
        },
        Msg::CampaignCreated { handle: handle() },
        Msg::CampaignRejected {
            message: "late".to_string(),
        },
        Msg::FormEdited(FormField::Subject("Second".to_string())),
    ];
    let mut state = state;
    for msg in late {
        let (next, effects) = step(state, msg);
        assert!(effects.is_empty());
        assert!(next.view().form_enabled);
        state = next;
    }

    let (state, effects) = step(state, Msg::SendClicked);
    assert!(matches!(effects.as_slice(), [Effect::SubmitCampaign { request }] if request.subject == "Second"));
    assert!(!state.view().form_enabled);
}
