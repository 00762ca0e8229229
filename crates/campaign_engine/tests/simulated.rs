use campaign_core::{CampaignRequest, TaskState, TestEmailRequest};
use campaign_engine::{CampaignApi, FailureKind, SimulatedBackend};
use pretty_assertions::assert_eq;

fn request(recipients: &str) -> CampaignRequest {
    CampaignRequest {
        sender_email: "news@example.com".to_string(),
        sender_name: "Newsroom".to_string(),
        recipients: recipients.to_string(),
        subject: "Hello".to_string(),
        content: "Hi".to_string(),
        is_html: false,
    }
}

fn addresses(n: usize) -> String {
    (0..n)
        .map(|i| format!("user{i}@example.com"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn campaign_runs_in_batches_until_success() {
    let backend = SimulatedBackend::default();
    let handle = backend.create_campaign(&request(&addresses(250))).await.unwrap();
    assert_eq!(handle.task_id, "sim-1");
    assert_eq!(
        backend.campaign_status(handle.campaign_id).await.unwrap().status,
        "pending"
    );

    let first = backend.task_status(&handle.task_id).await.unwrap();
    assert_eq!(first.state, TaskState::Queued);
    assert_eq!(
        backend.campaign_status(handle.campaign_id).await.unwrap().status,
        "pending"
    );

    let second = backend.task_status(&handle.task_id).await.unwrap();
    assert_eq!(second.state, TaskState::Progress);
    assert_eq!((second.current, second.sent, second.failed), (100, 95, 5));
    assert_eq!(second.status, "Sent 100 of 250");

    let third = backend.task_status(&handle.task_id).await.unwrap();
    assert_eq!((third.current, third.sent, third.failed), (200, 190, 10));
    assert_eq!(
        backend.campaign_status(handle.campaign_id).await.unwrap().status,
        "sending"
    );

    let last = backend.task_status(&handle.task_id).await.unwrap();
    assert_eq!(last.state, TaskState::Success);
    assert_eq!((last.current, last.sent, last.failed), (250, 237, 13));

    let summary = backend.campaign_status(handle.campaign_id).await.unwrap();
    assert_eq!(summary.status, "completed");
    assert_eq!((summary.total, summary.sent, summary.failed), (250, 237, 13));
}

#[tokio::test]
async fn finished_task_keeps_reporting_success() {
    let backend = SimulatedBackend::new(10, 100);
    let handle = backend.create_campaign(&request("a@x.com")).await.unwrap();
    backend.task_status(&handle.task_id).await.unwrap();
    for _ in 0..3 {
        let status = backend.task_status(&handle.task_id).await.unwrap();
        assert_eq!(status.state, TaskState::Success);
        assert_eq!((status.sent, status.failed), (1, 0));
    }
}

#[tokio::test]
async fn invalid_campaigns_are_rejected() {
    let backend = SimulatedBackend::default();

    let err = backend.create_campaign(&request("nobody here")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "No valid email addresses provided");

    let mut missing = request("a@x.com");
    missing.subject.clear();
    let err = backend.create_campaign(&missing).await.unwrap_err();
    assert_eq!(err.message, "Missing required fields");

    let err = backend
        .create_campaign(&request(&addresses(5001)))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Maximum 5000 recipients allowed");

    let err = backend.campaign_status(99).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn unknown_task_reads_as_queued() {
    let backend = SimulatedBackend::default();
    let status = backend.task_status("nope").await.unwrap();
    assert_eq!(status.state, TaskState::Queued);
}

#[tokio::test]
async fn test_email_validates_recipient() {
    let backend = SimulatedBackend::default();
    let mut req = TestEmailRequest {
        sender_email: "news@example.com".to_string(),
        sender_name: String::new(),
        recipient_email: "qa@example.com".to_string(),
        subject: "Hello".to_string(),
        content: "Hi".to_string(),
        is_html: false,
    };
    backend.send_test_email(&req).await.unwrap();

    req.recipient_email = "qa".to_string();
    let err = backend.send_test_email(&req).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "Invalid recipient qa");
}
