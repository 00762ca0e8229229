use crate::{CampaignHandle, TaskId, TaskStatus};

/// A single edited form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    SenderEmail(String),
    SenderName(String),
    Subject(String),
    Body(String),
    IsHtml(bool),
    Recipients(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited a form control.
    FormEdited(FormField),
    /// User pressed Send.
    SendClicked,
    /// Answer to the large-campaign confirmation prompt.
    ConfirmationAnswered { confirmed: bool },
    /// User asked for a test message. An empty address falls back to the sender.
    TestEmailRequested { recipient: String },
    /// Backend accepted the campaign.
    CampaignCreated { handle: CampaignHandle },
    /// Backend refused the campaign or the exchange failed.
    CampaignRejected { message: String },
    /// A status query answered.
    TaskStatusReceived { task_id: TaskId, status: TaskStatus },
    /// A status query could not be completed.
    TaskStatusFailed { task_id: TaskId, message: String },
    /// Test message delivered.
    TestEmailSent { recipient: String },
    /// Test message refused or the exchange failed.
    TestEmailFailed { recipient: String, message: String },
    /// The engine can no longer answer; anything in flight has failed.
    EngineStopped { message: String },
}
