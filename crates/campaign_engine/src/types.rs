use std::fmt;

use campaign_core::{CampaignHandle, CampaignId, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CampaignCreated {
        handle: CampaignHandle,
    },
    CampaignRejected {
        error: ApiError,
    },
    TaskStatus {
        task_id: TaskId,
        result: Result<TaskStatus, ApiError>,
    },
    TestEmailCompleted {
        recipient: String,
        result: Result<(), ApiError>,
    },
}

/// The engine thread is gone; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("campaign engine has stopped")]
pub struct EngineStopped;

/// Stored state of a campaign as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSummary {
    pub campaign_id: CampaignId,
    pub status: String,
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    /// Server-supplied text when there is one, otherwise a generic description.
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedBody,
    /// The backend answered successfully but refused the operation.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}
