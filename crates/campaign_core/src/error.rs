use std::fmt;

use thiserror::Error;

/// Which exchange a submission error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionContext {
    Campaign,
    TestEmail,
}

impl fmt::Display for SubmissionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionContext::Campaign => write!(f, "Failed to start email campaign"),
            SubmissionContext::TestEmail => write!(f, "Failed to send test email"),
        }
    }
}

/// The `Display` text of each variant is the line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("{0}")]
    Validation(String),
    #[error("{count} recipients exceeds the limit of {max}")]
    LimitExceeded { count: usize, max: usize },
    #[error("{context}: {message}")]
    Submission {
        context: SubmissionContext,
        message: String,
    },
    #[error("Error checking progress: {0}")]
    Polling(String),
}

impl CampaignError {
    pub(crate) fn no_recipients() -> Self {
        CampaignError::Validation("Please enter at least one valid email address".to_string())
    }

    pub(crate) fn invalid_test_address() -> Self {
        CampaignError::Validation("Please enter a valid email address".to_string())
    }
}
