pub type TaskId = String;
pub type CampaignId = u64;

/// Everything the backend needs to start a campaign. Recipients stay raw;
/// the server runs its own extraction over the same text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignRequest {
    pub sender_email: String,
    pub sender_name: String,
    pub recipients: String,
    pub subject: String,
    pub content: String,
    pub is_html: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestEmailRequest {
    pub sender_email: String,
    pub sender_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub is_html: bool,
}

/// Identifiers returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignHandle {
    pub task_id: TaskId,
    pub campaign_id: CampaignId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Queued,
    Progress,
    Success,
    Failure,
}

impl TaskState {
    /// Maps a backend state tag. Anything that is not progress or a terminal
    /// state (PENDING, STARTED, RETRY, ...) counts as queued.
    pub fn from_wire(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "PROGRESS" => TaskState::Progress,
            "SUCCESS" => TaskState::Success,
            "FAILURE" => TaskState::Failure,
            _ => TaskState::Queued,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

/// One decoded answer to a status query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub state: TaskState,
    pub current: u64,
    pub sent: u64,
    pub failed: u64,
    pub status: String,
}

impl TaskStatus {
    pub fn queued() -> Self {
        Self {
            state: TaskState::Queued,
            current: 0,
            sent: 0,
            failed: 0,
            status: "Pending...".to_string(),
        }
    }

    pub fn progress(current: u64, sent: u64, failed: u64, status: impl Into<String>) -> Self {
        Self {
            state: TaskState::Progress,
            current,
            sent,
            failed,
            status: status.into(),
        }
    }

    pub fn success(current: u64, sent: u64, failed: u64) -> Self {
        Self {
            state: TaskState::Success,
            current,
            sent,
            failed,
            status: "Completed".to_string(),
        }
    }

    pub fn failure(status: impl Into<String>) -> Self {
        Self {
            state: TaskState::Failure,
            current: 0,
            sent: 0,
            failed: 0,
            status: status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskState;

    #[test]
    fn wire_tags_map_onto_four_states() {
        assert_eq!(TaskState::from_wire("PROGRESS"), TaskState::Progress);
        assert_eq!(TaskState::from_wire("success"), TaskState::Success);
        assert_eq!(TaskState::from_wire("FAILURE"), TaskState::Failure);
        assert_eq!(TaskState::from_wire("PENDING"), TaskState::Queued);
        assert_eq!(TaskState::from_wire("STARTED"), TaskState::Queued);
        assert_eq!(TaskState::from_wire(""), TaskState::Queued);
    }
}
