use std::time::Duration;

use crate::{CampaignRequest, TaskId, TestEmailRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitCampaign { request: CampaignRequest },
    SendTestEmail { request: TestEmailRequest },
    PollTask { task_id: TaskId, delay: Duration },
}
