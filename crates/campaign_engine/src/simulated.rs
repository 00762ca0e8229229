use std::collections::HashMap;
use std::sync::Mutex;

use campaign_core::{
    extract, is_valid_address, CampaignHandle, CampaignId, CampaignRequest, TaskStatus,
    TestEmailRequest, DEFAULT_MAX_RECIPIENTS,
};
use engine_logging::engine_debug;

use crate::{ApiError, CampaignApi, CampaignSummary, FailureKind};

const DEFAULT_BATCH_SIZE: u64 = 100;
const DEFAULT_SUCCESS_PERCENT: u64 = 95;

#[derive(Debug, Clone)]
struct SimulatedTask {
    campaign_id: CampaignId,
    total: u64,
    processed: u64,
    sent: u64,
    failed: u64,
    started: bool,
}

impl SimulatedTask {
    fn advance(&mut self, batch_size: u64, success_percent: u64) {
        let batch = batch_size.min(self.total - self.processed);
        let batch_sent = batch * success_percent / 100;
        self.sent += batch_sent;
        self.failed += batch - batch_sent;
        self.processed += batch;
    }

    fn status(&self) -> TaskStatus {
        if self.processed >= self.total {
            TaskStatus::success(self.total, self.sent, self.failed)
        } else {
            TaskStatus::progress(
                self.processed,
                self.sent,
                self.failed,
                format!("Sent {} of {}", self.processed, self.total),
            )
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_campaign: CampaignId,
    tasks: HashMap<String, SimulatedTask>,
}

/// In-memory backend. Every status query after the first delivers one batch,
/// with a fixed share of each batch reported as failed.
#[derive(Debug)]
pub struct SimulatedBackend {
    batch_size: u64,
    success_percent: u64,
    inner: Mutex<Inner>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_SUCCESS_PERCENT)
    }
}

impl SimulatedBackend {
    pub fn new(batch_size: u64, success_percent: u64) -> Self {
        Self {
            batch_size: batch_size.max(1),
            success_percent: success_percent.min(100),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|_| ApiError::new(FailureKind::Network, "simulated backend poisoned"))
    }
}

#[async_trait::async_trait]
impl CampaignApi for SimulatedBackend {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<CampaignHandle, ApiError> {
        if request.sender_email.is_empty() || request.subject.is_empty() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(400),
                "Missing required fields",
            ));
        }
        let recipients = extract(&request.recipients);
        if recipients.is_empty() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(400),
                "No valid email addresses provided",
            ));
        }
        if recipients.len() > DEFAULT_MAX_RECIPIENTS {
            return Err(ApiError::new(
                FailureKind::HttpStatus(400),
                format!("Maximum {DEFAULT_MAX_RECIPIENTS} recipients allowed"),
            ));
        }

        let mut inner = self.lock()?;
        inner.next_campaign += 1;
        let campaign_id = inner.next_campaign;
        let task_id = format!("sim-{campaign_id}");
        inner.tasks.insert(
            task_id.clone(),
            SimulatedTask {
                campaign_id,
                total: recipients.len() as u64,
                processed: 0,
                sent: 0,
                failed: 0,
                started: false,
            },
        );
        engine_debug!(
            "Simulated campaign {} for {} recipients",
            campaign_id,
            recipients.len()
        );
        Ok(CampaignHandle {
            task_id,
            campaign_id,
        })
    }

    async fn send_test_email(&self, request: &TestEmailRequest) -> Result<(), ApiError> {
        if is_valid_address(&request.recipient_email) {
            Ok(())
        } else {
            Err(ApiError::new(
                FailureKind::Rejected,
                format!("Invalid recipient {}", request.recipient_email),
            ))
        }
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        let mut inner = self.lock()?;
        // Unknown ids read as pending, the way a task queue reports them.
        let Some(task) = inner.tasks.get_mut(task_id) else {
            return Ok(TaskStatus::queued());
        };
        if !task.started {
            task.started = true;
            return Ok(TaskStatus::queued());
        }
        if task.processed < task.total {
            task.advance(self.batch_size, self.success_percent);
        }
        Ok(task.status())
    }

    async fn campaign_status(
        &self,
        campaign_id: CampaignId,
    ) -> Result<CampaignSummary, ApiError> {
        let inner = self.lock()?;
        let task = inner
            .tasks
            .values()
            .find(|task| task.campaign_id == campaign_id)
            .ok_or_else(|| ApiError::new(FailureKind::HttpStatus(404), "Campaign not found"))?;
        let status = if task.processed == 0 {
            "pending"
        } else if task.processed >= task.total {
            "completed"
        } else {
            "sending"
        };
        Ok(CampaignSummary {
            campaign_id,
            status: status.to_string(),
            total: task.total,
            sent: task.sent,
            failed: task.failed,
        })
    }
}
