use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use campaign_core::{CampaignRequest, TaskId, TestEmailRequest};
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc as async_mpsc;

use crate::{
    ApiError, CampaignApi, ClientSettings, EngineEvent, EngineStopped, FailureKind,
    ReqwestCampaignApi,
};

enum EngineCommand {
    Submit { request: CampaignRequest },
    SendTest { request: TestEmailRequest },
    Poll { task_id: TaskId, delay: Duration },
}

/// Runs backend exchanges on a background thread and reports each outcome as
/// an [`EngineEvent`]. The engine never decides what to do next; every poll is
/// requested explicitly.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = ReqwestCampaignApi::new(settings)?;
        Self::with_api(Arc::new(api)).map_err(|err| {
            ApiError::new(FailureKind::Network, format!("engine runtime: {err}"))
        })
    }

    pub fn with_api(api: Arc<dyn CampaignApi>) -> io::Result<Self> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("campaign-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        tokio::spawn(async move {
                            handle_command(api.as_ref(), command, event_tx).await;
                        });
                    }
                });
                engine_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request: CampaignRequest) {
        self.send(EngineCommand::Submit { request });
    }

    pub fn send_test(&self, request: TestEmailRequest) {
        self.send(EngineCommand::SendTest { request });
    }

    pub fn poll(&self, task_id: impl Into<TaskId>, delay: Duration) {
        self.send(EngineCommand::Poll {
            task_id: task_id.into(),
            delay,
        });
    }

    /// `Ok(None)` when nothing is waiting.
    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    /// `Ok(None)` when `timeout` elapses without an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                engine_warn!("Engine event channel disconnected");
                Err(EngineStopped)
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    api: &dyn CampaignApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit { request } => match api.create_campaign(&request).await {
            Ok(handle) => {
                engine_info!(
                    "Campaign {} started as task {}",
                    handle.campaign_id,
                    handle.task_id
                );
                EngineEvent::CampaignCreated { handle }
            }
            Err(error) => {
                engine_warn!("Campaign submission failed ({}): {}", error.kind, error);
                EngineEvent::CampaignRejected { error }
            }
        },
        EngineCommand::SendTest { request } => {
            let result = api.send_test_email(&request).await;
            if let Err(error) = &result {
                engine_warn!(
                    "Test email to {} failed ({}): {}",
                    request.recipient_email,
                    error.kind,
                    error
                );
            }
            EngineEvent::TestEmailCompleted {
                recipient: request.recipient_email,
                result,
            }
        }
        EngineCommand::Poll { task_id, delay } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = api.task_status(&task_id).await;
            match &result {
                Ok(status) => engine_debug!(
                    "Task {} is {:?} ({} processed)",
                    task_id,
                    status.state,
                    status.current
                ),
                Err(error) => engine_warn!("Status query for {} failed: {}", task_id, error),
            }
            EngineEvent::TaskStatus { task_id, result }
        }
    };
    let _ = event_tx.send(event);
}
