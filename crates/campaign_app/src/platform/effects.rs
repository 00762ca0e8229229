use std::time::Duration;

use campaign_core::{Effect, Msg};
use campaign_engine::{EngineEvent, EngineHandle, EngineStopped};
use engine_logging::{engine_debug, engine_info};

/// Hands effects to the engine and turns its events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitCampaign { request } => {
                    engine_info!(
                        "SubmitCampaign from={} subject_len={} html={}",
                        request.sender_email,
                        request.subject.len(),
                        request.is_html
                    );
                    self.engine.submit(request);
                }
                Effect::SendTestEmail { request } => {
                    engine_info!("SendTestEmail to={}", request.recipient_email);
                    self.engine.send_test(request);
                }
                Effect::PollTask { task_id, delay } => {
                    engine_debug!("PollTask task_id={} delay_ms={}", task_id, delay.as_millis());
                    self.engine.poll(task_id, delay);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine outcome. A stopped engine
    /// yields [`Msg::EngineStopped`] on every call.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        received(self.engine.recv_timeout(timeout))
    }
}

fn received(result: Result<Option<EngineEvent>, EngineStopped>) -> Option<Msg> {
    match result {
        Ok(event) => event.map(to_msg),
        Err(stopped) => Some(Msg::EngineStopped {
            message: stopped.to_string(),
        }),
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CampaignCreated { handle } => Msg::CampaignCreated { handle },
        EngineEvent::CampaignRejected { error } => Msg::CampaignRejected {
            message: error.message,
        },
        EngineEvent::TaskStatus { task_id, result } => match result {
            Ok(status) => Msg::TaskStatusReceived { task_id, status },
            Err(error) => Msg::TaskStatusFailed {
                task_id,
                message: error.message,
            },
        },
        EngineEvent::TestEmailCompleted { recipient, result } => match result {
            Ok(()) => Msg::TestEmailSent { recipient },
            Err(error) => Msg::TestEmailFailed {
                recipient,
                message: error.message,
            },
        },
    }
}
