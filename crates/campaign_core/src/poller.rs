use std::time::Duration;

use crate::{CampaignHandle, LogSeverity, ProjectorEvent, TaskId, TaskState, TaskStatus};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Starting,
    Polling,
    Completed,
    Failed,
    Errored,
}

impl PollPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PollPhase::Completed | PollPhase::Failed | PollPhase::Errored
        )
    }
}

/// What the session wants done after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Query `task_id` once `delay` has elapsed.
    Schedule { task_id: TaskId, delay: Duration },
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub events: Vec<ProjectorEvent>,
    pub next: PollStep,
}

impl Transition {
    fn stop(events: Vec<ProjectorEvent>) -> Self {
        Self {
            events,
            next: PollStep::Stop,
        }
    }
}

/// One polling session over one campaign task. At most one query is ever
/// outstanding: the next one is only scheduled from a processed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    handle: CampaignHandle,
    phase: PollPhase,
    polls_answered: u32,
}

impl PollSession {
    pub fn new(handle: CampaignHandle) -> Self {
        Self {
            handle,
            phase: PollPhase::Starting,
            polls_answered: 0,
        }
    }

    pub fn handle(&self) -> &CampaignHandle {
        &self.handle
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn polls_answered(&self) -> u32 {
        self.polls_answered
    }

    pub fn is_tracking(&self, task_id: &str) -> bool {
        self.handle.task_id == task_id
    }

    /// Leaves `Starting` and issues the first query without delay.
    pub fn begin(&mut self) -> PollStep {
        if self.phase != PollPhase::Starting {
            return PollStep::Stop;
        }
        self.phase = PollPhase::Polling;
        self.schedule(Duration::ZERO)
    }

    pub fn on_status(&mut self, status: &TaskStatus, interval: Duration) -> Transition {
        if self.phase.is_terminal() {
            return Transition::stop(Vec::new());
        }
        self.polls_answered += 1;

        let mut events = Vec::new();
        if matches!(status.state, TaskState::Progress | TaskState::Success) {
            events.push(ProjectorEvent::ProgressUpdate {
                current: status.current,
                sent: status.sent,
                failed: status.failed,
            });
            if !status.status.is_empty() {
                events.push(ProjectorEvent::StatusLine {
                    text: status.status.clone(),
                    severity: LogSeverity::Info,
                });
            }
        }

        match status.state {
            TaskState::Success => {
                self.phase = PollPhase::Completed;
                events.push(ProjectorEvent::Completed);
                Transition::stop(events)
            }
            TaskState::Failure => {
                self.phase = PollPhase::Failed;
                events.push(ProjectorEvent::Failed {
                    status: status.status.clone(),
                });
                Transition::stop(events)
            }
            TaskState::Queued | TaskState::Progress => {
                self.phase = PollPhase::Polling;
                Transition {
                    events,
                    next: self.schedule(interval),
                }
            }
        }
    }

    /// A failed query ends the session; there is no automatic retry.
    pub fn on_error(&mut self, message: &str) -> Transition {
        if self.phase.is_terminal() {
            return Transition::stop(Vec::new());
        }
        self.polls_answered += 1;
        self.phase = PollPhase::Errored;
        Transition::stop(vec![ProjectorEvent::Errored {
            message: message.to_string(),
        }])
    }

    fn schedule(&self, delay: Duration) -> PollStep {
        PollStep::Schedule {
            task_id: self.handle.task_id.clone(),
            delay,
        }
    }
}
