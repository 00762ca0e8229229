//! Campaign engine: backend exchanges and effect execution.
mod api;
mod engine;
mod simulated;
mod types;

pub use api::{CampaignApi, ClientSettings, ReqwestCampaignApi};
pub use engine::EngineHandle;
pub use simulated::SimulatedBackend;
pub use types::{ApiError, CampaignSummary, EngineEvent, EngineStopped, FailureKind};
