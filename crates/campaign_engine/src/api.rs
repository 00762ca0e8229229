use std::time::Duration;

use campaign_core::{
    CampaignHandle, CampaignId, CampaignRequest, TaskState, TaskStatus, TestEmailRequest,
};
use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, CampaignSummary, FailureKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend contract. Each call is exactly one request/response exchange
/// and every failure comes back as an [`ApiError`].
#[async_trait::async_trait]
pub trait CampaignApi: Send + Sync {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<CampaignHandle, ApiError>;

    async fn send_test_email(&self, request: &TestEmailRequest) -> Result<(), ApiError>;

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError>;

    async fn campaign_status(&self, campaign_id: CampaignId)
        -> Result<CampaignSummary, ApiError>;
}

#[derive(Serialize)]
struct CampaignBody<'a> {
    sender_email: &'a str,
    sender_name: &'a str,
    recipients: &'a str,
    subject: &'a str,
    content: &'a str,
    is_html: bool,
}

#[derive(Serialize)]
struct TestEmailBody<'a> {
    sender_email: &'a str,
    sender_name: &'a str,
    recipient_email: &'a str,
    subject: &'a str,
    content: &'a str,
    is_html: bool,
}

#[derive(Deserialize)]
struct CreatedBody {
    campaign_id: CampaignId,
    task_id: String,
    #[serde(default)]
    total_recipients: Option<u64>,
}

/// Error and acknowledgement bodies share these optional fields.
#[derive(Deserialize, Default)]
struct NoticeBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct TaskBody {
    state: String,
    #[serde(default)]
    current: Option<u64>,
    #[serde(default)]
    sent: Option<u64>,
    #[serde(default)]
    failed: Option<u64>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct SummaryBody {
    status: String,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    sent: Option<u64>,
    #[serde(default)]
    failed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ReqwestCampaignApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestCampaignApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post_json<T: Serialize>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        exchange(request).await
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), ApiError> {
        exchange(self.client.get(url)).await
    }
}

#[async_trait::async_trait]
impl CampaignApi for ReqwestCampaignApi {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<CampaignHandle, ApiError> {
        let url = self.endpoint(&["api", "campaigns"]);
        engine_debug!("POST {}", url);
        let body = CampaignBody {
            sender_email: &request.sender_email,
            sender_name: &request.sender_name,
            recipients: &request.recipients,
            subject: &request.subject,
            content: &request.content,
            is_html: request.is_html,
        };
        let (status, bytes) = self.post_json(url, &body).await?;
        if !status.is_success() {
            return Err(error_from(status, &bytes, "Failed to create campaign"));
        }
        let created: CreatedBody = decode(&bytes)?;
        engine_info!(
            "Campaign {} accepted as task {} (server counted {:?} recipients)",
            created.campaign_id,
            created.task_id,
            created.total_recipients
        );
        Ok(CampaignHandle {
            task_id: created.task_id,
            campaign_id: created.campaign_id,
        })
    }

    async fn send_test_email(&self, request: &TestEmailRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "test-email"]);
        engine_debug!("POST {}", url);
        let body = TestEmailBody {
            sender_email: &request.sender_email,
            sender_name: &request.sender_name,
            recipient_email: &request.recipient_email,
            subject: &request.subject,
            content: &request.content,
            is_html: request.is_html,
        };
        let (status, bytes) = self.post_json(url, &body).await?;
        if !status.is_success() {
            return Err(error_from(status, &bytes, "Unknown error"));
        }
        let notice: NoticeBody = decode(&bytes)?;
        if notice.status.as_deref() == Some("error") {
            let message = notice
                .message
                .or(notice.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ApiError::new(FailureKind::Rejected, message));
        }
        Ok(())
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        let url = self.endpoint(&["api", "tasks", task_id]);
        engine_debug!("GET {}", url);
        let (status, bytes) = self.get(url).await?;
        if !status.is_success() {
            return Err(error_from(status, &bytes, "Failed to get task status"));
        }
        let body: TaskBody = decode(&bytes)?;
        let state = TaskState::from_wire(&body.state);
        if state == TaskState::Queued && !body.state.eq_ignore_ascii_case("PENDING") {
            engine_debug!("Backend state {} treated as queued", body.state);
        }
        Ok(TaskStatus {
            state,
            current: body.current.unwrap_or(0),
            sent: body.sent.unwrap_or(0),
            failed: body.failed.unwrap_or(0),
            status: body.status.unwrap_or_default(),
        })
    }

    async fn campaign_status(
        &self,
        campaign_id: CampaignId,
    ) -> Result<CampaignSummary, ApiError> {
        let id = campaign_id.to_string();
        let url = self.endpoint(&["api", "campaigns", &id, "status"]);
        engine_debug!("GET {}", url);
        let (status, bytes) = self.get(url).await?;
        if !status.is_success() {
            return Err(error_from(status, &bytes, "Failed to get campaign status"));
        }
        let body: SummaryBody = decode(&bytes)?;
        Ok(CampaignSummary {
            campaign_id,
            status: body.status,
            total: body.total.unwrap_or(0),
            sent: body.sent.unwrap_or(0),
            failed: body.failed.unwrap_or(0),
        })
    }
}

async fn exchange(request: reqwest::RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok((status, bytes.to_vec()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| {
        engine_warn!("Could not decode response body: {}", err);
        ApiError::new(FailureKind::MalformedBody, format!("malformed response: {err}"))
    })
}

/// Prefers the server's `error`/`message` text over `fallback`.
fn error_from(status: StatusCode, bytes: &[u8], fallback: &str) -> ApiError {
    let notice: NoticeBody = serde_json::from_slice(bytes).unwrap_or_default();
    let message = notice
        .error
        .or(notice.message)
        .unwrap_or_else(|| fallback.to_string());
    engine_warn!("Backend answered {}: {}", status, message);
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
