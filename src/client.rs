use crate::models::{ErrorBody, TipCalculation, TipCalculationDraft};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

const TIP_CALCULATIONS_PATH: &str = "/api/tip-calculations";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// The two operations the calculator page needs from the backend.
#[async_trait]
pub trait TipCalculationsApi: Send + Sync {
    async fn list_recent(&self) -> Result<Vec<TipCalculation>, ClientError>;

    async fn create(&self, draft: &TipCalculationDraft) -> Result<TipCalculation, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTipCalculationsApi {
    base_url: String,
    http: Client,
}

impl HttpTipCalculationsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn endpoint(&self) -> String {
        format!("{}{TIP_CALCULATIONS_PATH}", self.base_url)
    }
}

#[async_trait]
impl TipCalculationsApi for HttpTipCalculationsApi {
    async fn list_recent(&self) -> Result<Vec<TipCalculation>, ClientError> {
        let response = self.http.get(self.endpoint()).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, draft: &TipCalculationDraft) -> Result<TipCalculation, ClientError> {
        let response = self.http.post(self.endpoint()).json(draft).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Status { status, message })
}
