use crate::domain::model::{SearchCriteria, TherapistRecord};
use crate::domain::ports::{ConfigProvider, DirectoryClient};
use crate::utils::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// reqwest-backed client for the therapist directory service.
pub struct HttpDirectoryClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> HttpDirectoryClient<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.api_base_url().trim_end_matches('/'),
            self.config.therapists_path()
        )
    }
}

#[async_trait]
impl<C: ConfigProvider> DirectoryClient for HttpDirectoryClient<C> {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<TherapistRecord>> {
        let endpoint = self.endpoint();
        let query = criteria.query_pairs();

        tracing::debug!("📡 GET {} with {:?}", endpoint, query);

        let mut request = self
            .client
            .get(&endpoint)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, self.config.api_key());

        // 沒有條件時不附加 '?'
        if !query.is_empty() {
            request = request.query(&query);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Server {
                status: status.as_u16(),
                message: server_error_message(status, &body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Vec<TherapistRecord>>(&body).map_err(|e| SearchError::Parse {
            message: e.to_string(),
        })
    }
}

/// Server-supplied `detail` if present, otherwise `HTTP <code>: <reason>`.
pub fn server_error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        });

    detail.unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    })
}
