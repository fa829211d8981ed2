//! HTTP client for the LMS attendance API
//!
//! Endpoints used:
//! - `GET /attendance/{user_id}` - every attendance record for a learner
//! - `GET /attendance/{user_id}/streak` - the server's current streak (`{"streak": N}`)

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::RawAttendanceRecord;

/// Response from GET /attendance/{user_id}/streak
#[derive(Debug, Deserialize)]
pub struct StreakResponse {
    pub streak: u32,
}

/// HTTP client for the LMS attendance API
pub struct LmsClient {
    config: ApiConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl LmsClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| Error::Config("api.base_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = config.resolved_token() {
            let auth_value = format!("Bearer {}", token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_token: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    /// Fetch every attendance record for a learner
    pub async fn fetch_attendance(&self, user_id: &str) -> Result<Vec<RawAttendanceRecord>> {
        let url = format!(
            "{}/attendance/{}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        self.get_json(&url).await
    }

    /// Fetch the server-computed current streak for a learner
    pub async fn fetch_streak(&self, user_id: &str) -> Result<u32> {
        let url = format!(
            "{}/attendance/{}/streak",
            self.base_url,
            urlencoding::encode(user_id)
        );
        let response: StreakResponse = self.get_json(&url).await?;
        Ok(response.streak)
    }

    /// [`Self::fetch_attendance`] with retries for transient failures
    pub async fn fetch_attendance_with_retry(
        &self,
        user_id: &str,
    ) -> Result<Vec<RawAttendanceRecord>> {
        let mut delay = Duration::from_millis(500);
        let mut attempt = 0;
        loop {
            match self.fetch_attendance(user_id).await {
                Ok(records) => return Ok(records),
                Err(e) if attempt < self.config.max_retries && is_retryable_error(&e) => {
                    tracing::warn!("Transient error fetching attendance: {}", e);
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
            tracing::debug!(
                "Retrying fetch_attendance (attempt {}/{}), waiting {:?}",
                attempt + 1,
                self.config.max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            delay = next_delay(delay);
        }
    }

    /// [`Self::fetch_streak`] with retries for transient failures
    pub async fn fetch_streak_with_retry(&self, user_id: &str) -> Result<u32> {
        let mut delay = Duration::from_millis(500);
        let mut attempt = 0;
        loop {
            match self.fetch_streak(user_id).await {
                Ok(streak) => return Ok(streak),
                Err(e) if attempt < self.config.max_retries && is_retryable_error(&e) => {
                    tracing::warn!("Transient error fetching streak: {}", e);
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
            tracing::debug!(
                "Retrying fetch_streak (attempt {}/{}), waiting {:?}",
                attempt + 1,
                self.config.max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            delay = next_delay(delay);
        }
    }

    /// The normalized base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(describe_transport_error(&e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Http(format!("failed to parse response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Api {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

fn next_delay(delay: Duration) -> Duration {
    std::cmp::min(delay * 2, Duration::from_secs(30))
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timeout: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

/// Check if an error is retryable (transient)
fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Api { status, .. } => *status >= 500 || *status == 429,
        Error::Http(msg) => {
            msg.starts_with("timeout") || msg.starts_with("connection")
        }
        _ => false,
    }
}
