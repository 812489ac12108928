pub mod dispatch;
pub mod types;

pub use dispatch::{ApiMessage, Dispatch, Request, Response};
pub use types::*;

use crate::config::ApiConfig;
use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cookie the backend uses to identify the signed-in user.
pub const SESSION_COOKIE: &str = "user_id";

const FALLBACK_MESSAGE: &str = "Request failed";

/// The two ways a backend call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("Network error")]
    Network,
    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }
}

/// Cookie-authenticated JSON client for the drafting backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
    jar: Arc<Jar>,
    job_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("draftdesk/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            client,
            jar,
            job_timeout: Duration::from_secs(config.job_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Installs a session cookie, e.g. one restored from disk.
    pub fn set_session(&self, user_id: &str) {
        self.jar
            .add_cookie_str(&format!("{SESSION_COOKIE}={user_id}; Path=/"), &self.base_url);
    }

    /// Expires the session cookie.
    pub fn clear_session(&self) {
        self.jar.add_cookie_str(
            &format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"),
            &self.base_url,
        );
    }

    /// The session cookie value the jar would send, if any.
    pub fn session(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|err| {
            warn!(%err, path, "could not build request URL");
            ApiError::Network
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path)?)
            .send()
            .await
            .map_err(|err| transport_error(path, &err))?;
        decode(path, response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.post_with_timeout(path, body, None).await
    }

    /// POST that overrides the client-wide timeout when `timeout` is set.
    async fn post_with_timeout<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        debug!(path, ?timeout, "POST");
        let mut request = self.client.post(self.url(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(path, &err))?;
        decode(path, response).await
    }

    /// Signs in (or registers) and stores the returned session cookie.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError> {
        let body = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: SignInResponse = self.post("/sign-in", Some(&body)).await?;
        self.set_session(&response.user_id);
        Ok(response)
    }

    pub async fn verify_auth(&self) -> Result<VerifyAuthResponse, ApiError> {
        self.get("/verify-auth").await
    }

    pub async fn profile_image(&self) -> Result<ProfileImage, ApiError> {
        self.get("/get_user_profile_image").await
    }

    pub async fn pending_items(&self, queue: Queue) -> Result<Vec<PendingItem>, ApiError> {
        match queue {
            Queue::Replies | Queue::TopTweetReplies => {
                let body: PendingRepliesResponse = self.get(queue.list_path()).await?;
                Ok(body.pending_replies)
            }
            Queue::Repurposed => {
                let body: PendingRepurposedResponse = self.get(queue.list_path()).await?;
                Ok(body.pending_repurposed)
            }
        }
    }

    pub async fn submit_action(
        &self,
        queue: Queue,
        request: &ActionRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post(queue.action_path(), Some(request)).await
    }

    /// Triggers a backend scraping job and waits for its summary.
    pub async fn run_job(&self, job: FetchJob) -> Result<JobSummary, ApiError> {
        self.post_with_timeout::<(), _>(job.path(), None, Some(self.job_timeout))
            .await
    }

    pub async fn settings(&self) -> Result<UserSettings, ApiError> {
        self.get("/get_user_settings").await
    }

    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let path = update.group().path();
        // Both call third-party APIs before answering.
        let slow = Some(self.job_timeout);
        match update {
            SettingsUpdate::Credentials(credentials) => {
                self.post_with_timeout(path, Some(credentials), slow).await
            }
            SettingsUpdate::TargetAccounts(accounts) => {
                let body = TargetAccountsBody {
                    target_accounts: accounts,
                };
                self.post_with_timeout(path, Some(&body), slow).await
            }
            SettingsUpdate::Keywords(keywords) => {
                let body = KeywordsBody { keywords };
                self.post(path, Some(&body)).await
            }
        }
    }
}

fn transport_error(path: &str, err: &reqwest::Error) -> ApiError {
    warn!(path, error = %err, "request failed before a response arrived");
    ApiError::Network
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        warn!(path, status = status.as_u16(), %message, "server rejected request");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    response.json::<T>().await.map_err(|err| {
        warn!(path, error = %err, "could not decode response body");
        ApiError::Network
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 5,
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::Network.to_string(), "Network error");
        let err = ApiError::Server {
            status: 400,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_error_body_prefers_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Invalid password"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Invalid password"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(body.message().is_none());

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message().is_none());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = ApiClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
            ..ApiConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_session_round_trips_through_jar() {
        let client = client();
        assert!(client.session().is_none());
        client.set_session("abc123");
        assert_eq!(client.session().as_deref(), Some("abc123"));
    }
}
