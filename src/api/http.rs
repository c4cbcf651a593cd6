//! HTTP implementation of the backend API
//!
//! This module implements [`CampusApi`] over reqwest against the
//! campus-assistant REST backend. A bearer credential is attached uniformly
//! to every request; response status codes are not distinguished beyond
//! success/failure.

use crate::api::{CampusApi, ChatSession, Message, SendReply, SessionId, SessionPatch};
use crate::config::ApiConfig;
use crate::error::{CampmateError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

/// Request body of the send-message endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a str,
    session_id: &'a SessionId,
}

/// Campus-assistant backend client
///
/// # Examples
///
/// ```no_run
/// use campmate::api::{CampusApi, HttpCampusApi};
/// use campmate::config::ApiConfig;
///
/// # async fn example() -> campmate::error::Result<()> {
/// let api = HttpCampusApi::new(&ApiConfig::default(), "token".to_string())?;
/// let sessions = api.list_sessions().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpCampusApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpCampusApi {
    /// Create a new backend client
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration (base URL and timeout)
    /// * `token` - Bearer credential attached to every request
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &ApiConfig, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("campmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CampmateError::Api(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!("Initialized backend client: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    /// Collapse transport errors and non-success statuses into the single
    /// API failure variant.
    async fn check(response: reqwest::Result<Response>, what: &str) -> Result<Response> {
        let response =
            response.map_err(|e| CampmateError::Api(format!("{} failed: {}", what, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CampmateError::Api(format!("{} failed: HTTP {}", what, status)).into());
        }
        Ok(response)
    }
}

#[async_trait]
impl CampusApi for HttpCampusApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        tracing::debug!("GET /chat/sessions");
        let request = self.authorized(self.client.get(self.url("/chat/sessions")));
        let response = Self::check(request.send().await, "list sessions").await?;
        let sessions = response
            .json()
            .await
            .map_err(|e| CampmateError::Api(format!("list sessions: bad payload: {}", e)))?;
        Ok(sessions)
    }

    async fn create_session(&self) -> Result<ChatSession> {
        tracing::debug!("POST /chat/sessions");
        let request = self.authorized(self.client.post(self.url("/chat/sessions")));
        let response = Self::check(request.send().await, "create session").await?;
        let session = response
            .json()
            .await
            .map_err(|e| CampmateError::Api(format!("create session: bad payload: {}", e)))?;
        Ok(session)
    }

    async fn update_session(&self, id: &SessionId, patch: &SessionPatch) -> Result<ChatSession> {
        tracing::debug!("PATCH /chat/sessions/{}", id);
        let request = self
            .authorized(self.client.patch(self.url(&format!("/chat/sessions/{}", id))))
            .json(patch);
        let response = Self::check(request.send().await, "update session").await?;
        let session = response
            .json()
            .await
            .map_err(|e| CampmateError::Api(format!("update session: bad payload: {}", e)))?;
        Ok(session)
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        tracing::debug!("DELETE /chat/sessions/{}", id);
        let request =
            self.authorized(self.client.delete(self.url(&format!("/chat/sessions/{}", id))));
        Self::check(request.send().await, "delete session").await?;
        Ok(())
    }

    async fn history(&self, id: &SessionId) -> Result<Vec<Message>> {
        tracing::debug!("GET /chat/history?session_id={}", id);
        let request = self
            .authorized(self.client.get(self.url("/chat/history")))
            .query(&[("session_id", id.as_str())]);
        let response = Self::check(request.send().await, "load history").await?;
        let messages = response
            .json()
            .await
            .map_err(|e| CampmateError::Api(format!("load history: bad payload: {}", e)))?;
        Ok(messages)
    }

    async fn send_message(&self, text: &str, session: &SessionId) -> Result<SendReply> {
        tracing::debug!("POST /chat (session {})", session);
        let body = SendRequest {
            message: text,
            session_id: session,
        };
        let request = self.authorized(self.client.post(self.url("/chat"))).json(&body);
        let response = Self::check(request.send().await, "send message").await?;
        let reply = response
            .json()
            .await
            .map_err(|e| CampmateError::Api(format!("send message: bad payload: {}", e)))?;
        Ok(reply)
    }

    async fn clear_history(&self) -> Result<()> {
        tracing::debug!("DELETE /chat/history");
        let request = self.authorized(self.client.delete(self.url("/chat/history")));
        Self::check(request.send().await, "clear history").await?;
        Ok(())
    }
}
