//! HTTP client implementation for the SetGraph API.
//!
//! This module provides a reqwest-based implementation of the
//! [`SetgraphApi`](crate::SetgraphApi) trait.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::models::{LogPage, MeasurementPage};
use crate::{AuthToken, Credentials, SetgraphApi, SetgraphError};

/// Client for the SetGraph API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestSetgraphClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestSetgraphClient {
    /// Create a new client instance.
    ///
    /// `base_url` is the root of the SetGraph API (e.g.
    /// "https://api.setgraph.app"); a trailing slash is tolerated.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url)
    }

    /// Build a bearer-authenticated GET request.
    fn get_request(&self, url: &str, token: &AuthToken) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(token.access_token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SetgraphError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }
}

/// Extract error information from a failed response.
async fn error_from_response(resp: reqwest::Response) -> SetgraphError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let body_snippet: String = body.chars().take(256).collect();
    SetgraphError::Api {
        status: Some(status),
        message: body_snippet,
    }
}

#[async_trait]
impl SetgraphApi for ReqwestSetgraphClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, SetgraphError> {
        let url = format!("{}/api/v1/auth/login", self.base_url);
        let body = serde_json::json!({
            "usernameOrEmail": credentials.username_or_email,
            "password": credentials.password.expose_secret(),
        });

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            let snippet: String = text.chars().take(256).collect();
            return Err(SetgraphError::Auth(format!(
                "login returned status {}: {snippet}",
                status.as_u16()
            )));
        }

        // All three fields must be present as strings; anything else is an
        // authentication failure rather than a decode error.
        let payload: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| SetgraphError::Auth(format!("malformed login response: {e}")))?;
        let field = |key: &str| -> Result<String, SetgraphError> {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .ok_or_else(|| SetgraphError::Auth(format!("login response missing `{key}`")))
        };
        Ok(AuthToken {
            access_token: SecretString::new(field("accessToken")?.into()),
            refresh_token: SecretString::new(field("refreshToken")?.into()),
            user_id: field("userId")?,
        })
    }

    async fn global_measurement_page(
        &self,
        token: &AuthToken,
        page: u32,
    ) -> Result<MeasurementPage, SetgraphError> {
        let url = format!("{}/api/v1/measurements", self.base_url);
        self.execute_json(self.get_request(&url, token).query(&[("page", page)]))
            .await
    }

    async fn user_measurement_page(
        &self,
        token: &AuthToken,
        page: u32,
    ) -> Result<MeasurementPage, SetgraphError> {
        let url = format!(
            "{}/api/v1/users/{}/measurements",
            self.base_url, token.user_id
        );
        self.execute_json(self.get_request(&url, token).query(&[("page", page)]))
            .await
    }

    async fn log_page(
        &self,
        token: &AuthToken,
        limit: u32,
        continuation: Option<&str>,
    ) -> Result<LogPage, SetgraphError> {
        let url = format!("{}/api/v1/users/{}/logs", self.base_url, token.user_id);
        let mut request = self
            .get_request(&url, token)
            .query(&[("limit", limit.to_string())]);
        if let Some(continuation) = continuation {
            request = request.query(&[("continuationToken", continuation)]);
        }
        self.execute_json(request).await
    }
}
