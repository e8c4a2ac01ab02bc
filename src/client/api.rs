//! REST client for the public-profile endpoints: the owner's authenticated
//! calls and the anonymous visitor lookups

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::model::{PublicProfile, PublicProfileView, ToggleRequest};

/// Default per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("Public profile not found")]
    NotFound,

    #[error("Unexpected response status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(reqwest::Error),

    #[error("No public profile loaded")]
    NotReady,
}

/// The calls the client makes against the backend
///
/// `bearer` is the raw access token without the `Bearer ` prefix. The two
/// lookups are anonymous and each counts one view on the server.
pub trait PublicProfileApi: Send + Sync {
    fn get_or_create(
        &self,
        bearer: &str,
    ) -> impl Future<Output = Result<PublicProfile, ClientError>> + Send;

    fn toggle(
        &self,
        bearer: &str,
        is_active: bool,
    ) -> impl Future<Output = Result<PublicProfile, ClientError>> + Send;

    fn get_by_token(
        &self,
        share_token: &str,
    ) -> impl Future<Output = Result<PublicProfileView, ClientError>> + Send;

    fn get_by_user_id(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<PublicProfileView, ClientError>> + Send;
}

/// [`PublicProfileApi`] over HTTP
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED => {
            response.json().await.map_err(ClientError::Decode)
        }
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        other => Err(ClientError::Status(other.as_u16())),
    }
}

impl PublicProfileApi for HttpApi {
    async fn get_or_create(&self, bearer: &str) -> Result<PublicProfile, ClientError> {
        let response = self
            .client
            .post(self.url("/profiles/public"))
            .bearer_auth(bearer)
            .json(&json!({}))
            .send()
            .await
            .map_err(ClientError::Network)?;

        decode(response).await
    }

    async fn toggle(&self, bearer: &str, is_active: bool) -> Result<PublicProfile, ClientError> {
        let response = self
            .client
            .post(self.url("/profiles/public/toggle"))
            .bearer_auth(bearer)
            .json(&ToggleRequest { is_active })
            .send()
            .await
            .map_err(ClientError::Network)?;

        decode(response).await
    }

    async fn get_by_token(&self, share_token: &str) -> Result<PublicProfileView, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/profiles/public/share/{}", share_token)))
            .send()
            .await
            .map_err(ClientError::Network)?;

        decode(response).await
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<PublicProfileView, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/profiles/public/user/{}", user_id)))
            .send()
            .await
            .map_err(ClientError::Network)?;

        decode(response).await
    }
}
