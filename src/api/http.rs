//! JSON-over-HTTP implementation of [`FeedApi`].
//!
//! Procedures live at `{base_url}/{router}.{procedure}`. Queries are `GET`
//! with the JSON input in `?input=`; mutations `POST` their input as the
//! JSON body. Queries are retried on transport failures; mutations never
//! are, since a toggle that reached the server must not be sent twice.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{CreateCommentInput, CreatePostInput, FavoriteToggled, LikeToggled};
use crate::api::FeedApi;
use crate::config::{ApiConfig, SecureString};
use crate::model::{Comment, Post, PostId};

pub struct HttpFeedApi {
    client: Client,
    base_url: String,
    session_token: Option<SecureString>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff_base: Duration,
}

impl HttpFeedApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl { url: base_url });
        }

        let timeout = Duration::from_secs(config.timeout_seconds as u64);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                procedure: "client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            session_token: config.resolve_session_token(),
            timeout,
            max_retries: config.max_retries,
            retry_backoff_base: Duration::from_millis(config.retry_backoff_base_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url, procedure)
    }

    async fn query<I, O>(&self, procedure: &str, input: Option<&I>) -> Result<O, ApiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let encoded = input
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Decode {
                procedure: procedure.to_string(),
                source: e,
            })?;

        let mut attempt = 0;
        loop {
            let endpoint = self.endpoint(procedure);
            let mut url = Url::parse(&endpoint).map_err(|_| ApiError::InvalidUrl { url: endpoint })?;
            if let Some(ref encoded) = encoded {
                url.query_pairs_mut().append_pair("input", encoded);
            }

            match self.send(procedure, self.client.get(url)).await {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let backoff = self.retry_backoff_base * 2u32.saturating_pow(attempt);
                    tracing::warn!(
                        procedure,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Query failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn mutate<I, O>(&self, procedure: &str, input: &I) -> Result<O, ApiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint(procedure)).json(input);
        self.send(procedure, request).await
    }

    async fn send<O>(&self, procedure: &str, mut request: RequestBuilder) -> Result<O, ApiError>
    where
        O: DeserializeOwned,
    {
        if let Some(ref token) = self.session_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(procedure, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(procedure, e))?;

        tracing::debug!(procedure, status = status.as_u16(), bytes = body.len(), "Procedure call finished");

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            procedure: procedure.to_string(),
            source: e,
        })
    }

    fn transport_error(&self, procedure: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                procedure: procedure.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ApiError::Transport {
                procedure: procedure.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl FeedApi for HttpFeedApi {
    async fn latest_feed(&self) -> Result<Vec<Post>, ApiError> {
        self.query::<(), _>("post.getLatestFeed", None).await
    }

    async fn post_by_id(&self, id: &PostId) -> Result<Post, ApiError> {
        self.query("post.getById", Some(id)).await
    }

    async fn toggle_like(&self, id: &PostId) -> Result<LikeToggled, ApiError> {
        self.mutate("post.toggleLike", id).await
    }

    async fn toggle_favorite(&self, id: &PostId) -> Result<FavoriteToggled, ApiError> {
        self.mutate("post.toggleFavorite", id).await
    }

    async fn create_comment(&self, input: &CreateCommentInput) -> Result<Comment, ApiError> {
        self.mutate("comment.create", input).await
    }

    async fn comments_for_post(&self, id: &PostId) -> Result<Vec<Comment>, ApiError> {
        self.query("comment.byPostId", Some(id)).await
    }

    async fn create_post(&self, input: &CreatePostInput) -> Result<Post, ApiError> {
        self.mutate("post.create", input).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.mutate::<_, IgnoredAny>("post.delete", id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            HttpFeedApi::new(&config),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/api/".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpFeedApi::new(&config).unwrap();
        assert_eq!(api.endpoint("post.toggleLike"), "http://localhost:3000/api/post.toggleLike");
    }
}
