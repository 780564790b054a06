use super::types::{CommentRequest, FundraisingPage};
use super::{ApiError, ContentSource};
use crate::config::TogetherConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// REST client for the Kakao Together platform. Authentication rides on
/// ambient session cookies; the client itself carries none.
pub struct TogetherRest {
    client: Client,
    base_url: String,
    comment_base_url: String,
    sort: String,
    list_seed: u32,
}

impl TogetherRest {
    pub fn new(config: &TogetherConfig) -> Self {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            comment_base_url: config.comment_api_base.trim_end_matches('/').to_string(),
            sort: config.sort.clone(),
            list_seed: config.list_seed,
        }
    }

    /// Probe whether the platform session is live. A non-2xx answer means
    /// likes and comments will be rejected until the operator signs in.
    pub async fn session_ok(&self) -> Result<bool, ApiError> {
        let url = format!("{}/api/me", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    async fn check(
        resp: reqwest::Response,
        endpoint: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl ContentSource for TogetherRest {
    async fn fundraising_page(&self, page: u32, size: u32) -> Result<FundraisingPage, ApiError> {
        let url = format!(
            "{}/fundraisings/api/fundraisings/api/v1/fundraisings/now?sort={}&page={}&size={}&seed={}",
            self.base_url, self.sort, page, size, self.list_seed
        );
        let resp = self.client.get(&url).send().await?;
        let resp = Self::check(resp, "fundraising listing").await?;
        Ok(resp.json().await?)
    }

    async fn like(&self, content_id: u64) -> Result<(), ApiError> {
        let url = format!(
            "{}/fundraisings/together-api/api/fundraisings/{}/signs",
            self.base_url, content_id
        );
        // The endpoint wants the JSON content type even though the body is empty.
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::check(resp, "like").await?;
        Ok(())
    }

    async fn comment(&self, content_id: u64, message: &str) -> Result<(), ApiError> {
        let url = format!("{}/fundraisings/api/v2/comments", self.comment_base_url);
        let body = CommentRequest {
            content_id,
            content_type: "FUNDRAISING".to_string(),
            message: message.to_string(),
        };
        let resp = self.client.post(&url).json(&body).send().await?;
        Self::check(resp, "comment").await?;
        Ok(())
    }
}
