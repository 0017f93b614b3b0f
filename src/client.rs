// src/client.rs

use crate::{config::AppConfig, constants, error::*};
use log::{debug, warn};
use reqwest::{IntoUrl, Response, header};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use url::Url;

const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// The authenticated session: one cookie jar, transient-failure retries and a
/// politeness delay in front of every request.
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let min_interval = config.retry_backoff.min(MAX_RETRY_INTERVAL);
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(min_interval, MAX_RETRY_INTERVAL)
            .build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .cookie_store(true)
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
        let res = request.send().await?;
        Ok(res.error_for_status()?)
    }

    /// GET whose body is left unread; headers are available before the body is consumed.
    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let url = url.into_url()?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    pub async fn head<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let url = url.into_url()?;
        debug!("HEAD {}", url);
        self.send(self.client.head(url)).await
    }

    /// GETs a page and returns its final URL (after redirects) with the body text.
    pub async fn get_page<T: IntoUrl>(&self, url: T) -> AppResult<(Url, String)> {
        let res = self.get(url).await?;
        let final_url = res.url().clone();
        let body = res.text().await?;
        if body.len() < constants::SUSPICIOUS_BODY_LEN {
            warn!(
                "response from {} is suspiciously small ({} bytes)",
                final_url,
                body.len()
            );
        }
        Ok((final_url, body))
    }

    pub async fn post_form<T: IntoUrl>(&self, url: T, form: &[(&str, &str)]) -> AppResult<Response> {
        let url = url.into_url()?;
        debug!("POST (form) {}", url);
        self.send(self.client.post(url).form(form)).await
    }

    pub async fn post_json<T: IntoUrl>(
        &self,
        url: T,
        query: &[(&str, &str)],
        body: &Value,
    ) -> AppResult<Response> {
        let url = url.into_url()?;
        debug!("POST (json) {}", url);
        let request = self
            .client
            .post(url)
            .query(query)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
        self.send(request).await
    }
}
