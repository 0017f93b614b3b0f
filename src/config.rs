// src/config.rs

pub mod credentials;

use self::credentials::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr, time::Duration};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_backoff_secs: Option<u64>,
    pub request_delay_secs: Option<u64>,
    pub course_delay_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_folder: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(60),
            max_retries: Some(3),
            retry_backoff_secs: Some(1),
            request_delay_secs: Some(1),
            course_delay_secs: Some(2),
        };

        Self {
            base_url: Some(constants::DEFAULT_BASE_URL.into()),
            username: None,
            password: None,
            download_folder: None,
            network: network_config,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Site root, always ending in `/` so relative Moodle paths join below it.
    pub base_url: Url,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub request_delay: Duration,
    pub course_delay: Duration,
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

/// Parses a site root and appends the trailing slash `Url::join` needs.
pub fn normalize_base_url(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Self::from_sources(args, &external_config)
    }

    /// Merges CLI flags, environment variables and the config file, in that order of precedence.
    pub fn from_sources(args: &Cli, external: &ExternalConfig) -> AppResult<Self> {
        let network = &external.network;

        let base_url = args
            .base_url
            .clone()
            .or_else(|| env_value(constants::env::BASE_URL))
            .or_else(|| external.base_url.clone())
            .unwrap_or_else(|| constants::DEFAULT_BASE_URL.to_string());

        let output_dir = args
            .output
            .clone()
            .or_else(|| env_value::<String>(constants::env::DOWNLOAD_FOLDER).map(PathBuf::from))
            .or_else(|| external.download_folder.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_SAVE_DIR));

        let max_retries = args
            .max_retries
            .or_else(|| env_value(constants::env::RETRY_ATTEMPTS))
            .or(network.max_retries)
            .unwrap_or(3);
        let retry_backoff = env_value(constants::env::RETRY_BACKOFF)
            .or(network.retry_backoff_secs)
            .unwrap_or(1);
        let request_delay = args
            .request_delay
            .or_else(|| env_value(constants::env::REQUEST_DELAY))
            .or(network.request_delay_secs)
            .unwrap_or(1);
        let course_delay = args.course_delay.or(network.course_delay_secs).unwrap_or(2);

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            output_dir,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(60)),
            max_retries,
            retry_backoff: Duration::from_secs(retry_backoff),
            request_delay: Duration::from_secs(request_delay),
            course_delay: Duration::from_secs(course_delay),
        })
    }

    pub fn login_url(&self) -> AppResult<Url> {
        Ok(self.base_url.join(constants::moodle::LOGIN_PATH)?)
    }

    pub fn dashboard_url(&self) -> AppResult<Url> {
        Ok(self.base_url.join(constants::moodle::DASHBOARD_PATH)?)
    }

    pub fn ajax_service_url(&self) -> AppResult<Url> {
        Ok(self.base_url.join(constants::moodle::AJAX_SERVICE_PATH)?)
    }

    pub fn course_url(&self, course_id: u64) -> AppResult<Url> {
        let mut url = self.base_url.join(constants::moodle::COURSE_VIEW_PATH)?;
        url.query_pairs_mut()
            .append_pair("id", &course_id.to_string());
        Ok(url)
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1/").expect("static test URL"),
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            retry_backoff: Duration::from_millis(10),
            request_delay: Duration::ZERO,
            course_delay: Duration::ZERO,
        }
    }
}
