//! Upstream HTTP client for calendar fetches.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Why an upstream fetch produced no calendar body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream answered with a non-2xx status.
    #[error("upstream responded with {status}")]
    Status { status: StatusCode },

    /// The request could not be built or sent, or the body could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Shared client used for every upstream GET.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` and read the whole body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        Ok(response.text().await?)
    }
}

/// Reason phrase for `status`, falling back to the numeric code.
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

/// Render an error with its whole `source()` chain, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
