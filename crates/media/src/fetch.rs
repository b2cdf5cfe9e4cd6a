//! Network fetch for remote media.

use std::time::Duration;

use {async_trait::async_trait, cqbridge_config::MediaConfig, tracing::debug};

use crate::{Error, Result};

/// Download raw bytes from a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, giving up after `timeout` when set and routing through
    /// the configured proxy when `use_proxy` is true.
    async fn fetch(&self, url: &str, timeout: Option<Duration>, use_proxy: bool) -> Result<Vec<u8>>;
}

/// [`Fetcher`] on top of `reqwest`.
///
/// Holds a direct client and, when a proxy is configured, a second client
/// that routes everything through it.
pub struct HttpFetcher {
    direct: reqwest::Client,
    proxied: Option<reqwest::Client>,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn from_config(config: &MediaConfig) -> Result<Self> {
        let builder = || reqwest::Client::builder().user_agent(config.user_agent.clone());

        let direct = builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::external("building HTTP client", e))?;
        let proxied = match config.proxy.as_deref() {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy)
                    .map_err(|e| Error::external(format!("invalid proxy {proxy}"), e))?;
                Some(
                    builder()
                        .proxy(proxy)
                        .build()
                        .map_err(|e| Error::external("building proxied HTTP client", e))?,
                )
            },
            None => None,
        };

        Ok(Self {
            direct,
            proxied,
            max_bytes: config.max_download_bytes,
        })
    }

    fn client(&self, use_proxy: bool) -> &reqwest::Client {
        match (&self.proxied, use_proxy) {
            (Some(proxied), true) => proxied,
            (None, true) => {
                debug!("proxy requested but none configured, fetching directly");
                &self.direct
            },
            _ => &self.direct,
        }
    }

    fn check_size(&self, url: &str, len: usize) -> Result<()> {
        if self.max_bytes > 0 && len > self.max_bytes {
            return Err(Error::TooLarge {
                url: url.to_owned(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Option<Duration>, use_proxy: bool) -> Result<Vec<u8>> {
        let mut request = self.client(use_proxy).get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| classify(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        if let Some(len) = response.content_length() {
            self.check_size(url, usize::try_from(len).unwrap_or(usize::MAX))?;
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        self.check_size(url, body.len())?;
        debug!(url, size = body.len(), "fetched media");
        Ok(body.to_vec())
    }
}

fn classify(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            url: url.to_owned(),
        }
    } else {
        Error::external(format!("fetching {url}"), err)
    }
}
