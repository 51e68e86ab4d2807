use crate::context::FetchContext;
use crate::error::{Result, ScanError};
use crate::extract::extract_metadata;
use crate::result::Metadata;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkmarkBot/1.0)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
    /// Bodies larger than this are refused rather than parsed.
    pub max_document_bytes: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            max_document_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ScraperConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_max_document_bytes(mut self, max_document_bytes: usize) -> Self {
        self.max_document_bytes = max_document_bytes;
        self
    }
}

/// Fetches a page and extracts its bookmark metadata.
///
/// Holds a single pooled client; clone it freely; clones share connections.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch `url` and extract its metadata, probing `/favicon.ico` when the
    /// document names no icon.
    pub async fn get_metadata(&self, url: &str, ctx: &FetchContext) -> Result<Metadata> {
        let parsed_url = validate_url(url)?;
        info!("Fetching metadata for {}", parsed_url);

        let body = self.fetch(&parsed_url, ctx).await?;
        let mut metadata = extract_metadata(&body, &parsed_url);
        drop(body);

        if metadata.favicon_url.is_none()
            && let Some(favicon) = self.probe_default_favicon(&parsed_url, ctx).await
        {
            metadata.set_favicon(favicon);
        }

        debug!(
            "Metadata for {}: title={:?} description={:?} favicon={:?}",
            parsed_url, metadata.title, metadata.description, metadata.favicon_url
        );
        Ok(metadata)
    }

    /// Single GET of `url`; anything other than a 200 is an error.
    pub async fn fetch(&self, url: &Url, ctx: &FetchContext) -> Result<String> {
        debug!("GET {}", url);

        let result = ctx
            .run(async {
                let response = self.client.get(url.clone()).send().await?;

                let status = response.status();
                if status != StatusCode::OK {
                    return Err(ScanError::UnexpectedStatus {
                        code: status.as_u16(),
                    });
                }

                let cap = self.config.max_document_bytes;
                if let Some(len) = response.content_length()
                    && usize::try_from(len).map_or(true, |len| len > cap)
                {
                    return Err(document_too_large(cap));
                }

                // Content-Length is absent on chunked responses, so the cap
                // is enforced while the body streams in.
                let mut response = response;
                let mut body = Vec::new();
                while let Some(chunk) = response.chunk().await? {
                    if body.len() + chunk.len() > cap {
                        return Err(document_too_large(cap));
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(String::from_utf8_lossy(&body).into_owned())
            })
            .await;

        if let Err(ref e) = result {
            warn!("Fetch of {} failed: {}", url, e);
        }
        result
    }

    /// HEAD `/favicon.ico` on the page's host. Every failure reads as "no favicon".
    pub async fn probe_default_favicon(&self, base_url: &Url, ctx: &FetchContext) -> Option<String> {
        let candidate = match default_favicon_url(base_url) {
            Some(candidate) => candidate,
            None => {
                debug!("Cannot build default favicon URL for {}", base_url);
                return None;
            }
        };

        let status = ctx
            .run(async {
                let response = self.client.head(candidate.clone()).send().await?;
                Ok::<_, ScanError>(response.status())
            })
            .await;

        match status {
            Ok(StatusCode::OK) => Some(candidate.to_string()),
            Ok(status) => {
                debug!("Favicon probe {} returned {}", candidate, status);
                None
            }
            Err(e) => {
                debug!("Favicon probe {} failed: {}", candidate, e);
                None
            }
        }
    }
}

fn document_too_large(cap: usize) -> ScanError {
    ScanError::ParseFailure(format!("document exceeds limit of {} bytes", cap))
}

/// Parse `url` and accept only http and https.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScanError::UnsupportedScheme(other.to_string())),
    }
}

/// `<scheme>://<host>[:port]/favicon.ico` for the given page.
pub fn default_favicon_url(base_url: &Url) -> Option<Url> {
    if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
        return None;
    }
    base_url.join("/favicon.ico").ok()
}
