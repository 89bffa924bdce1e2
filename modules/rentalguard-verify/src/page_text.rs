use std::net::IpAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use ai_client::truncate_chars;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::redirect::Policy;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::traits::PageFetcher;

/// Upper bound on extracted text handed to the prompt.
pub const MAX_PAGE_TEXT_CHARS: usize = 24_000;
/// Upper bound on the raw body read before stripping.
const MAX_BODY_BYTES: usize = 2_000_000;
const MAX_REDIRECTS: usize = 5;

pub const USER_AGENT: &str = "RentalGuard/1.0 (+https://housetective.com)";

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce markup to bounded plain text: drop script and style blocks, drop
/// every tag, collapse whitespace, cap the length.
pub fn strip_markup(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    truncate_chars(text.trim(), MAX_PAGE_TEXT_CHARS).to_string()
}

// --- Extraction ---

/// Result of a best-effort extraction. `text` is empty whenever `failure`
/// is set, and may also be empty for a page with no visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub text: String,
    pub failure: Option<String>,
}

pub struct PageTextExtractor {
    fetcher: Arc<dyn PageFetcher>,
}

impl PageTextExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Never fails: any fetch or decode problem degrades to empty text with
    /// the reason recorded.
    pub async fn extract(&self, url: &str) -> PageText {
        match self.fetcher.fetch_html(url).await {
            Ok(html) => {
                let text = strip_markup(&html);
                debug!(url, chars = text.chars().count(), "page: text extracted");
                PageText {
                    text,
                    failure: None,
                }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(url, error = %reason, error_kind = "extraction_degraded", "page: fetch/strip failed");
                PageText {
                    text: String::new(),
                    failure: Some(reason),
                }
            }
        }
    }
}

// --- HTTP fetcher ---

pub struct HttpPageFetcher {
    http: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(guarded_redirects())
            .build()
            .context("Failed to build page fetch client")?;
        Ok(Self { http })
    }

    /// GET an already-validated URL. Redirect hops are re-checked by the
    /// client's redirect policy.
    async fn fetch_validated(&self, url: Url) -> Result<String> {
        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .context("Failed to fetch URL")?;

        let status = response.status();
        if !status.is_success() {
            // Login walls and bot checks still carry text worth reading.
            debug!(url = %url, %status, "page: non-success status, reading body anyway");
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read response body")?
        {
            let room = MAX_BODY_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= MAX_BODY_BYTES {
                debug!(url = %url, "page: body cap reached, dropping the rest");
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Follow at most `MAX_REDIRECTS` hops, each one held to the same host rules
/// as the first URL.
fn guarded_redirects() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match validate_fetch_url(attempt.url().as_str()) {
            Ok(_) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    })
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed = validate_fetch_url(url)?;
        self.fetch_validated(parsed).await
    }
}

/// Only public http(s) hosts may be fetched.
pub fn validate_fetch_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw.trim()).context("Invalid URL")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!("URL must use http or https scheme, got {}", parsed.scheme());
    }
    match parsed.host() {
        None => bail!("URL has no host"),
        Some(Host::Ipv4(v4)) if is_private_ip(IpAddr::V4(v4)) => {
            bail!("URLs pointing to private/loopback addresses are not allowed")
        }
        Some(Host::Ipv6(v6)) if is_private_ip(IpAddr::V6(v6)) => {
            bail!("URLs pointing to private/loopback addresses are not allowed")
        }
        Some(Host::Domain(domain)) => {
            let lower = domain.to_lowercase();
            if lower == "localhost" || lower.ends_with(".local") || lower.ends_with(".internal") {
                bail!("URLs pointing to internal hosts are not allowed");
            }
        }
        Some(_) => {}
    }
    Ok(parsed)
}

/// Check if an IP address is loopback, unspecified, or in a private range
/// (RFC 1918 / RFC 4193 / link-local).
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_unspecified()
                || v4.is_link_local()
                || v4.is_private()
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(v4));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
