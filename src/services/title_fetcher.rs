//! Remote page title lookup used when a link is added without a title.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::{Host, Url};

use crate::types::errors::TitleFetchError;

static TITLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("title pattern must compile")
});

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; ReelShelf/", env!("CARGO_PKG_VERSION"), ")");

/// Replaces the handful of entities that commonly appear in page titles.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        // last, so "&amp;lt;" stays "&lt;"
        .replace("&amp;", "&")
}

/// Returns the first non-empty `<title>` of an HTML document, trimmed and unescaped.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_PATTERN.captures(html)?.get(1)?.as_str();
    let title = unescape_html(raw.trim());
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

const MAX_REDIRECTS: usize = 5;

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // 100.64.0.0/10, carrier-grade NAT
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64)
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_internal_v4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local, fe80::/10 link local
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}

/// True when `url` names a host the server may fetch: not localhost, and
/// not a loopback, private, link-local or unspecified address literal.
/// Names are not resolved here.
pub fn is_public_host(url: &Url) -> bool {
    match url.host() {
        None => false,
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain != "localhost" && !domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => !is_internal_v4(ip),
        Some(Host::Ipv6(ip)) => !is_internal_v6(ip),
    }
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS || !is_public_host(attempt.url()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// HTTP client for title lookups with a fixed per-request timeout.
pub struct TitleFetcher {
    client: Client,
    timeout: Duration,
}

impl TitleFetcher {
    pub fn new(timeout: Duration) -> Result<Self, TitleFetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(redirect_policy())
            .build()
            .map_err(|e| TitleFetchError::Request(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches `url` and extracts its title.
    pub async fn fetch_title(&self, url: &str) -> Result<String, TitleFetchError> {
        let parsed = Url::parse(url).map_err(|e| TitleFetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TitleFetchError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        if !is_public_host(&parsed) {
            tracing::warn!(url, "refusing to fetch an internal address");
            return Err(TitleFetchError::BlockedHost(
                parsed.host_str().unwrap_or_default().to_string(),
            ));
        }

        let response = self.client.get(parsed).send().await.map_err(map_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TitleFetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest)?;
        extract_title(&body).ok_or(TitleFetchError::NoTitle)
    }
}

fn map_reqwest(err: reqwest::Error) -> TitleFetchError {
    if err.is_timeout() {
        TitleFetchError::Timeout
    } else {
        TitleFetchError::Request(err.to_string())
    }
}
