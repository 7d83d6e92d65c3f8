//! Acquisition of SVG markup from a URL.
//!
//! Transport is abstracted behind [`SvgFetcher`] so the library stays runtime-agnostic; the CLI
//! plugs in a blocking HTTP client, tests plug in scripted responses.

use crate::sanitize::looks_like_svg;
use crate::{Error, Result};
use futures::future::BoxFuture;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn svg_media_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)image/svg\+xml|text/xml|application/xml").expect("valid regex")
    })
}

/// Transport-level failure while acquiring markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("invalid SVG source URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Minimal view of an HTTP response: everything the acquire step looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single `GET` for an SVG source.
///
/// Implementations report non-2xx responses as `Ok` with the status set; [`acquire`] turns them
/// into [`FetchError::Status`].
pub trait SvgFetcher {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<HttpResponse, FetchError>>;
}

impl<F: SvgFetcher + ?Sized> SvgFetcher for &F {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<HttpResponse, FetchError>> {
        (**self).get(url)
    }
}

/// Resolves a source URL against an optional page base.
///
/// Only `http`, `https` and `file` URLs are fetchable; `javascript:`, `data:` and friends are
/// rejected before any request is made.
pub fn resolve_source_url(source: &str, base: Option<&Url>) -> std::result::Result<Url, FetchError> {
    let source = source.trim();
    let invalid = |message: String| FetchError::InvalidUrl {
        url: source.to_string(),
        message,
    };

    let parsed = match Url::parse(source) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let Some(base) = base else {
                return Err(invalid("relative URL without a base URL".to_string()));
            };
            base.join(source).map_err(|e| invalid(e.to_string()))?
        }
        Err(err) => return Err(invalid(err.to_string())),
    };

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

/// Fetches `url` and applies the content checks.
///
/// SVG/XML media types are accepted as-is (shape validation happens later). Any other
/// content type is accepted only when the body itself opens with an `<svg` root.
pub async fn acquire<F: SvgFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<String> {
    tracing::debug!(url, "fetching SVG");
    let response = fetcher.get(url).await?;

    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        }
        .into());
    }

    let content_type = response.content_type.as_deref().unwrap_or_default();
    if svg_media_type_regex().is_match(content_type) || looks_like_svg(&response.body) {
        return Ok(response.body);
    }

    Err(Error::InvalidContent {
        content_type: content_type.to_string(),
    })
}
