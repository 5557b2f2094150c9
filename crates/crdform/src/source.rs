//! Remote schema sources.

use thiserror::Error;
use url::Url;

/// Largest schema document accepted from a source.
pub const MAX_DOCUMENT_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("url is required")]
    EmptyUrl,
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("only http and https urls are supported")]
    UnsupportedScheme,
    #[error("url hostname is required")]
    MissingHost,
    #[error("fetch failed with status {0}")]
    Status(u16),
    #[error("document is too large (max 2MB)")]
    TooLarge,
    #[error("document is empty")]
    EmptyDocument,
    #[error("read response: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "http")]
    #[error("fetch url: {0}")]
    Http(#[from] reqwest::Error),
}

/// Supplies raw schema text for a URL.
pub trait SchemaSource {
    fn fetch(&self, url: &Url) -> Result<String, SourceError>;
}

/// Schema text together with the URL it was actually read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSchema {
    pub source_url: String,
    pub raw: String,
}

/// Parses a user supplied URL, accepting only `http` and `https` with a host.
pub fn parse_source_url(raw: &str) -> Result<Url, SourceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SourceError::EmptyUrl);
    }
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SourceError::UnsupportedScheme);
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SourceError::MissingHost);
    }
    Ok(url)
}

/// Rewrites GitHub `blob` page URLs to their raw content URL.
///
/// `https://github.com/<owner>/<repo>/blob/<branch>/<path>` becomes
/// `https://raw.githubusercontent.com/<owner>/<repo>/<branch>/<path>`; any other
/// URL is returned unchanged.
pub fn normalize_source_url(url: &Url) -> Result<Url, SourceError> {
    let is_github = url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("github.com"));
    if !is_github {
        return Ok(url.clone());
    }

    let segments: Vec<&str> = url
        .path()
        .trim_matches('/')
        .split('/')
        .collect();
    if segments.len() < 5 || segments[2] != "blob" {
        return Ok(url.clone());
    }
    let file: Vec<&str> = segments[4..]
        .iter()
        .copied()
        .filter(|segment| !segment.is_empty())
        .collect();
    Ok(Url::parse(&format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        segments[0],
        segments[1],
        segments[3],
        file.join("/")
    ))?)
}

/// Validates and normalizes `raw_url`, then reads the schema through `source`.
pub fn fetch_schema(source: &dyn SchemaSource, raw_url: &str) -> Result<FetchedSchema, SourceError> {
    let url = normalize_source_url(&parse_source_url(raw_url)?)?;
    let body = source.fetch(&url)?;
    if body.len() > MAX_DOCUMENT_BYTES {
        return Err(SourceError::TooLarge);
    }
    let raw = body.trim();
    if raw.is_empty() {
        return Err(SourceError::EmptyDocument);
    }
    Ok(FetchedSchema {
        source_url: url.to_string(),
        raw: raw.to_string(),
    })
}

#[cfg(feature = "http")]
pub use http::HttpSchemaSource;

#[cfg(feature = "http")]
mod http {
    use std::io::Read;
    use std::time::Duration;

    use reqwest::header::ACCEPT;
    use url::Url;

    use super::{MAX_DOCUMENT_BYTES, SchemaSource, SourceError};

    const TIMEOUT: Duration = Duration::from_secs(12);
    const ACCEPTED_TYPES: &str = "text/plain, application/yaml, application/x-yaml, */*";

    /// Blocking HTTP source with a request timeout and a body size cap.
    #[derive(Debug, Clone)]
    pub struct HttpSchemaSource {
        client: reqwest::blocking::Client,
    }

    impl HttpSchemaSource {
        pub fn new() -> Result<Self, SourceError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(TIMEOUT)
                .user_agent(format!("crdform/{}", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }
    }

    impl SchemaSource for HttpSchemaSource {
        fn fetch(&self, url: &Url) -> Result<String, SourceError> {
            let response = self
                .client
                .get(url.as_str())
                .header(ACCEPT, ACCEPTED_TYPES)
                .send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status(status.as_u16()));
            }

            let mut body = Vec::new();
            response
                .take(MAX_DOCUMENT_BYTES as u64 + 1)
                .read_to_end(&mut body)?;
            if body.len() > MAX_DOCUMENT_BYTES {
                return Err(SourceError::TooLarge);
            }
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
    }
}
