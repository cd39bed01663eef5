pub use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{ClientError, Result};

/// Origin of a request (`scheme://host:port`), lower-cased.
///
/// Used as the credential cache key: every URL served by the same origin maps
/// to the same address regardless of path or query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress(String);

impl HostAddress {
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| ClientError::InvalidUri(format!("{} has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ClientError::InvalidUri(format!("{} has no port", url)))?;

        Ok(Self(format!("{}://{}:{}", url.scheme(), host, port).to_lowercase()))
    }

    /// Builds an address from free-form text. Blank input yields `None`.
    pub fn parse(address: &str) -> Option<Self> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        match Url::parse(address) {
            Ok(url) if url.has_host() => Self::from_url(&url).ok(),
            _ => Some(Self(address.to_lowercase())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Only credentials carrying a user name are worth sending or caching.
    pub fn is_valid(&self) -> bool {
        !self.username.trim().is_empty()
    }

    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", base64::prelude::BASE64_STANDARD.encode(credentials))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How a request picks its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CredentialChoice {
    /// Use these credentials, remembering them for the host if none are cached yet.
    Explicit(Credentials),
    /// Use whatever was remembered for the host, if anything.
    #[default]
    UseCached,
    /// Send no credentials at all.
    Anonymous,
}

impl From<Option<Credentials>> for CredentialChoice {
    fn from(credentials: Option<Credentials>) -> Self {
        match credentials {
            Some(c) => CredentialChoice::Explicit(c),
            None => CredentialChoice::UseCached,
        }
    }
}

impl From<Credentials> for CredentialChoice {
    fn from(credentials: Credentials) -> Self {
        CredentialChoice::Explicit(credentials)
    }
}

/// One page of a progressively fetched console log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutput {
    pub text: String,
    /// Total size reported by the server; pass it as `start` on the next poll.
    pub offset: u64,
    pub is_building: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
}

impl ApiMethod {
    pub fn as_str(&self) -> &str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub url: Url,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: ApiMethod, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            credentials: None,
            timeout: None,
        }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    headers: HashMap<String, Vec<String>>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Header names are stored lower-cased so lookups ignore case. Repeated
    /// headers keep every value, in order.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self.headers.entry(name.to_lowercase()).or_default().push(value);
        }
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.entry(name.to_lowercase()).or_default().push(value.into());
        self
    }

    /// First value of `name`, if the header is present at all.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).first().map(String::as_str)
    }

    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers.get(&name.to_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Per-call limits. Both are optional; without them a call runs until the
/// transport gives up.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthRule {
    /// Any URL on the server, only its origin is kept.
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_command: Option<String>,
}
