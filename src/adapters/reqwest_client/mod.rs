use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::domain::{ApiMethod, ApiRequest, ApiResponse, ClientError, Result};
use crate::ports::HttpClientPort;

/// HTTP transport backed by `reqwest`.
///
/// A fresh client is built for every request and dropped once the response
/// body has been read, so no connection outlives its call.
pub struct ReqwestHttpClient {
    user_agent: String,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let mut http_request = match request.method {
            ApiMethod::Get => client.get(request.url.as_str()),
            ApiMethod::Post => client
                .post(request.url.as_str())
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(request.body.clone().unwrap_or_default()),
        };

        if let Some(creds) = &request.credentials {
            http_request = http_request.header(AUTHORIZATION, creds.to_basic_auth());
        }

        let http_response = http_request.send().await.map_err(convert_error)?;

        let status = http_response.status();

        // Non-text values are kept lossily so the header still reads as present.
        let headers: Vec<(String, String)> = http_response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        let body = http_response.text().await.map_err(convert_error)?;

        Ok(ApiResponse::new(status).with_headers(headers).with_body(body))
    }
}

fn convert_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(format!("HTTP request failed: {}", e))
    }
}
