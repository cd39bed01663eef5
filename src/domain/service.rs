use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{
    parse, ApiMethod, ApiRequest, ApiResponse, ClientError, ConsoleOutput, CredentialChoice, HostAddress,
    RequestOptions, Result,
};
use crate::ports::{CredentialsPort, HttpClientPort};

pub const TEXT_SIZE_HEADER: &str = "X-Text-Size";
pub const MORE_DATA_HEADER: &str = "X-More-Data";
const PROGRESSIVE_TEXT_PATH: &str = "logText/progressiveText";

/// Calls a build server's HTTP API on behalf of a caller.
///
/// Every call resolves its credentials through the credential port, performs a
/// single request through the HTTP port and fails on any non-success status.
#[derive(Clone)]
pub struct BuildServerClient {
    credentials: Arc<dyn CredentialsPort>,
    http_client: Arc<dyn HttpClientPort>,
    default_timeout: Option<Duration>,
}

impl BuildServerClient {
    pub fn new(credentials: Arc<dyn CredentialsPort>, http_client: Arc<dyn HttpClientPort>) -> Self {
        Self {
            credentials,
            http_client,
            default_timeout: None,
        }
    }

    /// Timeout applied to calls whose options don't carry one.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// GET `url` and return the response body.
    pub async fn fetch_text(&self, url: &Url, choice: CredentialChoice, options: &RequestOptions) -> Result<String> {
        let response = self.dispatch(ApiMethod::Get, url.clone(), None, choice, options).await?;
        Ok(response.body)
    }

    /// GET `url` and deserialize the body. A blank body yields `None`.
    pub async fn fetch_object<T: DeserializeOwned>(
        &self,
        url: &Url,
        choice: CredentialChoice,
        options: &RequestOptions,
    ) -> Result<Option<T>> {
        let body = self.fetch_text(url, choice, options).await?;
        parse(&body)
    }

    /// Fetch the console log of a build starting at `offset`.
    ///
    /// `url` points at the build (e.g. `.../job/foo/42/`). The returned offset is
    /// the total size reported by the server and is meant to be passed back on
    /// the next poll while `is_building` holds.
    pub async fn fetch_console_output(
        &self,
        url: &Url,
        offset: u64,
        choice: CredentialChoice,
        options: &RequestOptions,
    ) -> Result<ConsoleOutput> {
        let target = progressive_text_url(url, offset);
        let response = self.dispatch(ApiMethod::Get, target, None, choice, options).await?;

        let offset = text_size(&response)?;
        let is_building = response.header(MORE_DATA_HEADER).is_some();

        Ok(ConsoleOutput {
            text: response.body,
            offset,
            is_building,
        })
    }

    /// POST `body` as plain text to `url` and return the response body.
    pub async fn submit_data(
        &self,
        url: &Url,
        body: impl Into<String>,
        choice: CredentialChoice,
        options: &RequestOptions,
    ) -> Result<String> {
        let response = self
            .dispatch(ApiMethod::Post, url.clone(), Some(body.into()), choice, options)
            .await?;
        Ok(response.body)
    }

    async fn dispatch(
        &self,
        method: ApiMethod,
        mut url: Url,
        body: Option<String>,
        choice: CredentialChoice,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let host = HostAddress::from_url(&url)?;
        // Authentication only ever comes from the resolved credentials.
        let _ = url.set_username("");
        let _ = url.set_password(None);

        let credentials = self.credentials.resolve(Some(&host), choice).await;
        let timeout = options.timeout.or(self.default_timeout);

        debug!(
            "{} {} ({})",
            method.as_str(),
            url,
            if credentials.is_some() { "authenticated" } else { "anonymous" }
        );

        let mut request = ApiRequest::new(method, url)
            .with_credentials(credentials)
            .with_timeout(timeout);
        if let Some(body) = body {
            request = request.with_body(body);
        }

        let response = self.execute(&request, timeout, options.cancel.as_ref()).await?;

        if !response.status.is_success() {
            warn!("{} {} returned {}", method.as_str(), request.url, response.status);
            return Err(ClientError::Status {
                status: response.status.as_u16(),
                url: request.url.to_string(),
            });
        }

        Ok(response)
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        timeout: Option<Duration>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let call = self.http_client.execute(request);
        let call = async {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(response) => response,
                    Err(_) => Err(ClientError::Timeout),
                },
                None => call.await,
            }
        };

        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(ClientError::Cancelled),
                response = call => response,
            },
            None => call.await,
        }
    }
}

fn progressive_text_url(url: &Url, offset: u64) -> Url {
    let mut target = url.clone();
    let path = if url.path().ends_with('/') {
        format!("{}{}", url.path(), PROGRESSIVE_TEXT_PATH)
    } else {
        format!("{}/{}", url.path(), PROGRESSIVE_TEXT_PATH)
    };
    target.set_path(&path);
    target.set_query(Some(&format!("start={}", offset)));
    target.set_fragment(None);
    target
}

fn text_size(response: &ApiResponse) -> Result<u64> {
    let values = response.header_values(TEXT_SIZE_HEADER);
    let value = values
        .first()
        .ok_or_else(|| ClientError::Protocol(format!("missing {} header", TEXT_SIZE_HEADER)))?;

    if values.iter().any(|v| v != value) {
        return Err(ClientError::Protocol(format!(
            "conflicting {} headers: {:?}",
            TEXT_SIZE_HEADER, values
        )));
    }

    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Protocol(format!("invalid {} header: {:?}", TEXT_SIZE_HEADER, value)))
}
