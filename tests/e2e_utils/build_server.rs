#![cfg(test)]
#![allow(dead_code)]

use std::sync::Arc;

use url::Url;
use wiremock::MockServer;

use jenkins_client::{BuildServerClient, InMemoryCredentialStore, ReqwestHttpClient};

/// A mock build server plus a client wired to a fresh credential store.
pub struct TestBuildServer {
    pub server: MockServer,
    pub store: Arc<InMemoryCredentialStore>,
    pub client: BuildServerClient,
}

impl TestBuildServer {
    pub async fn start() -> Self {
        Self::start_with_store(Arc::new(InMemoryCredentialStore::new())).await
    }

    pub async fn start_with_store(store: Arc<InMemoryCredentialStore>) -> Self {
        let server = MockServer::start().await;
        let client = BuildServerClient::new(store.clone(), Arc::new(ReqwestHttpClient::new()));
        Self { server, store, client }
    }

    /// Swap the credential store, e.g. for one seeded with this server's address.
    pub fn with_store(self, store: Arc<InMemoryCredentialStore>) -> Self {
        let client = BuildServerClient::new(store.clone(), Arc::new(ReqwestHttpClient::new()));
        Self {
            server: self.server,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> Url {
        format!("{}{}", self.server.uri(), path)
            .parse()
            .expect("mock server url should parse")
    }

    /// Same as `url`, with `user:password@` embedded in the authority.
    pub fn url_with_userinfo(&self, user: &str, password: &str, path: &str) -> Url {
        let mut url = self.url(path);
        url.set_username(user).expect("mock server url accepts a username");
        url.set_password(Some(password))
            .expect("mock server url accepts a password");
        url
    }

    /// `Authorization` header of every request received so far, in order.
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}
