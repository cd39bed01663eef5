//! Small client for a Jenkins-style build server HTTP API.
//!
//! [`BuildServerClient`](domain::BuildServerClient) issues one request per call
//! (GET, POST or a progressive console-log fetch) and picks the credentials to
//! attach through a [`CredentialsPort`](ports::CredentialsPort), which by default
//! is an [`InMemoryCredentialStore`](adapters::InMemoryCredentialStore)
//! remembering the first valid credentials used against each server origin.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryCredentialStore, ReqwestHttpClient};
pub use domain::{
    parse, BuildServerClient, ClientError, ConsoleOutput, CredentialChoice, Credentials, HostAddress,
    RequestOptions, Result,
};
