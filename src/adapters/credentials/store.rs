use crate::domain::{AuthRule, ClientError, CredentialChoice, Credentials, HostAddress, Result};
use crate::ports::CredentialsPort;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::process::Command;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory credential store keyed by server origin.
///
/// The first valid credentials seen for an origin are kept for the lifetime of
/// the store. Later credentials for the same origin are used for their own
/// request but never replace the stored ones.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    entries: Arc<RwLock<HashMap<HostAddress, Credentials>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded from configured rules.
    pub fn from_rules(rules: Vec<AuthRule>) -> Result<Self> {
        let mut entries = HashMap::new();

        for rule in rules {
            let host = HostAddress::parse(&rule.url)
                .ok_or_else(|| ClientError::Config("auth rule with an empty url".into()))?;
            let password = match (rule.password, rule.password_command) {
                (Some(password), _) => password,
                (None, Some(cmd)) => Self::execute_password_command(&cmd)?,
                (None, None) => String::new(),
            };

            let credentials = Credentials::new(rule.username, password);
            if !credentials.is_valid() {
                return Err(ClientError::Config(format!("auth rule for {} has no username", host)));
            }

            debug!("Seeding credentials for {}: {}", host, credentials.username);
            entries.entry(host).or_insert(credentials);
        }

        info!("Loaded credentials for {} host(s)", entries.len());
        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    fn execute_password_command(cmd: &str) -> Result<String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .map_err(|e| ClientError::Authentication(format!("Command failed: {}", e)))?;

        if !output.status.success() {
            return Err(ClientError::Authentication(format!(
                "Password command exited with {}",
                output.status
            )));
        }

        let password = String::from_utf8(output.stdout)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| ClientError::Authentication(format!("Invalid UTF-8: {}", e)))?;

        if password.is_empty() {
            return Err(ClientError::Authentication(
                "Password command returned an empty password".into(),
            ));
        }
        Ok(password)
    }

    async fn remember(&self, host: &HostAddress, credentials: &Credentials) {
        if !credentials.is_valid() {
            return;
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(host) {
            debug!("Caching credentials for {}: {}", host, credentials.username);
            entries.insert(host.clone(), credentials.clone());
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialsPort for InMemoryCredentialStore {
    async fn resolve(&self, host: Option<&HostAddress>, choice: CredentialChoice) -> Option<Credentials> {
        match choice {
            CredentialChoice::Explicit(credentials) => {
                if let Some(host) = host {
                    self.remember(host, &credentials).await;
                }
                Some(credentials)
            }
            CredentialChoice::UseCached => match host {
                Some(host) => self.lookup(host).await,
                None => None,
            },
            CredentialChoice::Anonymous => None,
        }
    }

    async fn lookup(&self, host: &HostAddress) -> Option<Credentials> {
        self.entries.read().await.get(host).cloned()
    }
}
