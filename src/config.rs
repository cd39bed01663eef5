use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{AuthRule, ClientError, Result};

pub const APP_NAME: &str = "jenkins-client";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credentials known up front, one entry per server.
    #[serde(default)]
    pub auth_rules: Vec<AuthRule>,
    /// Timeout applied to every request unless overridden.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load from `path`, or from the per-user default location when `None`.
    /// A missing file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => confy::load_path(path),
            None => confy::load(APP_NAME, None),
        };

        config.map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
