use crate::domain::{CredentialChoice, Credentials, HostAddress};
use async_trait::async_trait;

/// Port for remembering credentials per server origin
#[async_trait]
pub trait CredentialsPort: Send + Sync {
    /// Pick the credentials a request to `host` should carry
    ///
    /// Explicit credentials are remembered for the host the first time they are
    /// seen (when valid). Never fails: `None` means an anonymous request.
    async fn resolve(&self, host: Option<&HostAddress>, choice: CredentialChoice) -> Option<Credentials>;

    /// Credentials remembered for `host`, if any
    async fn lookup(&self, host: &HostAddress) -> Option<Credentials>;
}
