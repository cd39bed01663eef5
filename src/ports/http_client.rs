use crate::domain::{ApiRequest, ApiResponse, Result};
use async_trait::async_trait;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Perform a single request. Non-success statuses are returned, not raised.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}
