use async_trait::async_trait;

use crate::api::{AgentInfo, Processor, ProcessingResponse, ProcessorsResponse};
use crate::errors::TransportError;

/// A remote processing agent.
///
/// Implementations report transport problems as [`TransportError`]; callers
/// decide what a failed call means for scheduling.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Base address identifying the agent, without trailing slash.
    fn base_url(&self) -> &str;

    /// `GET /info`
    async fn info(&self) -> Result<AgentInfo, TransportError>;

    /// `POST /processors`, optionally filtered by `search`.
    async fn processors(&self, search: Option<&str>) -> Result<ProcessorsResponse, TransportError>;

    /// `POST /process` with a processor whose arguments are already bound.
    async fn process(&self, processor: &Processor) -> Result<ProcessingResponse, TransportError>;
}
