//! Record of remote resources a session owns, and their release.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FoundryError;
use crate::service::AgentService;
use crate::util::timeout::with_timeout;

/// Identifiers of everything provisioned for a session.
///
/// Filled step by step during provisioning, so a half-built session still
/// knows what to release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResources {
    pub file_id: Option<String>,
    pub vector_store_id: Option<String>,
    pub agent_id: Option<String>,
    pub thread_id: Option<String>,
}

impl SessionResources {
    /// Nothing left to release. Threads are not released, so they don't count.
    pub fn is_released(&self) -> bool {
        self.file_id.is_none() && self.vector_store_id.is_none() && self.agent_id.is_none()
    }

    /// Delete agent, vector store and file, in that order.
    ///
    /// Never fails: errors are logged and the id is dropped from the record
    /// either way, so a second call is a no-op.
    pub async fn release(&mut self, service: &dyn AgentService, per_call: Duration) {
        if let Some(id) = self.agent_id.take() {
            report("agent", &id, with_timeout(per_call, service.delete_agent(&id)).await);
        }
        if let Some(id) = self.vector_store_id.take() {
            report(
                "vector store",
                &id,
                with_timeout(per_call, service.delete_vector_store(&id)).await,
            );
        }
        if let Some(id) = self.file_id.take() {
            report("file", &id, with_timeout(per_call, service.delete_file(&id)).await);
        }
    }
}

fn report(kind: &str, id: &str, result: Result<(), FoundryError>) {
    match result {
        Ok(()) => info!(kind, id, "Released"),
        Err(err) if err.is_not_found() => debug!(kind, id, "Already released"),
        Err(err) => warn!(kind, id, error = %err, "Failed to release"),
    }
}
