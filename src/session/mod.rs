//! Agent session: provisioned resources, a thread to talk on, and teardown.

pub mod builder;
pub mod resources;

pub use builder::SessionBuilder;
pub use resources::SessionResources;

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info_span, instrument, warn, Instrument};

use crate::config::FoundryConfig;
use crate::error::FoundryError;
use crate::extract::{self, ExtractedParts};
use crate::run::RunDriver;
use crate::service::AgentService;
use crate::types::{MessageList, MessageRole, Run, RunStatus};

/// Outcome of one prompt: the finished run and the thread after it.
#[derive(Debug, Clone)]
pub struct Reply {
    pub run: Run,
    pub messages: MessageList,
}

impl Reply {
    pub fn succeeded(&self) -> bool {
        self.run.status == RunStatus::Completed
    }

    /// Text, images and citations of the agent's latest message.
    pub fn parts(&self) -> ExtractedParts {
        extract::extract_last(&self.messages, MessageRole::Assistant)
    }

    pub fn text(&self) -> Option<String> {
        extract::last_text_by_role(&self.messages, MessageRole::Assistant)
    }
}

/// A provisioned agent with its thread.
///
/// Call [`Session::close`] (or use [`Session::scoped`]) to release the
/// remote resources. A session dropped while still holding resources spawns
/// the release on the current tokio runtime.
pub struct Session {
    service: Arc<dyn AgentService>,
    driver: RunDriver,
    resources: SessionResources,
    teardown_timeout: Duration,
}

impl Session {
    pub fn builder(service: Arc<dyn AgentService>, config: &FoundryConfig) -> SessionBuilder {
        SessionBuilder::new(service, config)
    }

    pub(crate) fn new(
        service: Arc<dyn AgentService>,
        driver: RunDriver,
        resources: SessionResources,
        teardown_timeout: Duration,
    ) -> Self {
        Self {
            service,
            driver,
            resources,
            teardown_timeout,
        }
    }

    pub fn resources(&self) -> &SessionResources {
        &self.resources
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.resources.agent_id.as_deref()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.resources.thread_id.as_deref()
    }

    pub fn driver(&self) -> &RunDriver {
        &self.driver
    }

    pub fn service(&self) -> &Arc<dyn AgentService> {
        &self.service
    }

    /// Send a prompt, wait for the run, and fetch the thread.
    #[instrument(
        name = "ask",
        skip_all,
        fields(agent_id = self.agent_id(), thread_id = self.thread_id())
    )]
    pub async fn ask(&self, content: &str) -> Result<Reply, FoundryError> {
        let (thread_id, agent_id) = self.active_ids()?;
        let run = self
            .driver
            .submit_and_wait(thread_id, agent_id, content)
            .await?;
        let messages = self.service.list_messages(thread_id).await?;
        Ok(Reply { run, messages })
    }

    /// Raw bytes of a file the agent produced (e.g. a generated chart).
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, FoundryError> {
        self.service.file_content(file_id).await
    }

    /// Release agent, vector store and file. Safe to call more than once.
    #[instrument(
        name = "close_session",
        skip_all,
        fields(agent_id = self.agent_id(), thread_id = self.thread_id())
    )]
    pub async fn close(&mut self) {
        if self.resources.is_released() {
            debug!("Session already closed");
            return;
        }
        self.resources
            .release(self.service.as_ref(), self.teardown_timeout)
            .await;
    }

    /// Run `f` with this session, then close it whatever `f` returned.
    ///
    /// ```ignore
    /// let answer = session
    ///     .scoped(|s| Box::pin(async move { s.ask("Hello").await }))
    ///     .await?;
    /// ```
    pub async fn scoped<T, F>(mut self, f: F) -> Result<T, FoundryError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, FoundryError>>,
    {
        let result = f(&mut self).await;
        self.close().await;
        result
    }

    fn active_ids(&self) -> Result<(&str, &str), FoundryError> {
        match (self.thread_id(), self.agent_id()) {
            (Some(thread_id), Some(agent_id)) => Ok((thread_id, agent_id)),
            _ => Err(FoundryError::InvalidState(
                "Session is closed".into(),
            )),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.resources.is_released() {
            return;
        }
        let mut resources = std::mem::take(&mut self.resources);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let service = self.service.clone();
                let per_call = self.teardown_timeout;
                let span = info_span!(
                    "release_dropped_session",
                    agent_id = resources.agent_id.as_deref(),
                    thread_id = resources.thread_id.as_deref()
                );
                handle.spawn(
                    async move {
                        resources.release(service.as_ref(), per_call).await;
                    }
                    .instrument(span),
                );
            }
            Err(_) => warn!(
                ?resources,
                "Session dropped outside a tokio runtime; remote resources were not released"
            ),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("resources", &self.resources)
            .field("driver", &self.driver)
            .finish()
    }
}
