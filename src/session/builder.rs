//! Provisioning of a session's remote resources.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, Span};

use super::resources::SessionResources;
use super::Session;
use crate::config::FoundryConfig;
use crate::error::FoundryError;
use crate::run::{RunDriver, ToolFailurePolicy};
use crate::service::{AgentService, FileUpload};
use crate::tools::ToolSet;
use crate::types::{CreateAgentRequest, CreateVectorStoreRequest, FileStatus, VectorStoreStatus};
use crate::util::poll::{PollPolicy, PollStep};

pub(crate) const DEFAULT_TEARDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Collects what a session needs, then creates it with [`SessionBuilder::start`].
pub struct SessionBuilder {
    service: Arc<dyn AgentService>,
    model: String,
    name: Option<String>,
    instructions: Option<String>,
    tools: ToolSet,
    upload: Option<FileUpload>,
    vector_store_name: Option<String>,
    search_connection_name: Option<String>,
    bing_grounding: bool,
    poll: PollPolicy,
    failure_policy: ToolFailurePolicy,
    teardown_timeout: Duration,
}

impl SessionBuilder {
    /// Model, poll budget and search connection are taken from `config`.
    pub fn new(service: Arc<dyn AgentService>, config: &FoundryConfig) -> Self {
        Self {
            service,
            model: config.model_id.clone(),
            name: None,
            instructions: None,
            tools: ToolSet::new(),
            upload: None,
            vector_store_name: None,
            search_connection_name: config.search_connection_name.clone(),
            bing_grounding: false,
            poll: config.poll.clone(),
            failure_policy: ToolFailurePolicy::default(),
            teardown_timeout: DEFAULT_TEARDOWN_TIMEOUT,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    /// Upload `file`, index it in a new vector store and enable file search over it.
    pub fn file_search(mut self, file: FileUpload) -> Self {
        self.upload = Some(file);
        self
    }

    pub fn vector_store_name(mut self, name: impl Into<String>) -> Self {
        self.vector_store_name = Some(name.into());
        self
    }

    /// Ground answers in Bing search through the configured search connection.
    pub fn bing_grounding(mut self) -> Self {
        self.bing_grounding = true;
        self
    }

    pub fn search_connection(mut self, name: impl Into<String>) -> Self {
        self.search_connection_name = Some(name.into());
        self
    }

    pub fn poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Budget for each single deletion during teardown.
    pub fn teardown_timeout(mut self, timeout: Duration) -> Self {
        self.teardown_timeout = timeout;
        self
    }

    /// Create file, vector store, agent and thread, in that order.
    ///
    /// If a step fails, whatever was already created is released before the
    /// error is returned.
    #[instrument(
        name = "provision_session",
        skip_all,
        fields(
            model = %self.model,
            agent_id = tracing::field::Empty,
            thread_id = tracing::field::Empty
        )
    )]
    pub async fn start(self) -> Result<Session, FoundryError> {
        self.poll.validate()?;
        let mut resources = SessionResources::default();

        match self.provision(&mut resources).await {
            Ok(tools) => {
                let driver = RunDriver::new(self.service.clone(), tools.registry())
                    .with_poll(self.poll)
                    .with_failure_policy(self.failure_policy);
                Ok(Session::new(
                    self.service,
                    driver,
                    resources,
                    self.teardown_timeout,
                ))
            }
            Err(err) => {
                info!(error = %err, "Provisioning failed; releasing partial session");
                resources
                    .release(self.service.as_ref(), self.teardown_timeout)
                    .await;
                Err(err)
            }
        }
    }

    async fn provision(&self, resources: &mut SessionResources) -> Result<ToolSet, FoundryError> {
        let mut tools = self.tools.clone();

        if self.bing_grounding {
            let name = self
                .search_connection_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| {
                    FoundryError::Configuration("Bing grounding needs a search connection name".into())
                })?;
            let connection = self.service.get_connection(name).await?;
            let connection_id = require_id("search connection", &connection.id)?;
            debug!(name, connection_id, "Resolved search connection");
            tools = tools.with_bing_grounding(connection_id);
        }

        if let Some(upload) = &self.upload {
            let file = self.service.upload_file(upload).await?;
            let file_id = require_id("uploaded file", &file.id)?.to_string();
            resources.file_id = Some(file_id.clone());
            info!(%file_id, filename = %upload.filename, "Uploaded file");
            self.wait_for_file(&file_id).await?;

            let store = self
                .service
                .create_vector_store(&CreateVectorStoreRequest {
                    file_ids: vec![file_id],
                    name: self.vector_store_name.clone(),
                })
                .await?;
            let store_id = require_id("vector store", &store.id)?.to_string();
            resources.vector_store_id = Some(store_id.clone());
            info!(vector_store_id = %store_id, "Created vector store");
            self.wait_for_vector_store(&store_id).await?;
            tools.add_vector_store(store_id);
        }

        let mut request = CreateAgentRequest::new(self.model.clone())
            .with_tools(tools.definitions(), tools.resources());
        request.name = self.name.clone();
        request.instructions = self.instructions.clone();
        let agent = self.service.create_agent(&request).await?;
        let agent_id = require_id("agent", &agent.id)?.to_string();
        resources.agent_id = Some(agent_id.clone());
        Span::current().record("agent_id", agent_id.as_str());
        info!(%agent_id, model = %self.model, "Created agent");

        let thread = self.service.create_thread().await?;
        let thread_id = require_id("thread", &thread.id)?.to_string();
        resources.thread_id = Some(thread_id.clone());
        Span::current().record("thread_id", thread_id.as_str());
        info!(%thread_id, "Created thread");

        Ok(tools)
    }

    async fn wait_for_file(&self, file_id: &str) -> Result<(), FoundryError> {
        self.poll
            .until_ready(|| async move {
                let file = self.service.get_file(file_id).await?;
                match file.status {
                    Some(FileStatus::Error) => Err(FoundryError::Provisioning(format!(
                        "File {file_id} failed processing: {}",
                        file.status_details.as_deref().unwrap_or("no details")
                    ))),
                    _ if file.is_pending() => Ok(PollStep::Pending),
                    _ => Ok(PollStep::Ready(())),
                }
            })
            .await
    }

    async fn wait_for_vector_store(&self, vector_store_id: &str) -> Result<(), FoundryError> {
        self.poll
            .until_ready(|| async move {
                let store = self.service.get_vector_store(vector_store_id).await?;
                match store.status {
                    VectorStoreStatus::Completed => Ok(PollStep::Ready(())),
                    VectorStoreStatus::Expired => Err(FoundryError::Provisioning(format!(
                        "Vector store {vector_store_id} expired before indexing finished"
                    ))),
                    _ => Ok(PollStep::Pending),
                }
            })
            .await
    }
}

fn require_id<'a>(what: &str, id: &'a str) -> Result<&'a str, FoundryError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(FoundryError::Provisioning(format!(
            "Service returned no id for the {what}"
        )));
    }
    Ok(id)
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("model", &self.model)
            .field("name", &self.name)
            .field("tools", &self.tools)
            .field("bing_grounding", &self.bing_grounding)
            .field("poll", &self.poll)
            .finish()
    }
}
