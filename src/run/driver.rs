//! Poll loop for a single run.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn, Span};

use crate::error::FoundryError;
use crate::service::AgentService;
use crate::tools::ToolRegistry;
use crate::types::{CreateMessageRequest, Run, RunStatus, ToolOutput};
use crate::util::poll::PollPolicy;

/// What to do when a local function fails while a run waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    /// Send `{"error": "..."}` as the function's output and let the agent react.
    #[default]
    Report,
    /// Cancel the run and return the error.
    Abort,
}

/// Sends prompts, starts runs and polls them until the service is done.
///
/// Runs are driven one at a time; the driver never has two active runs on
/// the same thread.
#[derive(Clone)]
pub struct RunDriver {
    service: Arc<dyn AgentService>,
    registry: Arc<ToolRegistry>,
    poll: PollPolicy,
    failure_policy: ToolFailurePolicy,
}

impl RunDriver {
    pub fn new(service: Arc<dyn AgentService>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            service,
            registry,
            poll: PollPolicy::default(),
            failure_policy: ToolFailurePolicy::default(),
        }
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Append `content` as a user message, run the agent and wait for a
    /// terminal status.
    ///
    /// A run that ends `failed` is returned as `Ok`; check
    /// [`Run::failure`]. Only client-side problems are errors.
    #[instrument(
        name = "submit_and_wait",
        skip_all,
        fields(thread_id = %thread_id, agent_id = %agent_id)
    )]
    pub async fn submit_and_wait(
        &self,
        thread_id: &str,
        agent_id: &str,
        content: &str,
    ) -> Result<Run, FoundryError> {
        self.poll.validate()?;
        let message = self
            .service
            .create_message(thread_id, &CreateMessageRequest::user(content))
            .await?;
        debug!(thread_id, message_id = %message.id, "Appended user message");
        self.create_and_wait(thread_id, agent_id).await
    }

    /// Start a run on whatever the thread already holds and wait for it.
    #[instrument(
        name = "run",
        skip_all,
        fields(thread_id = %thread_id, agent_id = %agent_id, run_id = tracing::field::Empty)
    )]
    pub async fn create_and_wait(&self, thread_id: &str, agent_id: &str) -> Result<Run, FoundryError> {
        self.poll.validate()?;
        let run = self.service.create_run(thread_id, agent_id).await?;
        Span::current().record("run_id", run.id.as_str());
        info!(thread_id, run_id = %run.id, "Run started");
        self.wait(thread_id, &run.id).await
    }

    #[instrument(
        name = "wait_for_run",
        skip_all,
        fields(run_id = %run_id, max_attempts = self.poll.max_attempts)
    )]
    async fn wait(&self, thread_id: &str, run_id: &str) -> Result<Run, FoundryError> {
        let started = Instant::now();

        for attempt in 0..self.poll.max_attempts {
            let mut run = self.service.get_run(thread_id, run_id).await?;
            debug!(run_id, status = %run.status, attempt = attempt + 1, "Polled run");

            if run.status == RunStatus::RequiresAction {
                run = self.answer_tool_calls(thread_id, &run).await?;
            }

            if run.status.is_terminal() {
                match run.failure() {
                    Some(failure) => warn!(run_id, %failure, "Run failed"),
                    None => info!(run_id, status = %run.status, "Run finished"),
                }
                return Ok(run);
            }

            self.poll.pause_after(attempt).await;
        }

        warn!(
            run_id,
            attempts = self.poll.max_attempts,
            "Gave up waiting for run"
        );
        Err(self.poll.exhausted(started))
    }

    /// Execute every requested function and hand the outputs back.
    async fn answer_tool_calls(&self, thread_id: &str, run: &Run) -> Result<Run, FoundryError> {
        let calls = run.pending_tool_calls();
        let mut outputs = Vec::with_capacity(calls.len());

        for call in calls {
            let Some(function) = &call.function else {
                warn!(call_id = %call.id, kind = %call.kind, "Skipping non-function tool call");
                continue;
            };

            let output = match self
                .registry
                .invoke_raw(&function.name, &function.arguments)
                .await
            {
                Ok(output) => output,
                Err(err) if self.reportable(&err) => {
                    warn!(tool = %function.name, error = %err, "Tool execution failed");
                    serde_json::json!({ "error": err.to_string() }).to_string()
                }
                Err(err) => {
                    self.cancel_quietly(thread_id, &run.id).await;
                    return Err(err);
                }
            };
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }

        if outputs.is_empty() {
            warn!(run_id = %run.id, "No tool outputs to submit; cancelling run");
            return self.service.cancel_run(thread_id, &run.id).await;
        }

        info!(run_id = %run.id, count = outputs.len(), "Submitting tool outputs");
        self.service
            .submit_tool_outputs(thread_id, &run.id, &outputs)
            .await
    }

    fn reportable(&self, err: &FoundryError) -> bool {
        self.failure_policy == ToolFailurePolicy::Report
            && matches!(
                err,
                FoundryError::ToolExecution { .. } | FoundryError::InvalidArgument(_)
            )
    }

    async fn cancel_quietly(&self, thread_id: &str, run_id: &str) {
        if let Err(err) = self.service.cancel_run(thread_id, run_id).await {
            warn!(run_id, error = %err, "Failed to cancel run");
        }
    }
}

impl std::fmt::Debug for RunDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunDriver")
            .field("registry", &self.registry)
            .field("poll", &self.poll)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}
