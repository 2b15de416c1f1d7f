//! Shared test helpers and a scripted in-memory agent service.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use foundry_agents::auth::StaticCredential;
use foundry_agents::config::FoundryConfig;
use foundry_agents::error::FoundryError;
use foundry_agents::service::{AgentService, FileUpload};
use foundry_agents::types::*;
use foundry_agents::util::poll::PollPolicy;

pub const CONNECTION_STRING: &str = "eastus.api.azureml.ms;sub-123;rg-agents;proj-demo";

pub type ErrorFactory = fn() -> FoundryError;

/// Fast poll budget for tests.
pub fn fast_poll(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(1), max_attempts)
}

pub fn test_config() -> FoundryConfig {
    FoundryConfig::new(CONNECTION_STRING, Arc::new(StaticCredential::new("test-token")))
        .with_poll(fast_poll(20))
}

pub fn run_with(status: RunStatus) -> Run {
    Run {
        id: "run_1".into(),
        thread_id: "thread_1".into(),
        assistant_id: "asst_1".into(),
        status,
        required_action: None,
        last_error: None,
        created_at: 0,
        completed_at: None,
        failed_at: None,
        model: None,
        usage: None,
    }
}

pub fn requires_action(calls: Vec<RequiredToolCall>) -> Run {
    let mut run = run_with(RunStatus::RequiresAction);
    run.required_action = Some(RequiredAction::SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs { tool_calls: calls },
    });
    run
}

pub fn failed_run(code: &str, message: &str) -> Run {
    let mut run = run_with(RunStatus::Failed);
    run.last_error = Some(RunError {
        code: code.into(),
        message: message.into(),
    });
    run
}

pub fn assistant_message(id: &str, content: Vec<MessageContent>) -> ThreadMessage {
    ThreadMessage {
        id: id.into(),
        thread_id: "thread_1".into(),
        role: MessageRole::Assistant,
        content,
        created_at: 0,
        assistant_id: Some("asst_1".into()),
        run_id: Some("run_1".into()),
    }
}

/// In-memory [`AgentService`] driven by scripted responses.
///
/// Every call is recorded as `"operation"` or `"operation:id"`.
#[derive(Default)]
pub struct MockAgentService {
    calls: Mutex<Vec<String>>,
    runs: Mutex<VecDeque<Run>>,
    last_run: Mutex<Option<Run>>,
    file_statuses: Mutex<VecDeque<FileStatus>>,
    store_statuses: Mutex<VecDeque<VectorStoreStatus>>,
    messages: Mutex<Vec<ThreadMessage>>,
    submitted: Mutex<Vec<Vec<ToolOutput>>>,
    created_agents: Mutex<Vec<CreateAgentRequest>>,
    failures: Mutex<HashMap<String, ErrorFactory>>,
    blank_ids: Mutex<HashSet<String>>,
    file_bytes: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockAgentService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Responses for successive `get_run` calls. The last one repeats.
    pub fn script_runs(&self, runs: impl IntoIterator<Item = Run>) {
        self.runs.lock().unwrap().extend(runs);
    }

    pub fn script_file_statuses(&self, statuses: impl IntoIterator<Item = FileStatus>) {
        self.file_statuses.lock().unwrap().extend(statuses);
    }

    pub fn script_store_statuses(&self, statuses: impl IntoIterator<Item = VectorStoreStatus>) {
        self.store_statuses.lock().unwrap().extend(statuses);
    }

    /// Messages in service order (newest first).
    pub fn set_messages(&self, messages: Vec<ThreadMessage>) {
        *self.messages.lock().unwrap() = messages;
    }

    pub fn set_file_content(&self, file_id: &str, bytes: &[u8]) {
        self.file_bytes
            .lock()
            .unwrap()
            .insert(file_id.to_string(), bytes.to_vec());
    }

    /// Make `operation` fail with the error built by `make`.
    pub fn fail_on(&self, operation: &str, make: ErrorFactory) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), make);
    }

    /// Make `operation` answer with an empty id.
    pub fn blank_id_on(&self, operation: &str) {
        self.blank_ids.lock().unwrap().insert(operation.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == operation || c.starts_with(&format!("{operation}:")))
            .collect()
    }

    pub fn submitted(&self) -> Vec<Vec<ToolOutput>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn created_agents(&self) -> Vec<CreateAgentRequest> {
        self.created_agents.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, id: Option<&str>) -> Result<(), FoundryError> {
        let entry = match id {
            Some(id) => format!("{operation}:{id}"),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(entry);
        match self.failures.lock().unwrap().get(operation) {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn id_for(&self, operation: &str, id: &str) -> String {
        if self.blank_ids.lock().unwrap().contains(operation) {
            String::new()
        } else {
            id.to_string()
        }
    }

    fn next_run(&self) -> Run {
        let mut last = self.last_run.lock().unwrap();
        let run = self
            .runs
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| last.clone())
            .unwrap_or_else(|| run_with(RunStatus::InProgress));
        *last = Some(run.clone());
        run
    }
}

#[async_trait]
impl AgentService for MockAgentService {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, FoundryError> {
        self.record("create_agent", None)?;
        self.created_agents.lock().unwrap().push(request.clone());
        Ok(Agent {
            id: self.id_for("create_agent", "asst_1"),
            name: request.name.clone(),
            model: request.model.clone(),
            instructions: request.instructions.clone(),
            tools: request.tools.clone(),
            tool_resources: request.tool_resources.clone(),
            created_at: 0,
        })
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), FoundryError> {
        self.record("delete_agent", Some(agent_id))
    }

    async fn create_thread(&self) -> Result<Thread, FoundryError> {
        self.record("create_thread", None)?;
        Ok(Thread {
            id: self.id_for("create_thread", "thread_1"),
            created_at: 0,
            metadata: None,
        })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<ThreadMessage, FoundryError> {
        self.record("create_message", Some(thread_id))?;
        let message = ThreadMessage {
            id: "msg_user".into(),
            thread_id: thread_id.to_string(),
            role: request.role,
            content: vec![MessageContent::text(request.content.clone())],
            created_at: 0,
            assistant_id: None,
            run_id: None,
        };
        self.messages.lock().unwrap().insert(0, message.clone());
        Ok(message)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, FoundryError> {
        self.record("list_messages", Some(thread_id))?;
        Ok(MessageList::new(self.messages.lock().unwrap().clone()))
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run, FoundryError> {
        self.record("create_run", Some(agent_id))?;
        let mut run = run_with(RunStatus::Queued);
        run.thread_id = thread_id.to_string();
        run.id = self.id_for("create_run", "run_1");
        Ok(run)
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, FoundryError> {
        self.record("get_run", Some(run_id))?;
        Ok(self.next_run())
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, FoundryError> {
        self.record("submit_tool_outputs", Some(run_id))?;
        self.submitted.lock().unwrap().push(outputs.to_vec());
        Ok(run_with(RunStatus::Queued))
    }

    async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, FoundryError> {
        self.record("cancel_run", Some(run_id))?;
        Ok(run_with(RunStatus::Cancelling))
    }

    async fn upload_file(&self, upload: &FileUpload) -> Result<FileObject, FoundryError> {
        self.record("upload_file", None)?;
        Ok(FileObject {
            id: self.id_for("upload_file", "file_1"),
            filename: upload.filename.clone(),
            bytes: upload.bytes.len() as u64,
            purpose: upload.purpose.to_string(),
            status: Some(FileStatus::Uploaded),
            status_details: None,
        })
    }

    async fn get_file(&self, file_id: &str) -> Result<FileObject, FoundryError> {
        self.record("get_file", Some(file_id))?;
        let status = self
            .file_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FileStatus::Processed);
        Ok(FileObject {
            id: file_id.to_string(),
            filename: String::new(),
            bytes: 0,
            purpose: "assistants".into(),
            status: Some(status),
            status_details: None,
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), FoundryError> {
        self.record("delete_file", Some(file_id))
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, FoundryError> {
        self.record("file_content", Some(file_id))?;
        self.file_bytes
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| FoundryError::NotFound(file_id.to_string()))
    }

    async fn create_vector_store(
        &self,
        request: &CreateVectorStoreRequest,
    ) -> Result<VectorStore, FoundryError> {
        self.record("create_vector_store", None)?;
        Ok(VectorStore {
            id: self.id_for("create_vector_store", "vs_1"),
            name: request.name.clone(),
            status: VectorStoreStatus::InProgress,
            file_counts: FileCounts::default(),
        })
    }

    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore, FoundryError> {
        self.record("get_vector_store", Some(vector_store_id))?;
        let status = self
            .store_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(VectorStoreStatus::Completed);
        Ok(VectorStore {
            id: vector_store_id.to_string(),
            name: None,
            status,
            file_counts: FileCounts::default(),
        })
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), FoundryError> {
        self.record("delete_vector_store", Some(vector_store_id))
    }

    async fn get_connection(&self, name: &str) -> Result<Connection, FoundryError> {
        self.record("get_connection", Some(name))?;
        Ok(Connection {
            id: self.id_for("get_connection", &format!("/connections/{name}")),
            name: name.to_string(),
        })
    }
}
