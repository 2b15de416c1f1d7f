//! The remote agent service boundary.
//!
//! Everything the client does against the cloud goes through
//! [`AgentService`]; [`HttpAgentService`] is the REST implementation.

pub mod http;
pub mod multipart;
pub mod rest;

pub use rest::HttpAgentService;

use std::path::Path;

use async_trait::async_trait;

use crate::error::FoundryError;
use crate::types::{
    Agent, Connection, CreateAgentRequest, CreateMessageRequest, CreateVectorStoreRequest,
    FileObject, FilePurpose, MessageList, Run, Thread, ThreadMessage, ToolOutput, VectorStore,
};

/// A file to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub purpose: FilePurpose,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            purpose: FilePurpose::Assistants,
        }
    }

    /// Read a local file; the upload is named after the path's file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FoundryError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FoundryError::InvalidArgument(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(filename, bytes))
    }
}

/// Operations the client needs from the remote agent service.
///
/// Implementations return opaque identifiers and status enums; all actual
/// orchestration happens on the service side.
#[async_trait]
pub trait AgentService: Send + Sync {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, FoundryError>;

    async fn delete_agent(&self, agent_id: &str) -> Result<(), FoundryError>;

    async fn create_thread(&self) -> Result<Thread, FoundryError>;

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<ThreadMessage, FoundryError>;

    /// Messages of a thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, FoundryError>;

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run, FoundryError>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, FoundryError>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, FoundryError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, FoundryError>;

    async fn upload_file(&self, upload: &FileUpload) -> Result<FileObject, FoundryError>;

    async fn get_file(&self, file_id: &str) -> Result<FileObject, FoundryError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), FoundryError>;

    /// Raw bytes of a stored file (e.g. an image produced by code interpreter).
    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, FoundryError>;

    async fn create_vector_store(
        &self,
        request: &CreateVectorStoreRequest,
    ) -> Result<VectorStore, FoundryError>;

    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore, FoundryError>;

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), FoundryError>;

    /// Look up a project connection by name.
    async fn get_connection(&self, name: &str) -> Result<Connection, FoundryError>;
}
