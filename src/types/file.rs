//! Uploaded files and vector stores.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Processing state of an uploaded file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FileStatus {
    Uploaded,
    Pending,
    Running,
    Processed,
    Error,
    Deleting,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl FileStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Uploaded | Self::Pending | Self::Running)
    }
}

/// A file stored by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileObject {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub status: Option<FileStatus>,
    #[serde(default)]
    pub status_details: Option<String>,
}

impl FileObject {
    /// Still being processed by the service. A missing status counts as done.
    pub fn is_pending(&self) -> bool {
        self.status.map(FileStatus::is_pending).unwrap_or(false)
    }
}

/// Intended use of an upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
    AssistantsOutput,
}

/// Indexing state of a vector store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VectorStoreStatus {
    InProgress,
    Completed,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FileCounts {
    #[serde(default)]
    pub in_progress: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub cancelled: u32,
    #[serde(default)]
    pub total: u32,
}

/// Retrieval index over uploaded files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorStore {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: VectorStoreStatus,
    #[serde(default)]
    pub file_counts: FileCounts,
}

/// Body of a create-vector-store request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateVectorStoreRequest {
    pub file_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
