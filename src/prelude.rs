//! Convenience re-exports for common use.

pub use crate::auth::{AccessToken, CredentialProvider, StaticCredential};
pub use crate::config::FoundryConfig;
pub use crate::error::{FoundryError, Result};
pub use crate::extract::{extract_last, extract_parts, last_message_by_role, ExtractedParts, MessagePart};
pub use crate::run::{RunDriver, ToolFailurePolicy};
pub use crate::service::{AgentService, FileUpload, HttpAgentService};
pub use crate::session::{Reply, Session, SessionBuilder};
pub use crate::tools::{FunctionParameters, FunctionTool, Tool, ToolArguments, ToolRegistry, ToolSet};
pub use crate::types::{MessageRole, Run, RunStatus};
pub use crate::util::poll::PollPolicy;
