//! Wire types for the agent service.

pub mod agent;
pub mod file;
pub mod message;
pub mod run;

pub use agent::*;
pub use file::*;
pub use message::*;
pub use run::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletionStatus {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

/// A named project connection (e.g. a Bing search resource).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connection {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Provisioning ids the service may omit or send as `null` decode as empty,
/// so the session can report them as a provisioning failure.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
