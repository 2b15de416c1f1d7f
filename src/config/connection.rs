//! Project connection strings.

use std::fmt;
use std::str::FromStr;

use crate::error::FoundryError;

/// Parsed `<HostName>;<SubscriptionId>;<ResourceGroup>;<ProjectName>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub host: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub project_name: String,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, FoundryError> {
        let parts: Vec<&str> = raw.trim().split(';').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(FoundryError::Configuration(format!(
                "connection string must have 4 ';'-separated segments, got {}",
                parts.len()
            )));
        }
        if let Some(idx) = parts.iter().position(|p| p.is_empty()) {
            return Err(FoundryError::Configuration(format!(
                "connection string segment {} is empty",
                idx + 1
            )));
        }

        let host = parts[0]
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            subscription_id: parts[1].to_string(),
            resource_group: parts[2].to_string(),
            project_name: parts[3].to_string(),
        })
    }

    /// Base URL of the agents API for this project.
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/agents/v1.0/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/workspaces/{}",
            self.host, self.subscription_id, self.resource_group, self.project_name
        )
    }
}

impl FromStr for ConnectionString {
    type Err = FoundryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{}",
            self.host, self.subscription_id, self.resource_group, self.project_name
        )
    }
}
