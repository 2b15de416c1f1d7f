//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provisioning,
    ToolExecution,
    Timeout,
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    NotFound,
    Serialization,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreasePollBudget,
    CheckToolImplementation,
    /// The resource is already gone; nothing to do.
    Ignore,
    ContactSupport,
}
