//! Tool trait and closure-based function tool.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::FunctionParameters;
use crate::error::FoundryError;
use crate::types::{FunctionDefinition, ToolDefinition};

/// A locally executed function the agent may call by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name (must match what the service calls).
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the accepted arguments.
    fn parameters(&self) -> &FunctionParameters;

    /// Execute with already validated arguments.
    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, FoundryError>;

    /// Declaration sent to the service when the agent is created.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::Function {
            function: FunctionDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters().schema.clone(),
            },
        }
    }
}

type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, FoundryError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: FunctionParameters,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    /// Create a tool from an async closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: FunctionParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, FoundryError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Create a tool from a plain synchronous function.
    pub fn from_fn<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: FunctionParameters,
        func: F,
    ) -> Self
    where
        F: Fn(&ToolArguments) -> Result<serde_json::Value, FoundryError> + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        Self::new(name, description, parameters, move |args| {
            let func = func.clone();
            async move { func(&args) }
        })
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &FunctionParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, FoundryError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
