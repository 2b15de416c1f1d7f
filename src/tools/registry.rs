//! Name-keyed dispatch table for local function tools.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{FunctionTool, Tool};
use super::types::FunctionParameters;
use super::validation::validate_arguments;
use crate::error::FoundryError;
use crate::types::ToolDefinition;

/// Maps function names to local callables.
///
/// Built once before a session starts; it is only read while runs are in
/// flight, so one registry can be shared (`Arc`) across sequential runs.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of tools, rejecting duplicate names.
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Result<Self, FoundryError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Add a tool. Names must be non-empty and unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), FoundryError> {
        let name = tool.name().trim();
        if name.is_empty() {
            return Err(FoundryError::Configuration(
                "Tool name must not be empty".into(),
            ));
        }
        if self.index.contains_key(name) {
            return Err(FoundryError::Configuration(format!(
                "Tool '{name}' is already registered"
            )));
        }
        self.index.insert(name.to_string(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register an async closure as a tool.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: FunctionParameters,
        handler: F,
    ) -> Result<(), FoundryError>
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<serde_json::Value, FoundryError>> + Send + 'static,
    {
        self.register(Arc::new(FunctionTool::new(name, description, parameters, handler)))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function declarations to send to the service, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Call `name` with already decoded arguments.
    ///
    /// Returns the callable's result serialized to a JSON string; a string
    /// result is passed through untouched.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<String, FoundryError> {
        let tool = self.get(name).ok_or_else(|| {
            FoundryError::Configuration(format!("No tool registered under '{name}'"))
        })?;

        validate_arguments(arguments, &tool.parameters().schema)?;

        debug!(tool = name, "Invoking tool");
        let value = tool
            .execute(&ToolArguments::new(arguments.clone()))
            .await
            .map_err(|e| match e {
                FoundryError::ToolExecution { .. } => e,
                other => FoundryError::tool(name, other.to_string()),
            })?;

        match value {
            serde_json::Value::String(s) => Ok(s),
            other => Ok(serde_json::to_string(&other)?),
        }
    }

    /// Call `name` with the JSON-encoded argument string sent by the service.
    pub async fn invoke_raw(&self, name: &str, arguments: &str) -> Result<String, FoundryError> {
        let args = ToolArguments::parse(arguments)?;
        self.invoke(name, args.raw()).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
