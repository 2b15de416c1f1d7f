//! Function tools plus the service's built-in tools, as declared on an agent.

use std::sync::Arc;

use super::registry::ToolRegistry;
use crate::types::{
    BingGroundingConfig, CodeInterpreterResources, ConnectionRef, FileSearchResources,
    ToolDefinition, ToolResources,
};

/// Everything an agent can call: local functions and hosted tools.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    registry: ToolRegistry,
    code_interpreter: Option<Vec<String>>,
    file_search: Option<Vec<String>>,
    bing_connection_id: Option<String>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Enable the code interpreter, optionally with input files.
    pub fn with_code_interpreter(mut self, file_ids: Vec<String>) -> Self {
        self.code_interpreter = Some(file_ids);
        self
    }

    /// Enable file search over the given vector stores.
    pub fn with_file_search(mut self, vector_store_ids: Vec<String>) -> Self {
        self.file_search = Some(vector_store_ids);
        self
    }

    pub fn with_bing_grounding(mut self, connection_id: impl Into<String>) -> Self {
        self.bing_connection_id = Some(connection_id.into());
        self
    }

    /// Enable file search (if needed) and attach one more vector store.
    pub fn add_vector_store(&mut self, vector_store_id: impl Into<String>) {
        self.file_search
            .get_or_insert_with(Vec::new)
            .push(vector_store_id.into());
    }

    pub fn functions(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Shareable copy of the function registry for a run driver.
    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::new(self.registry.clone())
    }

    pub fn has_file_search(&self) -> bool {
        self.file_search.is_some()
    }

    /// Declarations for agent creation: functions first, then built-ins.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs = self.registry.definitions();
        if self.code_interpreter.is_some() {
            defs.push(ToolDefinition::CodeInterpreter);
        }
        if self.file_search.is_some() {
            defs.push(ToolDefinition::FileSearch);
        }
        if let Some(connection_id) = &self.bing_connection_id {
            defs.push(ToolDefinition::BingGrounding {
                bing_grounding: BingGroundingConfig {
                    connections: vec![ConnectionRef {
                        connection_id: connection_id.clone(),
                    }],
                },
            });
        }
        defs
    }

    /// Resources for the built-ins, or `None` when no built-in needs any.
    pub fn resources(&self) -> Option<ToolResources> {
        let resources = ToolResources {
            file_search: self
                .file_search
                .as_ref()
                .filter(|ids| !ids.is_empty())
                .map(|ids| FileSearchResources {
                    vector_store_ids: ids.clone(),
                }),
            code_interpreter: self
                .code_interpreter
                .as_ref()
                .filter(|ids| !ids.is_empty())
                .map(|ids| CodeInterpreterResources {
                    file_ids: ids.clone(),
                }),
        };
        (!resources.is_empty()).then_some(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FunctionParameters;
    use serde_json::json;

    #[test]
    fn empty_toolset_declares_nothing() {
        let set = ToolSet::new();
        assert!(set.definitions().is_empty());
        assert!(set.resources().is_none());
    }

    #[test]
    fn functions_come_before_builtins() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("ping", "Ping", FunctionParameters::empty(), |_| async {
                Ok(json!("pong"))
            })
            .unwrap();
        let set = ToolSet::new()
            .with_functions(registry)
            .with_code_interpreter(Vec::new())
            .with_bing_grounding("conn-1");

        let defs = set.definitions();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].function_name(), Some("ping"));
        assert_eq!(defs[1], ToolDefinition::CodeInterpreter);
        assert!(matches!(defs[2], ToolDefinition::BingGrounding { .. }));
        // Code interpreter without files needs no resources.
        assert!(set.resources().is_none());
    }

    #[test]
    fn add_vector_store_enables_file_search() {
        let mut set = ToolSet::new();
        set.add_vector_store("vs_1");
        assert!(set.has_file_search());
        assert_eq!(
            set.resources().unwrap().file_search.unwrap().vector_store_ids,
            vec!["vs_1".to_string()]
        );
        assert!(set.definitions().contains(&ToolDefinition::FileSearch));
    }
}
