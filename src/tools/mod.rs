//! Local function tools the agent can call.

pub mod arguments;
pub mod registry;
pub mod samples;
pub mod tool;
pub mod toolset;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool};
pub use toolset::ToolSet;
pub use types::{FunctionParameters, ParameterBuilder};
pub use validation::validate_arguments;
