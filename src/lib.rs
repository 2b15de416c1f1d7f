//! foundry-agents: client for hosted conversational agents.
//!
//! Registers local functions as agent tools, drives runs to completion
//! (answering tool calls along the way), pulls text, images and citations out
//! of the thread, and provisions and tears down the remote resources a
//! conversation needs.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use foundry_agents::prelude::*;
//!
//! # async fn example() -> foundry_agents::error::Result<()> {
//! let config = FoundryConfig::from_env()?;
//! let service: Arc<dyn AgentService> = Arc::new(HttpAgentService::from_config(&config)?);
//! let tools = ToolSet::new().with_functions(foundry_agents::tools::samples::user_functions()?);
//!
//! let session = Session::builder(service, &config)
//!     .name("my-agent")
//!     .instructions("You are a helpful agent")
//!     .tools(tools)
//!     .start()
//!     .await?;
//!
//! let reply = session
//!     .scoped(|s| Box::pin(async move { s.ask("What is the sum of 45 and 55?").await }))
//!     .await?;
//! println!("{}", reply.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod run;
pub mod service;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
