//! Command-line front end.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Talk to hosted agents from the terminal.
#[derive(Parser, Debug)]
#[command(name = "foundry-agents", version, about = "Hosted agent sessions from the command line")]
pub struct Cli {
    /// Model deployment to use (defaults to MODEL_DEPLOYMENT_NAME)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// One prompt against an agent with the sample functions and a code interpreter
    Ask(AskArgs),
    /// Interactive conversation on a single thread
    Chat(ChatArgs),
    /// Answer from an uploaded document, with citations
    Search(SearchArgs),
    /// Answer grounded in Bing search results
    Ground(GroundArgs),
}

impl Commands {
    /// Subcommand name, used as the scenario span's `command` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ask(_) => "ask",
            Self::Chat(_) => "chat",
            Self::Search(_) => "search",
            Self::Ground(_) => "ground",
        }
    }
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    pub prompt: String,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Where to save images the agent produces
    #[arg(long, default_value = ".")]
    pub files_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Document to upload and search
    #[arg(short, long)]
    pub file: PathBuf,

    pub prompt: String,
}

#[derive(Parser, Debug)]
pub struct GroundArgs {
    /// Search connection name (defaults to BING_CONNECTION_NAME)
    #[arg(long)]
    pub connection: Option<String>,

    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_ask() {
        let cli = Cli::try_parse_from(["foundry-agents", "ask", "What is 3 + 4?"]).unwrap();
        match cli.command {
            Commands::Ask(args) => assert_eq!(args.prompt, "What is 3 + 4?"),
            other => panic!("expected Ask, got {other:?}"),
        }
        assert!(cli.model.is_none());
    }

    #[test]
    fn parse_chat_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["foundry-agents", "chat"]).unwrap();
        match cli.command {
            Commands::Chat(args) => assert_eq!(args.files_dir, PathBuf::from(".")),
            other => panic!("expected Chat, got {other:?}"),
        }
    }

    #[test]
    fn parse_search_with_global_model() {
        let cli = Cli::try_parse_from([
            "foundry-agents",
            "search",
            "--file",
            "product_info_1.md",
            "-m",
            "gpt-4o",
            "What products are there?",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.file, PathBuf::from("product_info_1.md"));
                assert_eq!(args.prompt, "What products are there?");
            }
            other => panic!("expected Search, got {other:?}"),
        }
    }

    #[test]
    fn search_requires_file() {
        assert!(Cli::try_parse_from(["foundry-agents", "search", "question"]).is_err());
    }

    #[test]
    fn missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["foundry-agents"]).is_err());
    }
}
