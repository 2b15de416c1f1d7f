//! Handlers behind each CLI subcommand.
//!
//! Every handler provisions a session and closes it again, also on failure.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::FoundryConfig;
use crate::extract::{CitationSource, MessagePart};
use crate::service::{AgentService, FileUpload, HttpAgentService};
use crate::session::{Reply, Session, SessionBuilder};
use crate::tools::{samples, ToolSet};

use super::{AskArgs, ChatArgs, GroundArgs, SearchArgs};

type CliResult = Result<(), Box<dyn std::error::Error>>;

const INSTRUCTIONS: &str = "You are a helpful agent";

fn session_builder(model: Option<String>) -> Result<SessionBuilder, Box<dyn std::error::Error>> {
    let mut config = FoundryConfig::from_env()?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let service: Arc<dyn AgentService> = Arc::new(HttpAgentService::from_config(&config)?);
    Ok(Session::builder(service, &config).instructions(INSTRUCTIONS))
}

fn sample_tools() -> Result<ToolSet, Box<dyn std::error::Error>> {
    Ok(ToolSet::new()
        .with_functions(samples::user_functions()?)
        .with_code_interpreter(Vec::new()))
}

fn sales_tools() -> Result<ToolSet, Box<dyn std::error::Error>> {
    Ok(ToolSet::new()
        .with_functions(samples::sales_functions()?)
        .with_code_interpreter(Vec::new()))
}

pub async fn handle_ask(model: Option<String>, args: AskArgs) -> CliResult {
    let session = session_builder(model)?
        .name("my-agent")
        .tools(sample_tools()?)
        .start()
        .await?;
    let prompt = args.prompt;
    let reply = session
        .scoped(|s| Box::pin(async move { s.ask(&prompt).await }))
        .await?;
    print_reply(&reply, false);
    Ok(())
}

pub async fn handle_chat(model: Option<String>, args: ChatArgs) -> CliResult {
    tokio::fs::create_dir_all(&args.files_dir).await?;
    let session = session_builder(model)?
        .name("chat-agent")
        .tools(sales_tools()?)
        .start()
        .await?;

    let files_dir = args.files_dir;
    session
        .scoped(|s| {
            Box::pin(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                let mut stdout = tokio::io::stdout();
                loop {
                    stdout.write_all(b"> ").await?;
                    stdout.flush().await?;
                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if matches!(line, "exit" | "quit") {
                        break;
                    }
                    let reply = s.ask(line).await?;
                    print_reply(&reply, false);
                    let parts = reply.parts();
                    for file_id in parts.image_file_ids() {
                        let bytes = s.download_file(file_id).await?;
                        let path = files_dir.join(format!("{file_id}_image_file.png"));
                        tokio::fs::write(&path, bytes).await?;
                        println!("Saved image to {}", path.display());
                    }
                }
                Ok(())
            })
        })
        .await?;
    Ok(())
}

pub async fn handle_search(model: Option<String>, args: SearchArgs) -> CliResult {
    let upload = FileUpload::from_path(&args.file).await?;
    let session = session_builder(model)?
        .name("search-agent")
        .file_search(upload)
        .vector_store_name(vector_store_name(&args.file))
        .start()
        .await?;
    let prompt = args.prompt;
    let reply = session
        .scoped(|s| Box::pin(async move { s.ask(&prompt).await }))
        .await?;
    print_reply(&reply, true);
    Ok(())
}

pub async fn handle_ground(model: Option<String>, args: GroundArgs) -> CliResult {
    let mut builder = session_builder(model)?.name("grounded-agent").bing_grounding();
    if let Some(connection) = args.connection {
        builder = builder.search_connection(connection);
    }
    let session = builder.start().await?;
    let prompt = args.prompt;
    let reply = session
        .scoped(|s| Box::pin(async move { s.ask(&prompt).await }))
        .await?;
    print_reply(&reply, true);
    Ok(())
}

fn vector_store_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| format!("{stem}-store"))
        .unwrap_or_else(|| "search-store".to_string())
}

fn print_reply(reply: &Reply, with_citations: bool) {
    if let Some(failure) = reply.run.failure() {
        eprintln!("Run failed: {failure}");
    } else if !reply.succeeded() {
        eprintln!("Run ended with status {}", reply.run.status);
    }

    let parts = reply.parts();
    for part in &parts.parts {
        match part {
            MessagePart::Text { text } => println!("{text}"),
            MessagePart::Image { file_id } => println!("[image: {file_id}]"),
        }
    }

    if with_citations && !parts.citations.is_empty() {
        println!();
        for citation in &parts.citations {
            match &citation.source {
                CitationSource::File { file_id, quote } => match quote {
                    Some(quote) => println!("{} file {file_id}: {quote}", citation.text),
                    None => println!("{} file {file_id}", citation.text),
                },
                CitationSource::FilePath { file_id } => {
                    println!("{} file {file_id}", citation.text)
                }
                CitationSource::Url { url, title } => match title {
                    Some(title) => println!("{} {title} <{url}>", citation.text),
                    None => println!("{} <{url}>", citation.text),
                },
            }
        }
    }
}
