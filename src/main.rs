use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

mod cli;

use bistro::agent::{display_content, ChatEvent};
use bistro::categories::CategoryTable;
use bistro::config::Config;
use bistro::context::AppContext;
use bistro::{repl, server};
use cli::commands::Commands;
use cli::Cli;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bistro")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("bistro.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_chat(config: Config) -> Result<()> {
    let ctx = AppContext::initialize(config)?;
    repl::run(Arc::new(ctx)).await
}

async fn run_serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let ctx = AppContext::initialize(config)?;
    server::serve(Arc::new(ctx), &host, port).await
}

/// One question, one answer, exit code 0 - handy for scripting
async fn run_ask(config: Config, message: &str) -> Result<()> {
    let ctx = AppContext::initialize(config)?;
    let agent = ctx.build_agent();

    let mut history = Vec::new();
    let report = agent.run_turn(&mut history, message).await?;

    for event in &report.events {
        match event {
            ChatEvent::Assistant { content } => {
                let text = display_content(content);
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            ChatEvent::ToolCall { name, arguments } => {
                info!("tool call: {}({})", name, arguments);
            }
            ChatEvent::ToolResult { name, is_error, .. } => {
                info!("tool result: {} (error: {})", name, is_error);
            }
        }
    }
    Ok(())
}

/// Local category lookup; needs no API key or network
fn run_category(config: &Config, query: &str) -> Result<()> {
    let table = match &config.maps.categories_file {
        Some(path) => CategoryTable::load(path)?,
        None => CategoryTable::bundled()?,
    };

    match table.find(query) {
        Some(category) => {
            println!(
                "{} {} ({})",
                "found:".green(),
                category.category_name,
                category.category_id
            );
        }
        None => println!("{}", "Category not found".yellow()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    info!("Starting with config from: {:?}", cli.config);

    match cli.command {
        None | Some(Commands::Chat) => run_chat(config).await.context("Chat session failed"),
        Some(Commands::Serve { host, port }) => {
            run_serve(config, host, port).await.context("Server failed")
        }
        Some(Commands::Ask { message }) => run_ask(config, &message).await.context("Ask failed"),
        Some(Commands::Category { query }) => run_category(&config, &query).context("Category lookup failed"),
    }
}
