use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clause_adaptor_terminal::render::{format_agent_text, render_message, render_status};
use clause_adaptor_terminal::{TerminalAdaptor, TerminalConfig};
use clause_core::config::{API_KEY_VAR, ENDPOINT_VAR, SHOW_LOGS_VAR};
use clause_core::utils::logger::LOG_LEVEL_VAR;
use clause_core::{
    init_logging, load_env, load_env_from_path, ChatConfig, ChatController, ConnectionState,
    ExchangeOutcome, PromptCatalog,
};
use clause_provider_agent::AgentClient;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "clause-chat", version, about = "Chat with a license-analysis AI agent")]
struct Cli {
    /// Agent base URL
    #[arg(long, env = ENDPOINT_VAR)]
    endpoint: Option<String>,

    /// Bearer token for the agent
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Tracing filter, e.g. `info` or `clause_provider_agent=debug`
    #[arg(long, env = LOG_LEVEL_VAR, default_value = "info")]
    log_level: String,

    /// Echo redacted log events in the chat
    #[arg(long)]
    show_logs: bool,

    /// Only echo log events matching this text
    #[arg(long)]
    log_filter: Option<String>,

    /// Load environment from this file instead of `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Ask {
        /// Message text
        message: String,
    },
    /// Check agent reachability
    Status,
    /// Probe the agent API and print a report
    Diagnose,
    /// List the standard prompts
    Prompts,
}

fn print_prompts() {
    for (key, text) in PromptCatalog::standard().iter() {
        println!("{}\n  {}\n", key.cyan().bold(), text);
    }
}

fn build_config(cli: &Cli) -> Result<ChatConfig> {
    match &cli.env_file {
        Some(path) => load_env_from_path(path)?,
        None => load_env()?,
    }
    // Flags win over the environment and the env file
    if let Some(endpoint) = &cli.endpoint {
        std::env::set_var(ENDPOINT_VAR, endpoint);
    }
    if let Some(key) = &cli.api_key {
        std::env::set_var(API_KEY_VAR, key);
    }
    if cli.show_logs {
        std::env::set_var(SHOW_LOGS_VAR, "true");
    }
    ChatConfig::from_env().context("agent connection is not configured")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    std::env::set_var(LOG_LEVEL_VAR, &cli.log_level);
    init_logging();

    let command = cli.command.as_ref().unwrap_or(&Cmd::Chat);
    if matches!(command, Cmd::Prompts) {
        print_prompts();
        return Ok(());
    }

    let config = build_config(&cli)?;
    tracing::info!(
        endpoint = %config.endpoint,
        api_key = %config.api_key_summary(),
        "Starting ClauseChat"
    );

    let terminal_config = TerminalConfig {
        show_logs: config.show_logs,
        log_filter: cli.log_filter.clone(),
        export_dir: config.export_dir.clone(),
    };
    let controller = ChatController::new(Arc::new(AgentClient::new(config)));

    match command {
        Cmd::Chat => {
            TerminalAdaptor::new(terminal_config, controller).run().await?;
        }
        Cmd::Ask { message } => match controller.submit(message).await {
            ExchangeOutcome::Replied(reply) => {
                println!("{}", render_message(&reply));
                if reply.is_error {
                    bail!("exchange with the agent failed");
                }
            }
            ExchangeOutcome::Rejected => bail!("message is empty"),
        },
        Cmd::Status => {
            let state = controller.check_connection().await;
            println!("{}", render_status(state));
            if state != ConnectionState::Connected {
                bail!("agent at {} is not reachable", controller.endpoint());
            }
        }
        Cmd::Diagnose => {
            let report = controller.run_diagnostics().await;
            println!("{}", format_agent_text(&report.render()));
        }
        Cmd::Prompts => print_prompts(),
    }

    Ok(())
}
