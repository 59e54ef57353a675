//! Terminal surface for ClauseChat
//!
//! Reads lines from stdin, runs exchanges on background tasks so input keeps
//! flowing, and prints transcript entries as they arrive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod log_tail;
pub mod render;

pub use commands::{Command, LimitedInput, HELP_TEXT, MAX_INPUT_CHARS, WARN_INPUT_CHARS};

use clause_core::{
    ChatController, ConnectionState, ExchangeOutcome, Message, Result, Role,
    CONNECTIVITY_ERROR_MESSAGE,
};
use colored::Colorize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Terminal settings
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Echo redacted tracing events
    pub show_logs: bool,
    /// Only echo events whose target or message contains this
    pub log_filter: Option<String>,
    /// Default directory for `/export`
    pub export_dir: PathBuf,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            show_logs: false,
            log_filter: None,
            export_dir: PathBuf::from("."),
        }
    }
}

/// Results that background tasks hand back to the input loop
#[derive(Debug)]
enum UiEvent {
    Reply(Message),
    Refused,
    Status(ConnectionState),
    Diagnostics(String),
}

fn exchange_event(joined: std::result::Result<ExchangeOutcome, JoinError>) -> UiEvent {
    match joined {
        Ok(ExchangeOutcome::Replied(message)) => UiEvent::Reply(message),
        Ok(ExchangeOutcome::Rejected) => UiEvent::Refused,
        Err(err) => {
            tracing::error!(error = %err, "Exchange task failed");
            UiEvent::Reply(Message::new(Role::Agent, CONNECTIVITY_ERROR_MESSAGE, true))
        }
    }
}

/// What the next input line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    Normal,
    ConfirmClear,
}

/// Interactive chat loop bound to one controller
pub struct TerminalAdaptor {
    /// Terminal settings
    pub config: TerminalConfig,
    controller: ChatController,
}

impl TerminalAdaptor {
    /// Create an adaptor over a controller
    pub fn new(config: TerminalConfig, controller: ChatController) -> Self {
        Self {
            config,
            controller,
        }
    }

    /// Start the redacted log tail when enabled
    pub fn start_log_tail(&self) -> Option<JoinHandle<()>> {
        if !self.config.show_logs {
            return None;
        }
        let handle = log_tail::spawn(self.config.log_filter.clone());
        if handle.is_none() {
            tracing::warn!("Log tail requested but logging is not initialized");
        }
        handle
    }

    fn print_banner(&self) {
        println!("{}", "=== License Analysis Chat ===".bright_magenta().bold());
        println!("{}", "Type /help for commands, /quit to exit.".bright_black());
        println!();
        self.controller.with_conversation(|conv| {
            for message in conv.messages() {
                println!("{}", render::render_message(message));
            }
        });
    }

    fn print_prompts(&self) {
        println!("{}", "Standard prompts (load one with /use <key>):".bright_yellow());
        for (key, text) in self.controller.catalog().iter() {
            println!(
                "  {}  {}",
                key.cyan().bold(),
                clause_core::utils::truncate_chars(text, 70).bright_black()
            );
        }
    }

    /// Run until `/quit` or end of input
    pub async fn run(&self) -> Result<()> {
        let tail = self.start_log_tail();
        self.print_banner();
        let session = self.controller.with_conversation(|c| c.session().id.clone());
        tracing::info!(session = %session, "Terminal session started");

        let (tx, mut rx) = mpsc::channel::<UiEvent>(32);
        self.spawn_status_check(tx.clone());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut mode = LineMode::Normal;
        let mut draft: Option<String> = None;

        loop {
            tokio::select! {
                Some(event) = rx.recv() => self.show_event(event),
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };

                    if mode == LineMode::ConfirmClear {
                        mode = LineMode::Normal;
                        if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
                            self.controller.clear();
                            draft = None;
                            println!("{}", "Chat cleared.".bright_green());
                            self.print_banner();
                        } else {
                            println!("{}", "Clear cancelled.".bright_black());
                        }
                        continue;
                    }

                    match Command::parse(&line) {
                        Command::Quit => break,
                        Command::Help => println!("{}", HELP_TEXT),
                        Command::Prompts => self.print_prompts(),
                        Command::Use(None) => {
                            println!("{}", "Usage: /use <key> (see /prompts)".yellow());
                        }
                        Command::Use(Some(key)) => match self.controller.prompt(&key) {
                            Ok(text) => {
                                println!("{}", "Loaded prompt (press Enter to send, or type your own message):".bright_yellow());
                                println!("{}", text);
                                draft = Some(text.to_string());
                            }
                            Err(e) => println!("{}", e.to_string().red()),
                        },
                        Command::Clear => {
                            println!("{}", "Are you sure you want to clear the chat history? [y/N]".bright_yellow());
                            mode = LineMode::ConfirmClear;
                        }
                        Command::Export(dir) => {
                            let dir = dir.unwrap_or_else(|| self.config.export_dir.clone());
                            match self.controller.export(&dir) {
                                Ok(path) => println!("{}", format!("Transcript saved to {}", path.display()).bright_green()),
                                Err(e) => println!("{}", format!("Export failed: {}", e).red()),
                            }
                        }
                        Command::Debug => {
                            println!("{}", format!("🔧 Testing agent API at {} ...", self.controller.endpoint()).bright_yellow());
                            self.spawn_diagnostics(tx.clone());
                        }
                        Command::Status => self.spawn_status_check(tx.clone()),
                        Command::Unknown(raw) => {
                            println!("{}", format!("Unknown command: {} (try /help)", raw).yellow());
                        }
                        Command::Empty => {
                            if let Some(text) = draft.take() {
                                self.send(text, tx.clone());
                            }
                        }
                        Command::Send(text) => {
                            draft = None;
                            self.send(text, tx.clone());
                        }
                    }
                }
            }
        }

        if self.controller.is_busy() {
            println!("{}", "Leaving with a reply still pending.".bright_black());
        }
        if let Some(handle) = tail {
            handle.abort();
        }
        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    fn send(&self, input: String, tx: mpsc::Sender<UiEvent>) {
        if self.controller.is_busy() {
            println!("{}", "Still waiting for the previous reply.".yellow());
            return;
        }

        let limited = LimitedInput::new(&input);
        if limited.truncated {
            println!(
                "{}",
                format!(
                    "Message was {} characters; only the first {} will be sent.",
                    limited.original_chars, MAX_INPUT_CHARS
                )
                .yellow()
            );
        } else if limited.near_limit() {
            println!(
                "{}",
                format!(
                    "Message is {} characters, close to the {} limit.",
                    limited.original_chars, MAX_INPUT_CHARS
                )
                .yellow()
            );
        }

        println!(
            "{}",
            render::render_message(&Message::new(Role::User, limited.text.as_str(), false))
        );
        println!("{}", render::render_thinking());

        let controller = self.controller.clone();
        tokio::spawn(async move {
            let exchange = tokio::spawn({
                let controller = controller.clone();
                async move { controller.submit(&limited.text).await }
            });
            let event = exchange_event(exchange.await);
            let _ = tx.send(event).await;
            let _ = tx.send(UiEvent::Status(controller.status())).await;
        });
    }

    fn spawn_status_check(&self, tx: mpsc::Sender<UiEvent>) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let state = controller.check_connection().await;
            let _ = tx.send(UiEvent::Status(state)).await;
        });
    }

    fn spawn_diagnostics(&self, tx: mpsc::Sender<UiEvent>) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let report = controller.run_diagnostics().await;
            let _ = tx.send(UiEvent::Diagnostics(report.render())).await;
        });
    }

    fn show_event(&self, event: UiEvent) {
        match event {
            UiEvent::Reply(message) => println!("{}", render::render_message(&message)),
            UiEvent::Refused => println!("{}", "Message not sent.".yellow()),
            UiEvent::Status(state) => println!("{}", render::render_status(state)),
            UiEvent::Diagnostics(text) => {
                println!("{}", render::format_agent_text(&text));
                println!();
            }
        }
    }
}
