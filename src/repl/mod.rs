//! Interactive chat loop
//!
//! Read-eval-print loop tying together input handling (rustyline), command
//! processing, the streaming client, conversation state, and display.
//! While a response is streaming, Ctrl-C cancels it; between responses,
//! Ctrl-C just discards the current input line.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;

use crate::config::{Config, ResponseMode};
use crate::errors::ChatError;
use crate::repl::commands::Command;
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};
use crate::session::Conversation;
use crate::speech::{default_engine, SpeechEngine};
use crate::streaming::{ChatClient, StreamSession, DEFAULT_MODEL};
use crate::telemetry::TelemetryCollector;

/// How one streamed response settled
enum StreamOutcome {
    Completed,
    Cancelled,
    Failed(ChatError),
}

/// REPL session coordinator
pub struct ReplSession {
    config: Config,
    client: ChatClient,
    conversation: Conversation,
    telemetry: TelemetryCollector,
    speech: Box<dyn SpeechEngine>,
    display: DisplayManager,
    input: InputHandler,
    raw_mode: bool,
}

impl ReplSession {
    /// Create new REPL session
    pub fn new(config: Config, raw_mode: bool) -> Result<Self> {
        let client = ChatClient::with_config(&config.api_base_url, DEFAULT_MODEL)?;
        let display = DisplayManager::new(config.dark_theme);

        let input = match dirs::home_dir() {
            Some(home) => InputHandler::with_history(home.join(".chatline_history"))?,
            None => InputHandler::new()?,
        };

        Ok(ReplSession {
            config,
            client,
            conversation: Conversation::new(),
            telemetry: TelemetryCollector::new(),
            speech: default_engine(),
            display,
            input,
            raw_mode,
        })
    }

    /// Replace the speech engine
    pub fn with_speech(mut self, speech: Box<dyn SpeechEngine>) -> Self {
        self.speech = speech;
        self
    }

    /// Run the interactive loop until exit
    pub async fn run(&mut self) -> Result<()> {
        self.display
            .show_banner(env!("CARGO_PKG_VERSION"), self.client.base_url());

        loop {
            match self.input.read_line()? {
                InputEvent::Eof => break,
                InputEvent::Interrupted => continue,
                InputEvent::Line(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Command::Exit => break,
                        Command::Help => println!("{}", Command::help_text()),
                        Command::Clear => {
                            if self.conversation.clear() {
                                self.display.show_info("Conversation cleared");
                            } else {
                                self.display
                                    .show_error("cannot clear while a response is streaming");
                            }
                        }
                        Command::Status => self.show_status(),
                        Command::History { limit } => self.show_history(limit),
                        Command::System { prompt } => self.set_system(prompt),
                        Command::Seed { value } => {
                            self.config.seed = value;
                            self.persist_config();
                            self.display.show_info(&format!("Seed set to {}", value));
                        }
                        Command::Edit { index, text } => {
                            match self.conversation.edit(index, text) {
                                Ok(()) => self.display.show_info(&format!("Turn {} updated", index)),
                                Err(e) => self.display.show_error(&e.to_string()),
                            }
                        }
                        Command::Prompt { input } => self.submit(input).await?,
                        Command::Unknown { input } => {
                            self.display
                                .show_error(&format!("unknown command: {} (try /help)", input));
                        }
                    }
                }
            }
        }

        let _ = self.input.save_history();
        Ok(())
    }

    /// Submit one user prompt and stream the reply
    async fn submit(&mut self, prompt: String) -> Result<()> {
        self.conversation.begin_stream()?;
        self.conversation.push_user(prompt, None);

        let handle = if self.raw_mode {
            self.client
                .stream_raw(self.conversation.turns(), self.config.seed)
                .await
        } else {
            match self
                .client
                .build_request(self.conversation.turns(), &self.config.request_options())
            {
                Ok(request) => self.client.stream_chat(request).await,
                Err(e) => Err(e),
            }
        };

        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                // No usable stream; fold the synthetic error turn into history
                self.display.show_error(&e.to_string());
                self.conversation.fail_stream()?;
                self.telemetry.record_failed();
                return Ok(());
            }
        };

        let mut session = StreamSession::new(handle);
        self.display.show_assistant_label();
        let mut spinner = Some(self.display.start_waiting());

        let outcome = loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    session.cancel();
                    break StreamOutcome::Cancelled;
                }
                fragment = session.next_fragment() => match fragment {
                    Ok(Some(fragment)) => {
                        if let Some(pb) = spinner.take() {
                            pb.finish_and_clear();
                        }
                        self.display.show_fragment(&fragment);
                    }
                    Ok(None) => break StreamOutcome::Completed,
                    Err(e) => {
                        session.cancel();
                        break StreamOutcome::Failed(e);
                    }
                }
            }
        };

        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }

        match outcome {
            StreamOutcome::Completed => {
                self.display.end_response();
                let done = session.finish();
                self.display.show_stats(&done.stats);
                if self.config.response_mode == ResponseMode::Voice && self.speech.is_available() {
                    if let Err(e) = self.speech.speak(&done.text).await {
                        self.display.show_error(&e.to_string());
                    }
                }
                self.telemetry.record_completed(done.stats.clone());
                self.conversation.complete_stream(done.text)?;
            }
            StreamOutcome::Cancelled => {
                self.display.show_cancelled();
                self.conversation.cancel_stream()?;
                self.telemetry.record_cancelled();
            }
            StreamOutcome::Failed(e) => {
                self.display.end_response();
                self.display.show_error(&e.to_string());
                // Mid-stream death discards the partial response, like a cancel
                self.conversation.cancel_stream()?;
                self.telemetry.record_failed();
            }
        }

        Ok(())
    }

    fn show_status(&self) {
        self.display.show_info(&format!(
            "endpoint: {}  seed: {}  max tokens: {}  mode: {:?}",
            self.client.base_url(),
            self.config.seed,
            self.config.max_tokens,
            self.config.response_mode,
        ));
        self.display.show_info(&format!(
            "responses: {} completed, {} cancelled, {} failed, {} tokens total",
            self.telemetry.completed(),
            self.telemetry.cancelled(),
            self.telemetry.failed(),
            self.telemetry.total_tokens(),
        ));
        if let Some(stats) = self.telemetry.last() {
            self.display.show_stats(stats);
        }
    }

    fn show_history(&self, limit: Option<usize>) {
        let turns = self.conversation.turns();
        if turns.is_empty() {
            self.display.show_info("No conversation yet");
            return;
        }
        let skip = limit.map(|l| turns.len().saturating_sub(l)).unwrap_or(0);
        for (index, turn) in turns.iter().enumerate().skip(skip) {
            self.display.show_turn(index, turn);
        }
    }

    fn set_system(&mut self, prompt: Option<String>) {
        match prompt {
            None => {
                if self.config.system_prompt.is_empty() {
                    self.display.show_info("No system prompt set");
                } else {
                    let prompt = self.config.system_prompt.clone();
                    self.display.show_info(&format!("System prompt: {}", prompt));
                }
            }
            Some(prompt) => {
                self.config.system_prompt = prompt;
                self.persist_config();
                self.display.show_info("System prompt saved");
            }
        }
    }

    fn persist_config(&self) {
        if let Err(e) = self.config.save() {
            self.display.show_error(&format!("failed to save settings: {}", e));
        }
    }
}
