//! Chat command handler
//!
//! Streams answers from the SeeSea assistant to the terminal, either for a
//! single question or in a readline-based interactive loop.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::chat::{
    ChatSession, Conversation, HttpChatTransport, Turn, TurnOutcome, TurnUpdate,
};
use crate::config::Config;
use crate::error::{Result, SeeseaError};

/// Run the chat command
///
/// With `message`, asks that one question and exits; otherwise starts an
/// interactive session that lasts until `exit`, Ctrl-C or Ctrl-D.
///
/// # Errors
///
/// Returns an error if the transport cannot be built, if the terminal
/// cannot be read, or if a one-shot question could not reach the backend.
pub async fn run_chat(config: Config, message: Option<String>) -> Result<()> {
    let transport = HttpChatTransport::new(
        &config.api.chat_url,
        Duration::from_secs(config.api.connect_timeout_seconds),
    )?;
    tracing::debug!("Chat endpoint: {}", transport.endpoint());

    match message {
        Some(message) => {
            let mut session = ChatSession::new(Arc::new(transport))
                .with_session_prefix(config.chat.session_prefix.clone());
            match ask(&mut session, &message).await {
                Some(turn) if turn.outcome == TurnOutcome::ConnectionFailed => Err(
                    SeeseaError::ChatTransport(format!(
                        "could not reach chat API at {}",
                        config.api.chat_url
                    ))
                    .into(),
                ),
                _ => Ok(()),
            }
        }
        None => {
            let conversation = Conversation::with_greeting(config.chat.greeting.clone());
            let session = ChatSession::with_conversation(Arc::new(transport), conversation)
                .with_session_prefix(config.chat.session_prefix.clone());
            run_interactive(session).await
        }
    }
}

async fn run_interactive(mut session: ChatSession) -> Result<()> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SeeseaError::Config(format!("failed to start line editor: {}", e)))?;

    print_welcome_banner();
    if let Some(greeting) = session.conversation().last() {
        println!("{}\n", greeting.content.cyan());
    }

    loop {
        match rl.readline(&format!("{} ", "you>".green().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if matches!(trimmed, "exit" | "quit") {
                    break;
                }
                let _ = rl.add_history_entry(trimmed);
                ask(&mut session, trimmed).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    tracing::info!(
        "Chat ended after {} messages",
        session.conversation().len()
    );
    println!("Goodbye!");
    Ok(())
}

/// Send one question and echo the answer as it streams
async fn ask(session: &mut ChatSession, message: &str) -> Option<Turn> {
    print!("{} ", "seesea>".cyan().bold());
    let mut renderer = AnswerRenderer::new(std::io::stdout());
    let turn = session
        .send_message_with(message, |update| renderer.render(update))
        .await;
    renderer.finish();
    turn
}

/// Writes placeholder updates to a terminal
struct AnswerRenderer<W: Write> {
    out: W,
    mid_line: bool,
}

impl<W: Write> AnswerRenderer<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    fn render(&mut self, update: TurnUpdate<'_>) {
        // Terminal write failures are not worth aborting the stream for.
        let _ = match update {
            TurnUpdate::Delta(text) => {
                self.mid_line = !text.ends_with('\n');
                write!(self.out, "{}", text)
            }
            TurnUpdate::Notice(text) => {
                let prefix = if self.mid_line { "\n" } else { "" };
                self.mid_line = false;
                writeln!(self.out, "{}{}", prefix, text.yellow())
            }
        };
        let _ = self.out.flush();
    }

    fn finish(mut self) {
        let _ = writeln!(self.out, "\n");
        let _ = self.out.flush();
    }
}

fn print_welcome_banner() {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║            SeeSea Shipping Intelligence - Chat               ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Type 'exit' to quit\n");
}
