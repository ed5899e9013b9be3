use crate::cli::chat::commands::{Feedback, Input, command_names, interpret};
use crate::cli::ux::{ChatMessageType, ChatView, GenerationSpinner, style_chat_text};
use crate::svc::chat::Chat;
use anyhow::Result;
use confab_core::completion::Role;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor, Helper, Highlighter, Validator};
use std::io::{Write, stdout};
use tracing::debug;

const QUIT_FAREWELL: &str = "Thanks for chatting! Goodbye!";
const INTERRUPT_FAREWELL: &str = "Chat terminated by user. Goodbye!";

/// Whether the REPL keeps going after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// -------------
// REPL completion
// -------------
#[derive(Helper, Validator, Highlighter)]
struct Repl {
    command_names: Vec<String>,
}

impl Completer for Repl {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let line_to_pos = &line[..pos];
        if !line_to_pos.starts_with('/') || line_to_pos.contains(char::is_whitespace) {
            return Ok((0, Vec::new()));
        }

        let candidates = self
            .command_names
            .iter()
            .filter(|name| name.starts_with(line_to_pos))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for Repl {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.len() < 2 || pos < line.len() || !line.starts_with('/') {
            return None;
        }
        self.command_names
            .iter()
            .find(|name| name.starts_with(line))
            .map(|name| name[line.len()..].into())
    }
}

/// Collect one logical input from physical lines.
///
/// Lines are read until a blank line follows some content. Blank lines before
/// any content are skipped. `read_line` receives the prompt to show.
pub fn collect_input<F>(mut read_line: F) -> Result<String, ReadlineError>
where
    F: FnMut(&str) -> Result<String, ReadlineError>,
{
    let first_prompt = format!("{} ", style_chat_text("└→", ChatMessageType::Prompt));
    let continuation_prompt = format!("{} ", style_chat_text("│", ChatMessageType::Prompt));

    let mut lines: Vec<String> = Vec::new();
    loop {
        let prompt = if lines.is_empty() {
            &first_prompt
        } else {
            &continuation_prompt
        };
        let line = read_line(prompt)?;
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Handle one logical input line: run a command or send a chat turn.
pub async fn handle_line<W: Write>(
    chat: &mut Chat,
    line: &str,
    view: &mut ChatView<W>,
) -> Result<Flow> {
    match interpret(line) {
        Input::Empty => {}
        Input::Command(command) => match command.execute(chat) {
            Feedback::Info(text) => view.info(&text)?,
            Feedback::Error(text) => view.error(&text)?,
            Feedback::Help => view.help()?,
            Feedback::Quit => {
                view.farewell(QUIT_FAREWELL)?;
                return Ok(Flow::Exit);
            }
        },
        Input::Unknown(name) => view.error(&format!(
            "Unknown command: /{name}. Type 'help' for available commands."
        ))?,
        Input::Invalid(usage) => view.error(&usage)?,
        Input::Chat(text) => return process_message(chat, &text, view).await,
    }
    Ok(Flow::Continue)
}

/// Send a chat message and render the reply. The history is left untouched
/// when the request fails. Ctrl-C while waiting ends the session.
async fn process_message<W: Write>(
    chat: &mut Chat,
    text: &str,
    view: &mut ChatView<W>,
) -> Result<Flow> {
    view.message(Role::User, text)?;

    let spinner = GenerationSpinner::new("Thinking".to_string());
    let outcome = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        result = chat.send(text) => Some(result),
    };
    spinner.clear();

    match outcome {
        None => {
            debug!("Interrupted while waiting for the model");
            view.farewell(INTERRUPT_FAREWELL)?;
            Ok(Flow::Exit)
        }
        Some(Ok(reply)) => {
            view.message(Role::Assistant, &reply)?;
            Ok(Flow::Continue)
        }
        Some(Err(e)) => {
            view.error(&format!("Error calling API: {e}"))?;
            view.error("Failed to get response from the API.")?;
            Ok(Flow::Continue)
        }
    }
}

/// Runs the interactive REPL for the chat session.
pub async fn run(chat: &mut Chat) -> Result<()> {
    let mut view = ChatView::new(stdout());
    view.banner()?;

    let config = rustyline::Config::builder()
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let command_names = command_names()
        .into_iter()
        .map(|name| format!("/{name}"))
        .collect();

    let mut rl: Editor<Repl, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(Repl { command_names }));

    loop {
        view.input_header()?;
        let input = collect_input(|prompt| {
            let line = rl.readline(prompt)?;
            if !line.trim().is_empty() {
                rl.add_history_entry(line.as_str())?;
            }
            Ok(line)
        });

        let line = match input {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                view.farewell(INTERRUPT_FAREWELL)?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match handle_line(chat, &line, &mut view).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            // A single bad turn never ends the session
            Err(e) => view.error(&format!("An error occurred: {e:#}"))?,
        }
    }
}
