use crate::svc::chat::Chat;
use clap::{CommandFactory, Parser, Subcommand};
use confab_core::session::parse_temperature;
use tracing::debug;

// -------------
// REPL commands
// -------------
#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
pub struct CliCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Clear conversation history
    Clear,
    /// Save conversation to a timestamped JSON file
    Save,
    /// Set or view the system prompt.
    ///
    /// With no arguments, shows the current system prompt.
    #[command(alias = "sys")]
    System {
        /// New system prompt
        #[arg(allow_hyphen_values = true)]
        prompt: Option<String>,
    },
    /// Set or view the sampling temperature (0.0 to 1.0).
    ///
    /// With no arguments, shows the current temperature.
    #[command(alias = "temperature")]
    Temp {
        /// New temperature
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Show available commands
    Help,
    /// Exit the chat session
    #[command(alias = "q", alias = "exit")]
    Quit,
}

/// What the REPL should show after a command ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Info(String),
    Error(String),
    Help,
    Quit,
}

impl Command {
    /// Executes a REPL command against the chat session.
    pub fn execute(self, chat: &mut Chat) -> Feedback {
        debug!(command = ?self, "Executing command");
        match self {
            Command::Clear => {
                chat.session_mut().clear();
                Feedback::Info("Conversation history cleared.".to_string())
            }
            Command::Save => match chat.save() {
                Ok(path) => Feedback::Info(format!("Conversation saved to {}", path.display())),
                Err(e) => Feedback::Error(format!("Error saving conversation: {e}")),
            },
            Command::System { prompt } => match prompt {
                Some(prompt) => {
                    chat.session_mut().set_system_prompt(&prompt);
                    Feedback::Info("System prompt updated.".to_string())
                }
                None => Feedback::Info(format!(
                    "Current system prompt:\n{}",
                    chat.session().system_prompt()
                )),
            },
            Command::Temp { value } => match value {
                Some(raw) => {
                    let result = parse_temperature(&raw)
                        .and_then(|t| chat.session_mut().set_temperature(t).map(|_| t));
                    match result {
                        Ok(t) => Feedback::Info(format!("Temperature set to {t}")),
                        Err(e) => Feedback::Error(e.to_string()),
                    }
                }
                None => Feedback::Info(format!(
                    "Current temperature: {}",
                    chat.session().temperature()
                )),
            },
            Command::Help => Feedback::Help,
            Command::Quit => Feedback::Quit,
        }
    }
}

/// A classified line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Nothing but whitespace.
    Empty,
    Command(Command),
    /// A slash command that does not exist.
    Unknown(String),
    /// A known slash command with bad arguments; holds the rendered usage error.
    Invalid(String),
    /// Text to send to the model.
    Chat(String),
}

/// Names and aliases of all REPL commands, without the leading slash.
pub fn command_names() -> Vec<String> {
    CliCommand::command()
        .get_subcommands()
        .flat_map(|c| {
            std::iter::once(c.get_name())
                .chain(c.get_all_aliases())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Split a slash command into clap arguments.
///
/// The command name is lowercased and stripped of its slash. `/system` and
/// `/temp` take the rest of the line verbatim so that prompts keep their quotes
/// and apostrophes; other commands are shell-split.
pub fn parse_command_line(line: &str) -> Vec<String> {
    let body = line.trim();
    let body = body.strip_prefix('/').unwrap_or(body);

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };
    let name = name.to_lowercase();

    let mut args = vec![name.clone()];
    if rest.is_empty() {
        return args;
    }

    match name.as_str() {
        "system" | "sys" | "temp" | "temperature" => args.push(rest.to_string()),
        _ => match shlex::split(rest) {
            Some(parsed) => args.extend(parsed),
            // Unbalanced quotes
            None => args.extend(rest.split_whitespace().map(str::to_string)),
        },
    }
    args
}

/// Classify one logical input line.
///
/// `quit` and `help` match whole lines case-insensitively; anything starting
/// with `/` is a command; everything else is chat.
pub fn interpret(line: &str) -> Input {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Input::Empty;
    }
    if trimmed.eq_ignore_ascii_case("quit") {
        return Input::Command(Command::Quit);
    }
    if trimmed.eq_ignore_ascii_case("help") {
        return Input::Command(Command::Help);
    }
    if !trimmed.starts_with('/') {
        return Input::Chat(trimmed.to_string());
    }

    let args = parse_command_line(trimmed);
    if !command_names().contains(&args[0]) {
        return Input::Unknown(args[0].clone());
    }

    match CliCommand::try_parse_from(&args) {
        Ok(cli_command) => Input::Command(cli_command.command),
        Err(e) => Input::Invalid(e.render().to_string().trim_end().to_string()),
    }
}
