use confab_core::completion::Role;
use console::{Style, StyledObject, measure_text_width};

/// Column at which message bodies are wrapped.
pub const WRAP_WIDTH: usize = 70;
/// Indent for wrapped continuation lines.
pub const WRAP_INDENT: usize = 4;
const RULE_WIDTH: usize = 50;

const BANNER: &str = r#"
╔══════════════════════════════════════════════════════════════╗
║                       AI Assistant                           ║
║                                                              ║
║              Your Personal AI Chat Assistant                 ║
╚══════════════════════════════════════════════════════════════╝
"#;

/// Represents the type of a chat message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// Banner and farewell text.
    Banner,
    /// Hints like the usage line under the banner.
    Hint,
    /// Confirmation of a successful command.
    Info,
    /// An error message.
    Error,
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().green(),
        ChatMessageType::Banner => Style::new().cyan(),
        ChatMessageType::Hint => Style::new().yellow(),
        ChatMessageType::Info => Style::new().green(),
        ChatMessageType::Error => Style::new().red(),
    };
    style_obj.apply_to(text)
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::new().green(),
        Role::Assistant => Style::new().blue(),
        Role::System => Style::new().yellow(),
    }
}

/// Word-wrap `text` to `width` columns. Paragraph breaks are kept; lines after
/// the first one of each paragraph are indented by `indent` spaces. Words
/// longer than the width are left whole.
pub fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = measure_text_width(word);
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current));
                current.push_str(&pad);
                current_width = indent;
            } else if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Frame a message with a role header, a gutter and a closing rule.
pub fn format_message(role: Role, content: &str) -> String {
    let style = role_style(role);
    let gutter = style.apply_to("│");

    let mut output = format!("\n{}\n", style.apply_to(format!("╭─ {}", role.title())));
    for line in wrap_text(content, WRAP_WIDTH, WRAP_INDENT) {
        output.push_str(&format!("{gutter}  {line}\n"));
    }
    output.push_str(&format!(
        "{}\n",
        style.apply_to(format!("╰{}", "─".repeat(RULE_WIDTH)))
    ));
    output
}

pub fn format_banner() -> String {
    format!(
        "{}\n{}\n",
        style_chat_text(BANNER, ChatMessageType::Banner),
        style_chat_text(
            "Type 'help' for commands or 'quit' to exit",
            ChatMessageType::Hint
        )
    )
}

pub fn format_help() -> String {
    format!(
        "
{}
• /clear - Clear conversation history
• /save - Save conversation to file
• /system <prompt> - Set new system prompt (no prompt shows the current one)
• /temp <0.0-1.0> - Adjust temperature (no value shows the current one)
• help - Show this help message
• quit - Exit

{}
• Be specific in your questions
• Use clear and concise language
• Multi-line input is supported (press Enter twice to submit)
",
        style_chat_text("Available Commands:", ChatMessageType::Info),
        style_chat_text("Tips:", ChatMessageType::Info)
    )
}
