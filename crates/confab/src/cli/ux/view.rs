use super::presenter::{
    ChatMessageType, format_banner, format_help, format_message, style_chat_text,
};
use confab_core::completion::Role;
use std::io::{self, Write};

/// Renders chat output to a writer: stdout for the REPL, a buffer in tests.
pub struct ChatView<W: Write> {
    out: W,
}

impl<W: Write> ChatView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        write!(self.out, "{}", format_banner())?;
        self.out.flush()
    }

    /// Header shown before collecting a new (possibly multi-line) input.
    pub fn input_header(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{} (Press Enter twice to submit)",
            style_chat_text("┌─ Input", ChatMessageType::Prompt)
        )?;
        self.out.flush()
    }

    pub fn message(&mut self, role: Role, content: &str) -> io::Result<()> {
        write!(self.out, "{}", format_message(role, content))?;
        self.out.flush()
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", style_chat_text(text, ChatMessageType::Info))?;
        self.out.flush()
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", style_chat_text(text, ChatMessageType::Error))?;
        self.out.flush()
    }

    pub fn help(&mut self) -> io::Result<()> {
        write!(self.out, "{}", format_help())?;
        self.out.flush()
    }

    pub fn farewell(&mut self, text: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{}",
            style_chat_text(text, ChatMessageType::Banner)
        )?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
