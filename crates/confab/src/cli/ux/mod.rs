mod presenter;
mod progress;
mod view;

pub use presenter::{ChatMessageType, style_chat_text};
pub use progress::GenerationSpinner;
pub use view::ChatView;

use console::style;

/// Prints a formatted error message to stderr.
pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
