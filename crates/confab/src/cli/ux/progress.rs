use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner shown while waiting for the model to answer.
#[derive(Debug)]
pub struct GenerationSpinner {
    spinner: ProgressBar,
}

impl GenerationSpinner {
    /// Creates a new `GenerationSpinner` with a message.
    pub fn new(msg: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg:.cyan}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["   ", ".  ", ".. ", "...", "..."]);
        spinner.set_style(style);
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(300));

        Self { spinner }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for GenerationSpinner {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_spinner_new() {
        // Smoke test only, terminal output is not captured.
        let spinner = GenerationSpinner::new("Thinking".to_string());
        assert_eq!(spinner.spinner.message(), "Thinking");
        spinner.clear();
        assert!(spinner.spinner.is_finished());
    }
}
