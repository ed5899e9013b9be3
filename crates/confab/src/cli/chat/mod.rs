use crate::svc::chat::Chat;
use anyhow::Result;
use confab_core::config::Config;

mod commands;
mod repl;
pub(crate) mod test_utils;

/// Executes the chat command, starting an interactive REPL session.
///
/// The gateway is built before anything is printed, so a missing API key
/// fails here without entering the loop.
pub async fn execute(config: &Config) -> Result<()> {
    let mut chat = Chat::new(config)?;
    repl::run(&mut chat).await
}
