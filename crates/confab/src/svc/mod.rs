//! Services layer for the app. Wraps confab_core session and gateway logic for the cli.
pub mod chat;
