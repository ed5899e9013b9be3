mod assets;
mod provider;

pub mod completion;
pub mod config;
pub mod export;
pub mod model;
pub mod session;

pub use crate::assets::{get_config_dir, get_data_dir};
pub use crate::provider::llm::get_completion_gateway;
