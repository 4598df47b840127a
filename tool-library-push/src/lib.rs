pub mod cli;
pub mod load_config;
pub mod notify;

pub use cli::{run, Cli, Commands};
