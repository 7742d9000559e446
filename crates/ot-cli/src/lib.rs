//! toggl-overtime CLI library.
//!
//! This crate provides the CLI interface: argument parsing, layered
//! configuration and the Toggl-backed report service.

mod cli;
mod config;
pub mod report;
mod service;

pub use cli::Cli;
pub use config::{Config, Overrides, dirs_config_path};
pub use service::TogglService;
