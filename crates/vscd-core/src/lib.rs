pub mod config;
pub mod error;
pub mod logging;

// Install workflow
pub mod checksum;
pub mod cleanup;
pub mod command;
pub mod context;
pub mod deps;
pub mod fetch;
pub mod install;
pub mod orchestrator;
pub mod package_manager;
pub mod privilege;
pub mod repository;
pub mod retry;
pub mod verify;

pub use error::{InstallError, Result};
