pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::{ConfigSource, EnvConfig, MapConfig, Settings};
pub use crate::core::bootstrap::{Bootstrapper, Handles};
pub use crate::core::health::{run_health_checks, AiCheckOutcome, DbCheckOutcome, HealthReport};
pub use crate::core::registry::AppRegistry;
pub use crate::domain::ports::ConsoleReporter;
pub use crate::utils::error::{BootError, Result};
