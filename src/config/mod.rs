//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`RISKI_BASE_URL`, `RISKI_AGENT_ENDPOINT`,
//!    `RISKI_TIMEOUT_SECS`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./riski.toml in the current directory
//! 4. $XDG_CONFIG_HOME/riski/riski.toml (or ~/.config/riski/riski.toml)
//! 5. Built-in defaults

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use loader::load_config;
pub use sources::{config_root_dir, ConfigSource};
pub use types::{ApiConfig, Config, DisplayConfig, LoadedConfig, ReconcilerConfig};
