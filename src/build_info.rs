//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("RISKI_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("RISKI_BUILD_TIMESTAMP");

/// Help trailer that surfaces build metadata in `riski --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("RISKI_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("RISKI_BUILD_TIMESTAMP")
);

/// Version block shown by `riski --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("RISKI_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("RISKI_BUILD_TIMESTAMP")
);

/// Short identifier sent as the HTTP user agent.
pub fn user_agent() -> String {
    format!("riski/{VERSION} ({GIT_COMMIT})")
}
