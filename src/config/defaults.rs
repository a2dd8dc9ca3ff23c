//! Default configuration constants.

/// Default agent backend origin.
pub(super) const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Path of the AG-UI agent endpoint below the base URL.
pub(super) const DEFAULT_AGENT_ENDPOINT: &str = "/api/ag-ui/riskiagent";
/// Default connect and stream-idle timeout.
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Config file name, both locally and below the global config root.
pub(super) const CONFIG_FILE_NAME: &str = "riski.toml";
/// Directory below the global config root.
pub(super) const CONFIG_DIR_NAME: &str = "riski";
