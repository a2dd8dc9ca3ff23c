//! Environment overrides.

use crate::error::ConfigError;

use super::Config;

const ENV_BASE_URL: &str = "RISKI_BASE_URL";
const ENV_AGENT_ENDPOINT: &str = "RISKI_AGENT_ENDPOINT";
const ENV_TIMEOUT_SECS: &str = "RISKI_TIMEOUT_SECS";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup(ENV_BASE_URL)) {
        config.api.base_url = url;
    }
    if let Some(endpoint) = non_empty(env_lookup(ENV_AGENT_ENDPOINT)) {
        config.api.agent_endpoint = endpoint;
    }
    if let Some(timeout) = non_empty(env_lookup(ENV_TIMEOUT_SECS)) {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_TIMEOUT_SECS} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed;
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
