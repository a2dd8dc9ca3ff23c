//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

use super::env::apply_env_overrides;
use super::sources::{config_root_dir, read_config_text};
use super::{Config, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&mut config)?;
    debug!(source = %source, url = %config.api.agent_url(), "configuration loaded");
    Ok(LoadedConfig { config, source })
}

fn validate(config: &mut Config) -> Result<(), ConfigError> {
    let url = config.api.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "api.base_url `{url}` must start with http:// or https://"
        )));
    }
    config.api.base_url = url.trim_end_matches('/').to_string();
    // Zero would disable the stream idle timeout entirely.
    config.api.timeout_secs = config.api.timeout_secs.max(1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSource;
    use crate::reconciler::RelevanceDetection;
    use std::collections::HashMap;

    fn files(entries: &[(&str, &str)]) -> impl Fn(&Path) -> Result<String, std::io::Error> {
        let map: HashMap<PathBuf, String> = entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        move |path| {
            map.get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_when_no_file_exists() {
        let loaded = load_config_from_sources(None, files(&[]), no_env, || None).expect("load");
        assert_eq!(loaded.source, ConfigSource::BuiltInDefaults);
        assert_eq!(
            loaded.config.api.agent_url(),
            "http://localhost:8080/api/ag-ui/riskiagent"
        );
        assert_eq!(loaded.config.api.timeout_secs, 120);
        assert_eq!(
            loaded.config.reconciler.relevance_detection,
            RelevanceDetection::Transition
        );
        assert!(loaded.config.display.color);
    }

    #[test]
    fn local_file_wins_over_global() {
        let read = files(&[
            ("riski.toml", "[api]\nbase_url = \"https://local.example\"\n"),
            (
                "/cfg/riski/riski.toml",
                "[api]\nbase_url = \"https://global.example\"\n",
            ),
        ]);
        let loaded = load_config_from_sources(None, read, no_env, || Some(PathBuf::from("/cfg")))
            .expect("load");
        assert_eq!(loaded.source, ConfigSource::Local);
        assert_eq!(loaded.config.api.base_url, "https://local.example");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let read = files(&[(
            "/cfg/riski/riski.toml",
            "[reconciler]\nrelevance_detection = \"snapshot\"\n[display]\njson = true\n",
        )]);
        let loaded = load_config_from_sources(None, read, no_env, || Some(PathBuf::from("/cfg")))
            .expect("load");
        assert_eq!(
            loaded.source,
            ConfigSource::Global(PathBuf::from("/cfg/riski/riski.toml"))
        );
        assert_eq!(
            loaded.config.reconciler.relevance_detection,
            RelevanceDetection::Snapshot
        );
        assert!(loaded.config.display.json);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from_sources(Some("/nope.toml"), files(&[]), no_env, || None)
            .expect_err("missing explicit file");
        assert!(matches!(err, ConfigError::Io(_)), "got: {err}");
    }

    #[test]
    fn env_overrides_file_values() {
        let read = files(&[("riski.toml", "[api]\nbase_url = \"https://file.example/\"\ntimeout_secs = 5\n")]);
        let env = |name: &str| match name {
            "RISKI_BASE_URL" => Some("https://env.example/".to_string()),
            "RISKI_AGENT_ENDPOINT" => Some("agent".to_string()),
            "RISKI_TIMEOUT_SECS" => Some("0".to_string()),
            _ => None,
        };
        let loaded = load_config_from_sources(None, read, env, || None).expect("load");
        assert_eq!(loaded.config.api.agent_url(), "https://env.example/agent");
        assert_eq!(loaded.config.api.timeout_secs, 1);
    }

    #[test]
    fn rejects_invalid_values() {
        let env = |name: &str| (name == "RISKI_TIMEOUT_SECS").then(|| "soon".to_string());
        let err = load_config_from_sources(None, files(&[]), env, || None).expect_err("invalid");
        assert!(err.to_string().contains("RISKI_TIMEOUT_SECS"), "got: {err}");

        let read = files(&[("riski.toml", "[api]\nbase_url = \"ftp://x\"\n")]);
        let err = load_config_from_sources(None, read, no_env, || None).expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let read = files(&[("riski.toml", "[reconciler]\nrelevance_detection = \"maybe\"\n")]);
        let err = load_config_from_sources(None, read, no_env, || None).expect_err("invalid");
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
