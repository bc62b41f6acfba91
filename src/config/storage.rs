//! Loading configuration from disk.

use super::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const APP_DIR: &str = "pr-timer";

/// Filename for the configuration.
const CONFIG_FILE: &str = "config.toml";

/// Get path to the default configuration file.
///
/// `None` when the platform has no config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Load configuration from the default location.
///
/// Returns defaults if there is no config directory or no file.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load configuration from `path`.
///
/// Returns defaults if the file doesn't exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyKind, RepositoryEntry};
    use crate::platform::Backend;
    use crate::policy::RepoPolicy;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("pr-timer/config.toml"));
        }
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval_secs, 300);
    }

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
poll_interval_secs = 60
backend = "api"

[[repository]]
name = "acme/widgets"
policy = "hold-until-deadline"

[[repository]]
name = "acme/gadgets"
policy = "single-check"
check = "ci / test"
"#,
        );

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.backend, Backend::Api);
        assert_eq!(
            config.repositories[1],
            RepositoryEntry {
                name: "acme/gadgets".to_string(),
                policy: PolicyKind::SingleCheck,
                check: Some("ci / test".to_string()),
            }
        );

        let table = config.policy_table().unwrap();
        assert_eq!(table.policy_for("acme/widgets"), &RepoPolicy::HoldUntilDeadline);
        assert_eq!(
            table.policy_for("ACME/Gadgets"),
            &RepoPolicy::SingleCheck("ci / test".to_string())
        );
        // Built-ins survive
        assert_eq!(
            table.policy_for("microsoft/typespec"),
            &RepoPolicy::HoldUntilDeadline
        );
    }

    #[test]
    fn test_config_entry_overrides_builtin() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[repository]]
name = "microsoft/typespec"
policy = "default"
"#,
        );

        let table = load_config_from(&path).unwrap().policy_table().unwrap();
        assert_eq!(table.policy_for("microsoft/typespec"), &RepoPolicy::Default);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "poll_interval_secs = 0\n");
        assert!(matches!(load_config_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_single_check_without_name_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[repository]]
name = "acme/widgets"
policy = "single-check"
"#,
        );
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("no 'check' name"));
    }

    #[test]
    fn test_bad_repository_name_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[repository]]
name = "widgets"
policy = "default"
"#,
        );
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_unparseable_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "poll_interval_secs = \"soon\"\n");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
