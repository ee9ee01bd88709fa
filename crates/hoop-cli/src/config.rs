//! Configuration file management for hoopbuddy.
//!
//! Provides a TOML-based config file at `~/.config/hoopbuddy/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use hoop_core::model::{DEFAULT_MODEL, GeminiModel};
use hoop_core::{PlanGenerator, Planner, RemotePlanner};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5050;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the hoopbuddy config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/hoopbuddy` or
/// `~/.config/hoopbuddy`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("hoopbuddy");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("hoopbuddy")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// The file holds an API key, so it is made owner-only (0600) on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub backend_url: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct HoopConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub bind: String,
    pub port: u16,
    /// Base URL of a running `hoopbuddy serve`; `None` means generate in-process.
    pub backend_url: Option<String>,
}

impl HoopConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `--api-key` > `GEMINI_API_KEY` > `gemini.api_key` > none
    /// - Model: `--model` > `HOOPBUDDY_MODEL` > `gemini.model` > `gemini-1.5-pro`
    /// - Bind: `--bind` > `HOOPBUDDY_BIND` > `server.bind` > `127.0.0.1`
    /// - Port: `--port` > `HOOPBUDDY_PORT` > `server.port` > `5050`
    /// - Backend URL: `--server` > `HOOPBUDDY_BACKEND_URL` > none
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let file = if config_path().exists() {
            load_config()?
        } else {
            ConfigFile::default()
        };

        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| env_var("GEMINI_API_KEY"))
            .or(file.gemini.api_key);

        let model = overrides
            .model
            .clone()
            .or_else(|| env_var("HOOPBUDDY_MODEL"))
            .or(file.gemini.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind = overrides
            .bind
            .clone()
            .or_else(|| env_var("HOOPBUDDY_BIND"))
            .or(file.server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = if let Some(port) = overrides.port {
            port
        } else if let Some(raw) = env_var("HOOPBUDDY_PORT") {
            raw.parse()
                .with_context(|| format!("HOOPBUDDY_PORT is not a valid port: {raw:?}"))?
        } else {
            file.server.port.unwrap_or(DEFAULT_PORT)
        };

        let backend_url = overrides
            .backend_url
            .clone()
            .or_else(|| env_var("HOOPBUDDY_BACKEND_URL"));

        Ok(Self {
            api_key,
            model,
            bind,
            port,
            backend_url,
        })
    }

    /// The API key, for commands that call the model in-process.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!(
                "Gemini API key not found; set GEMINI_API_KEY or run `hoopbuddy init --api-key <KEY>`"
            ),
        }
    }

    /// In-process generator backed by Gemini. Needs an API key.
    pub fn local_generator(&self) -> Result<PlanGenerator> {
        let model = GeminiModel::new(&self.model, self.require_api_key()?);
        Ok(PlanGenerator::new(Arc::new(model)))
    }

    /// The remote server when a backend URL is configured, else the
    /// in-process generator.
    pub fn planner(&self) -> Result<Arc<dyn Planner>> {
        match &self.backend_url {
            Some(url) => {
                tracing::debug!(url = %url, "using remote planner");
                Ok(Arc::new(RemotePlanner::new(url)))
            }
            None => Ok(Arc::new(self.local_generator()?)),
        }
    }
}

/// Read an env var, treating empty as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "XDG_CONFIG_HOME",
        "GEMINI_API_KEY",
        "HOOPBUDDY_MODEL",
        "HOOPBUDDY_BIND",
        "HOOPBUDDY_PORT",
        "HOOPBUDDY_BACKEND_URL",
    ];

    /// Clear every variable `resolve` reads and point the config dir at `dir`.
    fn isolate(dir: &std::path::Path) {
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir) };
    }

    fn cleanup() {
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    fn write_file(contents: &str) {
        std::fs::create_dir_all(config_dir()).unwrap();
        std::fs::write(config_path(), contents).unwrap();
    }

    #[test]
    fn defaults_when_nothing_set() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());

        let config = HoopConfig::resolve(&ConfigOverrides::default()).unwrap();
        cleanup();

        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 5050);
        assert_eq!(config.backend_url, None);
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn config_file_values_are_used() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        write_file(
            "[gemini]\napi_key = \"file-key\"\nmodel = \"gemini-1.5-flash\"\n\n[server]\nport = 8080\n",
        );

        let config = HoopConfig::resolve(&ConfigOverrides::default()).unwrap();
        cleanup();

        assert_eq!(config.require_api_key().unwrap(), "file-key");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind, "127.0.0.1");
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        write_file("[gemini]\napi_key = \"file-key\"\n[server]\nport = 8080\n");
        unsafe { std::env::set_var("GEMINI_API_KEY", "env-key") };
        unsafe { std::env::set_var("HOOPBUDDY_PORT", "9090") };

        let from_env = HoopConfig::resolve(&ConfigOverrides::default()).unwrap();
        let from_cli = HoopConfig::resolve(&ConfigOverrides {
            api_key: Some("cli-key".into()),
            port: Some(7070),
            ..Default::default()
        })
        .unwrap();
        cleanup();

        assert_eq!(from_env.api_key.as_deref(), Some("env-key"));
        assert_eq!(from_env.port, 9090);
        assert_eq!(from_cli.api_key.as_deref(), Some("cli-key"));
        assert_eq!(from_cli.port, 7070);
    }

    #[test]
    fn invalid_port_env_is_an_error() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        unsafe { std::env::set_var("HOOPBUDDY_PORT", "not-a-port") };

        let result = HoopConfig::resolve(&ConfigOverrides::default());
        cleanup();

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("HOOPBUDDY_PORT"), "unexpected error: {msg}");
    }

    #[test]
    fn backend_url_selects_remote_planner_without_api_key() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        unsafe { std::env::set_var("HOOPBUDDY_BACKEND_URL", "http://localhost:5050") };

        let config = HoopConfig::resolve(&ConfigOverrides::default()).unwrap();
        cleanup();

        assert_eq!(config.backend_url.as_deref(), Some("http://localhost:5050"));
        assert!(config.planner().is_ok());
        assert!(config.local_generator().is_err());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        write_file("[server]\nport = \"eighty\"\n");

        let result = HoopConfig::resolve(&ConfigOverrides::default());
        cleanup();

        assert!(result.is_err());
    }

    #[test]
    fn empty_env_var_counts_as_unset() {
        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());
        unsafe { std::env::set_var("GEMINI_API_KEY", "  ") };

        let config = HoopConfig::resolve(&ConfigOverrides::default()).unwrap();
        cleanup();

        assert_eq!(config.api_key, None);
    }

    #[cfg(unix)]
    #[test]
    fn save_config_writes_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = crate::test_util::lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        isolate(tmp.path());

        let cfg = ConfigFile {
            gemini: GeminiSection {
                api_key: Some("secret".into()),
                model: None,
            },
            server: ServerSection::default(),
        };
        save_config(&cfg).unwrap();
        let path = config_path();
        let loaded = load_config().unwrap();
        cleanup();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
        assert_eq!(loaded.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(loaded.server.port, None);
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _lock = crate::test_util::lock_env();
        let path = config_path();
        assert!(
            path.ends_with("hoopbuddy/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
