//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The shell reads one TOML file. Every setting has a default, so running
//! without any config file is supported.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. The first config file found (see below)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. Explicit path (`--config`), which must exist
//! 2. `$JAILSH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/jailsh/config.toml`
//! 4. `~/.jailsh/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use jailsh::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Root: {}", config.root().unwrap().display());
//! println!("Login endpoint: {}", config.login_url());
//! ```

pub mod schema;

pub use schema::{RemoteConfig, ShellConfig, ToolsConfig};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Default root directory.
pub const DEFAULT_ROOT: &str = "~/.jailsh/root";

/// Default login endpoint.
pub const DEFAULT_LOGIN_URL: &str = "http://localhost:8004/loginpy.php";

/// Default profile endpoint.
pub const DEFAULT_PROFILE_URL: &str = "http://localhost:8004/profilepy.php";

/// Default credential file name, relative to the process working directory.
pub const DEFAULT_CREDENTIAL_FILE: &str = "jailsh-session.json";

/// Default marker a successful login response contains.
pub const DEFAULT_SUCCESS_MARKER: &str = "success";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ShellConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is provided it must exist. Otherwise the standard
    /// locations are searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ShellConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the standard locations.
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $JAILSH_CONFIG
        if let Ok(path) = std::env::var("JAILSH_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/jailsh/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("jailsh/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.jailsh/config.toml
        let path = dirs::home_dir()?.join(".jailsh/config.toml");
        path.exists().then_some(path)
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.jailsh/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".jailsh/config.toml"))
    }

    /// Write a config file atomically (temp file, then rename).
    pub fn write_config_atomic(path: &Path, config: &ShellConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// A config file with every default spelled out.
    pub fn starter() -> ShellConfig {
        ShellConfig {
            root: Some(DEFAULT_ROOT.to_string()),
            credential_file: Some(DEFAULT_CREDENTIAL_FILE.to_string()),
            remote: Some(RemoteConfig {
                login_url: Some(DEFAULT_LOGIN_URL.to_string()),
                profile_url: Some(DEFAULT_PROFILE_URL.to_string()),
                success_marker: Some(DEFAULT_SUCCESS_MARKER.to_string()),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            }),
            tools: Some(ToolsConfig {
                git: Some("git".to_string()),
                install: Some(default_install_command()),
                interpreters: Some(default_interpreters()),
            }),
        }
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the root directory, with `~` expanded.
    ///
    /// Defaults to `~/.jailsh/root`.
    pub fn root(&self) -> Result<PathBuf, ConfigError> {
        expand_home(self.file.root.as_deref().unwrap_or(DEFAULT_ROOT))
    }

    /// Get the credential file path, resolved against `working_dir` when
    /// relative.
    pub fn credential_file(&self, working_dir: &Path) -> Result<PathBuf, ConfigError> {
        let raw = self
            .file
            .credential_file
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_FILE);
        Ok(working_dir.join(expand_home(raw)?))
    }

    fn remote(&self) -> Option<&RemoteConfig> {
        self.file.remote.as_ref()
    }

    fn tools(&self) -> Option<&ToolsConfig> {
        self.file.tools.as_ref()
    }

    /// Get the login endpoint.
    pub fn login_url(&self) -> &str {
        self.remote()
            .and_then(|r| r.login_url.as_deref())
            .unwrap_or(DEFAULT_LOGIN_URL)
    }

    /// Get the profile endpoint.
    pub fn profile_url(&self) -> &str {
        self.remote()
            .and_then(|r| r.profile_url.as_deref())
            .unwrap_or(DEFAULT_PROFILE_URL)
    }

    /// Get the login success marker.
    pub fn success_marker(&self) -> &str {
        self.remote()
            .and_then(|r| r.success_marker.as_deref())
            .unwrap_or(DEFAULT_SUCCESS_MARKER)
    }

    /// Get the HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.remote()
                .and_then(|r| r.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Get the VCS client program.
    ///
    /// Defaults to `git`.
    pub fn git_program(&self) -> &str {
        self.tools()
            .and_then(|t| t.git.as_deref())
            .unwrap_or("git")
    }

    /// Get the package manager invocation.
    ///
    /// Defaults to `python3 -m pip install`.
    pub fn install_command(&self) -> Vec<String> {
        self.tools()
            .and_then(|t| t.install.clone())
            .unwrap_or_else(default_install_command)
    }

    /// Get the script interpreters keyed by extension.
    ///
    /// Defaults to `py = "python3"` and `sh = "sh"`.
    pub fn interpreters(&self) -> BTreeMap<String, String> {
        self.tools()
            .and_then(|t| t.interpreters.clone())
            .unwrap_or_else(default_interpreters)
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn default_install_command() -> Vec<String> {
    ["python3", "-m", "pip", "install"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_interpreters() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("py".to_string(), "python3".to_string()),
        ("sh".to_string(), "sh".to_string()),
    ])
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf, ConfigError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(ConfigError::NoHomeDir);
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}
