//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Config File
//!
//! Located at (in order of precedence):
//! 1. `--config <path>` on the command line
//! 2. `$JAILSH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/jailsh/config.toml`
//! 4. `~/.jailsh/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing so that a typo in a URL or an
//! empty install command fails at startup instead of at first use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Shell configuration.
///
/// # Example
///
/// ```toml
/// root = "~/.jailsh/root"
/// credential_file = "jailsh-session.json"
///
/// [remote]
/// login_url = "http://localhost:8004/loginpy.php"
/// profile_url = "http://localhost:8004/profilepy.php"
/// success_marker = "success"
/// timeout_secs = 15
///
/// [tools]
/// git = "git"
/// install = ["python3", "-m", "pip", "install"]
///
/// [tools.interpreters]
/// py = "python3"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Root directory all commands are confined to
    pub root: Option<String>,

    /// Credential file, relative to the process working directory
    pub credential_file: Option<String>,

    /// Remote login/profile endpoints
    pub remote: Option<RemoteConfig>,

    /// External tools
    pub tools: Option<ToolsConfig>,
}

impl ShellConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            if root.trim().is_empty() {
                return Err(ConfigError::InvalidValue("root cannot be empty".to_string()));
            }
        }

        if let Some(file) = &self.credential_file {
            if file.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "credential_file cannot be empty".to_string(),
                ));
            }
        }

        if let Some(remote) = &self.remote {
            remote.validate()?;
        }

        if let Some(tools) = &self.tools {
            tools.validate()?;
        }

        Ok(())
    }
}

/// Remote authentication endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Form-encoded login endpoint
    pub login_url: Option<String>,

    /// Profile endpoint queried with the session cookies
    pub profile_url: Option<String>,

    /// Case-insensitive marker a successful login body contains
    pub success_marker: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    /// Validate the remote configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("login_url", &self.login_url),
            ("profile_url", &self.profile_url),
        ] {
            if let Some(url) = url {
                validate_http_url(name, url)?;
            }
        }

        if let Some(marker) = &self.success_marker {
            if marker.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "success_marker cannot be empty".to_string(),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// External tool commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// VCS client program
    pub git: Option<String>,

    /// Package manager invocation; the package name is appended
    pub install: Option<Vec<String>>,

    /// Script extension (without dot) to interpreter program
    pub interpreters: Option<BTreeMap<String, String>>,
}

impl ToolsConfig {
    /// Validate the tools configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(git) = &self.git {
            if git.trim().is_empty() {
                return Err(ConfigError::InvalidValue("git cannot be empty".to_string()));
            }
        }

        if let Some(install) = &self.install {
            if install.is_empty() || install[0].trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "install must name a program".to_string(),
                ));
            }
        }

        if let Some(interpreters) = &self.interpreters {
            for (ext, program) in interpreters {
                if ext.is_empty() || ext.contains('.') {
                    return Err(ConfigError::InvalidValue(format!(
                        "invalid script extension '{}', use the bare extension (e.g. 'py')",
                        ext
                    )));
                }
                if program.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "interpreter for '{}' cannot be empty",
                        ext
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validate_http_url(name: &str, url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid {} '{}': {}", name, url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "invalid {} '{}': unsupported scheme '{}'",
            name, url, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            root = "/srv/jail"
            credential_file = "session.json"

            [remote]
            login_url = "https://example.com/login"
            profile_url = "https://example.com/profile"
            success_marker = "ok"
            timeout_secs = 5

            [tools]
            git = "/usr/bin/git"
            install = ["pip", "install"]

            [tools.interpreters]
            py = "python3"
            rb = "ruby"
        "#;

        let config: ShellConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.root.as_deref(), Some("/srv/jail"));

        let remote = config.remote.unwrap();
        assert_eq!(remote.timeout_secs, Some(5));

        let tools = config.tools.unwrap();
        assert_eq!(tools.interpreters.unwrap().get("rb").unwrap(), "ruby");
    }

    #[test]
    fn rejects_non_http_url() {
        let remote = RemoteConfig {
            login_url: Some("ftp://example.com/login".to_string()),
            ..Default::default()
        };
        let err = remote.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_malformed_url() {
        let remote = RemoteConfig {
            profile_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(remote.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let remote = RemoteConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(remote.validate().is_err());
    }

    #[test]
    fn rejects_empty_install() {
        let tools = ToolsConfig {
            install: Some(vec![]),
            ..Default::default()
        };
        assert!(tools.validate().is_err());
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut interpreters = BTreeMap::new();
        interpreters.insert(".py".to_string(), "python3".to_string());
        let tools = ToolsConfig {
            interpreters: Some(interpreters),
            ..Default::default()
        };
        let err = tools.validate().unwrap_err();
        assert!(err.to_string().contains("bare extension"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<ShellConfig, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }
}
