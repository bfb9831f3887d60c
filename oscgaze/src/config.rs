//! Tracker configuration loading
//!
//! TOML-backed configuration with the usual resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file is a warning plus defaults, never a startup
//! failure; a file that exists but does not parse is a hard error.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::listener::DEFAULT_OSC_PORT;

/// Environment variable overriding the OSC port
pub const PORT_ENV_VAR: &str = "OSCGAZE_PORT";

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UDP port the OSC listener binds on all interfaces
    pub port: u16,

    /// Keep the vertical channel populated across fuses, so a fresh
    /// horizontal pair alone produces the next gaze sample
    pub latch_eyes_y: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_OSC_PORT,
            latch_eyes_y: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// `None`, or a path that does not exist, yields defaults (with a
    /// warning for the latter). Unparsable content is an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "config file {} not readable ({}), using defaults",
                    path.display(),
                    e
                );
                return Ok(Config::default());
            }
        };

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the effective port from CLI > environment > file > default.
    pub fn resolve_port(&self, cli_arg: Option<u16>, env_var_name: &str) -> u16 {
        if let Some(port) = cli_arg {
            return port;
        }

        if let Ok(value) = std::env::var(env_var_name) {
            match value.parse() {
                Ok(port) => return port,
                Err(_) => warn!(
                    "ignoring unparsable {}={:?}, falling back to config",
                    env_var_name, value
                ),
            }
        }

        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_OSC_PORT);
        assert!(!config.latch_eyes_y);
    }

    #[test]
    fn test_no_path_yields_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/oscgaze.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9015").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 9015);
        assert!(!config.latch_eyes_y);
    }

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9015\nlatch_eyes_y = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 9015);
        assert!(config.latch_eyes_y);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a port\"").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_port_prefers_cli() {
        env::set_var(PORT_ENV_VAR, "9016");
        let config = Config {
            port: 9015,
            ..Config::default()
        };
        assert_eq!(config.resolve_port(Some(9017), PORT_ENV_VAR), 9017);
        env::remove_var(PORT_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_resolve_port_env_beats_file() {
        env::set_var(PORT_ENV_VAR, "9016");
        let config = Config {
            port: 9015,
            ..Config::default()
        };
        assert_eq!(config.resolve_port(None, PORT_ENV_VAR), 9016);
        env::remove_var(PORT_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_resolve_port_ignores_bad_env() {
        env::set_var(PORT_ENV_VAR, "not-a-port");
        let config = Config {
            port: 9015,
            ..Config::default()
        };
        assert_eq!(config.resolve_port(None, PORT_ENV_VAR), 9015);
        env::remove_var(PORT_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_resolve_port_falls_back_to_file_value() {
        env::remove_var(PORT_ENV_VAR);
        let config = Config {
            port: 9015,
            ..Config::default()
        };
        assert_eq!(config.resolve_port(None, PORT_ENV_VAR), 9015);
    }
}
