use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub const PYTHON_ENV: &str = "PYSHIP_PYTHON";
pub const BUILD_CMD_ENV: &str = "PYSHIP_BUILD_CMD";
pub const UPLOAD_CMD_ENV: &str = "PYSHIP_UPLOAD_CMD";
pub const REPOSITORY_ENV: &str = "PYSHIP_REPOSITORY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Capture tool output so it can be embedded in the JSON response.
    pub json: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns the variable when it is set to something other than whitespace.
    pub(crate) fn non_empty(&self, key: &str) -> Option<&str> {
        self.var(key).map(str::trim).filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Tool overrides taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) toolchain: ToolchainConfig,
}

impl Config {
    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        Self {
            toolchain: ToolchainConfig {
                python: snapshot.non_empty(PYTHON_ENV).map(ToOwned::to_owned),
                build_command: snapshot.non_empty(BUILD_CMD_ENV).map(split_command),
                upload_command: snapshot.non_empty(UPLOAD_CMD_ENV).map(split_command),
                repository: snapshot.non_empty(REPOSITORY_ENV).map(ToOwned::to_owned),
            },
        }
    }

    #[must_use]
    pub fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
    pub python: Option<String>,
    pub build_command: Option<Vec<String>>,
    pub upload_command: Option<Vec<String>>,
    pub repository: Option<String>,
}

// Quoting is not interpreted.
fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(ToOwned::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_overrides_split_on_whitespace() {
        let snapshot = EnvSnapshot::testing(&[
            (BUILD_CMD_ENV, "  sh /tmp/stub build.sh "),
            (UPLOAD_CMD_ENV, "twine upload\t--verbose"),
        ]);
        let config = Config::from_snapshot(&snapshot);
        assert_eq!(
            config.toolchain().build_command.as_deref(),
            Some(&["sh".to_string(), "/tmp/stub".to_string(), "build.sh".to_string()][..])
        );
        assert_eq!(
            config.toolchain().upload_command.as_deref(),
            Some(&["twine".to_string(), "upload".to_string(), "--verbose".to_string()][..])
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let snapshot = EnvSnapshot::testing(&[
            (PYTHON_ENV, "   "),
            (BUILD_CMD_ENV, ""),
            (REPOSITORY_ENV, "testpypi"),
        ]);
        let config = Config::from_snapshot(&snapshot);
        assert!(config.toolchain().python.is_none());
        assert!(config.toolchain().build_command.is_none());
        assert_eq!(config.toolchain().repository.as_deref(), Some("testpypi"));
    }
}
