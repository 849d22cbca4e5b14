//! Configuration of a run and of individual test cases.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_HELM_BINARY, DEFAULT_NAMESPACE, DEFAULT_RELEASE_NAME, REGENERATE_ENV, TEST_CASE_FILE,
};
use crate::error::{Error, Result};
use crate::splitter::is_whitespace_or_comments;

/// Options shared by every test case of a run.
///
/// Built once at start up and passed by reference, nothing reads the
/// environment after that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Copy the generated resources over the expected ones instead of comparing.
    pub regenerate: bool,
    /// Stop comparing a test case at its first failing file.
    pub fail_fast: bool,
}

impl RunOptions {
    /// Reads the regeneration switch from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(REGENERATE_ENV).ok().as_deref())
    }

    pub fn from_env_value(value: Option<&str>) -> Self {
        Self { regenerate: value.is_some_and(is_truthy), fail_fast: false }
    }
}

/// Returns true for `1`, `true`, `yes` and `on`, ignoring case and surrounding whitespace.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Per test case settings read from `testcase.yml`.
///
/// Keys are accepted in camel case, Pascal case or all lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCaseConfig {
    /// Extra resources are the expected outcome of the test case.
    #[serde(alias = "ExpectFail", alias = "expectfail")]
    pub expect_fail: bool,
    /// Resources generated but absent from the expected directory fail the test case.
    #[serde(alias = "FailOnExtraResources", alias = "failonextraresources")]
    pub fail_on_extra_resources: bool,
}

impl TestCaseConfig {
    /// Loads the configuration of the test case in `case_dir`.
    ///
    /// # Returns
    /// * `Result<TestCaseConfig>` - Defaults when the test case has no `testcase.yml`
    ///
    /// # Errors
    /// * `Error::ConfigError` if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(case_dir: P) -> Result<Self> {
        let config_path = case_dir.as_ref().join(TEST_CASE_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        debug!("Loading test case configuration from {}", config_path.display());
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::ConfigError(format!("failed to load {}: {}", config_path.display(), e))
        })?;
        Self::parse(&content).map_err(|e| match e {
            Error::ConfigError(msg) => {
                Error::ConfigError(format!("{} in {}", msg, config_path.display()))
            }
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        if is_whitespace_or_comments(content) {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("invalid test case configuration: {}", e)))
    }
}

/// How the templating tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmOptions {
    pub binary: PathBuf,
    pub release: String,
    pub namespace: String,
}

impl Default for HelmOptions {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_HELM_BINARY),
            release: DEFAULT_RELEASE_NAME.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
