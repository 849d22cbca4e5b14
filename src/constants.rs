//! Common constants used throughout chart-golden.

/// Line separating two resources in the output of `helm template`
pub const RESOURCE_SEPARATOR: &str = "---";

/// Marker starting a comment line inside a rendered document
pub const COMMENT_MARKER: &str = "#";

/// Extension of the resource files written and compared
pub const YAML_EXTENSION: &str = "yaml";

/// Permissions for directories created under results and expected trees
pub const DEFAULT_DIR_WRITE_PERMISSIONS: u32 = 0o760;

/// Permissions for resource files written by the splitter
pub const DEFAULT_FILE_WRITE_PERMISSIONS: u32 = 0o644;

/// Environment variable switching the run into baseline regeneration
pub const REGENERATE_ENV: &str = "HELM_UNIT_REGENERATE_EXPECTED";

/// Optional per test case configuration file
pub const TEST_CASE_FILE: &str = "testcase.yml";

/// Directory holding the values files of a test case
pub const VALUES_DIR: &str = "values";

/// Directory holding the expected resources of a test case
pub const EXPECTED_DIR: &str = "expected";

/// Directory, below the test case output directory, receiving split resources
pub const RESULTS_DIR: &str = "results";

/// Prefix of the temporary output root
pub const OUTPUT_DIR_PREFIX: &str = "helm-test-";

pub const DEFAULT_HELM_BINARY: &str = "helm";
pub const DEFAULT_RELEASE_NAME: &str = "myrel";
pub const DEFAULT_NAMESPACE: &str = "jx";
