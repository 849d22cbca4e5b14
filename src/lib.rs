//! chart-golden is a golden-file test harness for Helm charts.
//! It renders a chart with the values of each test case, splits the rendered
//! stream into one file per resource and compares the result with a checked-in
//! expected directory, or regenerates that directory on demand.

/// Command-line interface module for the chart-golden application
pub mod cli;

/// Byte comparison of an expected tree against a results tree
pub mod compare;

/// Run options and `testcase.yml` handling
pub mod config;

pub mod constants;

/// Parsing of split documents and resource identity
pub mod document;

/// Error types and handling for the chart-golden application
pub mod error;

/// Invocation of `helm template`
pub mod helm;

pub mod logger;

/// Overwriting an expected tree with the output of a run
pub mod regenerate;

/// Splitting of a multi-document YAML stream on `---` lines
pub mod splitter;

/// Test case discovery and the per test case pipeline
pub mod test_case;

/// Writing resources to `[<apiVersion>/]<kind>/<name>.yaml`
pub mod writer;
