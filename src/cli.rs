//! Command-line interface implementation for chart-golden.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::{HelmOptions, RunOptions};
use crate::constants::{DEFAULT_HELM_BINARY, DEFAULT_NAMESPACE, DEFAULT_RELEASE_NAME};

/// Command-line arguments structure for chart-golden.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "chart-golden: golden-file unit tests for Helm charts",
    long_about = None
)]
pub struct Args {
    /// Path to the chart directory
    #[arg(value_name = "CHART")]
    pub chart: PathBuf,

    /// Directory containing one sub-directory per test case
    #[arg(value_name = "TESTS_DIR", default_value = "tests")]
    pub tests_dir: PathBuf,

    /// Helm binary to invoke
    #[arg(long, value_name = "BIN", default_value = DEFAULT_HELM_BINARY)]
    pub helm: PathBuf,

    /// Release name passed to helm template
    #[arg(long, default_value = DEFAULT_RELEASE_NAME)]
    pub release: String,

    /// Namespace passed to helm template
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Copy the generated resources over the expected directories instead of
    /// comparing them. Also enabled by HELM_UNIT_REGENERATE_EXPECTED=true.
    #[arg(long)]
    pub regenerate: bool,

    /// Stop comparing a test case at its first mismatching file
    #[arg(long)]
    pub fail_fast: bool,

    /// Keep the generated output directory instead of removing it
    #[arg(long)]
    pub keep_output: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merges the flags with the options read from the environment.
    pub fn run_options(&self, from_env: RunOptions) -> RunOptions {
        RunOptions {
            regenerate: self.regenerate || from_env.regenerate,
            fail_fast: self.fail_fast || from_env.fail_fast,
        }
    }

    pub fn helm_options(&self) -> HelmOptions {
        HelmOptions {
            binary: self.helm.clone(),
            release: self.release.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
