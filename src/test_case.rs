//! Discovery and execution of chart test cases.
//!
//! A tests directory holds one sub-directory per test case:
//!
//! ```text
//! tests/
//!   defaults/
//!     testcase.yml      optional, see TestCaseConfig
//!     values/*.yaml     values files passed to helm, sorted by name
//!     expected/         expected resources, [<apiVersion>/]<kind>/<name>.yaml
//! ```

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::TempDir;

use crate::compare::{compare_trees, CompareOptions, Comparison};
use crate::config::{HelmOptions, RunOptions, TestCaseConfig};
use crate::constants::{EXPECTED_DIR, OUTPUT_DIR_PREFIX, RESULTS_DIR, VALUES_DIR};
use crate::error::{Error, Result};
use crate::helm::{TemplateRequest, TemplateRunner};
use crate::regenerate::regenerate;
use crate::writer::ResourceWriter;

/// Resolves the chart path to an absolute path and checks it is a directory.
pub fn assert_chart_path_exists<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let chart = fs::canonicalize(path).map_err(|_| Error::ChartDoesNotExistError {
        chart: path.display().to_string(),
    })?;
    if !chart.is_dir() {
        return Err(Error::ChartDoesNotExistError { chart: chart.display().to_string() });
    }
    Ok(chart)
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub chart: PathBuf,
    pub values_dir: PathBuf,
    pub expected_dir: PathBuf,
    pub out_dir: PathBuf,
    pub config: TestCaseConfig,
}

/// What running a test case produced.
#[derive(Debug)]
pub enum Outcome {
    /// The expected directory was overwritten with this many files.
    Regenerated(usize),
    Compared(Comparison),
}

impl TestCase {
    pub fn results_dir(&self) -> PathBuf {
        self.out_dir.join(RESULTS_DIR)
    }

    /// Renders the chart, splits the resources into the results directory and
    /// then either compares them with the expected directory or regenerates it.
    ///
    /// # Errors
    /// Any failure before the comparison aborts the test case. Differences
    /// found by the comparison are part of the returned [`Outcome`].
    pub fn run(
        &self,
        runner: &dyn TemplateRunner,
        helm: &HelmOptions,
        options: &RunOptions,
    ) -> Result<Outcome> {
        let request = TemplateRequest::new(&self.chart, &self.values_dir, helm)?;
        let stream = runner.template(&request)?;

        let writer = ResourceWriter::new(self.results_dir());
        let written = writer.write_stream(Cursor::new(stream))?;
        info!("Test {} generated {} resources", self.name, written.len());

        if options.regenerate {
            info!(
                "Regenerating the expected files for test {} into dir {}",
                self.name,
                self.expected_dir.display()
            );
            let count = regenerate(writer.results_root(), &self.expected_dir)?;
            return Ok(Outcome::Regenerated(count));
        }

        let compare_options = CompareOptions {
            fail_on_extra: self.config.fail_on_extra_resources,
            fail_fast: options.fail_fast,
        };
        let comparison =
            compare_trees(&self.expected_dir, writer.results_root(), compare_options)?;

        if self.config.expect_fail && comparison.has_extras() {
            let extras: Vec<String> =
                comparison.extras().map(|p| p.display().to_string()).collect();
            info!(
                "As expected test case {} failed due to extra resources being generated \
                 that were not in the expected directory: {:?}",
                self.name, extras
            );
        }
        Ok(Outcome::Compared(comparison))
    }
}

/// Result of one test case of a run.
#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub expect_fail: bool,
    pub outcome: Result<Outcome>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        match &self.outcome {
            Ok(Outcome::Regenerated(_)) => true,
            Ok(Outcome::Compared(comparison)) => comparison.is_success(self.expect_fail),
            Err(_) => false,
        }
    }

    /// One line status, as printed by the command line.
    pub fn status(&self) -> String {
        match &self.outcome {
            Ok(Outcome::Regenerated(count)) => format!("regenerated {} files", count),
            Ok(Outcome::Compared(comparison)) if self.passed() => {
                format!("ok ({} files verified)", comparison.verified_count())
            }
            Ok(Outcome::Compared(_)) => "FAILED".to_string(),
            Err(_) => "aborted".to_string(),
        }
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "test {} ... {}", self.name, self.status())?;
        match &self.outcome {
            Ok(Outcome::Compared(comparison)) if !self.passed() => write!(f, "{}", comparison),
            Err(e) => writeln!(f, "{}", e),
            _ => Ok(()),
        }
    }
}

/// Runs the test cases of a chart inside a temporary output root.
pub struct UnitTester {
    out_dir: TempDir,
}

impl UnitTester {
    /// Creates the temporary output root, removed when the tester is dropped.
    pub fn new() -> Result<Self> {
        let out_dir = tempfile::Builder::new().prefix(OUTPUT_DIR_PREFIX).tempdir()?;
        info!("Writing generated helm templates to {}", out_dir.path().display());
        Ok(Self { out_dir })
    }

    pub fn out_dir(&self) -> &Path {
        self.out_dir.path()
    }

    /// Keeps the output root on disk and returns its path.
    pub fn keep(self) -> PathBuf {
        self.out_dir.keep()
    }

    /// Finds the test cases in `test_dir`, one per sub-directory, sorted by name.
    pub fn load_tests<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        chart: P,
        test_dir: Q,
    ) -> Result<Vec<TestCase>> {
        let chart = chart.as_ref();
        let test_dir = test_dir.as_ref();
        let entries = fs::read_dir(test_dir).map_err(|e| {
            Error::ConfigError(format!("could not read dir {}: {}", test_dir.display(), e))
        })?;

        let mut tests = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let case_dir = entry.path();
            tests.push(TestCase {
                config: TestCaseConfig::load(&case_dir)?,
                chart: chart.to_path_buf(),
                values_dir: case_dir.join(VALUES_DIR),
                expected_dir: case_dir.join(EXPECTED_DIR),
                out_dir: self.out_dir().join(&name),
                name,
            });
        }
        tests.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tests)
    }

    /// Runs the test cases one after the other.
    ///
    /// An error in one test case is recorded in its report and does not stop
    /// the remaining ones.
    pub fn run_tests(
        &self,
        runner: &dyn TemplateRunner,
        tests: &[TestCase],
        helm: &HelmOptions,
        options: &RunOptions,
    ) -> Vec<CaseReport> {
        tests
            .iter()
            .map(|test| {
                let outcome = test.run(runner, helm, options);
                if let Err(e) = &outcome {
                    warn!("Test {} aborted: {}", test.name, e);
                }
                CaseReport {
                    name: test.name.clone(),
                    expect_fail: test.config.expect_fail,
                    outcome,
                }
            })
            .collect()
    }
}

/// Loads and runs every test case of `test_dir` against `chart`.
pub fn run_tests<P: AsRef<Path>, Q: AsRef<Path>>(
    runner: &dyn TemplateRunner,
    chart: P,
    test_dir: Q,
    helm: &HelmOptions,
    options: &RunOptions,
) -> Result<Vec<CaseReport>> {
    let chart = assert_chart_path_exists(chart)?;
    let tester = UnitTester::new()?;
    let tests = tester.load_tests(&chart, test_dir)?;
    Ok(tester.run_tests(runner, &tests, helm, options))
}
