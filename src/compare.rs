//! Comparison of a results tree against an expected tree.
//!
//! Every `.yaml` file of the expected tree must exist in the results tree with
//! byte-identical content. Files are compared textually; reordered keys or
//! changed whitespace count as a mismatch.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use similar::TextDiff;
use walkdir::WalkDir;

use crate::constants::YAML_EXTENSION;
use crate::error::Result;

/// Outcome for a single relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match,
    /// Both files exist but differ; carries a unified diff from expected to actual.
    ContentMismatch { diff: String },
    MissingInActual,
    ExtraInActual,
}

impl Verdict {
    /// Returns true for verdicts failing a test case regardless of its mode.
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::ContentMismatch { .. } | Verdict::MissingInActual)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompareOptions {
    /// Also report files present only in the actual tree.
    pub fail_on_extra: bool,
    /// Stop walking the expected tree at the first mismatching or missing file.
    pub fail_fast: bool,
}

/// Findings of one comparison, keyed by path relative to the tree roots and
/// ordered by that path.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub expected_root: PathBuf,
    pub actual_root: PathBuf,
    pub entries: IndexMap<PathBuf, Verdict>,
}

impl Comparison {
    /// Number of expected files that were checked.
    pub fn verified_count(&self) -> usize {
        self.entries.values().filter(|v| **v != Verdict::ExtraInActual).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &Verdict)> {
        self.entries.iter().filter(|(_, v)| v.is_failure())
    }

    pub fn extras(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.iter().filter(|(_, v)| **v == Verdict::ExtraInActual).map(|(p, _)| p)
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn has_extras(&self) -> bool {
        self.extras().next().is_some()
    }

    /// A comparison passes without failures, and without extras unless they are expected.
    pub fn is_success(&self, expect_fail: bool) -> bool {
        !self.has_failures() && (expect_fail || !self.has_extras())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, verdict) in &self.entries {
            match verdict {
                Verdict::Match => {}
                Verdict::ContentMismatch { diff } => {
                    writeln!(
                        f,
                        "generated: {} does not match expected: {}",
                        self.actual_root.join(path).display(),
                        self.expected_root.join(path).display()
                    )?;
                    writeln!(f, "{}", diff)?;
                }
                Verdict::MissingInActual => writeln!(
                    f,
                    "missing: {} was not generated, expected by {}",
                    self.actual_root.join(path).display(),
                    self.expected_root.join(path).display()
                )?,
                Verdict::ExtraInActual => writeln!(
                    f,
                    "extra: {} is not in the expected directory {}",
                    path.display(),
                    self.expected_root.display()
                )?,
            }
        }
        Ok(())
    }
}

/// Relative paths of all `.yaml` files below a root, in walk order.
pub(crate) fn yaml_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_yaml = path.extension().is_some_and(|ext| ext == YAML_EXTENSION);
        if entry.file_type().is_dir() || !is_yaml {
            continue;
        }
        // Entries yielded by the walk always live below its root.
        if let Ok(relative) = path.strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Renders a unified diff between the expected and actual content of a file.
pub fn render_diff(
    expected: &[u8],
    actual: &[u8],
    expected_name: &str,
    actual_name: &str,
) -> String {
    let expected = String::from_utf8_lossy(expected);
    let actual = String::from_utf8_lossy(actual);
    TextDiff::from_lines(&*expected, &*actual)
        .unified_diff()
        .context_radius(3)
        .header(expected_name, actual_name)
        .to_string()
}

fn compare_file(expected_file: &Path, actual_file: &Path) -> Result<Verdict> {
    if !actual_file.is_file() {
        return Ok(Verdict::MissingInActual);
    }
    let expected = fs::read(expected_file)?;
    let actual = fs::read(actual_file)?;
    if expected == actual {
        return Ok(Verdict::Match);
    }
    let diff = render_diff(
        &expected,
        &actual,
        &expected_file.display().to_string(),
        &actual_file.display().to_string(),
    );
    Ok(Verdict::ContentMismatch { diff })
}

/// Compares the expected tree against the actual tree.
///
/// # Arguments
/// * `expected_root` - Baseline directory
/// * `actual_root` - Directory the resources of this run were written to
/// * `options` - Whether extra files are reported and whether to stop early
///
/// # Errors
/// Fails only when a tree or file cannot be read. Differences between the
/// trees are returned as [`Verdict`]s.
pub fn compare_trees<P: AsRef<Path>, Q: AsRef<Path>>(
    expected_root: P,
    actual_root: Q,
    options: CompareOptions,
) -> Result<Comparison> {
    let expected_root = expected_root.as_ref();
    let actual_root = actual_root.as_ref();
    let mut entries = IndexMap::new();
    let mut visited = HashSet::new();
    let mut stopped = false;

    for relative in yaml_files(expected_root)? {
        let expected_file = expected_root.join(&relative);
        debug!("Testing expected file {}", expected_file.display());
        let verdict = compare_file(&expected_file, &actual_root.join(&relative))?;
        let stop = options.fail_fast && verdict.is_failure();
        visited.insert(relative.clone());
        entries.insert(relative, verdict);
        if stop {
            stopped = true;
            break;
        }
    }
    info!(
        "Verified {} files against the expected YAML files in {}",
        entries.len(),
        expected_root.display()
    );

    // An interrupted walk leaves expected files unvisited, so extras cannot be told apart.
    if options.fail_on_extra && !stopped {
        for relative in yaml_files(actual_root)? {
            if !visited.contains(&relative) {
                entries.insert(relative, Verdict::ExtraInActual);
            }
        }
    }

    entries.sort_keys();
    Ok(Comparison {
        expected_root: expected_root.to_path_buf(),
        actual_root: actual_root.to_path_buf(),
        entries,
    })
}
