//! Regeneration of an expected tree from the resources of a run.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::compare::yaml_files;
use crate::error::{Error, Result};
use crate::writer::create_dir_all;

/// Copies a file, creating the parent directory of the destination.
///
/// The destination receives the permissions of the source.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| Error::WriteError { path: to.to_path_buf(), source })
}

/// Copies every `.yaml` file of the actual tree over the expected tree.
///
/// Files of the expected tree without a counterpart in the actual tree are
/// left untouched.
///
/// # Returns
/// * `Result<usize>` - Number of files copied
pub fn regenerate<P: AsRef<Path>, Q: AsRef<Path>>(
    actual_root: P,
    expected_root: Q,
) -> Result<usize> {
    let actual_root = actual_root.as_ref();
    let expected_root = expected_root.as_ref();
    info!("Regenerating the expected files into {}", expected_root.display());

    let mut count = 0;
    for relative in yaml_files(actual_root)? {
        let expected_file = expected_root.join(&relative);
        debug!("Regenerating {}", expected_file.display());
        copy_file(&actual_root.join(&relative), &expected_file)?;
        count += 1;
    }

    info!("Regenerated {} expected files into {}", count, expected_root.display());
    Ok(count)
}
