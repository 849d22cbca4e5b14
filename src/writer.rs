//! Writing split resources into a results tree.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::{DEFAULT_DIR_WRITE_PERMISSIONS, DEFAULT_FILE_WRITE_PERMISSIONS};
use crate::document::{Document, ResourceIdentity};
use crate::error::{Error, Result};
use crate::splitter::{Segment, Splitter};

/// Creates a directory and its parents with the default directory permissions.
pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DEFAULT_DIR_WRITE_PERMISSIONS);
    }
    builder
        .create(path)
        .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    let to_error = |source| Error::WriteError { path: path.to_path_buf(), source };
    fs::write(path, content).map_err(to_error)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(DEFAULT_FILE_WRITE_PERMISSIONS))
            .map_err(to_error)?;
    }
    Ok(())
}

/// Writes each resource of a stream to `<root>/[<apiVersion>/]<kind>/<name>.yaml`.
///
/// Two resources with the same identity end up in the same file, the last one
/// written wins.
pub struct ResourceWriter {
    results_root: PathBuf,
}

impl ResourceWriter {
    pub fn new<P: Into<PathBuf>>(results_root: P) -> Self {
        Self { results_root: results_root.into() }
    }

    pub fn results_root(&self) -> &Path {
        &self.results_root
    }

    pub fn output_path(&self, identity: &ResourceIdentity) -> PathBuf {
        self.results_root.join(identity.relative_path())
    }

    /// Persists a document under the path derived from its identity.
    ///
    /// The segment text is written as it was rendered, so key order, comments
    /// and formatting are kept for the byte comparison against the baseline.
    pub fn write(&self, document: &Document, identity: &ResourceIdentity) -> Result<PathBuf> {
        let path = self.output_path(identity);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write_file(&path, document.segment.content.as_bytes())?;
        debug!("Wrote {} to {}", identity, path.display());
        Ok(path)
    }

    /// Parses and writes one segment, returning `None` for an empty document.
    pub fn write_segment(&self, segment: Segment) -> Result<Option<PathBuf>> {
        match Document::parse(segment)? {
            Some(document) => {
                let identity = document.identity()?;
                self.write(&document, &identity).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Splits a stream and writes every resource in it.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Written files, in stream order
    ///
    /// # Errors
    /// Stops at the first unreadable stream, invalid document, resource
    /// without name or kind, or failed write. Files written before the error
    /// are left in place.
    pub fn write_stream<R: BufRead>(&self, reader: R) -> Result<Vec<PathBuf>> {
        create_dir_all(&self.results_root)?;
        let mut written = Vec::new();
        for segment in Splitter::new(reader) {
            if let Some(path) = self.write_segment(segment?)? {
                written.push(path);
            }
        }
        debug!("Split {} resources into {}", written.len(), self.results_root.display());
        Ok(written)
    }
}
