//! Parsing of split segments and extraction of the fields identifying a resource.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde_yaml::Value;

use crate::constants::YAML_EXTENSION;
use crate::error::{Error, Result};
use crate::splitter::Segment;

/// A segment that parsed to a non-empty YAML mapping.
#[derive(Debug, Clone)]
pub struct Document {
    pub segment: Segment,
    pub value: Value,
}

impl Document {
    /// Parses a segment, returning `None` for documents without any top level key.
    ///
    /// # Errors
    /// * `Error::InvalidDocument` if the segment is not valid YAML
    /// * `Error::NotAMapping` if the segment is a scalar or a sequence
    pub fn parse(segment: Segment) -> Result<Option<Self>> {
        let value: Value = serde_yaml::from_str(&segment.content).map_err(|source| {
            Error::InvalidDocument {
                index: segment.index,
                content: segment.content.clone(),
                source,
            }
        })?;

        let has_content = match &value {
            Value::Null => false,
            Value::Mapping(mapping) => !mapping.is_empty(),
            _ => {
                return Err(Error::NotAMapping { index: segment.index, content: segment.content })
            }
        };
        Ok(has_content.then_some(Self { segment, value }))
    }

    /// Looks up a string value by its key path, see [`extract_str`].
    pub fn get_str(&self, keys: &[&str]) -> Option<&str> {
        extract_str(&self.value, keys)
    }

    pub fn identity(&self) -> Result<ResourceIdentity> {
        ResourceIdentity::from_document(self)
    }
}

/// Walks nested mappings one key at a time.
///
/// Returns `None` as soon as a key is absent or an intermediate value is not a
/// mapping. An empty path returns the value itself.
pub fn extract<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.as_mapping()?.get(*key))
}

/// Like [`extract`], but only a string leaf counts as present.
pub fn extract_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    extract(value, keys)?.as_str()
}

/// Returns true if every component of `value` is a plain name, so that joining
/// it onto a directory stays below that directory.
fn is_relative_to_root(value: &str) -> bool {
    Path::new(value).components().all(|c| matches!(c, Component::Normal(_)))
}

/// The fields naming the file a resource is written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub api_version: Option<String>,
    pub kind: String,
    pub name: String,
}

impl ResourceIdentity {
    /// Reads `kind`, `metadata.name` and the optional `apiVersion` of a document.
    ///
    /// Empty strings are treated like missing values.
    ///
    /// # Errors
    /// * `Error::MissingName` if `metadata.name` is absent
    /// * `Error::MissingKind` if `kind` is absent
    /// * `Error::InvalidIdentity` if a field would place the file outside the results root
    pub fn from_document(document: &Document) -> Result<Self> {
        let non_empty = |keys: &[&str]| {
            document.get_str(keys).filter(|s| !s.is_empty()).map(str::to_string)
        };
        let segment = &document.segment;

        let name = non_empty(&["metadata", "name"]).ok_or_else(|| Error::MissingName {
            index: segment.index,
            content: segment.content.clone(),
        })?;
        let kind = non_empty(&["kind"]).ok_or_else(|| Error::MissingKind {
            index: segment.index,
            content: segment.content.clone(),
        })?;
        let api_version = non_empty(&["apiVersion"]);

        let fields = [
            ("apiVersion", api_version.as_deref()),
            ("kind", Some(kind.as_str())),
            ("name", Some(name.as_str())),
        ];
        for (field, value) in fields {
            match value {
                Some(value) if !is_relative_to_root(value) => {
                    return Err(Error::InvalidIdentity {
                        index: segment.index,
                        field,
                        value: value.to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok(Self { api_version, kind, name })
    }

    /// Path of the resource file relative to a results root:
    /// `[<apiVersion>/]<kind>/<name>.yaml`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        if let Some(api_version) = &self.api_version {
            path.push(api_version);
        }
        path.push(&self.kind);
        path.push(format!("{}.{}", self.name, YAML_EXTENSION));
        path
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.api_version {
            Some(api_version) => write!(f, "{}/{} '{}'", api_version, self.kind, self.name),
            None => write!(f, "{} '{}'", self.kind, self.name),
        }
    }
}
