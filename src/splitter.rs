//! Splitting of a multi-document YAML stream into individual documents.
//!
//! The stream produced by `helm template` is a concatenation of resources
//! separated by a line containing exactly `---`. Templates frequently render
//! to nothing but a `# Source:` comment, so every segment is checked on its
//! own and segments holding only blank lines and comments are dropped.

use std::io::{BufRead, Lines};

use log::debug;

use crate::constants::{COMMENT_MARKER, RESOURCE_SEPARATOR};
use crate::error::Result;

/// A run of lines found between two separators of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of the segment in the stream, counting discarded segments too.
    pub index: usize,
    /// Lines of the segment, each terminated by `\n`.
    pub content: String,
}

impl Segment {
    /// Returns true if the segment has nothing but whitespace and comments.
    pub fn is_discardable(&self) -> bool {
        is_whitespace_or_comments(&self.content)
    }
}

/// Returns true if the data is empty, whitespace or comments only.
pub fn is_whitespace_or_comments(data: &str) -> bool {
    data.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with(COMMENT_MARKER)
    })
}

/// Lazy iterator over the non-discardable segments of a stream.
///
/// Reading stops at the first I/O error, which is yielded once.
pub struct Splitter<R> {
    lines: Lines<R>,
    buffer: String,
    index: usize,
    done: bool,
}

impl<R: BufRead> Splitter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            buffer: String::new(),
            index: 0,
            done: false,
        }
    }

    /// Closes the current buffer as a segment, returning it unless it is discardable.
    fn take_segment(&mut self) -> Option<Segment> {
        let segment = Segment {
            index: self.index,
            content: std::mem::take(&mut self.buffer),
        };
        self.index += 1;
        if segment.is_discardable() {
            debug!("Discarding empty or comment only document {}", segment.index);
            None
        } else {
            Some(segment)
        }
    }
}

impl<R: BufRead> Iterator for Splitter<R> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.lines.next() {
                Some(Ok(line)) if line == RESOURCE_SEPARATOR => {
                    if let Some(segment) = self.take_segment() {
                        return Some(Ok(segment));
                    }
                }
                Some(Ok(line)) => {
                    self.buffer.push_str(&line);
                    self.buffer.push('\n');
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    if !self.buffer.is_empty() {
                        return self.take_segment().map(Ok);
                    }
                }
            }
        }
        None
    }
}

/// Splits a whole stream, failing if it cannot be read to the end.
pub fn split<R: BufRead>(reader: R) -> Result<Vec<Segment>> {
    Splitter::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_or_comments() {
        assert!(is_whitespace_or_comments(""));
        assert!(is_whitespace_or_comments("\n   \n"));
        assert!(is_whitespace_or_comments("# Source: chart/templates/a.yaml\n  # indented\n"));
        assert!(!is_whitespace_or_comments("# Source: x\nkind: Service\n"));
        assert!(!is_whitespace_or_comments("a: 1 # trailing comment\n"));
    }

    #[test]
    fn test_indices_count_discarded_segments() {
        let stream = "---\n# only a comment\n---\nkind: A\n";
        let segments = split(stream.as_bytes()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 2);
    }
}
