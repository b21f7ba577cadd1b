//! The state behind one editor window: text, backing file, dirty flag.
//!
//! Saving is a plain overwrite of the backing file with the text exactly as
//! held. No temp file, no backup.

use lim_common::DISPLAY_NAME;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document has no file yet; save it under a name first")]
    NoPath,
    #[error("selection {start}..{end} is outside the document ({len} characters)")]
    InvalidSelection { start: usize, end: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Document {
    /// An empty, untitled document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` (UTF-8) into a clean document bound to that file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), chars = text.chars().count(), "document.opened");
        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when there is nothing but whitespace to lose.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Base name of the backing file, or `Untitled`.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Window title.
    ///
    /// ```
    /// use lim_editor::Document;
    ///
    /// assert_eq!(Document::new().title(), "Lim - Untitled");
    /// ```
    pub fn title(&self) -> String {
        format!("{DISPLAY_NAME} - {}", self.display_name())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Characters `range.start..range.end` (character offsets, not bytes).
    pub fn select(&self, range: Range<usize>) -> Result<&str, DocumentError> {
        let len = self.text.chars().count();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::InvalidSelection {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        Ok(&self.text[start..end])
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Append `block` as a new paragraph, separated by a newline when the
    /// document already has content that does not end in one.
    ///
    /// ```
    /// use lim_editor::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.append_block("first");
    /// doc.append_block("second");
    /// assert_eq!(doc.text(), "first\nsecond");
    /// ```
    pub fn append_block(&mut self, block: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(block);
        self.dirty = true;
    }

    /// Overwrite the backing file.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        self.write_to(&path)
    }

    /// Write to `path` and make it the backing file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref().to_path_buf();
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<(), DocumentError> {
        fs::write(path, &self.text).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.dirty = false;
        tracing::info!(path = %path.display(), bytes = self.text.len(), "document.saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_clean_and_untitled() {
        let doc = Document::new();
        assert!(doc.is_blank());
        assert!(!doc.is_dirty());
        assert!(doc.path().is_none());
        assert_eq!(doc.display_name(), "Untitled");
    }

    #[test]
    fn edits_mark_dirty() {
        let mut doc = Document::new();
        doc.set_text("hello");
        assert!(doc.is_dirty());
        assert!(!doc.is_blank());
    }

    #[test]
    fn selection_uses_character_offsets() {
        let mut doc = Document::new();
        doc.set_text("café Cat");
        assert_eq!(doc.select(5..8).unwrap(), "Cat");
        assert_eq!(doc.select(0..4).unwrap(), "café");
        assert_eq!(doc.select(8..8).unwrap(), "");
    }

    #[test]
    fn selection_out_of_range_is_rejected() {
        let mut doc = Document::new();
        doc.set_text("abc");
        assert!(matches!(
            doc.select(1..4),
            Err(DocumentError::InvalidSelection { len: 3, .. })
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = doc.select(2..1);
        assert!(reversed.is_err());
    }

    #[test]
    fn append_does_not_double_newlines() {
        let mut doc = Document::new();
        doc.set_text("line\n");
        doc.append_block("block");
        assert_eq!(doc.text(), "line\nblock");
    }

    #[test]
    fn save_without_path_fails() {
        let mut doc = Document::new();
        doc.set_text("x");
        assert!(matches!(doc.save(), Err(DocumentError::NoPath)));
        assert!(doc.is_dirty());
    }
}
