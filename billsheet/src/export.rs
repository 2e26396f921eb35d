//! Delivery of saved documents.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::layout::Document;

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    /// Delivered to a sink.
    Saved { file_name: String, location: PathBuf },
    /// Rendered for display only.
    Preview(Document),
}

/// Somewhere a saved document goes.
pub trait DocumentSink {
    /// Store `document` under its file name. Must not leave a partial
    /// file behind on failure.
    fn deliver(&mut self, document: &Document) -> io::Result<PathBuf>;
}

/// Writes documents into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

impl DocumentSink for DirectorySink {
    fn deliver(&mut self, document: &Document) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(&document.file_name);
        let tmp = self.dir.join(format!(".{}.tmp", document.file_name));

        // Atomic write: tmp file first, then rename over the target.
        if let Err(e) = fs::write(&tmp, &document.bytes).and_then(|()| fs::rename(&tmp, &target)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(target)
    }
}

/// Keeps delivered documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub documents: Vec<Document>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }
}

impl DocumentSink for MemorySink {
    fn deliver(&mut self, document: &Document) -> io::Result<PathBuf> {
        self.documents.push(document.clone());
        Ok(PathBuf::from(&document.file_name))
    }
}
