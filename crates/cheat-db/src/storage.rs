//! Canonical JSON reader/writer for per-title documents.
//!
//! Documents are written with 4-space indentation, top-level keys sorted and
//! non-ASCII text kept literal.

use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::sheet::decode_lossy;
use crate::types::{CheatDbResult, TitleDocument};

const INDENT: &[u8] = b"    ";

/// Writer for canonical title documents.
pub struct DocumentWriter;

/// Reader for canonical title documents.
pub struct DocumentReader;

impl DocumentWriter {
    /// Write a document to a file, creating parent directories.
    pub fn write_to_file(doc: &TitleDocument, path: &Path) -> CheatDbResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut buf = Vec::new();
        Self::write_to(doc, &mut buf)?;
        std::fs::write(path, buf)?;
        Ok(())
    }

    /// Write a document to any writer.
    pub fn write_to<W: Write>(doc: &TitleDocument, writer: &mut W) -> CheatDbResult<()> {
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        doc.serialize(&mut ser)?;
        Ok(())
    }

    /// Render a document to a string.
    pub fn to_string(doc: &TitleDocument) -> CheatDbResult<String> {
        let mut buf = Vec::new();
        Self::write_to(doc, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl DocumentReader {
    /// Read a document from a file. Invalid UTF-8 sequences are dropped.
    pub fn read_from_file(path: &Path) -> CheatDbResult<TitleDocument> {
        let bytes = std::fs::read(path)?;
        Self::read_from_str(&decode_lossy(&bytes))
    }

    pub fn read_from_str(text: &str) -> CheatDbResult<TitleDocument> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a previously written document.
    ///
    /// A missing file or one that does not parse as a document yields
    /// `None`; any other I/O failure is returned.
    pub fn load_prior(path: &Path) -> CheatDbResult<Option<TitleDocument>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match Self::read_from_str(&decode_lossy(&bytes)) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable document {}: {e}", path.display());
                Ok(None)
            }
        }
    }
}
