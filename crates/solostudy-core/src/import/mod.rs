//! Importing subjects from files.
//!
//! Files are routed by extension. `.json` is a subject backup; anything else
//! needs a [`TextDecoder`] that turns the bytes into plain text, which is then
//! scanned for course codes. Plain text formats are decoded out of the box;
//! PDF and Word documents need a decoder registered by the embedding
//! application.

mod backup;
mod extract;

pub use backup::{export_backup, parse_backup};
pub use extract::{extract_course_codes, scan_course_codes};

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CoreError, PlanError};
use crate::subject::Subject;

/// Turns a document's bytes into plain text.
pub trait TextDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, CoreError>;
}

/// UTF-8 text passthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextDecoder;

impl TextDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, CoreError> {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            PlanError::UnsupportedTextSource("file is not valid UTF-8 text".into()).into()
        })
    }
}

/// What an imported file contained.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
    /// A subject backup to restore wholesale.
    Backup(Vec<Subject>),
    /// Decoded document text, ready for course-code extraction.
    Text(String),
}

/// Extension-based import router.
pub struct Importer {
    decoders: HashMap<String, Box<dyn TextDecoder>>,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

impl Importer {
    /// Router with plain-text decoders for `txt`, `text`, `md` and `csv`.
    pub fn new() -> Self {
        let mut importer = Self {
            decoders: HashMap::new(),
        };
        for ext in ["txt", "text", "md", "csv"] {
            importer.register(ext, PlainTextDecoder);
        }
        importer
    }

    /// Route `extension` (without the dot, any case) through `decoder`.
    pub fn register(&mut self, extension: &str, decoder: impl TextDecoder + 'static) {
        self.decoders
            .insert(extension.to_ascii_lowercase(), Box::new(decoder));
    }

    pub fn supports(&self, extension: &str) -> bool {
        let ext = extension.to_ascii_lowercase();
        ext == "json" || self.decoders.contains_key(&ext)
    }

    /// Read and route a file.
    pub fn read(&self, path: &Path) -> Result<ImportPayload, CoreError> {
        let bytes = std::fs::read(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.route(extension, &bytes)
    }

    /// Route already-loaded bytes by extension.
    ///
    /// # Errors
    ///
    /// `CorruptBackup` for a bad `.json` payload; `UnsupportedTextSource` for
    /// an unknown extension or a decoder that produced only whitespace.
    pub fn route(&self, extension: &str, bytes: &[u8]) -> Result<ImportPayload, CoreError> {
        let ext = extension.to_ascii_lowercase();
        if ext == "json" {
            let json = String::from_utf8_lossy(bytes);
            return Ok(ImportPayload::Backup(parse_backup(&json)?));
        }

        let decoder = self.decoders.get(&ext).ok_or_else(|| {
            let shown = if ext.is_empty() { "(none)".to_string() } else { format!(".{ext}") };
            PlanError::UnsupportedTextSource(format!("no decoder for {shown} files"))
        })?;

        let text = decoder.decode(bytes)?;
        if text.trim().is_empty() {
            return Err(
                PlanError::UnsupportedTextSource(format!("the .{ext} file contained no text")).into(),
            );
        }
        tracing::debug!(extension = %ext, chars = text.len(), "decoded import text");
        Ok(ImportPayload::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpperDecoder;

    impl TextDecoder for UpperDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<String, CoreError> {
            Ok(String::from_utf8_lossy(bytes).to_uppercase())
        }
    }

    fn unsupported(result: Result<ImportPayload, CoreError>) -> bool {
        matches!(
            result,
            Err(CoreError::Plan(PlanError::UnsupportedTextSource(_)))
        )
    }

    #[test]
    fn routes_json_to_backup() {
        let payload = Importer::new()
            .route("JSON", br#"[{"id":"1","name":"MTH101","priority":"Low"}]"#)
            .unwrap();
        assert!(matches!(payload, ImportPayload::Backup(ref s) if s.len() == 1));
    }

    #[test]
    fn corrupt_json_is_reported() {
        let result = Importer::new().route("json", b"{}");
        assert!(matches!(
            result,
            Err(CoreError::Plan(PlanError::CorruptBackup(_)))
        ));
    }

    #[test]
    fn routes_text_through_decoder() {
        let payload = Importer::new().route("txt", b"MTH101 notes").unwrap();
        assert_eq!(payload, ImportPayload::Text("MTH101 notes".into()));
    }

    #[test]
    fn pdf_needs_a_registered_decoder() {
        let mut importer = Importer::new();
        assert!(!importer.supports("pdf"));
        assert!(unsupported(importer.route("pdf", b"%PDF-1.7")));

        importer.register("PDF", UpperDecoder);
        assert!(importer.supports("pdf"));
        let payload = importer.route("pdf", b"cos 101").unwrap();
        assert_eq!(payload, ImportPayload::Text("COS 101".into()));
    }

    #[test]
    fn blank_or_binary_text_is_unsupported() {
        let importer = Importer::new();
        assert!(unsupported(importer.route("txt", b"  \n\t ")));
        assert!(unsupported(importer.route("txt", &[0xff, 0xfe, 0x00])));
        assert!(unsupported(importer.route("", b"MTH101")));
    }

    #[test]
    fn reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.TXT");
        std::fs::write(&path, "Registered: GST 111").unwrap();
        let payload = Importer::new().read(&path).unwrap();
        assert_eq!(payload, ImportPayload::Text("Registered: GST 111".into()));
    }
}
