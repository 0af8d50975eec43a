//! Text extraction from uploaded resume files.
//!
//! Extraction is best-effort: an empty string means nothing usable was found, and the
//! normalizer drops that document. Binary formats (PDF, images) are handled upstream.


use tracing::{debug, warn};

/// Turns uploaded file bytes into plain text.
pub trait TextExtractor: Send + Sync {
    /// Returns the extracted text, or an empty string on failure.
    fn extract(&self, bytes: &[u8], filename: &str) -> String;
}

/// Accepts UTF-8 text documents.
///
/// A leading byte-order mark is stripped and NUL bytes are removed. Anything that is not
/// valid UTF-8 counts as an extraction failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

const UTF8_BOM: &str = "\u{feff}";

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], filename: &str) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => {
                let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
                let cleaned: String = text.chars().filter(|c| *c != '\0').collect();
                debug!(filename = %filename, bytes = bytes.len(), "Extracted plain text");
                cleaned
            }
            Err(e) => {
                warn!(
                    filename = %filename,
                    error = %e,
                    "Resume is not UTF-8 text, treating as extraction failure"
                );
                String::new()
            }
        }
    }
}
