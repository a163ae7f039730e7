//! Best-effort text layer preview. Used for upload inspection only; analysis
//! always goes through page images.

use tracing::debug;

pub const PREVIEW_MAX_CHARS: usize = 500;

/// First `PREVIEW_MAX_CHARS` characters of the PDF's text layer, whitespace-collapsed.
/// `None` when the document has no extractable text.
///
/// pdf-extract may panic on malformed input; call this from `spawn_blocking`
/// so a panic surfaces as a `JoinError` instead of tearing down a worker.
pub fn text_preview(bytes: &[u8]) -> Option<String> {
    let text = match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("PDF text extraction failed: {e}");
            return None;
        }
    };
    collapse_preview(&text)
}

fn collapse_preview(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(PREVIEW_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_joins_whitespace_runs() {
        assert_eq!(
            collapse_preview("Jane   Doe\n\nRust\tEngineer").as_deref(),
            Some("Jane Doe Rust Engineer")
        );
    }

    #[test]
    fn test_collapse_empty_is_none() {
        assert_eq!(collapse_preview(" \n\t "), None);
    }

    #[test]
    fn test_collapse_caps_length() {
        let long = "word ".repeat(400);
        assert_eq!(
            collapse_preview(&long).unwrap().chars().count(),
            PREVIEW_MAX_CHARS
        );
    }

    #[test]
    fn test_garbage_bytes_yield_no_preview() {
        assert_eq!(text_preview(b"definitely not a pdf"), None);
    }
}
