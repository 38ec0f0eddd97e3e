//! Sliding-window text chunker.
//!
//! Splits raw document text into overlapping fixed-size windows measured in
//! characters. Consecutive windows overlap by a fixed number of characters
//! so that no content is lost at window boundaries; the final window may be
//! shorter than the window size.

use crate::error::RagError;

/// Split `text` into overlapping windows of at most `window` characters.
///
/// The cursor starts at 0; each window is `text[cursor..cursor + window]`
/// clamped to the text length, and the cursor then advances by
/// `window - overlap`. Windows are sliced on `char` boundaries, so
/// multi-byte text is safe. Empty input yields an empty sequence.
///
/// `overlap >= window` would stall the cursor and is rejected as invalid
/// input rather than looping forever.
pub fn chunk_text(text: &str, window: usize, overlap: usize) -> Result<Vec<String>, RagError> {
    if window == 0 || overlap >= window {
        return Err(RagError::InvalidInput(format!(
            "chunk overlap ({}) must be smaller than the window size ({})",
            overlap, window
        )));
    }

    let total_chars = text.chars().count();
    if total_chars == 0 {
        return Ok(Vec::new());
    }

    // Byte offset of every char, plus one past the end, so windows counted
    // in characters can be sliced without splitting a code point.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut windows = Vec::new();
    let mut cursor = 0usize;
    loop {
        let end = (cursor + window).min(total_chars);
        windows.push(text[offsets[cursor]..offsets[end]].to_string());
        if end == total_chars {
            break;
        }
        cursor = end - overlap;
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the original text: first window whole, then each subsequent
    /// window with its leading `overlap` characters dropped.
    fn reconstruct(windows: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, w) in windows.iter().enumerate() {
            if i == 0 {
                out.push_str(w);
            } else {
                out.extend(w.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn empty_text_yields_no_windows() {
        assert!(chunk_text("", 1200, 200).unwrap().is_empty());
    }

    #[test]
    fn short_text_is_a_single_window() {
        let windows = chunk_text("korte tekst", 1200, 200).unwrap();
        assert_eq!(windows, vec!["korte tekst".to_string()]);
    }

    #[test]
    fn windows_reconstruct_original_text() {
        let text = "abcdefghij".repeat(500);
        let windows = chunk_text(&text, 1200, 200).unwrap();
        assert!(windows.len() > 1);
        assert_eq!(reconstruct(&windows, 200), text);
    }

    #[test]
    fn last_window_may_be_shorter() {
        let text = "x".repeat(1500);
        let windows = chunk_text(&text, 1200, 200).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].len(), 1200);
        // second window starts at 1000, runs to 1500
        assert_eq!(windows[1].len(), 500);
    }

    #[test]
    fn consecutive_windows_share_the_overlap() {
        let text: String = ('a'..='z').cycle().take(3000).collect();
        let windows = chunk_text(&text, 1000, 100).unwrap();
        for pair in windows.windows(2) {
            let tail: String = pair[0].chars().skip(pair[0].chars().count() - 100).collect();
            let head: String = pair[1].chars().take(100).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "financiële haven — überhaupt ≈ €100".repeat(100);
        let windows = chunk_text(&text, 50, 10).unwrap();
        assert_eq!(reconstruct(&windows, 10), text);
    }

    #[test]
    fn overlap_equal_to_window_is_rejected() {
        let err = chunk_text("abc", 100, 100).unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[test]
    fn overlap_larger_than_window_is_rejected() {
        let err = chunk_text("abc", 100, 150).unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[test]
    fn zero_overlap_is_allowed() {
        let text = "y".repeat(250);
        let windows = chunk_text(&text, 100, 0).unwrap();
        assert_eq!(windows.len(), 3);
        assert_eq!(reconstruct(&windows, 0), text);
    }
}
