//! Pre-parse nesting check.
//!
//! The parser runs with its own recursion limit disabled, so input is checked
//! here first. Brackets inside string literals are skipped; everything else is
//! left to the parser.

/// Byte offset of the first bracket that opens container number
/// `max_depth + 1`, or `None` when `text` stays within `max_depth`.
pub(crate) fn depth_overflow(text: &str, max_depth: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max_depth {
                    return Some(offset);
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}
