//! Display width helpers.
//!
//! Names typed into the planner end up on terminal previews and canvas labels,
//! so they are measured after stripping ANSI escapes and clipped by display
//! columns rather than bytes.

use unicode_width::UnicodeWidthChar;

/// Widest label, in display columns, kept for a table or guest name.
pub const MAX_NAME_WIDTH: usize = 40;

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Strip escapes and control characters, trim, and clip to [`MAX_NAME_WIDTH`].
///
/// Returns `None` when nothing printable is left.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let clean = strip_ansi_escapes::strip(raw);
    let clean_str = String::from_utf8_lossy(&clean);
    let trimmed = clean_str.trim();

    let mut out = String::with_capacity(trimmed.len());
    let mut used = 0;
    for ch in trimmed.chars().filter(|c| !c.is_control()) {
        let width = ch.width().unwrap_or(0);
        if used + width > MAX_NAME_WIDTH {
            break;
        }
        used += width;
        out.push(ch);
    }

    let out = out.trim_end().to_string();
    if out.is_empty() { None } else { Some(out) }
}
