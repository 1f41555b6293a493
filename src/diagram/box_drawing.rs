//! Unicode-width-aware box helpers for the flowchart outline.
//!
//! Width is measured in terminal columns so emoji and CJK labels line up.

use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal columns. Emoji = 2, CJK = 2, ASCII = 1.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Strip Variation Selector VS16 (U+FE0F).
///
/// `⬇\u{FE0F}` is drawn 2 columns wide by most terminals but measured as 1;
/// dropping the selector makes measurement and drawing agree.
pub fn strip_vs16(s: &str) -> String {
    s.chars().filter(|&c| c != '\u{FE0F}').collect()
}

/// Horizontal border: `left` + `─` × (width + 2) + `right`.
pub fn border(width: usize, left: char, right: char) -> String {
    let mut s = String::with_capacity(width + 4);
    s.push(left);
    s.extend(std::iter::repeat('─').take(width + 2));
    s.push(right);
    s
}

/// Pad content to `target_width` columns with one-space margins.
pub fn pad_cell(content: &str, target_width: usize) -> String {
    let pad = target_width.saturating_sub(display_width(content));
    format!(" {}{} ", content, " ".repeat(pad))
}

/// Three-line box around a single label.
///
/// ```text
/// ┌───────┐
/// │ label │
/// └───────┘
/// ```
pub fn boxed(label: &str) -> [String; 3] {
    let label = strip_vs16(label);
    let width = display_width(&label);
    [
        border(width, '┌', '┐'),
        format!("│{}│", pad_cell(&label, width)),
        border(width, '└', '┘'),
    ]
}
