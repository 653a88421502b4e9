//! Structural classification of export lines.

/// The structural role of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// The separator that closes one day block and opens the next.
    DayBoundary,
    /// Anything else; its meaning depends on the parser state.
    Content(&'a str),
}

/// Classifies a raw line, stripping trailing whitespace first.
pub fn classify<'a>(raw: &'a str, day_separator: &str) -> Line<'a> {
    let text = raw.trim_end();
    if text.is_empty() {
        Line::Blank
    } else if text == day_separator {
        Line::DayBoundary
    } else {
        Line::Content(text)
    }
}
