/// Byte-offset window helpers over page text. All slicing is clamped to
/// UTF-8 character boundaries so a window edge can never split a code
/// point (en dashes in identifiers are multi-byte).

pub(crate) fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index > text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

pub(crate) fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index > text.len() {
        return text.len();
    }
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

pub(crate) fn window_before(text: &str, start: usize, width: usize) -> &str {
    let from = floor_char_boundary(text, start.saturating_sub(width));
    let to = ceil_char_boundary(text, start);
    &text[from..to]
}

pub(crate) fn window_after(text: &str, end: usize, width: usize) -> &str {
    let from = floor_char_boundary(text, end);
    let to = ceil_char_boundary(text, end.saturating_add(width).min(text.len()));
    &text[from..to]
}

pub(crate) fn window_around(text: &str, span: (usize, usize), width: usize) -> &str {
    let from = floor_char_boundary(text, span.0.saturating_sub(width));
    let to = ceil_char_boundary(text, span.1.saturating_add(width).min(text.len()));
    &text[from..to]
}

/// A single-line snippet of the text surrounding a match, for human
/// review. Ellipses mark truncation at either edge.
pub(crate) fn context_snippet(text: &str, span: (usize, usize), width: usize) -> String {
    let from = floor_char_boundary(text, span.0.saturating_sub(width));
    let to = ceil_char_boundary(text, span.1.saturating_add(width).min(text.len()));

    let mut snippet = condense_whitespace(&text[from..to]);
    if from > 0 {
        snippet = format!("...{snippet}");
    }
    if to < text.len() {
        snippet = format!("{snippet}...");
    }
    snippet
}

pub(crate) fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}
