/// Canonicalize an identifier so that equivalent forms compare equal:
/// whitespace is removed, en/em dashes become hyphens, and trailing
/// periods picked up from heading punctuation are stripped. Total and
/// idempotent; unrecognized input passes through otherwise unchanged.
pub(crate) fn normalize_identifier(raw: &str) -> String {
    let mut id: String = raw
        .chars()
        .filter(|character| !character.is_whitespace())
        .map(|character| match character {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();

    let trimmed_len = id.trim_end_matches('.').len();
    id.truncate(trimmed_len);
    id
}
