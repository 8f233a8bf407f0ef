use super::patterns::{ReferencePatterns, ReferenceRule, TargetPatterns};
use super::types::{RawReference, RawTarget, RefKind};
use super::window::{ceil_char_boundary, condense_whitespace, context_snippet};

/// Scan one page of text for outbound reference mentions. Compound
/// mentions are split into one candidate per identifier; every candidate
/// from the same mention shares the mention's span and context snippet.
pub(crate) fn extract_references(
    patterns: &ReferencePatterns,
    text: &str,
    context_window: usize,
) -> Vec<RawReference> {
    let mut candidates = Vec::new();

    for rule in &patterns.rules {
        for captures in rule.mention.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let Some(primary) = captures.get(1) else {
                continue;
            };

            let mut ids = vec![primary.as_str().to_string()];
            let mut cursor = whole.end();
            while let Some(next) = continuation_id(rule, text, cursor) {
                ids.push(next.0);
                cursor = next.1;
            }

            let span = (whole.start(), cursor);
            let raw_text = condense_whitespace(&text[whole.start()..cursor]);
            let context = context_snippet(text, span, context_window);

            for raw_id in ids {
                candidates.push(RawReference {
                    kind: rule.kind,
                    raw_id,
                    raw_text: raw_text.clone(),
                    span,
                    context: context.clone(),
                });
            }
        }
    }

    candidates
}

fn continuation_id(rule: &ReferenceRule, text: &str, cursor: usize) -> Option<(String, usize)> {
    let rest = &text[cursor..];
    let captures = rule.continuation.captures(rest)?;
    let whole = captures.get(0)?;
    let id = captures.get(1)?;
    Some((id.as_str().to_string(), cursor + whole.end()))
}

/// Scan one page of text for inbound definitions: headings and labels at
/// the start of a line. The raw text kept with each target is the first
/// line of the match, truncated for the inventory report.
pub(crate) fn extract_targets(patterns: &TargetPatterns, text: &str) -> Vec<RawTarget> {
    let mut targets = Vec::new();

    let rules: [(RefKind, &regex::Regex); 5] = [
        (RefKind::Section, &patterns.section_heading),
        (RefKind::Chapter, &patterns.chapter_heading),
        (RefKind::Table, &patterns.table_label),
        (RefKind::Figure, &patterns.figure_label),
        (RefKind::Appendix, &patterns.appendix_header),
    ];

    for (kind, pattern) in rules {
        for captures in pattern.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let Some(id) = captures.get(1) else {
                continue;
            };

            targets.push(RawTarget {
                kind,
                raw_id: id.as_str().to_string(),
                raw_text: heading_line(text, whole.start(), 80),
            });
        }
    }

    targets
}

fn heading_line(text: &str, start: usize, max_len: usize) -> String {
    let tail = &text[start..];
    let line = tail.lines().next().unwrap_or(tail);
    let end = ceil_char_boundary(line, max_len.min(line.len()));
    line[..end].trim().to_string()
}
