use crate::model::KindCounts;

use super::types::{AuditOutcome, ClassifiedReference, MatchStatus, MatchVia, RefKind};

const RULE_HEAVY: &str =
    "================================================================================";
const RULE_LIGHT: &str = "----------------------------------------";

/// Render the four-section plain-text report: summary statistics,
/// potentially orphaned references, the target inventory, and the full
/// reference inventory (matched, orphaned, and filtered entries).
pub(crate) fn render_report(outcome: &AuditOutcome, per_kind: &[KindCounts]) -> String {
    let mut lines = Vec::new();

    lines.push(RULE_HEAVY.to_string());
    lines.push("SWEIS INTERNAL REFERENCE CHECK REPORT".to_string());
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    render_summary(&mut lines, outcome, per_kind);
    render_orphans(&mut lines, &outcome.orphaned);
    render_targets(&mut lines, outcome);
    render_references(&mut lines, outcome);

    lines.push(RULE_HEAVY.to_string());
    lines.push("END OF REPORT".to_string());
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    lines.join("\n")
}

fn render_summary(lines: &mut Vec<String>, outcome: &AuditOutcome, per_kind: &[KindCounts]) {
    let unique_references = outcome.matched.len() + outcome.orphaned.len();
    let unique_targets = outcome.targets.len();

    lines.push("SUMMARY STATISTICS".to_string());
    lines.push(RULE_LIGHT.to_string());
    lines.push(format!(
        "Total unique references found:  {unique_references}"
    ));
    lines.push(format!("Total unique targets found:     {unique_targets}"));
    lines.push(format!(
        "References matched to targets:  {}",
        outcome.matched.len()
    ));
    lines.push(format!(
        "Filtered as external/legal:     {}",
        outcome.filtered.len()
    ));
    lines.push(format!(
        "POTENTIALLY ORPHANED:           {}",
        outcome.orphaned.len()
    ));
    lines.push(String::new());

    lines.push(format!(
        "  {:<12} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "Kind", "Refs", "Targets", "Matched", "Orphaned", "Filtered"
    ));
    lines.push(format!(
        "  {} {} {} {} {} {}",
        "-".repeat(12),
        "-".repeat(6),
        "-".repeat(8),
        "-".repeat(8),
        "-".repeat(8),
        "-".repeat(8)
    ));
    for counts in per_kind {
        lines.push(format!(
            "  {:<12} {:>6} {:>8} {:>8} {:>8} {:>8}",
            counts.kind,
            counts.references,
            counts.targets,
            counts.matched,
            counts.orphaned,
            counts.filtered
        ));
    }
    lines.push(String::new());
}

fn render_orphans(lines: &mut Vec<String>, orphaned: &[ClassifiedReference]) {
    lines.push(RULE_HEAVY.to_string());
    lines.push("POTENTIALLY ORPHANED REFERENCES".to_string());
    lines.push(
        "(References that could not be matched to any target in the document set)".to_string(),
    );
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    if orphaned.is_empty() {
        lines.push("  No orphaned references found!".to_string());
        lines.push(String::new());
        return;
    }

    for (index, entry) in orphaned.iter().enumerate() {
        let reference = &entry.reference;
        lines.push(format!(
            "  [{}] {}: {}",
            index + 1,
            reference.kind.as_str().to_uppercase(),
            reference.normalized_id
        ));
        lines.push(format!("      Raw text: \"{}\"", reference.raw_text));
        lines.push(format!(
            "      Occurrences ({}):",
            reference.occurrence_count
        ));
        for location in &reference.locations {
            lines.push(format!("        - {}, page {}", location.volume, location.page));
        }
        if reference.occurrence_count > reference.locations.len() {
            lines.push(format!(
                "        ... and {} more occurrences",
                reference.occurrence_count - reference.locations.len()
            ));
        }
        lines.push(format!("      Context: {}", reference.context));
        lines.push(String::new());
    }
}

fn render_targets(lines: &mut Vec<String>, outcome: &AuditOutcome) {
    lines.push(RULE_HEAVY.to_string());
    lines.push("ALL TARGETS FOUND (Sections, Chapters, Tables, Figures, Appendices)".to_string());
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    for kind in RefKind::ALL {
        let kind_targets: Vec<_> = outcome
            .targets
            .iter()
            .filter(|target| target.kind == kind)
            .collect();

        lines.push(format!(
            "  {} targets ({} unique):",
            kind.as_str().to_uppercase(),
            kind_targets.len()
        ));
        lines.push(format!("  {}", "-".repeat(60)));
        for target in kind_targets {
            lines.push(format!(
                "    {:<30} ({}, p.{})",
                target.normalized_id, target.volume, target.page
            ));
        }
        lines.push(String::new());
    }
}

fn render_references(lines: &mut Vec<String>, outcome: &AuditOutcome) {
    lines.push(RULE_HEAVY.to_string());
    lines.push("ALL REFERENCES FOUND (grouped by kind)".to_string());
    lines.push(RULE_HEAVY.to_string());
    lines.push(String::new());

    for kind in RefKind::ALL {
        let mut entries: Vec<(String, String)> = Vec::new();

        for classified in outcome.matched.iter().chain(outcome.orphaned.iter()) {
            if classified.reference.kind == kind {
                entries.push((
                    classified.reference.normalized_id.clone(),
                    status_label(classified.status),
                ));
            }
        }
        for filtered in &outcome.filtered {
            if filtered.reference.kind == kind {
                entries.push((
                    filtered.reference.normalized_id.clone(),
                    format!("[FILTERED: {}]", filtered.reason.as_str()),
                ));
            }
        }
        entries.sort();

        lines.push(format!(
            "  {} references ({} unique):",
            kind.as_str().to_uppercase(),
            entries.len()
        ));
        lines.push(format!("  {}", "-".repeat(60)));
        for (id, status) in entries {
            lines.push(format!("    {id:<30} {status}"));
        }
        lines.push(String::new());
    }
}

fn status_label(status: MatchStatus) -> String {
    match status {
        MatchStatus::Matched(MatchVia::Exact) => "[OK]".to_string(),
        MatchStatus::Matched(MatchVia::ParentPrefix) => "[OK (subsection match)]".to_string(),
        MatchStatus::Orphaned => "[ORPHANED]".to_string(),
    }
}
