use std::collections::BTreeMap;

use super::types::{
    ClassifiedReference, MatchStatus, MatchVia, RefKind, ReferenceRecord, TargetRecord,
};

/// Classify every kept reference against the union of targets across all
/// volumes. A pure function of the two sets; B-tree ordering makes the
/// output order (kind, then normalized id) deterministic.
pub(crate) fn classify_references(
    references: BTreeMap<(RefKind, String), ReferenceRecord>,
    targets: &BTreeMap<(RefKind, String), TargetRecord>,
) -> (Vec<ClassifiedReference>, Vec<ClassifiedReference>) {
    let mut matched = Vec::new();
    let mut orphaned = Vec::new();

    for ((kind, normalized_id), reference) in references {
        let status = match_status(kind, &normalized_id, targets);
        let classified = ClassifiedReference { reference, status };
        match status {
            MatchStatus::Matched(_) => matched.push(classified),
            MatchStatus::Orphaned => orphaned.push(classified),
        }
    }

    (matched, orphaned)
}

fn match_status(
    kind: RefKind,
    normalized_id: &str,
    targets: &BTreeMap<(RefKind, String), TargetRecord>,
) -> MatchStatus {
    if targets.contains_key(&(kind, normalized_id.to_string())) {
        return MatchStatus::Matched(MatchVia::Exact);
    }

    // A section reference is satisfied by any of its subsections: the
    // reference id extended by one or more dot-separated components.
    // The prefix is dot-bounded, so "5.2" is satisfied by "5.2.1" but
    // never by "5.20".
    if kind == RefKind::Section && has_subsection_target(normalized_id, targets) {
        return MatchStatus::Matched(MatchVia::ParentPrefix);
    }

    MatchStatus::Orphaned
}

fn has_subsection_target(
    normalized_id: &str,
    targets: &BTreeMap<(RefKind, String), TargetRecord>,
) -> bool {
    let prefix = format!("{normalized_id}.");
    targets
        .range((RefKind::Section, prefix.clone())..)
        .take_while(|((kind, id), _)| *kind == RefKind::Section && id.starts_with(&prefix))
        .next()
        .is_some()
}
