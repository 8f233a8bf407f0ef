use super::audit::{ReferenceAudit, summarize_by_kind};
use super::extract::{extract_references, extract_targets};
use super::filter::FalsePositiveFilter;
use super::normalize::normalize_identifier;
use super::pages::split_form_feed_pages;
use super::patterns::{ReferencePatterns, TargetPatterns};
use super::report::render_report;
use super::types::{
    AuditConfig, AuditError, AuditOutcome, FilterReason, MatchStatus, MatchVia, PageRecord,
    RefKind,
};

fn page(volume: &str, number: u32, text: &str) -> PageRecord {
    PageRecord {
        volume: volume.to_string(),
        page: number,
        text: text.to_string(),
    }
}

fn audit_pages(pages: &[PageRecord]) -> AuditOutcome {
    let mut audit = ReferenceAudit::new(AuditConfig::default()).expect("patterns compile");
    for record in pages {
        audit.ingest_page(record).expect("valid page record");
    }
    audit.finish()
}

fn reference_candidates(text: &str) -> Vec<(RefKind, String)> {
    let patterns = ReferencePatterns::new().expect("patterns compile");
    extract_references(&patterns, text, 150)
        .into_iter()
        .map(|candidate| (candidate.kind, candidate.raw_id))
        .collect()
}

fn target_candidates(text: &str) -> Vec<(RefKind, String)> {
    let patterns = TargetPatterns::new().expect("patterns compile");
    extract_targets(&patterns, text)
        .into_iter()
        .map(|target| (target.kind, target.raw_id))
        .collect()
}

#[test]
fn normalize_identifier_is_idempotent() {
    let samples = [
        "5.2",
        "5.2.",
        "5.2..",
        " S.1.3 ",
        "A.3.5\u{2013}1",
        "A.3.5\u{2014}1",
        "  ",
        "garbage!!",
        "S. 2\u{2013}1",
    ];

    for sample in samples {
        let once = normalize_identifier(sample);
        assert_eq!(normalize_identifier(&once), once, "sample {sample:?}");
    }
}

#[test]
fn normalize_identifier_unifies_dashes_and_trailing_dots() {
    assert_eq!(
        normalize_identifier("A.3.5\u{2013}1"),
        normalize_identifier("A.3.5-1")
    );
    assert_eq!(
        normalize_identifier("A.3.5\u{2014}1"),
        normalize_identifier("A.3.5-1")
    );
    assert_eq!(normalize_identifier("5.2."), normalize_identifier("5.2"));
    assert_eq!(normalize_identifier(" S.2 - 1 "), "S.2-1");
}

#[test]
fn reference_extraction_covers_all_kinds() {
    let text = "As discussed in Section 5.2 and Chapter 3, see Table S.2-1, \
                Figure 1.3-1, and Appendix H for details.";
    let candidates = reference_candidates(text);

    assert!(candidates.contains(&(RefKind::Section, "5.2".to_string())));
    assert!(candidates.contains(&(RefKind::Chapter, "3".to_string())));
    assert!(candidates.contains(&(RefKind::Table, "S.2-1".to_string())));
    assert!(candidates.contains(&(RefKind::Figure, "1.3-1".to_string())));
    assert!(candidates.contains(&(RefKind::Appendix, "H".to_string())));
}

#[test]
fn compound_table_mention_splits_into_one_candidate_per_identifier() {
    let candidates = reference_candidates("see Tables A.3.5-1 and A.3.5-2 for comparison");

    let tables: Vec<&(RefKind, String)> = candidates
        .iter()
        .filter(|(kind, _)| *kind == RefKind::Table)
        .collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].1, "A.3.5-1");
    assert_eq!(tables[1].1, "A.3.5-2");
}

#[test]
fn compound_mentions_split_sections_and_appendices() {
    let sections = reference_candidates("described in Sections 2.1, 2.2, and 2.3 above");
    assert_eq!(
        sections,
        vec![
            (RefKind::Section, "2.1".to_string()),
            (RefKind::Section, "2.2".to_string()),
            (RefKind::Section, "2.3".to_string()),
        ]
    );

    let appendices = reference_candidates("presented in Appendices A and B");
    assert_eq!(
        appendices,
        vec![
            (RefKind::Appendix, "A".to_string()),
            (RefKind::Appendix, "B".to_string()),
        ]
    );
}

#[test]
fn reference_keyword_tolerates_a_line_break_before_the_identifier() {
    let candidates = reference_candidates("impacts are described in Section\n5.2 of this volume");
    assert!(candidates.contains(&(RefKind::Section, "5.2".to_string())));
}

#[test]
fn malformed_identifiers_yield_no_candidates() {
    assert!(reference_candidates("see Section five for details").is_empty());
    // A table id requires the hyphenated suffix.
    assert!(reference_candidates("shown in Table 4.4 below").is_empty());
    // A bare integer is a chapter id, not a section id.
    assert!(reference_candidates("see Section 5 below").is_empty());
}

#[test]
fn en_and_em_dash_identifiers_are_extracted() {
    let en = reference_candidates("values in Table 4.4\u{2013}11 show");
    assert_eq!(en, vec![(RefKind::Table, "4.4\u{2013}11".to_string())]);

    let em = reference_candidates("values in Figure 2.1\u{2014}3 show");
    assert_eq!(em, vec![(RefKind::Figure, "2.1\u{2014}3".to_string())]);
}

#[test]
fn target_extraction_recognizes_line_start_headings() {
    let text = "5.2 Land and Visual Resources\n\
                Table 4.4-11 Annual Water Usage\n\
                Figure S.1-1 Regional Setting\n\
                Appendix H Glossary\n\
                Chapter 3\n";
    let targets = target_candidates(text);

    assert!(targets.contains(&(RefKind::Section, "5.2".to_string())));
    assert!(targets.contains(&(RefKind::Table, "4.4-11".to_string())));
    assert!(targets.contains(&(RefKind::Figure, "S.1-1".to_string())));
    assert!(targets.contains(&(RefKind::Appendix, "H".to_string())));
    assert!(targets.contains(&(RefKind::Chapter, "3".to_string())));
}

#[test]
fn mid_paragraph_mentions_are_not_targets() {
    let text = "  additional detail appears in Appendix A and in Table 4.4-11 rows\n";
    assert!(target_candidates(text).is_empty());
}

#[test]
fn heading_split_across_a_line_break_is_not_a_target() {
    // Documented asymmetry: the reference grammar tolerates this split,
    // the heading grammar does not.
    let split_heading = "5.2\nLand and Visual Resources\n";
    assert!(target_candidates(split_heading).is_empty());

    let split_reference = "see Section\n5.2 for details";
    assert!(!reference_candidates(split_reference).is_empty());
}

#[test]
fn external_document_context_drops_the_reference() {
    let text = "Waste management alternatives were analyzed in Appendix I of the \
                Final Site-Wide Environmental Impact Statement for Continued Operation \
                of Los Alamos National Laboratory.";
    let outcome = audit_pages(&[page("vol1.pdf", 1, text)]);

    assert!(outcome.matched.is_empty());
    assert!(outcome.orphaned.is_empty());
    assert_eq!(outcome.filtered.len(), 1);
    assert_eq!(outcome.filtered[0].reference.kind, RefKind::Appendix);
    assert_eq!(outcome.filtered[0].reference.normalized_id, "I");
    assert_eq!(outcome.filtered[0].reason, FilterReason::ExternalDocument);
}

#[test]
fn regulatory_citations_never_reach_the_orphan_bucket() {
    // No reference keyword, so the citation is not extracted at all.
    let bare = audit_pages(&[page("vol1.pdf", 1, "subject to 10 CFR Part 830 requirements")]);
    assert!(bare.matched.is_empty());
    assert!(bare.orphaned.is_empty());
    assert!(bare.filtered.is_empty());

    // With a keyword present the candidate is extracted but filtered.
    let cited = audit_pages(&[page(
        "vol1.pdf",
        1,
        "nuclear safety management per 10 CFR Part 830, Section 830.204 requires a DSA",
    )]);
    assert!(cited.orphaned.is_empty());
    assert_eq!(cited.filtered.len(), 1);
    assert_eq!(cited.filtered[0].reason, FilterReason::RegulatoryCitation);
}

#[test]
fn source_attribution_drops_cited_table_numbers() {
    let text = "annual emissions totals.\nSource: DOE (2008b), Table 8-14 of the site inventory";
    let outcome = audit_pages(&[page("vol1.pdf", 1, text)]);

    assert!(outcome.orphaned.is_empty());
    assert_eq!(outcome.filtered.len(), 1);
    assert_eq!(outcome.filtered[0].reference.kind, RefKind::Table);
    assert_eq!(outcome.filtered[0].reason, FilterReason::SourceCitation);
}

#[test]
fn legal_code_context_drops_chapter_references() {
    let text = "noise limits are established by the County Code of Ordinances, Chapter 18";
    let outcome = audit_pages(&[page("vol1.pdf", 1, text)]);

    assert!(outcome.orphaned.is_empty());
    assert_eq!(outcome.filtered.len(), 1);
    assert_eq!(outcome.filtered[0].reference.kind, RefKind::Chapter);
    assert_eq!(outcome.filtered[0].reason, FilterReason::LegalCodeChapter);
}

#[test]
fn plain_internal_references_are_kept() {
    let patterns = ReferencePatterns::new().expect("patterns compile");
    let filter = FalsePositiveFilter::new(&AuditConfig::default()).expect("filter compiles");

    let text = "see Table 4.4-11 for projected water usage by alternative";
    let candidates = extract_references(&patterns, text, 150);
    assert_eq!(candidates.len(), 1);
    assert_eq!(
        filter.evaluate(text, candidates[0].span, candidates[0].kind),
        None
    );
}

#[test]
fn exact_match_classifies_before_parent_prefix() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "See Section 5.2."),
        page("vol2.pdf", 1, "5.2 Land and Visual Resources\n5.2.1 Soils\n"),
    ]);

    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(outcome.matched[0].reference.normalized_id, "5.2");
    assert_eq!(
        outcome.matched[0].status,
        MatchStatus::Matched(MatchVia::Exact)
    );
    assert!(outcome.orphaned.is_empty());

    let section_targets: Vec<&str> = outcome
        .targets
        .iter()
        .filter(|target| target.kind == RefKind::Section)
        .map(|target| target.normalized_id.as_str())
        .collect();
    assert_eq!(section_targets, vec!["5.2", "5.2.1"]);
}

#[test]
fn parent_section_is_satisfied_by_any_subsection() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "impacts are summarized in Section 5.2 below"),
        page("vol2.pdf", 1, "5.2.1 Soils and Geology\n"),
    ]);

    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(
        outcome.matched[0].status,
        MatchStatus::Matched(MatchVia::ParentPrefix)
    );
}

#[test]
fn parent_prefix_is_dot_bounded() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "impacts are summarized in Section 5.2 below"),
        page("vol2.pdf", 1, "5.20 Cumulative Impacts\n"),
    ]);

    assert!(outcome.matched.is_empty());
    assert_eq!(outcome.orphaned.len(), 1);
    assert_eq!(outcome.orphaned[0].reference.normalized_id, "5.2");
}

#[test]
fn matching_never_crosses_kinds() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "trends are shown in Figure 3.5-1 of this chapter"),
        page("vol2.pdf", 1, "Table 3.5-1 Ambient Air Quality Data\n"),
    ]);

    assert!(outcome.matched.is_empty());
    assert_eq!(outcome.orphaned.len(), 1);
    assert_eq!(outcome.orphaned[0].reference.kind, RefKind::Figure);
}

#[test]
fn dashed_reference_matches_hyphenated_label() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "usage is shown in Table 4.4\u{2013}11 above"),
        page("vol2.pdf", 1, "Table 4.4-11 Annual Water Usage\n"),
    ]);

    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(outcome.matched[0].reference.normalized_id, "4.4-11");
}

#[test]
fn duplicate_references_collapse_with_an_occurrence_cap() {
    let pages: Vec<PageRecord> = (1..=7)
        .map(|number| page("vol1.pdf", number, "mitigation is described in Section 2.1 here"))
        .collect();
    let outcome = audit_pages(&pages);

    assert_eq!(outcome.orphaned.len(), 1);
    let reference = &outcome.orphaned[0].reference;
    assert_eq!(reference.occurrence_count, 7);
    assert_eq!(reference.locations.len(), 5);
    assert_eq!(reference.locations[0].page, 1);
    assert_eq!(reference.locations[4].page, 5);
}

#[test]
fn duplicate_targets_collapse_but_keep_their_count() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 2, "5.2 Land and Visual Resources .... 5-10\n"),
        page("vol1.pdf", 50, "5.2 Land and Visual Resources\n"),
    ]);

    let section_targets: Vec<_> = outcome
        .targets
        .iter()
        .filter(|target| target.kind == RefKind::Section)
        .collect();
    assert_eq!(section_targets.len(), 1);
    assert_eq!(section_targets[0].occurrence_count, 2);
    assert_eq!(section_targets[0].page, 2);
}

#[test]
fn invalid_page_records_are_rejected() {
    let mut audit = ReferenceAudit::new(AuditConfig::default()).expect("patterns compile");

    let zero_page = audit.ingest_page(&page("vol1.pdf", 0, "text"));
    assert!(matches!(
        zero_page,
        Err(AuditError::InvalidInput { page: 0, .. })
    ));

    let blank_volume = audit.ingest_page(&page("   ", 1, "text"));
    assert!(matches!(
        blank_volume,
        Err(AuditError::InvalidInput { .. })
    ));
}

#[test]
fn three_volume_scenario_matches_across_volumes() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "See Section 5.2."),
        page("vol2.pdf", 1, "5.2 Land and Visual Resources\n5.2.1 Soils\n"),
        page("vol3.pdf", 1, "unrelated front matter"),
    ]);

    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(outcome.matched[0].reference.normalized_id, "5.2");
    assert_eq!(
        outcome.matched[0].status,
        MatchStatus::Matched(MatchVia::Exact)
    );
    assert!(outcome.orphaned.is_empty());
    assert_eq!(outcome.targets.len(), 2);
}

#[test]
fn kind_summary_partitions_counts() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "See Section 5.2 and Figure 3.5-1."),
        page("vol2.pdf", 1, "5.2 Land and Visual Resources\n"),
    ]);
    let per_kind = summarize_by_kind(&outcome);

    let section = per_kind.iter().find(|c| c.kind == "section").unwrap();
    assert_eq!(section.references, 1);
    assert_eq!(section.matched, 1);
    assert_eq!(section.orphaned, 0);

    let figure = per_kind.iter().find(|c| c.kind == "figure").unwrap();
    assert_eq!(figure.references, 1);
    assert_eq!(figure.orphaned, 1);
}

#[test]
fn report_lists_orphans_with_occurrences() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 3, "details appear in Section 9.9 of this document"),
        page("vol2.pdf", 1, "5.2 Land and Visual Resources\n"),
    ]);
    let per_kind = summarize_by_kind(&outcome);
    let report = render_report(&outcome, &per_kind);

    assert!(report.contains("POTENTIALLY ORPHANED REFERENCES"));
    assert!(report.contains("SECTION: 9.9"));
    assert!(report.contains("vol1.pdf, page 3"));
    assert!(report.contains("[ORPHANED]"));
    assert!(report.contains("END OF REPORT"));
}

#[test]
fn report_marks_filtered_and_parent_matches() {
    let outcome = audit_pages(&[
        page("vol1.pdf", 1, "see Section 5.2 of this volume for details"),
        page("vol1.pdf", 2, "compare Appendix I of the prior SWEIS"),
        page("vol2.pdf", 1, "5.2.1 Soils and Geology\n"),
    ]);
    let per_kind = summarize_by_kind(&outcome);
    let report = render_report(&outcome, &per_kind);

    assert!(report.contains("[OK (subsection match)]"));
    assert!(report.contains("[FILTERED: external_document]"));
}

#[test]
fn form_feed_output_splits_into_pages() {
    let raw = "page one text\u{000C}page two text\u{000C}\u{000C}";
    let pages = split_form_feed_pages(raw);

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0], "page one text");
    assert_eq!(pages[1], "page two text");
}

#[test]
fn context_snippet_is_captured_with_the_candidate() {
    let patterns = ReferencePatterns::new().expect("patterns compile");
    let text = "a long discussion of impacts precedes the mention of Section 5.2 in this text";
    let candidates = extract_references(&patterns, text, 150);

    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].context.contains("Section 5.2"));
    assert!(candidates[0].context.contains("long discussion"));
}
