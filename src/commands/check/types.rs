use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum RefKind {
    Section,
    Chapter,
    Table,
    Figure,
    Appendix,
}

impl RefKind {
    pub(crate) const ALL: [RefKind; 5] = [
        RefKind::Section,
        RefKind::Chapter,
        RefKind::Table,
        RefKind::Figure,
        RefKind::Appendix,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RefKind::Section => "section",
            RefKind::Chapter => "chapter",
            RefKind::Table => "table",
            RefKind::Figure => "figure",
            RefKind::Appendix => "appendix",
        }
    }
}

/// One page of extracted text, as handed to the audit pipeline.
#[derive(Debug, Clone)]
pub(crate) struct PageRecord {
    pub volume: String,
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Error)]
pub(crate) enum AuditError {
    #[error("invalid page record (volume {volume:?}, page {page}): {reason}")]
    InvalidInput {
        volume: String,
        page: u32,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub volume: String,
    pub page: u32,
}

/// A single extraction candidate before deduplication and filtering.
#[derive(Debug, Clone)]
pub(crate) struct RawReference {
    pub kind: RefKind,
    pub raw_id: String,
    pub raw_text: String,
    pub span: (usize, usize),
    pub context: String,
}

#[derive(Debug, Clone)]
pub(crate) struct RawTarget {
    pub kind: RefKind,
    pub raw_id: String,
    pub raw_text: String,
}

/// A unique reference, keyed by (kind, normalized id) across all volumes.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceRecord {
    pub kind: RefKind,
    pub raw_id: String,
    pub normalized_id: String,
    pub raw_text: String,
    pub context: String,
    pub occurrence_count: usize,
    pub locations: Vec<Occurrence>,
}

#[derive(Debug, Clone)]
pub(crate) struct TargetRecord {
    pub kind: RefKind,
    pub raw_id: String,
    pub normalized_id: String,
    pub raw_text: String,
    pub volume: String,
    pub page: u32,
    pub occurrence_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterReason {
    ExternalDocument,
    RegulatoryCitation,
    SourceCitation,
    LegalCodeChapter,
}

impl FilterReason {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FilterReason::ExternalDocument => "external_document",
            FilterReason::RegulatoryCitation => "regulatory_citation",
            FilterReason::SourceCitation => "source_citation",
            FilterReason::LegalCodeChapter => "legal_code_chapter",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FilteredRecord {
    pub reference: ReferenceRecord,
    pub reason: FilterReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchVia {
    Exact,
    ParentPrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchStatus {
    Matched(MatchVia),
    Orphaned,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassifiedReference {
    pub reference: ReferenceRecord,
    pub status: MatchStatus,
}

/// Final result of a full audit: classified references, the retained
/// filter decisions, and the target inventory.
#[derive(Debug)]
pub(crate) struct AuditOutcome {
    pub matched: Vec<ClassifiedReference>,
    pub orphaned: Vec<ClassifiedReference>,
    pub filtered: Vec<FilteredRecord>,
    pub targets: Vec<TargetRecord>,
    pub candidate_count: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct AuditConfig {
    pub filter_window: usize,
    pub source_window: usize,
    pub context_window: usize,
    pub max_locations: usize,
    pub external_document_markers: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            filter_window: 200,
            source_window: 150,
            context_window: 150,
            max_locations: 5,
            external_document_markers: default_external_markers(),
        }
    }
}

// Phrases that mark a reference as pointing into another document: the
// prior site-wide statement, related NEPA documents, and their DOE ids.
pub(crate) fn default_external_markers() -> Vec<String> {
    [
        "2008 LANL SWEIS",
        "Final Site-Wide Environmental Impact Statement for Continued",
        "CT EIS",
        "Conveyance and Transfer",
        "DOE/EIS-0380",
        "DOE/EIS-0293",
        "Chromium Interim Remedy",
        "Chromium Final Remedy",
        "previous SWEIS",
        "prior SWEIS",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
