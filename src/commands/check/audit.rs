use std::collections::BTreeMap;

use anyhow::Result;

use crate::model::KindCounts;

use super::extract::{extract_references, extract_targets};
use super::filter::FalsePositiveFilter;
use super::matching::classify_references;
use super::normalize::normalize_identifier;
use super::patterns::{ReferencePatterns, TargetPatterns};
use super::types::{
    AuditConfig, AuditError, AuditOutcome, ClassifiedReference, FilterReason, FilteredRecord,
    Occurrence, PageRecord, RawReference, RefKind, ReferenceRecord, TargetRecord,
};

/// Owns the accumulating reference/target collections for one audit run.
/// Pages are ingested one at a time in document order; classification
/// runs only in `finish`, after every page of every volume has been
/// seen, because a reference in one volume may be satisfied by a target
/// defined in another.
#[derive(Debug)]
pub(crate) struct ReferenceAudit {
    config: AuditConfig,
    reference_patterns: ReferencePatterns,
    target_patterns: TargetPatterns,
    filter: FalsePositiveFilter,
    references: BTreeMap<(RefKind, String), ReferenceRecord>,
    filtered: BTreeMap<(RefKind, String), FilteredRecord>,
    targets: BTreeMap<(RefKind, String), TargetRecord>,
    candidate_count: usize,
}

impl ReferenceAudit {
    pub(crate) fn new(config: AuditConfig) -> Result<Self> {
        let filter = FalsePositiveFilter::new(&config)?;
        Ok(Self {
            config,
            reference_patterns: ReferencePatterns::new()?,
            target_patterns: TargetPatterns::new()?,
            filter,
            references: BTreeMap::new(),
            filtered: BTreeMap::new(),
            targets: BTreeMap::new(),
            candidate_count: 0,
        })
    }

    pub(crate) fn ingest_page(&mut self, page: &PageRecord) -> Result<(), AuditError> {
        if page.page == 0 {
            return Err(AuditError::InvalidInput {
                volume: page.volume.clone(),
                page: page.page,
                reason: "page numbers are 1-based".to_string(),
            });
        }
        if page.volume.trim().is_empty() {
            return Err(AuditError::InvalidInput {
                volume: page.volume.clone(),
                page: page.page,
                reason: "missing volume identifier".to_string(),
            });
        }

        for target in extract_targets(&self.target_patterns, &page.text) {
            let normalized_id = normalize_identifier(&target.raw_id);
            if normalized_id.is_empty() {
                continue;
            }
            self.merge_target(target.kind, target.raw_id, normalized_id, target.raw_text, page);
        }

        let candidates =
            extract_references(&self.reference_patterns, &page.text, self.config.context_window);
        for candidate in candidates {
            self.candidate_count += 1;
            let normalized_id = normalize_identifier(&candidate.raw_id);
            if normalized_id.is_empty() {
                continue;
            }

            match self
                .filter
                .evaluate(&page.text, candidate.span, candidate.kind)
            {
                Some(reason) => self.merge_filtered(candidate, normalized_id, reason, page),
                None => self.merge_reference(candidate, normalized_id, page),
            }
        }

        Ok(())
    }

    pub(crate) fn finish(self) -> AuditOutcome {
        let (matched, orphaned) = classify_references(self.references, &self.targets);

        AuditOutcome {
            matched,
            orphaned,
            filtered: self.filtered.into_values().collect(),
            targets: self.targets.into_values().collect(),
            candidate_count: self.candidate_count,
        }
    }

    fn merge_target(
        &mut self,
        kind: RefKind,
        raw_id: String,
        normalized_id: String,
        raw_text: String,
        page: &PageRecord,
    ) {
        let entry = self
            .targets
            .entry((kind, normalized_id.clone()))
            .or_insert_with(|| TargetRecord {
                kind,
                raw_id,
                normalized_id,
                raw_text,
                volume: page.volume.clone(),
                page: page.page,
                occurrence_count: 0,
            });
        entry.occurrence_count += 1;
    }

    fn merge_reference(&mut self, candidate: RawReference, normalized_id: String, page: &PageRecord) {
        let max_locations = self.config.max_locations;
        let entry = self
            .references
            .entry((candidate.kind, normalized_id.clone()))
            .or_insert_with(|| new_record(candidate, normalized_id));

        entry.occurrence_count += 1;
        if entry.locations.len() < max_locations {
            entry.locations.push(Occurrence {
                volume: page.volume.clone(),
                page: page.page,
            });
        }
    }

    fn merge_filtered(
        &mut self,
        candidate: RawReference,
        normalized_id: String,
        reason: FilterReason,
        page: &PageRecord,
    ) {
        let max_locations = self.config.max_locations;
        let entry = self
            .filtered
            .entry((candidate.kind, normalized_id.clone()))
            .or_insert_with(|| FilteredRecord {
                reference: new_record(candidate, normalized_id),
                reason,
            });

        entry.reference.occurrence_count += 1;
        if entry.reference.locations.len() < max_locations {
            entry.reference.locations.push(Occurrence {
                volume: page.volume.clone(),
                page: page.page,
            });
        }
    }
}

fn new_record(candidate: RawReference, normalized_id: String) -> ReferenceRecord {
    ReferenceRecord {
        kind: candidate.kind,
        raw_id: candidate.raw_id,
        normalized_id,
        raw_text: candidate.raw_text,
        context: candidate.context,
        occurrence_count: 0,
        locations: Vec::new(),
    }
}

/// Per-kind summary counts for the report header and the run manifest.
pub(crate) fn summarize_by_kind(outcome: &AuditOutcome) -> Vec<KindCounts> {
    RefKind::ALL
        .iter()
        .map(|&kind| {
            let matched = count_kind(&outcome.matched, kind);
            let orphaned = count_kind(&outcome.orphaned, kind);
            let filtered = outcome
                .filtered
                .iter()
                .filter(|record| record.reference.kind == kind)
                .count();
            let targets = outcome
                .targets
                .iter()
                .filter(|target| target.kind == kind)
                .count();

            KindCounts {
                kind: kind.as_str().to_string(),
                references: matched + orphaned,
                targets,
                matched,
                orphaned,
                filtered,
            }
        })
        .collect()
}

fn count_kind(classified: &[ClassifiedReference], kind: RefKind) -> usize {
    classified
        .iter()
        .filter(|entry| entry.reference.kind == kind)
        .count()
}
