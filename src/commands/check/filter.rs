use anyhow::{Context, Result};
use regex::Regex;

use super::types::{AuditConfig, FilterReason, RefKind};
use super::window::{window_after, window_around, window_before};

/// Chain of independent keep/drop predicates over the text surrounding a
/// reference candidate. Each rule is named; the first rule that fires
/// supplies the drop reason. No rule consults the normalized identifier
/// or the target set, and none of them can fail: ambiguous context falls
/// through to Keep so a questionable reference still reaches the report.
#[derive(Debug)]
pub(crate) struct FalsePositiveFilter {
    external_document: Regex,
    external_trailing: Regex,
    regulatory_citation: Regex,
    source_citation: Regex,
    legal_code: Regex,
    filter_window: usize,
    source_window: usize,
}

impl FalsePositiveFilter {
    pub(crate) fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            external_document: external_document_regex(&config.external_document_markers)?,
            external_trailing: Regex::new(r"(?i)of\s+the\s+(?:Final|2008|previous)")
                .context("failed to compile trailing external-document regex")?,
            regulatory_citation: Regex::new(
                r"(?i)[0-9]+\s+CFR|[0-9]+\s+U\.?S\.?C\.?|[0-9]+\s+FR\s+[0-9]+|Executive\s+Order|DOE\s+Order",
            )
            .context("failed to compile regulatory citation regex")?,
            source_citation: Regex::new(r"(?i)Source:\s*\w+\s*\([0-9]{4}")
                .context("failed to compile source citation regex")?,
            legal_code: Regex::new(
                r"(?i)Code\s+of\s+Ordinances?|\bU\.?S\.?C\.?\b|United\s+States\s+Code",
            )
            .context("failed to compile legal code regex")?,
            filter_window: config.filter_window,
            source_window: config.source_window,
        })
    }

    /// Decide Keep (None) or Drop (reason) for a candidate at `span` in
    /// the raw page text.
    pub(crate) fn evaluate(
        &self,
        text: &str,
        span: (usize, usize),
        kind: RefKind,
    ) -> Option<FilterReason> {
        let around = window_around(text, span, self.filter_window);
        if self.external_document.is_match(around) {
            return Some(FilterReason::ExternalDocument);
        }

        // "Section 4.2 of the Final ..." reads forward past the match.
        let after = window_after(text, span.1, 80);
        if self.external_trailing.is_match(after) {
            return Some(FilterReason::ExternalDocument);
        }

        if self.regulatory_citation.is_match(around) {
            return Some(FilterReason::RegulatoryCitation);
        }

        if matches!(kind, RefKind::Table | RefKind::Figure) {
            let before = window_before(text, span.0, self.source_window);
            if self.source_citation.is_match(before) {
                return Some(FilterReason::SourceCitation);
            }
        }

        if kind == RefKind::Chapter {
            let before = window_before(text, span.0, self.source_window);
            if self.legal_code.is_match(before) {
                return Some(FilterReason::LegalCodeChapter);
            }
        }

        None
    }
}

fn external_document_regex(markers: &[String]) -> Result<Regex> {
    let mut alternatives: Vec<String> = markers
        .iter()
        .filter(|marker| !marker.trim().is_empty())
        .map(|marker| {
            marker
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<String>>()
                .join(r"\s+")
        })
        .collect();

    // Environmental-assessment ids are numbered, so they stay a pattern
    // rather than a configured phrase.
    alternatives.push(r"DOE/EA-[0-9]+".to_string());

    Regex::new(&format!("(?i:{})", alternatives.join("|")))
        .context("failed to compile external document marker regex")
}
