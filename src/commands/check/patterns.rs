use anyhow::{Context, Result};
use regex::Regex;

use super::types::RefKind;

// Identifier shapes shared between the mention and heading grammars.
// Keyword matching is case-insensitive; identifier classes are not, so an
// `S.` prefix or appendix letter must be uppercase.
const SECTION_ID: &str = r"S\.[0-9][0-9.]*|[0-9]+\.[0-9.]+";
const CHAPTER_ID: &str = r"[0-9]+";
const LABEL_ID: &str = r"[A-Z]?\.?[0-9][0-9.]*[-\u{2013}\u{2014}][0-9]+";
const APPENDIX_ID: &str = r"[A-Z]";

/// One reference-mention rule: the keyword-led pattern and the
/// continuation pattern used to split compound mentions such as
/// "Tables A.3.5-1 and A.3.5-2" into one candidate per identifier.
#[derive(Debug)]
pub(crate) struct ReferenceRule {
    pub kind: RefKind,
    pub mention: Regex,
    pub continuation: Regex,
}

#[derive(Debug)]
pub(crate) struct ReferencePatterns {
    pub rules: Vec<ReferenceRule>,
}

impl ReferencePatterns {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            rules: vec![
                reference_rule(RefKind::Section, r"(?i:sections?)", SECTION_ID, "")?,
                reference_rule(RefKind::Chapter, r"(?i:chapters?)", CHAPTER_ID, r"\b")?,
                reference_rule(RefKind::Table, r"(?i:tables?)", LABEL_ID, "")?,
                reference_rule(RefKind::Figure, r"(?i:figures?)", LABEL_ID, "")?,
                reference_rule(RefKind::Appendix, r"(?i:appendi(?:x|ces))", APPENDIX_ID, r"\b")?,
            ],
        })
    }
}

fn reference_rule(
    kind: RefKind,
    keyword: &str,
    id_pattern: &str,
    trailing: &str,
) -> Result<ReferenceRule> {
    // The keyword/identifier separator is `\s+`, so an identifier pushed
    // onto the next line by a wrap is still recognized.
    let mention = Regex::new(&format!(r"{keyword}\s+({id_pattern}){trailing}"))
        .with_context(|| format!("failed to compile {} mention regex", kind.as_str()))?;
    let continuation = Regex::new(&format!(
        r"^(?:\s*,\s*(?:and\s+)?|\s+and\s+)({id_pattern}){trailing}"
    ))
    .with_context(|| format!("failed to compile {} continuation regex", kind.as_str()))?;

    Ok(ReferenceRule {
        kind,
        mention,
        continuation,
    })
}

/// Heading and label grammars. All rules are anchored to the start of a
/// line, which is what distinguishes a structural heading from body
/// prose; the separator after the identifier is horizontal whitespace
/// only, so a heading whose numeral and title are split across a line
/// break is not recognized (unlike the mention grammar above).
#[derive(Debug)]
pub(crate) struct TargetPatterns {
    pub section_heading: Regex,
    pub chapter_heading: Regex,
    pub table_label: Regex,
    pub figure_label: Regex,
    pub appendix_header: Regex,
}

impl TargetPatterns {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            section_heading: Regex::new(&format!(r"(?m)^[ \t]*({SECTION_ID})[ \t]+[A-Z]"))
                .context("failed to compile section heading regex")?,
            chapter_heading: Regex::new(r"(?m)^[ \t]*(?:CHAPTER|Chapter)[ \t]+([0-9]+)\b")
                .context("failed to compile chapter heading regex")?,
            table_label: Regex::new(&format!(r"(?m)^[ \t]*(?i:table)[ \t]+({LABEL_ID})"))
                .context("failed to compile table label regex")?,
            figure_label: Regex::new(&format!(r"(?m)^[ \t]*(?i:figure)[ \t]+({LABEL_ID})"))
                .context("failed to compile figure label regex")?,
            appendix_header: Regex::new(r"(?m)^[ \t]*(?:APPENDIX|Appendix)[ \t]+([A-Z])\b")
                .context("failed to compile appendix header regex")?,
        })
    }
}
