//! Level-2 heading sections within a markdown document.
//!
//! A section starts at a line of the form `## <name>` and runs up to, but not
//! including, the next line that starts with `## ` (or the end of the
//! document). Every call re-scans the text; nothing is cached between calls.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

const HEADING_MARKER: &str = "## ";
const LINE_PADDING: [char; 3] = [' ', '\t', '\r'];

/// Span of a located section. Offsets are byte offsets into the scanned
/// document; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text as written in the document, trailing whitespace removed.
    pub name: String,
    pub start: usize,
    /// End of the heading line, excluding its line break.
    pub heading_end: usize,
    pub end: usize,
}

impl Section {
    /// Section content with the heading line removed and surrounding
    /// whitespace trimmed.
    pub fn body<'a>(&self, document: &'a str) -> &'a str {
        document[self.heading_end..self.end].trim()
    }
}

#[derive(Debug, Clone, Copy)]
struct HeadingLine<'a> {
    start: usize,
    end: usize,
    /// Everything after the marker, trailing whitespace included.
    raw: &'a str,
    text: &'a str,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"(?m)^## [^\n]*").expect("heading pattern is valid"))
}

fn heading_lines(document: &str) -> impl Iterator<Item = HeadingLine<'_>> {
    heading_regex().find_iter(document).map(|found| {
        let raw = &found.as_str()[HEADING_MARKER.len()..];
        HeadingLine {
            start: found.start(),
            end: found.end(),
            raw,
            text: raw.trim_end_matches(LINE_PADDING),
        }
    })
}

// The heading must be `name` followed only by trailing padding, so a name that
// itself ends in whitespace still needs that whitespace on the heading line.
fn names_match(raw: &str, name: &str) -> bool {
    let raw = raw.to_lowercase();
    let name = name.to_lowercase();
    raw.strip_prefix(name.as_str())
        .is_some_and(|rest| rest.chars().all(|ch| LINE_PADDING.contains(&ch)))
}

/// Finds the first `## <name>` heading (case-insensitive, whole line) and the
/// span it owns.
pub fn locate(document: &str, name: &str) -> Option<Section> {
    let mut headings = heading_lines(document);
    let Some(heading) = headings.by_ref().find(|line| names_match(line.raw, name)) else {
        debug!(section = name, "section not present");
        return None;
    };

    let end = headings
        .next()
        .map(|next| next.start)
        .unwrap_or(document.len());

    debug!(
        section = name,
        start = heading.start,
        end,
        "located section"
    );

    Some(Section {
        name: heading.text.to_string(),
        start: heading.start,
        heading_end: heading.end,
        end,
    })
}

/// Names of every level-2 heading, in document order.
pub fn section_names(document: &str) -> Vec<String> {
    heading_lines(document)
        .map(|line| line.text.to_string())
        .collect()
}

/// Appends `## <name>` with `body` to the end of `document`.
pub fn insert(document: &str, name: &str, body: &str) -> CoreResult<String> {
    validate_name(name)?;

    if locate(document, name).is_some() {
        return Err(CoreError::DuplicateSection {
            name: name.to_string(),
        });
    }

    let existing = document.trim();
    let body = body.trim();

    let mut output = String::with_capacity(existing.len() + name.len() + body.len() + 8);
    output.push_str(existing);
    if !existing.is_empty() {
        output.push_str("\n\n");
    }
    output.push_str(HEADING_MARKER);
    output.push_str(name);
    output.push_str("\n\n");
    output.push_str(body);
    output.push('\n');

    debug!(section = name, bytes = output.len(), "inserted section");
    Ok(output)
}

/// Removes the section owned by `name`, heading included.
pub fn delete(document: &str, name: &str) -> CoreResult<String> {
    let section = require(document, name)?;

    let before = &document[..section.start];
    let after = &document[section.end..];
    let joined = collapse_seam(before, after);

    debug!(
        section = name,
        removed = section.end - section.start,
        "deleted section"
    );
    Ok(joined.trim().to_string())
}

/// Returns the trimmed body of the section owned by `name`.
pub fn extract(document: &str, name: &str) -> CoreResult<String> {
    let section = require(document, name)?;
    Ok(section.body(document).to_string())
}

fn require(document: &str, name: &str) -> CoreResult<Section> {
    locate(document, name).ok_or_else(|| CoreError::SectionNotFound {
        name: name.to_string(),
    })
}

fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.trim().is_empty() {
        "name is empty"
    } else if name.contains(['\n', '\r']) {
        "name spans more than one line"
    } else {
        return Ok(());
    };

    Err(CoreError::InvalidSectionName {
        name: name.to_string(),
        reason,
    })
}

// Joins the text either side of a removed span, shrinking a run of three or
// more newlines that straddles the join down to a single blank line.
fn collapse_seam(before: &str, after: &str) -> String {
    let head = before.trim_end_matches('\n');
    let tail = after.trim_start_matches('\n');
    let newlines = (before.len() - head.len()) + (after.len() - tail.len());

    let mut joined = String::with_capacity(before.len() + after.len());
    joined.push_str(head);
    joined.push_str(&"\n".repeat(newlines.min(2)));
    joined.push_str(tail);
    joined
}
