use std::path::Path;

use similar::TextDiff;

// Sections are short; two lines either side keeps the neighbouring heading
// visible without repeating whole sections.
const CONTEXT_LINES: usize = 2;

/// Renders the pending edit to `path` as a unified diff, or `None` when the
/// edit is a no-op.
pub fn unified_diff(current: &str, proposed: &str, path: &Path) -> Option<String> {
    if current == proposed {
        return None;
    }

    let label = path.display();
    let old_header = format!("{label} (current)");
    let new_header = format!("{label} (proposed)");

    // Deletes trim the document, so the final newline often disappears; the
    // `\ No newline` marker only adds noise here.
    let rendered = TextDiff::from_lines(current, proposed)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .header(&old_header, &new_header)
        .to_string();

    Some(rendered)
}
