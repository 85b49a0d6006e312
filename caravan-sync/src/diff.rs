//! Unified diff previews for manifest rewrites.

use similar::TextDiff;

/// Unified diff of a manifest rewrite, headed `a/<label>` / `b/<label>`.
///
/// Shown to the operator after a fix is applied so the exact change is on
/// record in the terminal.
pub fn unified_preview(label: &str, old: &str, new: &str) -> String {
    let old_header = format!("a/{label}");
    let new_header = format!("b/{label}");
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
