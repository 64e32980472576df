//! Unified diffs for previewing file rewrites

use similar::TextDiff;

/// Render a unified diff of `old` -> `new` labelled with `label`.
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(label: &str, old: &str, new: &str) -> String {
  if old == new {
    return String::new();
  }

  let diff = TextDiff::from_lines(old, new);
  let (before, after) = (format!("a/{}", label), format!("b/{}", label));
  diff
    .unified_diff()
    .context_radius(2)
    .header(&before, &after)
    .to_string()
}
