//! Column label normalization: flatten hierarchical headers and sanitize
//! every label down to `[a-z0-9_]`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::domain::{ColumnLabel, Table};

static NON_LABEL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").unwrap());
static REPEATED_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Result of a label normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Distinct original labels that collapsed to the same sanitized label,
    /// keyed by the colliding sanitized name. Collisions are disambiguated
    /// with a numeric suffix, never merged.
    pub collisions: Vec<String>,
}

/// Sanitize a single label: lowercase, trim, spaces to underscores, strip
/// anything outside `[a-z0-9_]`, collapse repeated underscores, trim
/// boundary underscores. Always succeeds; may produce an empty label.
pub fn sanitize_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let spaced = lowered.trim().replace(' ', "_");
    let stripped = NON_LABEL_CHARS.replace_all(&spaced, "");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

/// Rewrite every column label in place. Hierarchical labels are flattened by
/// joining their levels with `_` before sanitization. Row order and values
/// are untouched and the label count is preserved.
pub fn normalize_labels(table: &mut Table) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(table.n_cols());

    for label in table.labels() {
        let sanitized = sanitize_label(&label.flatten());
        let count = seen.entry(sanitized.clone()).or_insert(0);
        *count += 1;
        let unique = if *count == 1 {
            sanitized
        } else {
            outcome.collisions.push(sanitized.clone());
            format!("{}_{}", sanitized, count)
        };
        labels.push(ColumnLabel::single(unique));
    }

    table.set_labels(labels);
    outcome
}
