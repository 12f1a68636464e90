//! Display formatting for classification results.
//!
//! Render-time only; stored results are never rewritten.

use medscore_shared::{Flag, SCORE_MAX};

/// `"income_mismatch_flag"` -> `"Income Mismatch Flag"`.
///
/// Each underscore-separated segment gets an upper-case first letter, the
/// rest is kept as is. Re-applying is stable once no underscores remain.
pub fn format_classifier_label(raw: &str) -> String {
    raw.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_score(score: u8) -> String {
    format!("{}/{}", score, SCORE_MAX)
}

pub fn flag_label(flag: Option<Flag>) -> &'static str {
    flag.map(|f| f.label()).unwrap_or("UNFLAGGED")
}

/// Title of the single-report page.
pub fn report_heading(report_id: &str) -> String {
    format!("Report Details - {}", report_id)
}
