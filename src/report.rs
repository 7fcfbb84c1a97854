//! Diagnostic rendering for the stderr channel.
//!
//! Everything rendered here stays off stdout so the primary JSON output can
//! be piped or redirected cleanly.
use colored::*;

use crate::engine::Engine;

/// One-line run summary: how many users were read, emitted, skipped as
/// non-local, and emitted without a hash.
pub fn render_summary(engine: &Engine) -> String {
    format!(
        "{} {} user(s) read, {} merged, {} non-local skipped, {} missing a password hash",
        "auth0-merge:".bold().cyan(),
        engine.profile_count,
        engine.records.len(),
        engine.skipped_non_local(),
        engine.missing_hashes.len(),
    )
}

/// The missing-hash block: a header plus one indented email per line.
/// Returns an empty string when there is nothing to report.
pub fn render_missing_hashes(missing: &[String]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(
        &"The following users were missing from the password hash file:"
            .bold()
            .yellow()
            .to_string(),
    );
    out.push('\n');
    for email in missing {
        out.push_str("  ");
        out.push_str(email);
        out.push('\n');
    }
    out
}
