//! Report printed by `skill_service --check`.

use calico_core::loader::LoadReport;
use std::fmt::Write;

/// Renders the registered intents and load failures. Returns the text and
/// whether every manifest loaded.
pub fn render(report: &LoadReport) -> (String, bool) {
    let mut out = String::new();
    let _ = writeln!(out, "Loaded {} skill(s):", report.loaded.len());
    for skill in report.registry.skills() {
        match skill.answer_intent() {
            Some(answer) => {
                let _ = writeln!(out, "  {} -> {} (answer: {answer})", skill.trigger_intent(), skill.name());
            }
            None => {
                let _ = writeln!(out, "  {} -> {}", skill.trigger_intent(), skill.name());
            }
        }
    }
    if !report.skipped.is_empty() {
        let _ = writeln!(out, "Skipped {} manifest(s):", report.skipped.len());
        for path in &report.skipped {
            let _ = writeln!(out, "  {}", path.display());
        }
    }
    if !report.failures.is_empty() {
        let _ = writeln!(out, "{} manifest(s) failed:", report.failures.len());
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.path.display(), failure.error);
        }
    }
    (out, report.failures.is_empty())
}
