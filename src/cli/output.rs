use super::replay::{ReplayOutput, ReplaySummary};
use crate::download::messages::OutcomeKind;
use crate::filter::{FileCategory, FilterOption, PostId};

/// Format a filter verdict for display
pub fn format_verdict(option: &FilterOption, accepted: bool) -> String {
    let mut parts = Vec::new();

    if let Some(ext) = &option.ext {
        parts.push(format!("ext={} ({})", ext, FileCategory::classify(ext).name()));
    }
    if let Some(fee) = option.fee {
        parts.push(format!("fee={}", fee));
    }
    match &option.id {
        Some(PostId::Number(n)) => parts.push(format!("id={}", n)),
        Some(PostId::Text(s)) => parts.push(format!("id={}", s)),
        None => {}
    }
    if let Some(date) = &option.date {
        parts.push(format!("date={}", date));
    }

    let criteria = if parts.is_empty() {
        "(no criteria)".to_string()
    } else {
        parts.join(" ")
    };

    format!("{} {}", if accepted { "✓ accept" } else { "✗ reject" }, criteria)
}

/// Format one replay output line as JSON
pub fn format_replay_output(output: &ReplayOutput) -> String {
    serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
}

/// Human-readable replay summary
pub fn format_summary(summary: &ReplaySummary, outputs: &[ReplayOutput]) -> String {
    let failed = outputs
        .iter()
        .filter(|o| {
            matches!(o, ReplayOutput::Outcome { message, .. } if message.kind == OutcomeKind::DownloadErr)
        })
        .count();

    format!(
        "{} events, {} submitted, {} outcomes ({} failed), {} pending, {} filtered, {} skipped",
        summary.events,
        summary.submitted,
        summary.outcomes,
        failed,
        summary.pending,
        summary.filtered,
        summary.skipped
    )
}
