use crate::config::EstimationConfig;
use crate::model::{Estimate, HoursOutput, TraceEntry, TraceOutput, SCHEMA_VERSION};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta, Utc};
use console::style;
use std::fmt::Write;
use std::path::Path;

const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Human-readable span such as `3h 10m`. Negative spans print as `0s`.
pub fn format_span(delta: TimeDelta) -> String {
    let std_duration = delta.to_std().unwrap_or_default();
    humantime::format_duration(std_duration).to_string()
}

pub fn format_bound(dt: &DateTime<FixedOffset>) -> String {
    dt.format(BOUND_FORMAT).to_string()
}

fn format_instant(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render_trace_entry(out: &mut String, entry: &TraceEntry) {
    let elapsed = entry
        .step
        .elapsed
        .map(format_span)
        .unwrap_or_else(|| "N/A".to_string());
    let marker = if entry.step.used_fallback { " [fallback]" } else { "" };
    let record = &entry.record;

    let _ = writeln!(out, "{} (+{}) >{}", elapsed, format_span(entry.step.contribution), marker);
    let _ = writeln!(
        out,
        "\t {} {} {} {} {}",
        record.id.as_deref().unwrap_or("-"),
        format_bound(&record.author_time),
        format_bound(&record.commit_time),
        record.author_name,
        record.subject
    );
}

pub fn render_text(estimate: &Estimate, config: &EstimationConfig) -> String {
    let mut out = String::new();

    for entry in &estimate.trace {
        render_trace_entry(&mut out, entry);
    }

    if config.emit_periods {
        let _ = writeln!(out, "{}", style("Active periods:").bold());
        for (i, period) in estimate.periods.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:2}. {} -> {} : {}",
                i + 1,
                format_instant(&period.start),
                format_instant(&period.end),
                format_span(period.duration)
            );
        }
    }

    let _ = writeln!(
        out,
        "From {:?} to {:?} : {}",
        format_bound(&config.range.since),
        format_bound(&config.range.before),
        style(format_span(estimate.total)).cyan()
    );
    out
}

pub fn build_output(
    estimate: &Estimate,
    config: &EstimationConfig,
    repository_path: &Path,
    commit_count: usize,
    skipped_count: usize,
) -> HoursOutput {
    HoursOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string_lossy().to_string(),
        since: format_bound(&config.range.since),
        before: format_bound(&config.range.before),
        authors: config.authors.clone(),
        session_gap_secs: config.session_gap.num_seconds(),
        commit_count,
        skipped_count,
        total_secs: estimate.total.num_seconds(),
        total: format_span(estimate.total),
        periods: estimate.periods.clone(),
        trace: estimate
            .trace
            .iter()
            .map(|entry| TraceOutput {
                commit_id: entry.record.id.clone(),
                author_time: entry.record.author_time,
                author_name: entry.record.author_name.clone(),
                subject: entry.record.subject.clone(),
                elapsed_secs: entry.step.elapsed.map(|e| e.num_seconds()),
                contribution_secs: entry.step.contribution.num_seconds(),
                fallback: entry.step.used_fallback,
            })
            .collect(),
    }
}

pub fn output_text(estimate: &Estimate, config: &EstimationConfig) -> anyhow::Result<()> {
    print!("{}", render_text(estimate, config));
    Ok(())
}

pub fn output_json(output: &HoursOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}
