use crate::error::{HoursError, Result};
use crate::model::DateRange;
use chrono::TimeDelta;
use std::time::Duration;

pub const DEFAULT_SESSION_GAP: &str = "1h";

/// Gaps shorter than `session_gap * multiplier` count as continuous work.
pub const DEFAULT_GAP_MULTIPLIER: u32 = 2;

/// Which history `git log` walks for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Head,
    AllBranches,
    Reflog,
    AllReflogs,
}

impl LogSource {
    pub fn git_args(self) -> &'static [&'static str] {
        match self {
            LogSource::Head => &[],
            LogSource::AllBranches => &["--all"],
            LogSource::Reflog => &["--walk-reflogs"],
            LogSource::AllReflogs => &["--walk-reflogs", "--all"],
        }
    }

    /// Batches to run, in order, for the `--all` / `--reflog` combination.
    pub fn plan(all_branches: bool, reflog: bool) -> Vec<LogSource> {
        match (all_branches, reflog) {
            (true, true) => vec![LogSource::AllBranches, LogSource::AllReflogs],
            (true, false) => vec![LogSource::AllBranches],
            (false, true) => vec![LogSource::Reflog],
            (false, false) => vec![LogSource::Head],
        }
    }
}

#[derive(Debug, Clone)]
pub struct EstimationConfig {
    pub range: DateRange,
    pub authors: Vec<String>,
    pub session_gap: TimeDelta,
    pub gap_multiplier: u32,
    pub emit_periods: bool,
    pub debug_trace: bool,
    pub sources: Vec<LogSource>,
}

impl EstimationConfig {
    pub fn new(range: DateRange, session_gap: TimeDelta) -> Self {
        Self {
            range,
            authors: Vec::new(),
            session_gap,
            gap_multiplier: DEFAULT_GAP_MULTIPLIER,
            emit_periods: false,
            debug_trace: false,
            sources: vec![LogSource::Head],
        }
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_gap_multiplier(mut self, multiplier: u32) -> Result<Self> {
        if multiplier == 0 {
            return Err(HoursError::InvalidDuration(
                "gap multiplier must be at least 1".to_string(),
            ));
        }
        i32::try_from(multiplier)
            .ok()
            .and_then(|m| self.session_gap.checked_mul(m))
            .ok_or_else(|| {
                HoursError::InvalidDuration(format!(
                    "gap multiplier {multiplier} overflows the session gap"
                ))
            })?;
        self.gap_multiplier = multiplier;
        Ok(self)
    }

    pub fn with_periods(mut self, emit_periods: bool) -> Self {
        self.emit_periods = emit_periods;
        self
    }

    pub fn with_debug_trace(mut self, debug_trace: bool) -> Self {
        self.debug_trace = debug_trace;
        self
    }

    pub fn with_sources(mut self, sources: Vec<LogSource>) -> Self {
        self.sources = sources;
        self
    }

    /// Gaps at or above this are capped to `session_gap`.
    pub fn continuity_limit(&self) -> TimeDelta {
        i32::try_from(self.gap_multiplier)
            .ok()
            .and_then(|m| self.session_gap.checked_mul(m))
            .unwrap_or(TimeDelta::MAX)
    }
}

pub fn parse_session_gap(input: &str) -> Result<TimeDelta> {
    let std_duration: Duration = humantime::parse_duration(input.trim())
        .map_err(|e| HoursError::InvalidDuration(format!("'{input}': {e}")))?;
    if std_duration.is_zero() {
        return Err(HoursError::InvalidDuration(format!(
            "'{input}': session gap must be greater than zero"
        )));
    }
    TimeDelta::from_std(std_duration)
        .map_err(|e| HoursError::InvalidDuration(format!("'{input}': {e}")))
}

/// Splits `--author "Adam,Jon"` into trimmed, non-empty names.
pub fn split_authors(input: Option<&str>) -> Vec<String> {
    input
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn range() -> DateRange {
        DateRange::new(
            DateTime::parse_from_rfc3339("2024-03-01T00:00:00+00:00").unwrap(),
            DateTime::parse_from_rfc3339("2024-03-31T23:59:59+00:00").unwrap(),
        )
    }

    #[test]
    fn session_gap_accepts_humantime() {
        assert_eq!(parse_session_gap("1h").unwrap(), TimeDelta::hours(1));
        assert_eq!(parse_session_gap("90m").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_session_gap(" 1h 30m ").unwrap(), TimeDelta::minutes(90));
    }

    #[test]
    fn session_gap_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_session_gap("0s"),
            Err(HoursError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_session_gap("soon"),
            Err(HoursError::InvalidDuration(_))
        ));
    }

    #[test]
    fn authors_are_split_on_commas() {
        assert_eq!(split_authors(Some("Adam, Jon,,")), vec!["Adam", "Jon"]);
        assert!(split_authors(None).is_empty());
    }

    #[test]
    fn source_plan_matches_flags() {
        assert_eq!(LogSource::plan(false, false), vec![LogSource::Head]);
        assert_eq!(LogSource::plan(true, false), vec![LogSource::AllBranches]);
        assert_eq!(LogSource::plan(false, true), vec![LogSource::Reflog]);
        assert_eq!(
            LogSource::plan(true, true),
            vec![LogSource::AllBranches, LogSource::AllReflogs]
        );
        assert_eq!(
            LogSource::AllReflogs.git_args(),
            &["--walk-reflogs", "--all"][..]
        );
    }

    #[test]
    fn continuity_limit_scales_with_multiplier() {
        let config = EstimationConfig::new(range(), TimeDelta::hours(1));
        assert_eq!(config.continuity_limit(), TimeDelta::hours(2));

        let config = config.with_gap_multiplier(3).unwrap();
        assert_eq!(config.continuity_limit(), TimeDelta::hours(3));
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let config = EstimationConfig::new(range(), TimeDelta::hours(1));
        assert!(config.with_gap_multiplier(0).is_err());
    }

    #[test]
    fn oversized_multiplier_is_rejected() {
        let config = EstimationConfig::new(range(), TimeDelta::hours(1));
        assert!(matches!(
            config.clone().with_gap_multiplier(3_000_000_000),
            Err(HoursError::InvalidDuration(_))
        ));
        assert!(config.with_gap_multiplier(u32::MAX).is_err());
    }

    #[test]
    fn large_multiplier_keeps_gaps_continuous() {
        let config = EstimationConfig::new(range(), TimeDelta::hours(1))
            .with_gap_multiplier(1_000_000)
            .unwrap();
        assert_eq!(config.continuity_limit(), TimeDelta::hours(1_000_000));
        assert!(config.continuity_limit() > TimeDelta::zero());

        // a multiplier set directly on the field saturates instead of wrapping
        let mut raw = config;
        raw.gap_multiplier = 3_000_000_000;
        assert_eq!(raw.continuity_limit(), TimeDelta::MAX);
    }
}
