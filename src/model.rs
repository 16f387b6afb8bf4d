use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Serialize, Serializer};

pub const SCHEMA_VERSION: u32 = 1;

/// One line of `git log` output, split into fields but not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub id: Option<String>,
    pub author_date: String,
    pub commit_date: String,
    pub author_name: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: Option<String>,
    pub author_time: DateTime<FixedOffset>,
    pub commit_time: DateTime<FixedOffset>,
    pub author_name: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: TimeDelta,
}

impl ActivePeriod {
    pub fn starting_at(at: DateTime<FixedOffset>) -> Self {
        Self {
            start: at,
            end: at,
            duration: TimeDelta::zero(),
        }
    }
}

/// Per-commit bookkeeping emitted by the estimator when a trace is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub elapsed: Option<TimeDelta>,
    pub contribution: TimeDelta,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub record: CommitRecord,
    pub step: Step,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub total: TimeDelta,
    pub periods: Vec<ActivePeriod>,
    pub trace: Vec<TraceEntry>,
}

impl Default for Estimate {
    fn default() -> Self {
        Self {
            total: TimeDelta::zero(),
            periods: Vec::new(),
            trace: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub since: DateTime<FixedOffset>,
    pub before: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn new(since: DateTime<FixedOffset>, before: DateTime<FixedOffset>) -> Self {
        Self { since, before }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceOutput {
    pub commit_id: Option<String>,
    pub author_time: DateTime<FixedOffset>,
    pub author_name: String,
    pub subject: String,
    pub elapsed_secs: Option<i64>,
    pub contribution_secs: i64,
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoursOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub since: String,
    pub before: String,
    pub authors: Vec<String>,
    pub session_gap_secs: i64,
    pub commit_count: usize,
    pub skipped_count: usize,
    pub total_secs: i64,
    pub total: String,
    pub periods: Vec<ActivePeriod>,
    pub trace: Vec<TraceOutput>,
}

pub fn serialize_secs<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(delta.num_seconds())
}
