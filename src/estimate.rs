//! Session-gap estimation over an ordered commit timeline.
//!
//! Every commit after the first contributes the time since the previous
//! commit's author time. Gaps below `session_gap * gap_multiplier` are taken
//! as continuous work; anything longer only counts `session_gap`, the assumed
//! length of the session that ended in the commit. When the author time goes
//! backwards the commit time stands in for it, clamped at zero.

use crate::config::EstimationConfig;
use crate::model::{ActivePeriod, CommitRecord, Estimate, Step, TraceEntry};
use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::debug;

/// Fold state threaded through the timeline.
#[derive(Debug, Clone)]
pub struct GapEstimator {
    session_gap: TimeDelta,
    continuity_limit: TimeDelta,
    track_periods: bool,
    previous: Option<DateTime<FixedOffset>>,
    total: TimeDelta,
    current: Option<ActivePeriod>,
    closed: Vec<ActivePeriod>,
}

impl GapEstimator {
    pub fn new(config: &EstimationConfig) -> Self {
        Self {
            session_gap: config.session_gap,
            continuity_limit: config.continuity_limit(),
            track_periods: config.emit_periods,
            previous: None,
            total: TimeDelta::zero(),
            current: None,
            closed: Vec::new(),
        }
    }

    pub fn total(&self) -> TimeDelta {
        self.total
    }

    pub fn push(&mut self, record: &CommitRecord) -> Step {
        let Some(previous) = self.previous else {
            self.previous = Some(record.author_time);
            if self.track_periods {
                self.current = Some(ActivePeriod::starting_at(record.author_time));
            }
            return Step {
                elapsed: None,
                contribution: TimeDelta::zero(),
                used_fallback: false,
            };
        };

        let mut elapsed = record.author_time - previous;
        let mut used_fallback = false;
        if elapsed < TimeDelta::zero() {
            used_fallback = true;
            elapsed = (record.commit_time - previous).max(TimeDelta::zero());
            debug!(
                commit = record.id.as_deref().unwrap_or("<unknown>"),
                elapsed_secs = elapsed.num_seconds(),
                "Author time regressed, using commit time"
            );
        }

        let continuous = elapsed < self.continuity_limit;
        let contribution = if continuous { elapsed } else { self.session_gap };

        if self.track_periods {
            self.advance_period(record.author_time, elapsed, continuous && !used_fallback);
        }

        self.total += contribution;
        self.previous = Some(record.author_time);

        Step {
            elapsed: Some(elapsed),
            contribution,
            used_fallback,
        }
    }

    fn advance_period(&mut self, at: DateTime<FixedOffset>, elapsed: TimeDelta, extends: bool) {
        match self.current.as_mut() {
            Some(period) if extends => {
                period.end = at;
                period.duration += elapsed;
            }
            _ => {
                if let Some(period) = self.current.take() {
                    debug!(start = %period.start, end = %period.end, "Closing active period");
                    self.closed.push(period);
                }
                self.current = Some(ActivePeriod::starting_at(at));
            }
        }
    }

    /// Closes any open period and returns the total with the closed periods.
    pub fn finish(mut self) -> (TimeDelta, Vec<ActivePeriod>) {
        if let Some(period) = self.current.take() {
            self.closed.push(period);
        }
        (self.total, self.closed)
    }
}

/// Runs the estimator over `records`, which are expected in timeline order.
pub fn estimate(records: &[CommitRecord], config: &EstimationConfig) -> Estimate {
    let mut estimator = GapEstimator::new(config);
    let mut trace = Vec::new();

    for record in records {
        let step = estimator.push(record);
        if config.debug_trace {
            trace.push(TraceEntry {
                record: record.clone(),
                step,
            });
        }
    }

    let (total, periods) = estimator.finish();
    Estimate {
        total,
        periods,
        trace,
    }
}
