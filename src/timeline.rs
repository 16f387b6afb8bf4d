use crate::model::{CommitRecord, RawCommit};
use crate::timestamp::parse_git_date;
use std::collections::HashSet;
use std::ops::Deref;
use tracing::warn;

/// Commits ordered by author time, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    records: Vec<CommitRecord>,
    skipped: usize,
}

impl Timeline {
    /// Number of raw commits dropped because a timestamp could not be parsed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Deref for Timeline {
    type Target = [CommitRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

/// Concatenates batches in order, keeping the first occurrence of each commit id.
/// Commits without an id are never treated as duplicates.
pub fn merge_batches<I>(batches: I) -> Vec<RawCommit>
where
    I: IntoIterator<Item = Vec<RawCommit>>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    for raw in batches.into_iter().flatten() {
        if let Some(id) = &raw.id {
            if !seen.insert(id.clone()) {
                continue;
            }
        }
        merged.push(raw);
    }
    merged
}

pub fn normalize(raw: RawCommit) -> crate::error::Result<CommitRecord> {
    let author_time = parse_git_date(&raw.author_date)?;
    let commit_time = parse_git_date(&raw.commit_date)?;
    Ok(CommitRecord {
        id: raw.id,
        author_time,
        commit_time,
        author_name: raw.author_name,
        subject: raw.subject,
    })
}

/// Merges, normalises and sorts raw batches. Records whose dates do not parse
/// are dropped so the estimator measures straight across them.
pub fn build_timeline<I>(batches: I) -> Timeline
where
    I: IntoIterator<Item = Vec<RawCommit>>,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for raw in merge_batches(batches) {
        let id = raw.id.clone();
        match normalize(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(commit = id.as_deref().unwrap_or("<unknown>"), "Skipping commit: {e}");
            }
        }
    }

    // stable: equal author times keep encounter order
    records.sort_by(|a, b| a.author_time.cmp(&b.author_time));

    Timeline { records, skipped }
}
