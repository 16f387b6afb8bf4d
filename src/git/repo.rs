use crate::config::{EstimationConfig, LogSource};
use crate::error::{HoursError, Result};
use crate::model::{DateRange, RawCommit};
use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use gix::{discover, Repository};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, warn};

/// Pretty format consumed by [`parse_log_line`]: hash, author date, commit date, author, subject.
pub const LOG_FORMAT: &str = "--pretty=format:%H|%ad|%cd|%an|%s";

const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Which end of a date range an input describes. A bare day means its first
/// second for `Since` and its last second for `Before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Since,
    Before,
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!("Opened git repository at {}", path.display());

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `--since`/`--before`, defaulting to the previous calendar month.
    pub fn resolve_range(&self, since: Option<&str>, before: Option<&str>) -> Result<DateRange> {
        let (first_day, last_day) = previous_month(Local::now().date_naive());

        let since_dt = match since {
            Some(s) => self.parse_bound(s, Bound::Since)?,
            None => local_day_bound(first_day, Bound::Since)?,
        };
        let before_dt = match before {
            Some(b) => self.parse_bound(b, Bound::Before)?,
            None => local_day_bound(last_day, Bound::Before)?,
        };

        if since_dt > before_dt {
            return Err(HoursError::InvalidDate(format!(
                "Invalid range: since ({}) is after before ({})",
                since_dt.format(GIT_DATE_FORMAT),
                before_dt.format(GIT_DATE_FORMAT)
            )));
        }

        Ok(DateRange::new(since_dt, before_dt))
    }

    fn parse_bound(&self, input: &str, bound: Bound) -> Result<DateTime<FixedOffset>> {
        if let Some(dt) = parse_date_input(input, bound) {
            return Ok(dt);
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| HoursError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| HoursError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| HoursError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Run one `git log` query and split its output into raw commits.
    pub fn log(&self, source: LogSource, config: &EstimationConfig) -> Result<Vec<RawCommit>> {
        let args = log_args(source, config);
        debug!(?args, "Running git");

        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.path)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => HoursError::GitNotFound,
                _ => HoursError::Io(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(HoursError::GitCommand {
                args: args.join(" "),
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            warn!("git: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_log_output(&stdout))
    }
}

/// Argument vector for `git`, without the program name.
pub fn log_args(source: LogSource, config: &EstimationConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["--no-pager".into(), "log".into()];
    args.extend(source.git_args().iter().map(|a| a.to_string()));
    args.push("--date=iso-local".into());
    args.push(LOG_FORMAT.into());
    if let Some(pattern) = author_pattern(&config.authors) {
        args.push(format!("--author={pattern}"));
    }
    args.push(format!("--since={}", config.range.since.format(GIT_DATE_FORMAT)));
    args.push(format!("--before={}", config.range.before.format(GIT_DATE_FORMAT)));
    args
}

/// Several names become a basic-regex alternation: `\(Adam\)\|\(Jon\)`.
pub fn author_pattern(authors: &[String]) -> Option<String> {
    match authors {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(format!(r"\({}\)", many.join(r"\)\|\("))),
    }
}

pub fn parse_log_output(stdout: &str) -> Vec<RawCommit> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_log_line(line);
            if parsed.is_none() {
                warn!("Ignoring unexpected git log line: {line:?}");
            }
            parsed
        })
        .collect()
}

/// Expected format: hash|author date|commit date|author|subject.
/// The subject may itself contain `|`.
pub fn parse_log_line(line: &str) -> Option<RawCommit> {
    let parts: Vec<&str> = line.splitn(5, '|').collect();
    if parts.len() < 5 {
        return None;
    }

    let hash = parts[0].trim();
    Some(RawCommit {
        id: (!hash.is_empty()).then(|| hash.to_string()),
        author_date: parts[1].to_string(),
        commit_date: parts[2].to_string(),
        author_name: parts[3].to_string(),
        subject: parts[4].to_string(),
    })
}

/// Dates that can be resolved without the repository.
pub fn parse_date_input(input: &str, bound: Bound) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();

    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }

    // YYYY-MM-DD HH:MM:SS +ZZZZ, as git prints it
    if let Ok(dt) = DateTime::parse_from_str(input, GIT_DATE_FORMAT) {
        return Some(dt);
    }

    // YYYY-MM-DD HH:MM:SS in the local zone
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest().map(|dt| dt.fixed_offset());
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return local_day_bound(date, bound).ok();
    }

    // Relative duration (e.g. "2 weeks ago")
    if let Some(duration) = parse_natural_duration(input) {
        let ago = chrono::TimeDelta::from_std(duration).ok()?;
        return Local::now().fixed_offset().checked_sub_signed(ago);
    }

    None
}

/// First day and last day of the month before `today`.
pub fn previous_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let last_of_previous = first_of_month.pred_opt().unwrap_or(first_of_month);
    let first_of_previous = last_of_previous.with_day(1).unwrap_or(last_of_previous);
    (first_of_previous, last_of_previous)
}

fn local_day_bound(date: NaiveDate, bound: Bound) -> Result<DateTime<FixedOffset>> {
    let time = match bound {
        Bound::Since => NaiveTime::MIN,
        Bound::Before => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    };
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| HoursError::InvalidDate(format!("{date} has no local representation")))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    for (suffix, unit_secs) in [
        (" days ago", 86400),
        (" weeks ago", 7 * 86400),
        (" months ago", 30 * 86400),
    ] {
        if let Some(count) = input.strip_suffix(suffix) {
            if let Ok(n) = count.trim().parse::<u64>() {
                return n.checked_mul(unit_secs).map(Duration::from_secs);
            }
        }
    }

    None
}
