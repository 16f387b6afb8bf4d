use crate::cli::CommonArgs;
use crate::config::{parse_session_gap, split_authors, EstimationConfig, LogSource};
use crate::estimate::estimate;
use crate::git::GitRepo;
use crate::model::RawCommit;
use crate::report::{build_output, output_json, output_text};
use crate::timeline::build_timeline;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let config = build_config(&repo, &common)?;

    let batches = fetch_batches(&repo, &config, !json)?;
    let timeline = build_timeline(batches);
    info!(commits = timeline.len(), skipped = timeline.skipped(), "Timeline built");

    let result = estimate(&timeline, &config);
    debug!(
        total_secs = result.total.num_seconds(),
        periods = result.periods.len(),
        "Estimated"
    );

    if json {
        let output = build_output(
            &result,
            &config,
            repo.path(),
            timeline.len(),
            timeline.skipped(),
        );
        output_json(&output)?;
    } else {
        output_text(&result, &config)?;
    }

    Ok(())
}

fn build_config(repo: &GitRepo, common: &CommonArgs) -> anyhow::Result<EstimationConfig> {
    let range = repo
        .resolve_range(common.since.as_deref(), common.before.as_deref())
        .context("Failed to resolve date range")?;
    let session_gap = parse_session_gap(&common.duration).context("Invalid --duration")?;

    let config = EstimationConfig::new(range, session_gap)
        .with_authors(split_authors(common.author.as_deref()))
        .with_gap_multiplier(common.multiplier)
        .context("Invalid --multiplier")?
        .with_periods(common.periods)
        .with_debug_trace(common.debug)
        .with_sources(LogSource::plan(common.all, common.reflog));
    Ok(config)
}

/// One `git log` run per planned source, in order.
pub fn fetch_batches(
    repo: &GitRepo,
    config: &EstimationConfig,
    show_progress: bool,
) -> anyhow::Result<Vec<Vec<RawCommit>>> {
    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut batches = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        pb.set_message(format!("Reading git log ({source:?})..."));
        let batch = repo
            .log(*source, config)
            .with_context(|| format!("Failed to read git log ({source:?})"))?;
        debug!(?source, commits = batch.len(), "Fetched batch");
        batches.push(batch);
        pb.tick();
    }
    pb.finish_and_clear();

    Ok(batches)
}
