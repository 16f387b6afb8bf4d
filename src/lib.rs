//! Estimate the hours spent on a git repository from the timestamps of its commits.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod git;
pub mod hours;
pub mod model;
pub mod report;
pub mod timeline;
pub mod timestamp;

pub use config::EstimationConfig;
pub use error::{HoursError, Result};
pub use estimate::{estimate, GapEstimator};
pub use timeline::{build_timeline, Timeline};
