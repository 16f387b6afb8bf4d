pub mod repo;

pub use repo::{author_pattern, log_args, parse_log_line, parse_log_output, GitRepo};
