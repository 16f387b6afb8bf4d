use thiserror::Error;

pub type Result<T> = std::result::Result<T, HoursError>;

#[derive(Error, Debug)]
pub enum HoursError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("git is not installed or not found in PATH")]
    GitNotFound,
    #[error("git {args} failed: {stderr}")]
    GitCommand { args: String, stderr: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for HoursError {
    fn from(err: gix::discover::Error) -> Self {
        HoursError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for HoursError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        HoursError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for HoursError {
    fn from(err: gix::object::commit::Error) -> Self {
        HoursError::Commit(Box::new(err))
    }
}
