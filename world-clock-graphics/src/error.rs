use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("No timezone configured")]
    NoTimezoneConfigured,
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
