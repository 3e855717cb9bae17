use thiserror::Error;

/// Why a deadline text could not be turned into one timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("deadline text is empty")]
    Empty,

    #[error("unrecognized expression: \"{0}\"")]
    Unrecognized(String),

    #[error("no date or time was found")]
    NoDeadline,

    /// Two parts of the text fill the same slot ("明日の明後日").
    #[error("{0} is given more than once")]
    Conflict(&'static str),

    #[error("number out of range: {0}")]
    NumberOutOfRange(String),

    #[error("no such date: {0}")]
    InvalidDate(String),

    #[error("no such time: {hour}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    /// An hour that does not fit the named part of the day ("朝20時").
    #[error("{hour}時 does not fit the stated part of the day")]
    PeriodMismatch { hour: u32 },

    /// An hour with two plausible readings ("午前12時").
    #[error("{hour}時 is ambiguous here")]
    AmbiguousHour { hour: u32 },

    #[error("the weekday does not match the date")]
    WeekdayMismatch,

    #[error("the deadline is out of the supported range")]
    OutOfRange,
}
