use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("cannot draw {count} unique numbers, the range only holds {available}")]
    CountExceedsRange { count: usize, available: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("expected {expected} numbers, got {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("number {value} is outside {min}..={max}")]
    OutOfRange { value: i32, min: i32, max: i32 },

    #[error("all numbers must be unique, {0} appears more than once")]
    Duplicate(i32),

    #[error("the numbers must be in ascending order")]
    NotAscending,

    #[error("invalid number: {0:?}")]
    NotANumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotteryError {
    #[error("round {0} has already been played")]
    AlreadyPlayed(u32),

    #[error("no entries for round {0}")]
    NoEntries(u32),

    #[error("no round can follow round {0}")]
    RoundsExhausted(u32),

    #[error(transparent)]
    Draw(#[from] DrawError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] DrawError),
}
