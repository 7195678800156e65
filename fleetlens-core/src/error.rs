use thiserror::Error;

/// Common result type for core operations.
pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("host reports no cpu cores")]
    NoCores,
    #[error("cpu counters did not advance within the sampling window")]
    StalledCounters,
    #[error("host reports zero total memory")]
    NoMemory,
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Provider(err.to_string())
    }
}
