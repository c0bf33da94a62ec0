use thiserror::Error;

#[derive(Debug, Error)]
pub enum UtilsError {
    #[error("unknown log format {0:?}, expected \"human\" or \"json\"")]
    UnknownLogFormat(String),

    #[error("invalid log level {0}")]
    InvalidLogLevel(String),

    #[error("tracing subscriber already installed: {0}")]
    SubscriberInstalled(String),
}
