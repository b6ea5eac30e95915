use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MonitorError {
    #[error("feed error: {0}")]
    Feed(String),
    #[error("settings error: {0}")]
    Settings(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("export error: {0}")]
    Export(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing telemetry source")]
    MissingSource,
    #[error("missing settings store")]
    MissingSettings,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
