use thiserror::Error;

#[derive(Error, Debug)]
pub enum MdtailError {
    #[error("Configuration parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Monitor error: {0}")]
    MonitorError(String),

    #[error("No content to display")]
    EmptyInput,
}
