//! Error types for driver glue

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("chromedriver failed to start: {0}")]
    ChromedriverStartup(String),

    #[error("chromedriver not ready after {0} attempts")]
    ChromedriverReadiness(usize),

    #[error("failed to open WebDriver session: {0}")]
    NewSession(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Cmd(#[from] fantoccini::error::CmdError),

    #[error("element '{selector}' not clickable after {waited_ms} ms")]
    ClickableTimeout { selector: String, waited_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type DriverResult<T> = Result<T, DriverError>;
