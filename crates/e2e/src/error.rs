//! Error types for the UI test harness

use thiserror::Error;

use crate::checker::TreeFailure;
use nsb_webdriver::DriverError;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// The extension never opened its consent tab. This is a precondition
    /// failure; there is nothing to diagnose on the page itself.
    #[error("consent tab did not appear within {waited_ms} ms")]
    ConsentTabTimeout { waited_ms: u64 },

    /// The namespace tree never reached the fully-loaded state.
    #[error("{}", .0.message())]
    TreeTimeout(TreeFailure),

    #[error("OAuth credentials required for protected page {0}")]
    MissingCredentials(String),

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_timeout_renders_classified_message() {
        let err = HarnessError::TreeTimeout(TreeFailure::RootWithoutChildren);
        assert_eq!(err.to_string(), "tree loaded with root but no children");
    }
}
