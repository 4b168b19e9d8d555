use thiserror::Error;

/// Error encountered while configuring or running an algorithm.
#[derive(Debug, Error)]
pub enum Error {
    /// An option value is outside its valid range. The message names the
    /// offending option.
    #[error("invalid option: {0}")]
    InvalidOptions(String),
}

impl Error {
    pub(crate) fn invalid_options(message: impl Into<String>) -> Self {
        Error::InvalidOptions(message.into())
    }
}
