//! Error types for aos-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from aos-core
    #[error(transparent)]
    Core(#[from] aos_core::Error),

    /// Error from aos-fs
    #[error(transparent)]
    Fs(#[from] aos_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The run completed, but some files could not be synchronized
    #[error("{count} file(s) could not be synchronized")]
    Failures { count: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failures { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_file_failures_exit_with_two() {
        assert_eq!(CliError::Failures { count: 1 }.exit_code(), 2);
        assert_eq!(CliError::user("nope").exit_code(), 1);
    }
}
