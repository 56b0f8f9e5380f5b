//! Failure modes of a single run.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Network phase in which a client error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Generation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("upload"),
            Self::Generation => f.write_str("generation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("--prompt is required when --quiz is not set")]
    Usage,

    #[error("The file '{}' does not exist.", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Could not construct the Gemini client")]
    Client {
        #[source]
        source: gemini_pdf::Error,
    },

    #[error("Gemini API error during {stage}")]
    Provider {
        stage: Stage,
        #[source]
        source: gemini_pdf::Error,
    },

    #[error("Unexpected error during {stage}")]
    Unexpected {
        stage: Stage,
        #[source]
        source: gemini_pdf::Error,
    },

    #[error("Could not open log file {}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not install the log subscriber")]
    LoggerInit {
        #[from]
        source: tracing_subscriber::util::TryInitError,
    },
}

impl CliError {
    /// Sorts a client error into the provider or unexpected bucket.
    #[must_use]
    pub fn from_client(stage: Stage, source: gemini_pdf::Error) -> Self {
        if source.is_api_error() {
            Self::Provider { stage, source }
        } else {
            Self::Unexpected { stage, source }
        }
    }

    /// Process exit status for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }
}
