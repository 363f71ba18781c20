//! Error types shared across ClipFocus crates.
//!
//! Detection misses are never errors; only I/O failures, cancellation and
//! invalid configuration surface here.

/// Top-level error type for ClipFocus operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipfocusError {
    #[error("Source unreadable: {message}")]
    SourceUnreadable { message: String },

    #[error("Unsupported aspect ratio: {label} (expected one of 1:1, 4:3, 16:9, 9:16, 3:4)")]
    UnsupportedAspectRatio { label: String },

    #[error("Sink open failed: {message}")]
    SinkOpenFailed { message: String },

    #[error("Sink write failed: {message}")]
    SinkWriteFailed { message: String },

    #[error("Sink finalize failed: {message}")]
    SinkFinalizeFailed { message: String },

    #[error("Cancellation requested")]
    CancellationRequested,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using ClipfocusError.
pub type ClipfocusResult<T> = Result<T, ClipfocusError>;

impl ClipfocusError {
    pub fn source_unreadable(msg: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            message: msg.into(),
        }
    }

    pub fn unsupported_aspect_ratio(label: impl Into<String>) -> Self {
        Self::UnsupportedAspectRatio {
            label: label.into(),
        }
    }

    pub fn sink_open(msg: impl Into<String>) -> Self {
        Self::SinkOpenFailed {
            message: msg.into(),
        }
    }

    pub fn sink_write(msg: impl Into<String>) -> Self {
        Self::SinkWriteFailed {
            message: msg.into(),
        }
    }

    pub fn sink_finalize(msg: impl Into<String>) -> Self {
        Self::SinkFinalizeFailed {
            message: msg.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: msg.into(),
        }
    }

    /// Short machine-friendly name of the error kind, used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnreadable { .. } => "source_unreadable",
            Self::UnsupportedAspectRatio { .. } => "unsupported_aspect_ratio",
            Self::SinkOpenFailed { .. } => "sink_open_failed",
            Self::SinkWriteFailed { .. } => "sink_write_failed",
            Self::SinkFinalizeFailed { .. } => "sink_finalize_failed",
            Self::CancellationRequested => "cancellation_requested",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_cause() {
        let err = ClipfocusError::source_unreadable("no such file");
        assert_eq!(err.to_string(), "Source unreadable: no such file");
        assert_eq!(err.kind(), "source_unreadable");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ClipfocusError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
