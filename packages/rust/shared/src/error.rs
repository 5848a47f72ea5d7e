//! Error types for lattice.
//!
//! Library crates use [`LatticeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Fatal variants abort the run. `MissingRequiredField` and
//! `CrossLinkValidation` are recoverable: the offending entry or edge is
//! dropped and the error value is carried alongside the successful result.

use std::path::PathBuf;

/// Top-level error type for all lattice operations.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The feed document could not be parsed at all.
    #[error("feed parse error: {message}")]
    FeedParse { message: String },

    /// A feed entry lacks a title or link and was skipped.
    #[error("entry {index} is missing required field `{field}`")]
    MissingRequiredField { index: usize, field: &'static str },

    /// A cross-link references an unknown post or is otherwise unusable.
    #[error("cross-link {source_slug} -> {target_slug}: {message}")]
    CrossLinkValidation {
        source_slug: String,
        target_slug: String,
        message: String,
    },

    /// Two posts produced the same node id.
    #[error("duplicate post slug `{slug}`: \"{first}\" and \"{second}\"")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    /// The output artifact could not be written.
    #[error("cannot write output {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The graph could not be turned into a page.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error while reading an input.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LatticeError>;

impl LatticeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a feed parse error from any displayable message.
    pub fn feed_parse(msg: impl Into<String>) -> Self {
        Self::FeedParse {
            message: msg.into(),
        }
    }

    /// Create a cross-link validation error for the `source -> target` pair.
    pub fn cross_link(
        source: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::CrossLinkValidation {
            source_slug: source.into(),
            target_slug: target.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` raised while writing the output artifact.
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MissingRequiredField { .. } | Self::CrossLinkValidation { .. }
        )
    }
}
