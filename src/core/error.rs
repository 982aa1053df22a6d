use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures raised by the extraction engine.
///
/// Template-level variants (`Parse`, `UnresolvedEntity`, and `Io` on a template path)
/// are recoverable per file; the rest abort the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unresolvable entity '{name}' in {}", path.display())]
    UnresolvedEntity { path: PathBuf, name: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed property file {} (line {line}): {message}", path.display())]
    PropertyFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(
        "No messages_xx.properties files found at {}. You have to create the messages_xx.properties first!",
        dir.display()
    )]
    NoBundles { dir: PathBuf },

    #[error("Unknown character encoding: '{0}'")]
    UnknownEncoding(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures confined to a single template file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::Parse { .. } | Error::UnresolvedEntity { .. } | Error::Io { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
