use std::path::PathBuf;

use thiserror::Error;

/// Errors the publishing pipeline can stop on.
///
/// Everything here is fatal for its stage; the marker-stripping stage is the
/// only place where per-file failures are caught and reported instead of
/// propagated.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("environment variable {0} is not set (expected a vault root path)")]
    MissingConfig(&'static str),

    #[error(
        "attachments directory already exists: {} (remove it to re-publish attachments)",
        .0.display()
    )]
    AttachmentsDirExists(PathBuf),

    #[error(
        "attachment '{name}' referenced by {} not found in {}",
        .note.display(),
        .source_dir.display()
    )]
    MissingAttachment {
        name: String,
        note: PathBuf,
        source_dir: PathBuf,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
