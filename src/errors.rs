use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure of the external include resolver for one document.
///
/// These never reach the user as fatal errors: the extractor logs them and
/// treats the document as having no includes.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to launch resolver '{program}': {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("Resolver '{program}' exited with {status} for {file}: {stderr}")]
    Failed { program: String, file: PathBuf, status: ExitStatus, stderr: String },
    #[error("Invalid UTF-8 in resolver output for {file}")]
    InvalidUtf8 { file: PathBuf },
}

#[derive(Debug, Error)]
pub enum RelationsError {
    #[error("{}: No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("{}: Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: Not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Missing dependency: '{0}' was not found")]
    MissingDependency(String),

    #[error("{}: Not inside a git repository", .0.display())]
    NotInRepository(PathBuf),

    #[error("Invalid root pattern '{pattern}': {source}")]
    RootPattern { pattern: String, source: globset::Error },

    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelationsError {
    /// Process exit code reported for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 2,
            Self::PermissionDenied(_) => 13,
            Self::NotRegularFile(_) => 21,
            Self::InvalidArguments(_) => 22,
            Self::MissingDependency(_)
            | Self::NotInRepository(_)
            | Self::RootPattern { .. }
            | Self::Pool(_)
            | Self::Json(_)
            | Self::Io(_) => 1,
        }
    }
}
