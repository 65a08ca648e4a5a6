use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all portal operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PortalError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed `package.json`.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the package.json for syntax errors"))]
    Manifest { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.portal/config.toml"))]
    Config { message: String },

    /// The block location could not be understood or does not exist.
    #[error("Invalid block source: {message}")]
    #[diagnostic(help(
        "Pass a local block directory or a git url such as https://github.com/owner/repo/tree/master/block"
    ))]
    Source { message: String },

    /// A git clone/fetch/checkout/pull step failed.
    #[error("Git error: {message}")]
    Git { message: String },

    /// The package manager failed to install block dependencies.
    #[error("Install failed: {message}")]
    Install { message: String },

    /// Copying block files into the project failed.
    #[error("Generate failed: {message}")]
    Generate { message: String },

    /// Block dependencies are incompatible with the project's.
    #[error("Dependencies conflict between block and your project:\n{listing}")]
    #[diagnostic(help("Align the versions in your package.json, or pull with --skip-dependencies"))]
    ProjectConflict { listing: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PortalResult<T> = miette::Result<T>;
