use thiserror;

/// The Result type for tui4096.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("io error")]
    StdIOError(#[from] std::io::Error),

    #[error("log setup error")]
    LogError(#[from] log::SetLoggerError),
}
