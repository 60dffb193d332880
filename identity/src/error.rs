use thiserror::Error;

/// Failure reaching a directory backend.
///
/// The in-memory implementations never return it; network-backed directories
/// surface their transport failures through this type so callers can map them
/// to an internal error rather than a credential rejection.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory backend unavailable: {0}")]
    Unavailable(String),
}
