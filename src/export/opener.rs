use std::path::Path;

use crate::error::AppError;

/// Hands a finished report to the OS default viewer. Injected so exports
/// stay testable without spawning anything.
pub trait DocumentOpener {
  fn open(&self, path: &Path) -> Result<(), AppError>;
}

pub struct ShellOpener;

impl DocumentOpener for ShellOpener {
  fn open(&self, path: &Path) -> Result<(), AppError> {
    open::that(path).map_err(|err| AppError::new("EXPORT", err.to_string()))
  }
}

/// Writes the file and leaves it closed (`--no-open`).
pub struct NoopOpener;

impl DocumentOpener for NoopOpener {
  fn open(&self, _path: &Path) -> Result<(), AppError> {
    Ok(())
  }
}
