//! Output sinks: a destination file or the data stream.

use std::io::Write;
use std::path::Path;

use crate::error::{write_err, PipelineError};

/// Label used for the data stream in errors.
pub const STDOUT_TARGET: &str = "stdout";

/// Write `content` to `path` byte for byte, replacing any existing file.
///
/// The file is truncated and written in place: a symlink is followed and
/// the target's permissions are kept. The parent directory must already
/// exist.
pub fn write_file(path: &Path, content: &str) -> Result<(), PipelineError> {
    std::fs::write(path, content).map_err(|e| write_err(path.display().to_string(), e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output file");
    Ok(())
}

/// Write `content` to `out` verbatim and flush.
pub fn write_stream<W: Write + ?Sized>(out: &mut W, content: &str) -> Result<(), PipelineError> {
    out.write_all(content.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| write_err(STDOUT_TARGET, e))
}
