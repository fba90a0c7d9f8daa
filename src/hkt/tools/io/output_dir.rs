use std::fs;
use std::path::Path;

use tracing::debug;

use crate::hkt::tools::error::{Result, ToolError};

/// Fails for group keys that would leave the output directory once they are
/// spliced into a file name.
pub fn check_group_key(group: &str) -> Result<()> {
    if group.contains(['/', '\\', '\0']) {
        return Err(ToolError::InvalidGroup(group.to_string()));
    }
    Ok(())
}

/// Creates `dir` if needed and deletes every regular file directly inside it.
///
/// Sub-directories and their contents are left untouched. Returns the number
/// of removed files.
pub fn prepare_output_dir(dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            debug!(file = %entry.path().display(), "removed stale output file");
            removed += 1;
        }
    }
    Ok(removed)
}
