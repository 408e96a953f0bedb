use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::random::RandomSource;

/// Length of the token written over the second line.
pub const REPLACEMENT_TOKEN_LENGTH: usize = 20;

/// Replaces line index 1 with a fresh random token.
///
/// Content with fewer than two newline-separated elements is rewritten as is.
pub fn overwrite_second_line<S>(path: &Path, source: &mut S) -> Result<(), MutationError>
where
    S: RandomSource + ?Sized,
{
    rewrite_lines(path, |lines| {
        if lines.len() > 1 {
            lines[1] = source.token(REPLACEMENT_TOKEN_LENGTH);
        }
    })
}

/// Drops the last two elements of the newline split.
///
/// Placeholder files end with a newline, so the split ends with an empty
/// element and this removes one text line plus the trailing newline.
pub fn truncate_last_two_lines(path: &Path) -> Result<(), MutationError> {
    rewrite_lines(path, |lines| {
        if lines.len() > 1 {
            lines.truncate(lines.len() - 2);
        }
    })
}

fn rewrite_lines(path: &Path, edit: impl FnOnce(&mut Vec<String>)) -> Result<(), MutationError> {
    let content = fs::read_to_string(path).context(ReadSnafu { path })?;

    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    let before = lines.len();
    edit(&mut lines);
    debug!(
        "Rewriting {} ({} -> {} elements)",
        path.display(),
        before,
        lines.len()
    );

    write_zero_mode(path, lines.join("\n").as_bytes()).context(WriteSnafu { path })
}

/// Truncates and writes `path`, passing permission bits `0o000` to the open.
///
/// Known quirk kept from the tool this replaces: the zero mode only takes
/// effect when the open creates the file. Mutators always read first, so an
/// existing file keeps its permissions; a file that vanished between read and
/// write is recreated with no permission bits at all.
fn write_zero_mode(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o000);
    }

    options.open(path)?.write_all(bytes)
}

#[derive(Debug, Snafu)]
pub enum MutationError {
    #[snafu(display("Error reading the file {}", path.best_effort_path_display()))]
    ReadError { path: PathBuf, source: io::Error },
    #[snafu(display("Error writing to the file {}", path.best_effort_path_display()))]
    WriteError { path: PathBuf, source: io::Error },
}
