use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;

/// Top-level folders seeded under the base folder, in creation order.
pub const CATEGORY_FOLDERS: [&str; 5] = ["documents", "pictures", "videos", "music", "archives"];

/// Each placeholder file repeats its identifying line this many times.
pub const LINES_PER_FILE: usize = 100;

/// Creates the base folder and every category folder with `min_files` files each.
///
/// Nothing here is fatal: failures are logged and the next folder or file is
/// attempted.
pub fn initialize_tree(base: &Path, min_files: usize) {
    info!(
        "Initializing tree at {} with {} files per folder",
        base.best_effort_path_display(),
        min_files
    );

    if let Err(e) = create_base_folder(base) {
        warn!("{e}");
    }

    for folder in CATEGORY_FOLDERS {
        if let Err(e) = create_sub_folder(base, folder, min_files) {
            warn!("{e}");
        }
    }
}

fn create_base_folder(base: &Path) -> Result<(), TreeError> {
    fs::create_dir_all(base).context(CreateDirSnafu { path: base })
}

/// Creates `parent/name` and fills it with `file0.txt .. file{file_count-1}.txt`.
///
/// Only a failure to create the folder itself is returned; individual file
/// failures are logged and skipped.
pub fn create_sub_folder(parent: &Path, name: &str, file_count: usize) -> Result<(), TreeError> {
    let path = parent.join(name);
    fs::create_dir_all(&path).context(CreateDirSnafu { path: &path })?;
    debug!("Created folder {}", path.display());

    for i in 0..file_count {
        if let Err(e) = create_file(&path, &format!("file{i}.txt")) {
            warn!("{e}");
        }
    }

    Ok(())
}

/// Writes `folder/file_name` with [`LINES_PER_FILE`] lines of
/// `Data in <folder> <file_name>`, each newline terminated.
pub fn create_file(folder: &Path, file_name: &str) -> Result<(), TreeError> {
    let path = folder.join(file_name);
    let mut file = File::create(&path).context(CreateFileSnafu { path: &path })?;

    let line = format!("Data in {} {}\n", folder.display(), file_name);
    file.write_all(line.repeat(LINES_PER_FILE).as_bytes())
        .context(WriteFileSnafu { path: &path })?;

    Ok(())
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("Error creating directory {}", path.best_effort_path_display()))]
    CreateDirError { path: PathBuf, source: io::Error },
    #[snafu(display("Error creating file {}", path.best_effort_path_display()))]
    CreateFileError { path: PathBuf, source: io::Error },
    #[snafu(display("Error writing to file {}", path.best_effort_path_display()))]
    WriteFileError { path: PathBuf, source: io::Error },
}
