use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;
use crate::mutators::{overwrite_second_line, truncate_last_two_lines};
use crate::random::RandomSource;
use crate::tree::{TreeError, create_sub_folder};
use crate::walker::Mutation;

const NEW_FOLDER_PREFIX: &str = "folder_new_";
const NEW_FOLDER_TOKEN_LENGTH: usize = 5;
/// A grown folder receives between 1 and this many files.
const MAX_NEW_FOLDER_FILES: usize = 5;

/// Tally of one mutation pass. Logged at the end and handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
#[display(
    "visited {visited} directories (modified {modified}, grown {grown}, shrunk {shrunk}, \
     deleted {deleted}), rewrote {files_mutated} files, skipped {skipped}, failed {failed}"
)]
pub struct WalkReport {
    pub visited: usize,
    pub modified: usize,
    pub grown: usize,
    pub shrunk: usize,
    pub deleted: usize,
    pub files_mutated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl WalkReport {
    fn record(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::ModifyContents => self.modified += 1,
            Mutation::GrowStructure => self.grown += 1,
            Mutation::ShrinkContents => self.shrunk += 1,
            Mutation::DeleteSubtree => self.deleted += 1,
        }
    }
}

/// Walks `base` depth first and applies one random [`Mutation`] to every
/// directory strictly below it.
///
/// A directory's children are listed, sorted by name, before its own mutation
/// runs. Folders grown during the pass are therefore never visited in the same
/// pass, and the listed children of a deleted directory are still visited and
/// skipped as vanished. No error escapes: each is logged and the walk moves on.
pub fn mutate_tree<S: RandomSource + ?Sized>(base: &Path, source: &mut S) -> WalkReport {
    info!("Mutating tree at {}", base.best_effort_path_display());

    let mut walker = DirectoryWalker {
        source,
        report: WalkReport::default(),
    };
    walker.visit_children(base);

    info!("Mutation pass finished: {}", walker.report);
    walker.report
}

struct DirectoryWalker<'a, S: ?Sized> {
    source: &'a mut S,
    report: WalkReport,
}

impl<S: RandomSource + ?Sized> DirectoryWalker<'_, S> {
    fn visit_children(&mut self, dir: &Path) {
        match snapshot_children(dir) {
            Ok(children) => self.visit_all(&children),
            Err(e) => {
                warn!("{e}");
                self.report.failed += 1;
            }
        }
    }

    fn visit_all(&mut self, children: &[PathBuf]) {
        for child in children {
            self.visit(child);
        }
    }

    fn visit(&mut self, path: &Path) {
        let metadata = match fs::symlink_metadata(path).context(AccessSnafu { path }) {
            Ok(metadata) => metadata,
            Err(WalkError::AccessError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("Skipping vanished path {}", path.display());
                self.report.skipped += 1;
                return;
            }
            Err(e) => {
                warn!("{e}");
                self.report.failed += 1;
                return;
            }
        };

        if !metadata.is_dir() {
            return;
        }

        let children = match snapshot_children(path) {
            Ok(children) => children,
            Err(e) => {
                warn!("{e}");
                self.report.failed += 1;
                return;
            }
        };

        self.report.visited += 1;
        let mutation = Mutation::select(&mut *self.source);
        debug!("Applying '{}' to {}", mutation, path.display());

        match self.apply(mutation, path) {
            Ok(()) => self.report.record(mutation),
            Err(e) => {
                warn!(
                    "Error performing operation on directory {}: {e}",
                    path.best_effort_path_display()
                );
                self.report.failed += 1;
            }
        }

        self.visit_all(&children);
    }

    fn apply(&mut self, mutation: Mutation, dir: &Path) -> Result<(), WalkError> {
        match mutation {
            Mutation::ModifyContents | Mutation::ShrinkContents => {
                self.mutate_files(mutation, dir);
                Ok(())
            }
            Mutation::GrowStructure => {
                let name = format!(
                    "{NEW_FOLDER_PREFIX}{}",
                    self.source.token(NEW_FOLDER_TOKEN_LENGTH)
                );
                let file_count = self.source.below(MAX_NEW_FOLDER_FILES) + 1;
                create_sub_folder(dir, &name, file_count).context(GrowSnafu)
            }
            Mutation::DeleteSubtree => fs::remove_dir_all(dir).context(RemoveSnafu { path: dir }),
        }
    }

    /// Rewrites every non-directory entry below `dir`. Symlinks are not
    /// descended into, but a symlinked file is read and written through.
    /// Per-file failures are counted and logged without stopping the traversal.
    fn mutate_files(&mut self, mutation: Mutation, dir: &Path) {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry.context(TraverseSnafu { path: dir }) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("{e}");
                    self.report.failed += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let result = match mutation {
                Mutation::ModifyContents => overwrite_second_line(entry.path(), &mut *self.source),
                _ => truncate_last_two_lines(entry.path()),
            };

            match result {
                Ok(()) => self.report.files_mutated += 1,
                Err(e) => {
                    warn!("{e}");
                    self.report.failed += 1;
                }
            }
        }
    }
}

/// Lists the entries of `dir` sorted by file name.
fn snapshot_children(dir: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let mut children = Vec::new();

    for entry in fs::read_dir(dir).context(ReadDirSnafu { path: dir })? {
        match entry {
            Ok(entry) => children.push(entry.path()),
            Err(e) => warn!("Error accessing an entry of {}: {e}", dir.display()),
        }
    }

    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(children)
}

#[derive(Debug, Snafu)]
pub enum WalkError {
    #[snafu(display("Error listing directory {}", path.best_effort_path_display()))]
    ReadDirError { path: PathBuf, source: io::Error },
    #[snafu(display("Error accessing a path {}", path.best_effort_path_display()))]
    AccessError { path: PathBuf, source: io::Error },
    #[snafu(display("Error walking files under {}", path.best_effort_path_display()))]
    TraverseError {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display("Failed to grow a new sub-folder"))]
    GrowError { source: TreeError },
    #[snafu(display("Error removing {}", path.best_effort_path_display()))]
    RemoveError { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutators::REPLACEMENT_TOKEN_LENGTH;
    use crate::random::TokenGenerator;
    use crate::tree::{CATEGORY_FOLDERS, LINES_PER_FILE, create_file, initialize_tree};
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Replays a fixed sequence of `below` results, then repeats `fallback`.
    struct ScriptedSource {
        script: VecDeque<usize>,
        fallback: usize,
        tokens: TokenGenerator,
    }

    impl ScriptedSource {
        fn new(script: &[usize], fallback: usize) -> Self {
            Self {
                script: script.iter().copied().collect(),
                fallback,
                tokens: TokenGenerator::from_seed(11),
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn token(&mut self, length: usize) -> String {
            self.tokens.token(length)
        }

        fn below(&mut self, upper: usize) -> usize {
            let value = self.script.pop_front().unwrap_or(self.fallback);
            assert!(value < upper, "Scripted value {value} is out of [0, {upper})");
            value
        }
    }

    fn split(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .expect("Failed to read file")
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_forced_delete_of_parent_does_not_escape() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let parent = temp_dir.path().join("parent");
        fs::create_dir_all(parent.join("empty")).unwrap();
        create_file(&parent, "file0.txt").unwrap();

        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[3], 0));

        assert!(temp_dir.path().exists());
        assert!(!parent.exists());
        assert_eq!(report.visited, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_children_of_deleted_directory_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let pictures = temp_dir.path().join("pictures");
        fs::create_dir_all(pictures.join("holiday")).unwrap();
        fs::create_dir_all(pictures.join("work")).unwrap();
        create_file(&pictures, "file0.txt").unwrap();

        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[3], 0));

        assert!(!pictures.exists());
        assert_eq!(report.visited, 1);
        assert_eq!(report.deleted, 1);
        // file0.txt, holiday and work were listed before the delete
        assert_eq!(report.skipped, 3);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_modify_rewrites_every_nested_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let docs = temp_dir.path().join("documents");
        let nested = docs.join("nested");
        fs::create_dir_all(&nested).unwrap();
        create_file(&docs, "file0.txt").unwrap();
        create_file(&docs, "file1.txt").unwrap();
        create_file(&nested, "file0.txt").unwrap();

        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[], 0));

        for file in [
            docs.join("file0.txt"),
            docs.join("file1.txt"),
            nested.join("file0.txt"),
        ] {
            let lines = split(&file);
            assert_eq!(lines.len(), LINES_PER_FILE + 1);
            assert_eq!(lines[1].len(), REPLACEMENT_TOKEN_LENGTH);
            assert!(lines[0].starts_with("Data in "));
        }
        assert_eq!(report.visited, 2);
        assert_eq!(report.modified, 2);
        // nested/file0.txt is rewritten by both directories
        assert_eq!(report.files_mutated, 4);
    }

    #[test]
    fn test_shrink_applies_once_per_enclosing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let music = temp_dir.path().join("music");
        let nested = music.join("nested");
        fs::create_dir_all(&nested).unwrap();
        create_file(&music, "file0.txt").unwrap();
        create_file(&nested, "file0.txt").unwrap();

        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[], 2));

        assert_eq!(split(&music.join("file0.txt")).len(), LINES_PER_FILE + 1 - 2);
        assert_eq!(split(&nested.join("file0.txt")).len(), LINES_PER_FILE + 1 - 4);
        assert_eq!(report.shrunk, 2);
    }

    #[test]
    fn test_grown_folder_is_left_alone_in_same_pass() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archives = temp_dir.path().join("archives");
        fs::create_dir(&archives).unwrap();

        // grow with 2 + 1 files; every later draw would delete
        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[1, 2], 3));

        let grown: Vec<PathBuf> = fs::read_dir(&archives)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(grown.len(), 1);

        let name = grown[0].file_name().unwrap().to_string_lossy().to_string();
        let suffix = name.strip_prefix(NEW_FOLDER_PREFIX).expect("Unexpected folder name");
        assert_eq!(suffix.len(), NEW_FOLDER_TOKEN_LENGTH);

        for i in 0..3 {
            let lines = split(&grown[0].join(format!("file{i}.txt")));
            assert_eq!(lines.len(), LINES_PER_FILE + 1);
            assert_eq!(lines[0], format!("Data in {} file{i}.txt", grown[0].display()));
        }
        assert!(!grown[0].join("file3.txt").exists());
        assert_eq!(report.visited, 1);
        assert_eq!(report.grown, 1);
        assert_eq!(report.deleted, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_mutated_through() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let outside = temp_dir.path().join("outside");
        let videos = temp_dir.path().join("tree").join("videos");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(&videos).unwrap();
        create_file(&outside, "file0.txt").unwrap();
        std::os::unix::fs::symlink(outside.join("file0.txt"), videos.join("link.txt")).unwrap();

        let report = mutate_tree(
            &temp_dir.path().join("tree"),
            &mut ScriptedSource::new(&[2], 2),
        );

        assert!(videos.join("link.txt").is_symlink());
        assert_eq!(split(&outside.join("file0.txt")).len(), LINES_PER_FILE + 1 - 2);
        assert_eq!(report.files_mutated, 1);
    }

    #[test]
    fn test_base_folder_is_never_mutated() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        create_file(temp_dir.path(), "file0.txt").unwrap();

        let report = mutate_tree(temp_dir.path(), &mut ScriptedSource::new(&[], 3));

        assert_eq!(report, WalkReport::default());
        assert_eq!(split(&temp_dir.path().join("file0.txt")).len(), LINES_PER_FILE + 1);
    }

    #[test]
    fn test_missing_base_is_not_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let report = mutate_tree(
            &temp_dir.path().join("missing"),
            &mut TokenGenerator::from_seed(5),
        );

        assert_eq!(report.visited, 0);
    }

    #[test]
    fn test_apply_on_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut source = ScriptedSource::new(&[0], 0);
        let mut walker = DirectoryWalker {
            source: &mut source,
            report: WalkReport::default(),
        };

        let gone = temp_dir.path().join("gone").join("deeper");
        let result = walker.apply(Mutation::GrowStructure, &gone);
        assert!(result.is_ok(), "Missing parents are recreated");
        assert!(gone.is_dir());

        let result = walker.apply(Mutation::DeleteSubtree, &temp_dir.path().join("never"));
        assert!(matches!(result, Err(WalkError::RemoveError { .. })));
    }

    #[test]
    fn test_seeded_pass_over_initialized_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("testData");
        initialize_tree(&base, 3);

        let report = mutate_tree(&base, &mut TokenGenerator::from_seed(1234));

        assert!(base.is_dir());
        assert!(report.visited >= CATEGORY_FOLDERS.len());
        assert_eq!(report.failed, 0);
        assert_eq!(
            report.visited,
            report.modified + report.grown + report.shrunk + report.deleted
        );
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let first = TempDir::new().expect("Failed to create temp directory");
        let second = TempDir::new().expect("Failed to create temp directory");
        initialize_tree(first.path(), 2);
        initialize_tree(second.path(), 2);

        let first_report = mutate_tree(first.path(), &mut TokenGenerator::from_seed(77));
        let second_report = mutate_tree(second.path(), &mut TokenGenerator::from_seed(77));

        assert_eq!(first_report, second_report);
    }
}
