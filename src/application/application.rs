use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::ext::BestEffortPathExt;
use crate::random::TokenGenerator;
use crate::tree::initialize_tree;
use crate::walker::{WalkReport, mutate_tree};

/// Printed to stdout once a run is over, whatever happened along the way.
pub const COMPLETION_MESSAGE: &str = "Data generation and modification completed successfully.";

pub struct Application;

impl Application {
    /// Builds the tree and, when enabled, runs one mutation pass over it.
    ///
    /// Individual filesystem failures are logged by the stages themselves and
    /// never end the run. Returns the pass report if a pass was made.
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Option<WalkReport> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let mut generator = match app_config.seed {
            Some(seed) => {
                info!("Using fixed seed {seed}");
                TokenGenerator::from_seed(seed)
            }
            None => TokenGenerator::from_time(),
        };

        initialize_tree(&app_config.base, app_config.min_files);

        if !app_config.random_ops {
            info!(
                "Random operations disabled, leaving {} as generated",
                app_config.base.best_effort_path_display()
            );
            return None;
        }

        Some(mutate_tree(&app_config.base, &mut generator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{CATEGORY_FOLDERS, LINES_PER_FILE};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(base: &Path, random_ops: bool) -> RuntimeConfig {
        RuntimeConfig {
            base: base.to_path_buf(),
            min_files: 3,
            random_ops,
            seed: Some(31337),
        }
    }

    #[test]
    fn test_run_with_random_ops() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("testData");

        let report = Application::run(config(&base, true)).expect("A pass should have run");

        assert!(base.is_dir());
        assert!(report.visited >= CATEGORY_FOLDERS.len());
    }

    #[test]
    fn test_run_without_random_ops_leaves_tree_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("testData");

        let report = Application::run(config(&base, false));

        assert!(report.is_none());
        for folder in CATEGORY_FOLDERS {
            for i in 0..3 {
                let content = fs::read_to_string(base.join(folder).join(format!("file{i}.txt")))
                    .expect("Seeded file should exist");
                assert_eq!(content.lines().count(), LINES_PER_FILE);
            }
        }
    }

    #[test]
    fn test_run_on_unusable_base_still_completes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("occupied");
        fs::write(&base, "a file where the base should be").unwrap();

        let report = Application::run(config(&base, true)).expect("A pass should have run");

        assert_eq!(report.visited, 0);
        assert!(base.is_file());
    }
}
