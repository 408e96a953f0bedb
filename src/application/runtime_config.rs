use std::path::PathBuf;

use crate::cli::Cli;

/// Everything a run needs once the command line has been parsed.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub base: PathBuf,
    pub min_files: usize,
    pub random_ops: bool,
    pub seed: Option<u64>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            base: cli.base,
            min_files: usize::try_from(cli.min_files).unwrap_or_default(),
            random_ops: cli.random_ops,
            seed: cli.seed,
        }
    }
}
