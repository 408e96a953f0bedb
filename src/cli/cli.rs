use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::application::data::LogLevel;

/// Generate a synthetic file tree and churn it with random mutations.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Base folder for the test data
    #[clap(long, default_value = "testData")]
    pub base: PathBuf,

    /// Minimum number of files to be created in each folder, negative counts as zero
    #[clap(long = "minFiles", default_value_t = 5, allow_negative_numbers = true)]
    pub min_files: i64,

    /// Perform random operations on the data
    #[clap(
        long = "randomOps",
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub random_ops: bool,

    /// Seed for the random source, defaults to the current time
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

impl Cli {
    /// Parses the process arguments, also accepting single-dash long flags
    /// such as `-minFiles=3`.
    pub fn parse_args() -> Self {
        Self::parse_from(expand_single_dash_long_flags(std::env::args_os()))
    }
}

/// Rewrites `-name[=value]` into `--name[=value]` for every known long flag.
///
/// Everything after a bare `--` is passed through untouched.
fn expand_single_dash_long_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let command = Cli::command();
    let long_flags: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .collect();

    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if long_flags.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
