//! In-place line mutations of a single text file.

mod file_mutators;

pub use file_mutators::{
    MutationError, REPLACEMENT_TOKEN_LENGTH, overwrite_second_line, truncate_last_two_lines,
};
