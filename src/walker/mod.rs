//! Randomized churn over an existing tree.
//!
//! Every directory below the base gets exactly one [`Mutation`], chosen
//! uniformly from the shared random source. Directories may vanish or appear
//! while the walk is in progress; a vanished path is skipped, never fatal.

mod directory_walker;
mod mutation;

pub use directory_walker::{WalkError, WalkReport, mutate_tree};
pub use mutation::Mutation;
