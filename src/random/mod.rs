//! Seeded source of random tokens and small uniform choices.
//!
//! A single source is created at start-up and threaded through the walker and
//! the mutators, so a fixed seed reproduces a whole run.

mod token_generator;

pub use token_generator::{ALPHABET, TokenGenerator};

/// Sequential consumer-facing view of the process random source.
pub trait RandomSource {
    /// Returns exactly `length` characters from [`ALPHABET`], drawn with replacement.
    fn token(&mut self, length: usize) -> String;

    /// Uniform integer in `[0, upper)`. `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize;
}
