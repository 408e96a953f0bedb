use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::RandomSource;

/// Characters a token is drawn from: lowercase, uppercase, then digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces fixed-length alphanumeric tokens and uniform integers from one RNG.
///
/// Not cryptographically secure and no uniqueness guarantee between calls.
#[derive(Debug, Clone)]
pub struct TokenGenerator<R = StdRng> {
    rng: R,
}

impl TokenGenerator<StdRng> {
    /// Seeds from the current wall-clock time in nanoseconds.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        debug!("Seeding token generator from clock: {seed}");
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TokenGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for TokenGenerator<R> {
    fn token(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| ALPHABET[self.rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }

    fn below(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}
