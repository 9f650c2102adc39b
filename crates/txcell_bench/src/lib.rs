//! Benchmark support utilities.

use rand::Rng;

/// Generates `count` pseudo-random word values.
#[must_use]
pub fn random_words(count: usize) -> Vec<usize> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen()).collect()
}
