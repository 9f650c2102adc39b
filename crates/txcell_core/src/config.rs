//! Context configuration.

/// Configuration for constructing a [`Context`](crate::Context).
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of ownership-record slots in the context's orec table.
    ///
    /// Rounded up to a power of two when the context is built. More slots
    /// means fewer unrelated cells aliasing to one record (false
    /// contention); the table is allocated up front and never resized.
    pub orec_slots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { orec_slots: 256 }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the orec slot count.
    #[must_use]
    pub const fn orec_slots(mut self, slots: usize) -> Self {
        self.orec_slots = slots;
        self
    }
}
