//! Scripted randomness for tests.

use storyloom_core::rng::DeterministicRng;

/// Always answers the low end of the requested range, so placeholder seeds
/// and random picks are predictable without scripting.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Replays a fixed list of values, wrapping around when exhausted, and
/// counts how many draws were made. Values are returned as scripted even if
/// they fall outside the requested range, so tests can pin exact seeds.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    draws: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` replaying `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        Self { values, draws: 0 }
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.draws % self.values.len()];
        self.draws += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32_range(0, u32::MAX)) / (f64::from(u32::MAX) + 1.0)
    }
}
