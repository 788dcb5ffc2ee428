//! Randomness abstraction for PLUM sensors and scenarios.

/// The central interface for drawing random values.
///
/// The protocol never touches an RNG directly: synthetic ground-motion
/// values and detection noise all come through this trait, so a run can be
/// replayed bit-for-bit from its seed.
///
/// # Implementations
///
/// - [`SeededSampler`](crate::SeededSampler) - ChaCha8 stream derived from a 64-bit seed
pub trait Sampler {
    /// Draws a synthetic peak displacement in centimeters.
    ///
    /// Stands in for a real ground-motion record: uniform in `[0.1, 10.0]`,
    /// rounded to two decimals.
    fn peak_displacement(&mut self) -> f64;

    /// Returns `true` with probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool;

    /// Draws uniformly from `[low, high)`.
    ///
    /// Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Returns the seed this sampler was created from (for logging).
    fn seed(&self) -> u64;
}
