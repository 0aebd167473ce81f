//! Seeded pseudo-random numbers keyed by topic identifier.
//!
//! The hash and the generator are deliberately tiny: a polynomial rolling
//! hash over UTF-16 code units and a 32-bit linear congruential generator.
//! Both use wrapping 32-bit arithmetic so the sequence for a given topic is
//! identical on every platform.

/// LCG multiplier (Numerical Recipes).
pub const LCG_MULTIPLIER: u32 = 1_664_525;

/// LCG increment (Numerical Recipes).
pub const LCG_INCREMENT: u32 = 1_013_904_223;

/// Hash a string into an unsigned 32-bit seed.
///
/// Computes `h = h * 31 + unit` over the UTF-16 code units of `s`, wrapping
/// at 32 bits.
///
/// ```
/// use comentaram_evidence::hash32;
///
/// assert_eq!(hash32(""), 0);
/// assert_eq!(hash32("abc"), 96_354);
/// ```
pub fn hash32(s: &str) -> u32 {
    s.encode_utf16().fold(0u32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(u32::from(unit))
    })
}

/// Deterministic generator yielding values in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator. A zero seed is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Create a generator seeded from a topic identifier.
    pub fn for_topic(topic_id: &str) -> Self {
        Self::new(hash32(topic_id))
    }

    /// Advance the generator and return the next value.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / f64::from(u32::MAX)
    }

    /// Next value mapped onto `[min, min + span]`.
    pub fn next_in(&mut self, min: f64, span: f64) -> f64 {
        min + self.next_f64() * span
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
