//! Fractal octave sums over the gradient-noise field.
//!
//! An [`OctaveField`] owns a set of three per-axis seed offsets and layers
//! [`crate::noise::sample3`] at doubling frequencies. Two variants exist:
//! the plain fractal sum used for terrain heights, and a domain-warped sum
//! that perturbs the sample coordinates with more noise for organic,
//! non-axis-aligned decorative features.

use tracing::debug;

use crate::hash::mix;

/// Per-instance axis offsets derived from a seed counter.
///
/// Offsets are produced by chaining [`mix`] over the counter at full
/// width, then masking each link to 16 bits. Adding them to the input
/// coordinates shifts the whole lattice, so two fields built from
/// different counters never alias even on identical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSeed {
    /// X-axis offset (16-bit)
    pub x: u32,
    /// Y-axis offset (16-bit)
    pub y: u32,
    /// Z-axis offset (16-bit)
    pub z: u32,
}

impl FieldSeed {
    /// Derives the three axis offsets for a seed counter value.
    #[must_use]
    pub const fn from_counter(counter: u32) -> Self {
        let sx = mix(counter);
        let sy = mix(sx);
        let sz = mix(sy);
        Self {
            x: sx & 0xFFFF,
            y: sy & 0xFFFF,
            z: sz & 0xFFFF,
        }
    }
}

/// Hands out successive seed counter values.
///
/// Each generator instance takes the next counter so that successive
/// instances are decorrelated. The sequence is an explicit value passed to
/// whoever constructs generators rather than an ambient global counter,
/// which keeps a fixed starting value fully reproducible.
#[derive(Debug, Clone)]
pub struct SeedSequence {
    counter: u32,
}

impl SeedSequence {
    /// Creates a sequence starting at the given counter value.
    #[must_use]
    pub const fn new(start: u32) -> Self {
        Self { counter: start }
    }

    /// Allocates the next field seed and advances the counter.
    pub fn next_seed(&mut self) -> FieldSeed {
        let seed = FieldSeed::from_counter(self.counter);
        debug!(
            counter = self.counter,
            x = seed.x,
            y = seed.y,
            z = seed.z,
            "allocated noise field seed"
        );
        self.counter = self.counter.wrapping_add(1);
        seed
    }

    /// Returns the next counter value without advancing.
    #[must_use]
    pub const fn peek(&self) -> u32 {
        self.counter
    }
}

/// A seeded multi-octave noise field.
#[derive(Debug, Clone, Copy)]
pub struct OctaveField {
    seed: FieldSeed,
}

impl OctaveField {
    /// Creates a field with the given axis offsets.
    #[must_use]
    pub const fn new(seed: FieldSeed) -> Self {
        Self { seed }
    }

    /// Returns the field's axis offsets.
    #[must_use]
    pub const fn seed(&self) -> FieldSeed {
        self.seed
    }

    /// Plain fractal sum over a z=0 slice.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, frequency: f64, persistence: f64) -> f64 {
        self.fractal3(x, y, 0.0, octaves, frequency, persistence)
    }

    /// Plain 3D fractal sum.
    ///
    /// Sums `octaves` layers of noise, doubling the frequency and scaling
    /// the amplitude by `persistence` each layer, then divides by the
    /// amplitude sum so the result stays in `[0, 1]` for any octave count.
    #[must_use]
    pub fn fractal3(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
    ) -> f64 {
        debug_assert!(octaves >= 1, "fractal sum needs at least one octave");
        let x = x + f64::from(self.seed.x);
        let y = y + f64::from(self.seed.y);
        let z = z + f64::from(self.seed.z);
        let mut frequency = frequency;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            total += crate::noise::sample3(x * frequency, y * frequency, z * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        total / max_value
    }

    /// Domain-warped fractal sum over a z=0 slice.
    #[must_use]
    pub fn warped(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
        warp_amplitude: f64,
        warp_frequency: f64,
    ) -> f64 {
        self.warped3(
            x,
            y,
            0.0,
            octaves,
            frequency,
            persistence,
            warp_amplitude,
            warp_frequency,
        )
    }

    /// Domain-warped 3D fractal sum.
    ///
    /// Before each octave sample, every axis is perturbed independently by
    /// `warp_amplitude` times a noise read at `warp_frequency`, producing
    /// features that do not line up with the lattice axes.
    #[must_use]
    pub fn warped3(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
        warp_amplitude: f64,
        warp_frequency: f64,
    ) -> f64 {
        debug_assert!(octaves >= 1, "fractal sum needs at least one octave");
        let x = x + f64::from(self.seed.x);
        let y = y + f64::from(self.seed.y);
        let z = z + f64::from(self.seed.z);
        let mut frequency = frequency;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            total += self.warp_sample(
                x * frequency,
                y * frequency,
                z * frequency,
                warp_amplitude,
                warp_frequency,
            ) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        total / max_value
    }

    /// One warped sample: perturb each axis, then read the field.
    fn warp_sample(&self, x: f64, y: f64, z: f64, warp_amplitude: f64, warp_frequency: f64) -> f64 {
        let x = x
            + warp_amplitude
                * crate::noise::sample3((x + f64::from(self.seed.x)) * warp_frequency, 0.0, 0.0);
        let y = y
            + warp_amplitude
                * crate::noise::sample3(0.0, (y + f64::from(self.seed.y)) * warp_frequency, 0.0);
        let z = z
            + warp_amplitude
                * crate::noise::sample3(0.0, 0.0, (z + f64::from(self.seed.z)) * warp_frequency);
        crate::noise::sample3(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seed_chain_golden_values() {
        assert_eq!(FieldSeed::from_counter(0), FieldSeed { x: 0, y: 0, z: 0 });
        assert_eq!(
            FieldSeed::from_counter(1),
            FieldSeed {
                x: 13699,
                y: 46204,
                z: 23541
            }
        );
        assert_eq!(
            FieldSeed::from_counter(7),
            FieldSeed {
                x: 55058,
                y: 11604,
                z: 2768
            }
        );
    }

    #[test]
    fn test_seed_sequence_advances() {
        let mut seeds = SeedSequence::new(0);
        let a = seeds.next_seed();
        let b = seeds.next_seed();
        assert_eq!(a, FieldSeed::from_counter(0));
        assert_eq!(b, FieldSeed::from_counter(1));
        assert_eq!(seeds.peek(), 2);
    }

    #[test]
    fn test_seed_offsets_fit_sixteen_bits() {
        for counter in 0..64 {
            let seed = FieldSeed::from_counter(counter);
            assert!(seed.x <= 0xFFFF && seed.y <= 0xFFFF && seed.z <= 0xFFFF);
        }
    }

    #[test]
    fn test_fractal_golden_value() {
        let field = OctaveField::new(FieldSeed::from_counter(1));
        let v = field.fractal(10.0, 20.0, 4, 1.0 / 64.0, 0.5);
        assert!((v - 0.4666290694069568).abs() < 1e-15);
    }

    #[test]
    fn test_warped_golden_value() {
        let field = OctaveField::new(FieldSeed::from_counter(1));
        let v = field.warped3(10.0, 20.0, 0.0, 2, 1.0 / 32.0, 0.5, 0.1, 1.0);
        assert!((v - 0.4398249642856708).abs() < 1e-15);
    }

    #[test]
    fn test_distinct_seeds_do_not_alias() {
        let a = OctaveField::new(FieldSeed::from_counter(1));
        let b = OctaveField::new(FieldSeed::from_counter(2));
        let va = a.fractal(5.5, 5.5, 4, 1.0 / 16.0, 0.5);
        let vb = b.fractal(5.5, 5.5, 4, 1.0 / 16.0, 0.5);
        assert!((va - vb).abs() > 1e-9, "fields with different seeds aliased");
    }

    proptest! {
        #[test]
        fn test_fractal_normalized(
            x in -1.0e4_f64..1.0e4,
            y in -1.0e4_f64..1.0e4,
            octaves in 1u32..10,
            persistence in 0.01_f64..0.99,
        ) {
            let field = OctaveField::new(FieldSeed::from_counter(3));
            let v = field.fractal(x, y, octaves, 1.0 / 64.0, persistence);
            prop_assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }

        #[test]
        fn test_warped_normalized(
            x in -1.0e4_f64..1.0e4,
            y in -1.0e4_f64..1.0e4,
            octaves in 1u32..6,
        ) {
            let field = OctaveField::new(FieldSeed::from_counter(5));
            let v = field.warped(x, y, octaves, 1.0 / 32.0, 0.5, 0.1, 1.0);
            prop_assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }
    }
}
