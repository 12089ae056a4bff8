//! Integer avalanche mixing.
//!
//! The mixer below is the single source of lattice randomness for the
//! terrain field: it reduces cell indices to gradient selections and
//! chains seed values into per-instance axis offsets. Every output bit
//! depends nonlinearly on every input bit, so neighbouring lattice cells
//! decorrelate completely.

/// Mixes a 32-bit value through a fixed subtract/shift-xor sequence.
///
/// Pure and total: defined for every input, all arithmetic wraps modulo
/// 2^32, all shifts are logical. The exact operation order is load-bearing;
/// seeds and lattice hashes are reproducible across runs and platforms
/// only because this sequence never changes.
#[must_use]
pub const fn mix(x: u32) -> u32 {
    let mut a = x;
    a = a.wrapping_sub(a << 6);
    a ^= a >> 17;
    a = a.wrapping_sub(a << 9);
    a ^= a << 4;
    a = a.wrapping_sub(a << 3);
    a ^= a << 10;
    a ^= a >> 15;
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_fixed_points() {
        // Zero maps to zero through every step of the sequence.
        assert_eq!(mix(0), 0);
    }

    #[test]
    fn test_mix_golden_values() {
        assert_eq!(mix(1), 3266786691);
        assert_eq!(mix(2), 3910079064);
        assert_eq!(mix(3), 1068787956);
        assert_eq!(mix(42), 3941539072);
        assert_eq!(mix(0xDEAD_BEEF), 561645252);
    }

    #[test]
    fn test_mix_is_deterministic() {
        for x in [0u32, 1, 7, 1234, u32::MAX] {
            assert_eq!(mix(x), mix(x));
        }
    }

    #[test]
    fn test_mix_avalanche_spreads_low_bits() {
        // Flipping the lowest input bit must change many output bits.
        let diff = mix(0x1234_5678) ^ mix(0x1234_5679);
        assert!(diff.count_ones() >= 8, "weak avalanche: {diff:#010x}");
    }
}
