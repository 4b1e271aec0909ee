//! Lattice hashing.
//!
//! Every generator derives its per-cell randomness from [`hash_lattice`], so
//! the whole engine has a single seed-to-value primitive. There is no
//! permutation table: the hash mixes the seed and the cell indices directly,
//! which keeps generators stateless and makes reseeding free.

/// Per-axis odd multipliers.
const AXIS_PRIMES: [u64; 4] = [
    0x8CB9_2BA7_2F3D_8DD7,
    0xD6E8_FEB8_6659_FD93,
    0xA076_1D64_78BD_642F,
    0xE703_7ED1_A0B4_28DB,
];

/// SplitMix64 finalizer.
#[inline]
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Hashes a seed and lattice cell to 64 well-mixed bits.
///
/// Negative indices are reinterpreted as two's complement, so cells on either
/// side of the origin hash independently.
#[inline]
pub fn hash_lattice(seed: u64, cell: &[i64]) -> u64 {
    let mut h = mix64(seed);
    for (axis, &c) in cell.iter().enumerate() {
        h = h.wrapping_add((c as u64).wrapping_mul(AXIS_PRIMES[axis & 3]));
        h = mix64(h);
    }
    h
}

/// Maps a hash to `[0, 1)` using its top 53 bits.
#[inline]
pub fn hash_to_unit(h: u64) -> f64 {
    (h >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Maps a hash to `[-1, 1)`.
#[inline]
pub fn hash_to_signed(h: u64) -> f64 {
    hash_to_unit(h) * 2.0 - 1.0
}
