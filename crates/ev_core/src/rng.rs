// crates/ev_core/src/rng.rs
//
// Deterministic RNG for election generation and strategy choices.
//
// Every random decision in a trial (ballot generation, candidate counts,
// random strategy instances, coalition splits) draws from one `SearchRng`
// passed explicitly by `&mut`. There is no global or thread-local RNG, so a
// fixed seed reproduces the same sequence of elections and strategies.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use crate::errors::CoreError;

/// Seedable ChaCha20 stream with a 64-bit word counter.
///
/// The `u64` seed maps to the 32-byte ChaCha seed explicitly:
/// `seed.to_le_bytes()` fills the first 8 bytes; the rest are zero.
#[derive(Debug, Clone)]
pub struct SearchRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

/// 2^-53, the spacing of doubles in [0.5, 1).
const DOUBLE_UNIT: f64 = 1.0 / ((1u64 << 53) as f64);

impl SearchRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Total number of 64-bit words drawn so far (saturating).
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    /// Draw the next word. This is the only place the counter advances.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in [0, n) by threshold rejection; `None` if `n == 0`.
    ///
    /// `threshold = 2^64 mod n`; accepting `x >= threshold` makes `x % n`
    /// uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Integer in [0, bound).
    #[inline]
    pub fn next_int(&mut self, bound: usize) -> Result<usize, CoreError> {
        self.gen_range(bound as u64)
            .map(|v| v as usize)
            .ok_or(CoreError::EmptyRange)
    }

    /// Integer in [low, high).
    pub fn next_int_between(&mut self, low: usize, high: usize) -> Result<usize, CoreError> {
        if high <= low {
            return Err(CoreError::EmptyRange);
        }
        Ok(low + self.next_int(high - low)?)
    }

    /// Double in [0, 1) with 53 random bits.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * DOUBLE_UNIT
    }

    /// Double in [low, high). Degenerate ranges return `low`.
    pub fn next_double_between(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + (high - low) * self.next_double()
    }

    /// Fisher–Yates: for i in (1..len).rev() { j ~ U{0..=i}; swap(i, j) }
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = match self.gen_range(i as u64 + 1) {
                Some(v) => v as usize,
                None => unreachable!("gen_range(>0) must return Some"),
            };
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn gen_range_zero_none() {
        let mut rng = SearchRng::from_seed_u64(0xDEADBEEFCAFEBABE);
        assert_eq!(rng.gen_range(0), None);
        assert_eq!(rng.next_int(0), Err(CoreError::EmptyRange));
        assert_eq!(rng.words_consumed(), 0);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SearchRng::from_seed_u64(123456789);
        let mut b = SearchRng::from_seed_u64(123456789);
        for _ in 0..32 {
            assert_eq!(a.next_int(10).unwrap(), b.next_int(10).unwrap());
            assert_eq!(a.next_double().to_bits(), b.next_double().to_bits());
        }
        assert_eq!(a.words_consumed(), b.words_consumed());
    }

    #[test]
    fn ranges_are_respected() {
        let mut rng = SearchRng::from_seed_u64(7);
        for _ in 0..200 {
            let k = rng.next_int_between(1, 4).unwrap();
            assert!((1..4).contains(&k));
            let d = rng.next_double_between(0.5, 3.0);
            assert!((0.5..3.0).contains(&d));
        }
        assert_eq!(rng.next_int_between(3, 3), Err(CoreError::EmptyRange));
        assert_eq!(rng.next_double_between(2.0, 2.0), 2.0);
    }

    #[test]
    fn shuffle_is_deterministic_permutation() {
        let mut a = SearchRng::from_seed_u64(42);
        let mut b = SearchRng::from_seed_u64(42);
        let mut xs = (0..16).collect::<Vec<_>>();
        let mut ys = (0..16).collect::<Vec<_>>();
        a.shuffle_in_place(&mut xs);
        b.shuffle_in_place(&mut ys);
        assert_eq!(xs, ys);

        let mut sorted = xs.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }
}
