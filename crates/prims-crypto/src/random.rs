//! Secure random number generation.
//!
//! All randomness comes from the operating system's CSPRNG ([`OsRng`]). The
//! generator is a type parameter so tests can substitute a seeded
//! [`CryptoRng`], but nothing on the operation surface exposes a seed.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// CSPRNG-backed selection, sampling, shuffling and UUIDs.
///
/// Every precondition is checked up front; nothing is silently clamped.
#[derive(Clone, Debug, Default)]
pub struct SecureRandom<R = OsRng> {
    rng: R,
}

impl SecureRandom<OsRng> {
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl<R: RngCore + CryptoRng> SecureRandom<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// `len` random bytes. `len == 0` yields an empty vector.
    pub fn bytes(&mut self, len: usize) -> Result<Vec<u8>, RandomError> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Uniform integer in `[0, max)`.
    ///
    /// Draws the fewest whole bytes covering `max - 1`, masks to the minimal
    /// bit width and redraws anything `>= max`. Each draw is accepted with
    /// probability above one half, so the loop terminates quickly.
    pub fn int(&mut self, max: u64) -> Result<u64, RandomError> {
        if max == 0 {
            return Err(RandomError::NonPositiveMax);
        }
        if max == 1 {
            return Ok(0);
        }

        let bits = u64::BITS - (max - 1).leading_zeros();
        let mask = u64::MAX >> (u64::BITS - bits);
        let len = bits.div_ceil(8) as usize;

        loop {
            let mut buf = [0u8; 8];
            self.fill(&mut buf[..len])?;
            let candidate = u64::from_le_bytes(buf) & mask;
            if candidate < max {
                return Ok(candidate);
            }
        }
    }

    /// Uniform integer in `[min, max)`.
    pub fn int_range(&mut self, min: i64, max: i64) -> Result<i64, RandomError> {
        if min >= max {
            return Err(RandomError::EmptyRange { min, max });
        }
        // max - min fits in u64 for any pair of i64 values with min < max
        let span = (i128::from(max) - i128::from(min)) as u64;
        let offset = self.int(span)?;
        Ok((i128::from(min) + i128::from(offset)) as i64)
    }

    /// Uniform pick from a non-empty slice.
    pub fn select<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RandomError> {
        if items.is_empty() {
            return Err(RandomError::EmptyArray);
        }
        let idx = self.index(items.len())?;
        Ok(&items[idx])
    }

    /// `k` distinct positions of `items`, drawn without replacement.
    ///
    /// Output order is random. `k == items.len()` is a permutation.
    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Result<Vec<T>, RandomError> {
        if k > items.len() {
            return Err(RandomError::InvalidSampleSize {
                k,
                len: items.len(),
            });
        }

        // Partial Fisher-Yates over positions
        let mut positions: Vec<usize> = (0..items.len()).collect();
        for i in 0..k {
            let j = i + self.index(positions.len() - i)?;
            positions.swap(i, j);
        }
        Ok(positions[..k].iter().map(|&p| items[p].clone()).collect())
    }

    /// Fisher-Yates shuffle in place. Returns the same slice for chaining.
    pub fn shuffle<'a, T>(&mut self, items: &'a mut [T]) -> Result<&'a mut [T], RandomError> {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1)?;
            items.swap(i, j);
        }
        Ok(items)
    }

    /// Version-4 UUID, lowercase hyphenated.
    pub fn uuid(&mut self) -> Result<String, RandomError> {
        let mut raw = [0u8; 16];
        self.fill(&mut raw)?;
        Ok(uuid::Builder::from_random_bytes(raw)
            .into_uuid()
            .hyphenated()
            .to_string())
    }

    fn index(&mut self, len: usize) -> Result<usize, RandomError> {
        // usize always fits in u64 on supported targets
        self.int(len as u64).map(|v| v as usize)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RandomError> {
        self.rng
            .try_fill_bytes(buf)
            .map_err(|e| RandomError::Entropy(e.to_string()))
    }
}

/// `len` bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, RandomError> {
    SecureRandom::new().bytes(len)
}

/// Uniform integer in `[0, max)`.
pub fn random_int(max: u64) -> Result<u64, RandomError> {
    SecureRandom::new().int(max)
}

/// Uniform integer in `[min, max)`.
pub fn random_int_range(min: i64, max: i64) -> Result<i64, RandomError> {
    SecureRandom::new().int_range(min, max)
}

pub fn random_select<T>(items: &[T]) -> Result<&T, RandomError> {
    SecureRandom::new().select(items)
}

pub fn random_sample<T: Clone>(items: &[T], k: usize) -> Result<Vec<T>, RandomError> {
    SecureRandom::new().sample(items, k)
}

pub fn shuffle<T>(items: &mut [T]) -> Result<&mut [T], RandomError> {
    SecureRandom::new().shuffle(items)
}

pub fn random_uuid() -> Result<String, RandomError> {
    SecureRandom::new().uuid()
}

/// Errors from random operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RandomError {
    #[error("max must be greater than 0")]
    NonPositiveMax,

    #[error("min ({min}) must be less than max ({max})")]
    EmptyRange { min: i64, max: i64 },

    #[error("cannot select from an empty array")]
    EmptyArray,

    #[error("sample size {k} exceeds array length {len}")]
    InvalidSampleSize { k: usize, len: usize },

    #[error("entropy source failure: {0}")]
    Entropy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Replays a fixed byte script, for exercising rejection paths.
    struct Scripted(std::vec::IntoIter<u8>);

    impl Scripted {
        fn new(bytes: &[u8]) -> Self {
            Self(bytes.to_vec().into_iter())
        }
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.0.next().expect("script exhausted");
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for Scripted {}

    fn is_v4_uuid(s: &str) -> bool {
        let groups: Vec<&str> = s.split('-').collect();
        let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        lens == [8, 4, 4, 4, 12]
            && s.chars().all(|c| c == '-' || matches!(c, '0'..='9' | 'a'..='f'))
            && groups[2].starts_with('4')
            && matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b'))
    }

    #[test]
    fn bytes_have_requested_length() {
        assert!(random_bytes(0).unwrap().is_empty());
        assert_eq!(random_bytes(1).unwrap().len(), 1);
        assert_eq!(random_bytes(64).unwrap().len(), 64);
    }

    #[test]
    fn bytes_are_unique() {
        assert_ne!(random_bytes(32).unwrap(), random_bytes(32).unwrap());
    }

    #[test]
    fn int_max_zero_is_an_error() {
        assert_eq!(random_int(0).unwrap_err(), RandomError::NonPositiveMax);
    }

    #[test]
    fn int_max_one_is_always_zero() {
        for _ in 0..100 {
            assert_eq!(random_int(1).unwrap(), 0);
        }
    }

    #[test]
    fn int_stays_in_range() {
        for max in [2u64, 3, 7, 10, 255, 256, 257, 1 << 40, u64::MAX] {
            for _ in 0..200 {
                assert!(random_int(max).unwrap() < max);
            }
        }
    }

    #[test]
    fn int_rejects_out_of_range_draws() {
        // max = 5 -> 3 bits, one byte per draw; 7, 6 and 5 are redrawn
        let mut rng = SecureRandom::with_rng(Scripted::new(&[7, 6, 5, 3]));
        assert_eq!(rng.int(5).unwrap(), 3);
    }

    #[test]
    fn int_masks_to_minimal_bit_width() {
        // 0xfa & 0b111 = 2
        let mut rng = SecureRandom::with_rng(Scripted::new(&[0xfa]));
        assert_eq!(rng.int(5).unwrap(), 2);
    }

    #[test]
    fn int_is_roughly_uniform() {
        const BUCKETS: usize = 10;
        const TRIALS: usize = 100_000;
        let mut counts = [0usize; BUCKETS];
        let mut rng = SecureRandom::new();
        for _ in 0..TRIALS {
            counts[rng.int(BUCKETS as u64).unwrap() as usize] += 1;
        }
        let expected = TRIALS / BUCKETS;
        for (bucket, &count) in counts.iter().enumerate() {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 10,
                "bucket {bucket}: {count} vs expected {expected}"
            );
        }
    }

    #[test]
    fn int_range_bounds() {
        assert_eq!(
            random_int_range(5, 5).unwrap_err(),
            RandomError::EmptyRange { min: 5, max: 5 }
        );
        assert!(random_int_range(6, 5).is_err());
        for _ in 0..200 {
            let v = random_int_range(-3, 4).unwrap();
            assert!((-3..4).contains(&v));
        }
        assert_eq!(random_int_range(9, 10).unwrap(), 9);
        let extreme = random_int_range(i64::MIN, i64::MAX).unwrap();
        assert!(extreme < i64::MAX);
    }

    #[test]
    fn select_from_empty_is_an_error() {
        let empty: [u8; 0] = [];
        assert_eq!(random_select(&empty).unwrap_err(), RandomError::EmptyArray);
    }

    #[test]
    fn select_returns_member() {
        let items = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(items.contains(random_select(&items).unwrap()));
        }
    }

    #[test]
    fn sample_full_is_permutation() {
        let mut sample = random_sample(&[1, 2, 3, 4, 5], 5).unwrap();
        sample.sort();
        assert_eq!(sample, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sample_members_are_distinct() {
        let items: Vec<u32> = (0..100).collect();
        for k in [0, 1, 10, 50, 99] {
            let sample = random_sample(&items, k).unwrap();
            assert_eq!(sample.len(), k);
            let unique: HashSet<_> = sample.iter().collect();
            assert_eq!(unique.len(), k);
            assert!(sample.iter().all(|x| items.contains(x)));
        }
    }

    #[test]
    fn sample_oversized_is_an_error() {
        assert_eq!(
            random_sample(&[1, 2], 3).unwrap_err(),
            RandomError::InvalidSampleSize { k: 3, len: 2 }
        );
    }

    #[test]
    fn sample_zero_from_empty_is_empty() {
        let empty: [u8; 0] = [];
        assert!(random_sample(&empty, 0).unwrap().is_empty());
    }

    #[test]
    fn shuffle_preserves_multiset_in_place() {
        let mut items = vec![1, 1, 2, 3, 5, 8, 13, 21];
        let ptr = items.as_ptr();
        let shuffled = shuffle(&mut items).unwrap();
        assert_eq!(shuffled.as_ptr(), ptr);
        shuffled.sort();
        assert_eq!(items, vec![1, 1, 2, 3, 5, 8, 13, 21]);
    }

    #[test]
    fn shuffle_handles_trivial_slices() {
        let mut empty: Vec<u8> = vec![];
        assert!(shuffle(&mut empty).unwrap().is_empty());
        let mut one = vec![42];
        assert_eq!(shuffle(&mut one).unwrap(), &[42]);
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let mut a = SecureRandom::with_rng(StdRng::seed_from_u64(7));
        let mut b = SecureRandom::with_rng(StdRng::seed_from_u64(7));
        let mut xs: Vec<u32> = (0..20).collect();
        let mut ys = xs.clone();
        a.shuffle(&mut xs).unwrap();
        b.shuffle(&mut ys).unwrap();
        assert_eq!(xs, ys);
    }

    #[test]
    fn uuid_is_version_4() {
        for _ in 0..50 {
            let id = random_uuid().unwrap();
            assert!(is_v4_uuid(&id), "{id}");
        }
    }

    #[test]
    fn successive_uuids_differ() {
        assert_ne!(random_uuid().unwrap(), random_uuid().unwrap());
    }
}
