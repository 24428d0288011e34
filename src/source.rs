//! Random sources for draw generation.
//!
//! The generator never reaches for a global random facility. Callers hand it
//! a [`RandomSource`], which keeps generation testable with deterministic
//! stand-ins such as [`SourceMock`].
//!
//! # Implementations
//!
//! ## [`SecureSource`]
//!
//! Wraps any [`rand`] generator that is marked [`CryptoRng`]. This is the only
//! source the binary uses.
//!
//! ## [`SourceMock`]
//!
//! Returns predefined raw values in rotation.

use rand::{CryptoRng, RngCore, rngs::ThreadRng};
use serde::{Deserialize, Serialize};

/// A provider of uniformly distributed 32-bit unsigned integers.
pub trait RandomSource {
    /// Returns the next raw value.
    fn next_u32(&mut self) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_u32(&mut self) -> u32 {
        T::next_u32(self)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_u32(&mut self) -> u32 {
        T::next_u32(self)
    }
}

/// A cryptographically secure source backed by the [`rand`] crate.
///
/// ```rust
/// use luckydip::source::{RandomSource, SecureSource};
///
/// let mut source = SecureSource::thread();
/// let _raw = source.next_u32();
/// ```
#[derive(Debug, Clone)]
pub struct SecureSource<R: RngCore + CryptoRng>(pub R);

impl SecureSource<ThreadRng> {
    /// The thread-local generator, reseeded from the operating system.
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: RngCore + CryptoRng> RandomSource for SecureSource<R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}

/// A deterministic source returning values from a fixed array in rotation.
///
/// Only for tests. A mock that keeps yielding values already drawn stalls
/// rejection sampling.
///
/// ```rust
/// use luckydip::source::{RandomSource, SourceMock};
///
/// let mut source = SourceMock([7, 9]);
/// assert_eq!(source.next_u32(), 7);
/// assert_eq!(source.next_u32(), 9);
/// assert_eq!(source.next_u32(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceMock<const N: usize>(pub [u32; N]);

impl<const N: usize> RandomSource for SourceMock<N> {
    fn next_u32(&mut self) -> u32 {
        let Some(first) = self.0.first().copied() else {
            return 0;
        };
        self.0.rotate_left(1);
        first
    }
}

/// How a raw `u32` is turned into an offset inside a range.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mapping {
    /// `floor(raw / (2^32 - 1) * span)`.
    ///
    /// Slightly biased towards some values when `span` is not a power of
    /// two. The raw value `u32::MAX` would land one past the range and is
    /// redrawn.
    Scaled,
    /// Rejects raw values above the largest multiple of `span`, then takes
    /// `raw % span`. Every offset is equally likely.
    #[default]
    Unbiased,
}

impl Mapping {
    /// Maps `raw` onto `0..span`, or `None` when the value must be redrawn.
    ///
    /// `span` must be in `1..=2^32`.
    pub fn offset(self, raw: u32, span: u64) -> Option<u64> {
        debug_assert!((1..=1 << 32).contains(&span));
        match self {
            Mapping::Scaled => {
                if raw == u32::MAX {
                    return None;
                }
                Some(u64::from(raw) * span / u64::from(u32::MAX))
            }
            Mapping::Unbiased => {
                let zone = (1u64 << 32) - (1u64 << 32) % span;
                let raw = u64::from(raw);
                (raw < zone).then_some(raw % span)
            }
        }
    }

    /// Draws from `source` until a raw value maps onto `0..span`.
    pub fn sample<S: RandomSource + ?Sized>(self, source: &mut S, span: u64) -> u64 {
        loop {
            if let Some(offset) = self.offset(source.next_u32(), span) {
                return offset;
            }
            tracing::trace!(mapping = ?self, span, "raw value outside mapping zone, redrawing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_matches_floor_scaling() {
        let span = 60;
        for raw in [0, 1, 71_582_788, 1 << 31, u32::MAX - 1] {
            let expected = (f64::from(raw) / f64::from(u32::MAX) * 60.0).floor() as u64;
            assert_eq!(Mapping::Scaled.offset(raw, span), Some(expected), "raw {raw}");
        }
    }

    #[test]
    fn scaled_redraws_the_top_value() {
        assert_eq!(Mapping::Scaled.offset(u32::MAX, 60), None);
        assert_eq!(Mapping::Scaled.offset(u32::MAX - 1, 60), Some(59));
    }

    #[test]
    fn unbiased_rejects_the_partial_block() {
        // 2^32 % 60 == 16, so the last 16 raw values are outside the zone.
        let zone = (1u64 << 32) - 16;
        assert_eq!(Mapping::Unbiased.offset((zone - 1) as u32, 60), Some((zone - 1) % 60));
        assert_eq!(Mapping::Unbiased.offset(zone as u32, 60), None);
        assert_eq!(Mapping::Unbiased.offset(u32::MAX, 60), None);
        assert_eq!(Mapping::Unbiased.offset(125, 60), Some(5));
    }

    #[test]
    fn full_width_span_keeps_every_raw_value() {
        let span = 1u64 << 32;
        assert_eq!(Mapping::Unbiased.offset(u32::MAX, span), Some(u64::from(u32::MAX)));
        assert_eq!(Mapping::Scaled.offset(u32::MAX - 1, span), Some(u64::from(u32::MAX) - 1));
    }

    #[test]
    fn sample_skips_rejected_values() {
        let mut source = SourceMock([u32::MAX, u32::MAX, 42]);
        assert_eq!(Mapping::Unbiased.sample(&mut source, 60), 42);
        let mut source = SourceMock([u32::MAX, 0]);
        assert_eq!(Mapping::Scaled.sample(&mut source, 60), 0);
    }

    #[test]
    fn empty_mock_yields_zero() {
        let mut source = SourceMock([]);
        assert_eq!(source.next_u32(), 0);
    }

    #[test]
    fn secure_source_is_usable_through_a_reference() {
        let mut source = SecureSource::thread();
        let by_ref: &mut dyn RandomSource = &mut source;
        let offset = Mapping::Unbiased.sample(by_ref, 10);
        assert!(offset < 10);
    }
}
