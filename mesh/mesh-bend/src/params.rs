//! Bending parameters and configuration.
//!
//! This module provides the [`BendParams`] struct for configuring how a
//! [`MeshBender`](crate::MeshBender) samples the curve and how it treats
//! degenerate input.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How curve samples are shared between vertices within one compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum SampleCachePolicy {
    /// Vertices share a sample only when their distance rates are bit-identical.
    ///
    /// Vertices that come from the same source coordinate through the same
    /// placement always produce identical rates, so rings of a tube share
    /// one curve query each.
    #[default]
    Exact,

    /// Snap the rate to the nearest multiple of `1 / steps` before sampling.
    ///
    /// At most `steps + 1` curve queries happen per compute. Vertices are
    /// placed at the snapped distance, so this trades accuracy for speed.
    Quantized {
        /// Number of intervals the curve is divided into.
        steps: u32,
    },
}

impl SampleCachePolicy {
    /// Cache key and the rate actually used for the curve query.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rate is clamped to [0, 1] by the caller
    pub(crate) fn key(self, rate: f64) -> (u64, f64) {
        match self {
            Self::Exact => (rate.to_bits(), rate),
            Self::Quantized { steps } => {
                let steps = f64::from(steps.max(1));
                let snapped = (rate * steps).round();
                (snapped as u64, snapped / steps)
            }
        }
    }
}

/// What to do when the mesh has zero length along the bend axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum DegenerateExtentPolicy {
    /// Fail the compute with [`BendError::DegenerateExtent`](crate::BendError::DegenerateExtent).
    #[default]
    Fail,

    /// Place every vertex at the start of the curve.
    CollapseToStart,
}

/// Parameters for mesh bending.
///
/// # Example
///
/// ```
/// use mesh_bend::{BendParams, DegenerateExtentPolicy, SampleCachePolicy};
///
/// let params = BendParams::default()
///     .with_sample_cache(SampleCachePolicy::Quantized { steps: 64 })
///     .with_degenerate_extent(DegenerateExtentPolicy::CollapseToStart);
///
/// assert_eq!(params.sample_cache, SampleCachePolicy::Quantized { steps: 64 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BendParams {
    /// Sample sharing policy. Default: [`SampleCachePolicy::Exact`].
    pub sample_cache: SampleCachePolicy,

    /// Zero-extent handling. Default: [`DegenerateExtentPolicy::Fail`].
    pub degenerate_extent: DegenerateExtentPolicy,
}

impl BendParams {
    /// Params with a quantized sample cache of `steps` intervals.
    #[must_use]
    pub fn quantized(steps: u32) -> Self {
        Self::default().with_sample_cache(SampleCachePolicy::Quantized { steps })
    }

    /// Set the sample cache policy.
    #[must_use]
    pub const fn with_sample_cache(mut self, policy: SampleCachePolicy) -> Self {
        self.sample_cache = policy;
        self
    }

    /// Set the degenerate extent policy.
    #[must_use]
    pub const fn with_degenerate_extent(mut self, policy: DegenerateExtentPolicy) -> Self {
        self.degenerate_extent = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_key_uses_bits() {
        let (key, rate) = SampleCachePolicy::Exact.key(0.25);
        assert_eq!(key, 0.25_f64.to_bits());
        assert!((rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn quantized_key_snaps() {
        let policy = SampleCachePolicy::Quantized { steps: 10 };
        let (a, ra) = policy.key(0.31);
        let (b, rb) = policy.key(0.29);
        assert_eq!(a, b);
        assert!((ra - 0.3).abs() < 1e-12);
        assert!((ra - rb).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_steps_behaves_like_one() {
        let policy = SampleCachePolicy::Quantized { steps: 0 };
        assert_eq!(policy.key(0.2).0, 0);
        assert_eq!(policy.key(0.8).0, 1);
    }

    #[test]
    fn defaults() {
        let params = BendParams::default();
        assert_eq!(params.sample_cache, SampleCachePolicy::Exact);
        assert_eq!(params.degenerate_extent, DegenerateExtentPolicy::Fail);
        assert_eq!(
            BendParams::quantized(8).sample_cache,
            SampleCachePolicy::Quantized { steps: 8 }
        );
    }
}
