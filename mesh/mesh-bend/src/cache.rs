//! Per-compute cache of curve samples keyed by distance rate.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::params::SampleCachePolicy;
use crate::sample::{CurveSample, CurveSampler};

/// Samples fetched during one compute.
///
/// A fresh cache is used for every compute, so a curve edit between
/// computes is always observed.
#[derive(Debug)]
pub(crate) struct SampleCache {
    policy: SampleCachePolicy,
    entries: HashMap<u64, CurveSample>,
    hits: usize,
}

impl SampleCache {
    pub(crate) fn new(policy: SampleCachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            hits: 0,
        }
    }

    /// Sample for `rate` in `[0, 1]`, querying `curve` at most once per key.
    pub(crate) fn sample(&mut self, rate: f64, curve: &dyn CurveSampler) -> CurveSample {
        let (key, query_rate) = self.policy.key(rate);
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                *entry.get()
            }
            Entry::Vacant(entry) => {
                let sample = curve.sample_at_distance(query_rate * curve.length());
                *entry.insert(sample)
            }
        }
    }

    /// Number of distinct curve queries made.
    pub(crate) fn queries(&self) -> usize {
        self.entries.len()
    }

    /// Number of lookups answered without a curve query.
    pub(crate) const fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ChangeNotifier;
    use nalgebra::{Point3, UnitQuaternion};
    use std::cell::RefCell;

    struct Recording {
        distances: RefCell<Vec<f64>>,
        changes: ChangeNotifier,
    }

    impl CurveSampler for Recording {
        fn sample_at_distance(&self, distance: f64) -> CurveSample {
            self.distances.borrow_mut().push(distance);
            CurveSample::new(Point3::new(0.0, 0.0, distance), UnitQuaternion::identity())
        }

        fn length(&self) -> f64 {
            8.0
        }

        fn changes(&self) -> &ChangeNotifier {
            &self.changes
        }
    }

    fn recording() -> Recording {
        Recording {
            distances: RefCell::new(Vec::new()),
            changes: ChangeNotifier::new(),
        }
    }

    #[test]
    fn exact_policy_queries_each_rate_once() {
        let curve = recording();
        let mut cache = SampleCache::new(SampleCachePolicy::Exact);

        for rate in [0.0, 0.5, 0.5, 1.0, 0.0] {
            cache.sample(rate, &curve);
        }

        assert_eq!(*curve.distances.borrow(), vec![0.0, 4.0, 8.0]);
        assert_eq!(cache.queries(), 3);
        assert_eq!(cache.hits(), 2);
    }

    #[test]
    fn quantized_policy_samples_snapped_distance() {
        let curve = recording();
        let mut cache = SampleCache::new(SampleCachePolicy::Quantized { steps: 4 });

        let a = cache.sample(0.26, &curve);
        let b = cache.sample(0.24, &curve);

        assert_eq!(a, b);
        assert_eq!(cache.queries(), 1);
        assert!((a.location.z - 2.0).abs() < 1e-12);
    }
}
