//! Statistics reported by a compute.

use std::fmt;

/// What a single [`MeshBender::compute`](crate::MeshBender::compute) did.
///
/// # Examples
///
/// ```
/// use mesh_bend::BendStats;
///
/// let stats = BendStats {
///     vertices_bent: 40,
///     curve_queries: 10,
///     cache_hits: 30,
///     ..BendStats::default()
/// };
///
/// assert!((stats.hit_rate() - 0.75).abs() < 1e-12);
/// println!("{stats}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BendStats {
    /// Number of vertices written to the output mesh.
    pub vertices_bent: usize,
    /// Number of distinct curve queries made.
    pub curve_queries: usize,
    /// Number of vertices that reused an earlier query.
    pub cache_hits: usize,
    /// Whether the placement data was rebuilt before bending.
    pub rebuilt: bool,
    /// Whether face winding was reversed to undo a mirroring placement.
    pub winding_reversed: bool,
}

impl BendStats {
    /// Fraction of vertex lookups answered from the sample cache.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.curve_queries + self.cache_hits;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// One-line summary of the compute.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "BendStats: {} vertices bent, {} curve queries, {} cache hits ({:.1}%), \
             rebuilt: {}, winding reversed: {}",
            self.vertices_bent,
            self.curve_queries,
            self.cache_hits,
            self.hit_rate() * 100.0,
            self.rebuilt,
            self.winding_reversed
        )
    }
}

impl fmt::Display for BendStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_have_zero_hit_rate() {
        assert!(BendStats::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn summary_mentions_counts() {
        let stats = BendStats {
            vertices_bent: 8,
            curve_queries: 2,
            cache_hits: 6,
            rebuilt: true,
            winding_reversed: false,
        };
        let text = stats.to_string();
        assert!(text.contains("8 vertices bent"));
        assert!(text.contains("2 curve queries"));
        assert!(text.contains("75.0%"));
    }
}
