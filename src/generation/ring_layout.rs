//! Concentric ring tiling for the accretion disk.

use crate::generation::GenerationError;

/// One half-open radial band of the disk. Invariant: `0 < inner < outer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingInterval {
    pub inner: f32,
    pub outer: f32,
}

impl RingInterval {
    pub fn width(&self) -> f32 {
        self.outer - self.inner
    }
}

/// Partition `[min_distance, max_distance]` into width-`gap` bands and keep
/// every other one, so rings never touch. A trailing partial band (when `gap`
/// does not evenly divide the span) is dropped rather than emitted short.
pub fn ring_layout(
    min_distance: f32,
    max_distance: f32,
    gap: f32,
) -> Result<Vec<RingInterval>, GenerationError> {
    if gap <= 0.0 || !gap.is_finite() {
        return Err(GenerationError::NonPositiveGap(gap));
    }
    if min_distance <= 0.0 {
        return Err(GenerationError::NonPositiveMin(min_distance));
    }
    if min_distance >= max_distance {
        return Err(GenerationError::InvertedBounds {
            min: min_distance,
            max: max_distance,
        });
    }

    let band_count = ((max_distance - min_distance) / gap).floor() as usize;
    let mut levels = Vec::with_capacity(band_count / 2 + 1);
    for i in (0..band_count).step_by(2) {
        levels.push(RingInterval {
            inner: min_distance + i as f32 * gap,
            outer: min_distance + (i + 1) as f32 * gap,
        });
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_layout_counts() {
        let levels = ring_layout(2.0, 5.0, 0.01).unwrap();
        assert_eq!(levels.len(), 150);
        assert_relative_eq!(levels[0].inner, 2.0);
        assert_relative_eq!(levels[0].outer, 2.01, epsilon = 1e-5);
    }

    #[test]
    fn test_intervals_sorted_disjoint_in_bounds() {
        let levels = ring_layout(2.0, 5.0, 0.25).unwrap();
        for pair in levels.windows(2) {
            // sorted by radius, separated by exactly one skipped band
            assert!(pair[0].outer < pair[1].inner);
            assert_relative_eq!(pair[1].inner - pair[0].outer, 0.25, epsilon = 1e-5);
        }
        for level in &levels {
            assert!(level.inner < level.outer);
            assert!(level.inner >= 2.0);
            assert!(level.outer <= 5.0);
            assert_relative_eq!(level.width(), 0.25, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_partial_trailing_band_omitted() {
        // span 3.0 holds four full 0.7 bands; the fifth is partial and dropped
        let levels = ring_layout(2.0, 5.0, 0.7).unwrap();
        assert_eq!(levels.len(), 2);
        assert_relative_eq!(levels[1].outer, 2.0 + 3.0 * 0.7, epsilon = 1e-5);
        assert!(levels[1].outer <= 5.0);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert_eq!(
            ring_layout(2.0, 5.0, 0.0),
            Err(GenerationError::NonPositiveGap(0.0))
        );
        assert_eq!(
            ring_layout(2.0, 5.0, -0.1),
            Err(GenerationError::NonPositiveGap(-0.1))
        );
        assert_eq!(
            ring_layout(0.0, 5.0, 0.1),
            Err(GenerationError::NonPositiveMin(0.0))
        );
        assert!(matches!(
            ring_layout(5.0, 2.0, 0.1),
            Err(GenerationError::InvertedBounds { .. })
        ));
        assert!(matches!(
            ring_layout(2.0, 2.0, 0.1),
            Err(GenerationError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn test_span_smaller_than_gap_yields_nothing() {
        let levels = ring_layout(2.0, 2.05, 0.1).unwrap();
        assert!(levels.is_empty());
    }
}
