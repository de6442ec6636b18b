//! Background star scattering.

use crate::generation::GenerationError;
use glam::Vec3;
use rand::Rng;

/// A star position in world space. Magnitudes on every axis fall inside the
/// configured shell; signs are mirrored independently per axis, so the cloud
/// fills the gap between two concentric cube shells, not a spherical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<StarPoint> for Vec3 {
    fn from(p: StarPoint) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Scatter stars between `inner_radius` and `outer_radius`.
///
/// Emits `count / 2` points; the halved density is deliberate and load-
/// bearing for the intended look (see DESIGN.md). Each axis draws its
/// magnitude uniformly from the shell, then flips sign with probability one
/// half, independently of the other axes.
pub fn star_field<R: Rng>(
    count: usize,
    inner_radius: f32,
    outer_radius: f32,
    rng: &mut R,
) -> Result<Vec<StarPoint>, GenerationError> {
    if inner_radius < 0.0 || inner_radius >= outer_radius || !outer_radius.is_finite() {
        return Err(GenerationError::InvalidShell {
            inner: inner_radius,
            outer: outer_radius,
        });
    }

    let mut stars = Vec::with_capacity(count / 2);
    for _ in 0..count / 2 {
        stars.push(StarPoint {
            x: mirrored(rng.gen_range(inner_radius..outer_radius), rng),
            y: mirrored(rng.gen_range(inner_radius..outer_radius), rng),
            z: mirrored(rng.gen_range(inner_radius..outer_radius), rng),
        });
    }
    Ok(stars)
}

fn mirrored<R: Rng>(magnitude: f32, rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_density_halving() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = star_field(1000, 25.0, 250.0, &mut rng).unwrap();
        assert_eq!(stars.len(), 500);

        let stars = star_field(9, 25.0, 250.0, &mut rng).unwrap();
        assert_eq!(stars.len(), 4);

        let stars = star_field(0, 25.0, 250.0, &mut rng).unwrap();
        assert!(stars.is_empty());
    }

    #[test]
    fn test_magnitudes_stay_in_shell() {
        let mut rng = StdRng::seed_from_u64(42);
        let stars = star_field(1000, 25.0, 250.0, &mut rng).unwrap();
        for star in &stars {
            for coord in [star.x, star.y, star.z] {
                assert!(coord.abs() >= 25.0, "coordinate {coord} inside shell");
                assert!(coord.abs() <= 250.0, "coordinate {coord} outside shell");
            }
        }
    }

    #[test]
    fn test_both_signs_occur() {
        let mut rng = StdRng::seed_from_u64(3);
        let stars = star_field(1000, 25.0, 250.0, &mut rng).unwrap();
        assert!(stars.iter().any(|s| s.x < 0.0) && stars.iter().any(|s| s.x > 0.0));
        assert!(stars.iter().any(|s| s.y < 0.0) && stars.iter().any(|s| s.y > 0.0));
        assert!(stars.iter().any(|s| s.z < 0.0) && stars.iter().any(|s| s.z > 0.0));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = star_field(100, 1.0, 2.0, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = star_field(100, 1.0, 2.0, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_shell_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(star_field(10, -1.0, 5.0, &mut rng).is_err());
        assert!(star_field(10, 5.0, 5.0, &mut rng).is_err());
        assert!(star_field(10, 6.0, 5.0, &mut rng).is_err());
    }
}
