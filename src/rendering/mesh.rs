//! Procedural mesh builders for the scene primitives.
//!
//! All meshes are indexed triangle lists built from [`Vertex`]; the builders
//! run once at assembly time, so clarity beats allocation thrift here.

use crate::rendering::Vertex;
use std::f32::consts::TAU;

/// CPU-side mesh: an indexed triangle list ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Latitude/longitude sphere centered at the origin.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    assert!(radius > 0.0, "sphere radius must be positive");
    assert!(sectors >= 3 && stacks >= 2, "sphere too coarse");

    let mut mesh = MeshData::default();
    for i in 0..=stacks {
        // stack angle from +Y pole down to -Y
        let v = i as f32 / stacks as f32;
        let phi = v * std::f32::consts::PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=sectors {
            let u = j as f32 / sectors as f32;
            let theta = u * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            mesh.vertices.push(Vertex::new(position, normal));
        }
    }

    let ring = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * ring + j;
            let b = a + ring;
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    mesh
}

/// Flat ring segment in the XY plane, normal +Z, spanning `theta_length`
/// radians counterclockwise from `theta_start`.
pub fn annulus_sector(
    inner: f32,
    outer: f32,
    segments: u32,
    theta_start: f32,
    theta_length: f32,
) -> MeshData {
    assert!(inner > 0.0 && inner < outer, "degenerate annulus radii");
    assert!(segments >= 3, "annulus too coarse");
    assert!(theta_length > 0.0, "annulus must span a positive angle");

    let mut mesh = MeshData::default();
    for j in 0..=segments {
        let theta = theta_start + theta_length * j as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for radius in [inner, outer] {
            mesh.vertices.push(Vertex::new(
                [radius * cos_theta, radius * sin_theta, 0.0],
                [0.0, 0.0, 1.0],
            ));
        }
    }
    for j in 0..segments {
        let a = j * 2; // inner edge, segment j
        mesh.indices.extend_from_slice(&[a, a + 1, a + 2]);
        mesh.indices.extend_from_slice(&[a + 2, a + 1, a + 3]);
    }
    mesh
}

/// Open-ended tapered tube along the Y axis, `radius_top` at +height/2 and
/// `radius_bottom` at -height/2, with no caps.
pub fn open_tube(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> MeshData {
    assert!(
        radius_top > 0.0 && radius_bottom > 0.0 && height > 0.0,
        "degenerate tube dimensions"
    );
    assert!(radial_segments >= 3 && height_segments >= 1, "tube too coarse");

    let slope = (radius_bottom - radius_top) / height;
    let mut mesh = MeshData::default();
    for i in 0..=height_segments {
        let v = i as f32 / height_segments as f32;
        let y = height * (0.5 - v);
        let radius = radius_top + (radius_bottom - radius_top) * v;
        for j in 0..=radial_segments {
            let theta = TAU * j as f32 / radial_segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = glam::Vec3::new(sin_theta, slope, cos_theta).normalize();
            mesh.vertices.push(Vertex::new(
                [radius * sin_theta, y, radius * cos_theta],
                normal.to_array(),
            ));
        }
    }

    let ring = radial_segments + 1;
    for i in 0..height_segments {
        for j in 0..radial_segments {
            let a = i * ring + j;
            let b = a + ring;
            mesh.indices.extend_from_slice(&[a, b, a + 1]);
            mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn max_index(mesh: &MeshData) -> u32 {
        *mesh.indices.iter().max().unwrap()
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = uv_sphere(2.0, 24, 16);
        assert_eq!(mesh.vertices.len(), 25 * 17);
        // pole stacks contribute one triangle per sector, inner stacks two
        assert_eq!(mesh.triangle_count() as u32, 24 * (2 * 16 - 2));
        assert!((max_index(&mesh) as usize) < mesh.vertices.len());
        for v in &mesh.vertices {
            let r = glam::Vec3::from_array(v.position).length();
            assert_relative_eq!(r, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_annulus_vertices_inside_band() {
        let mesh = annulus_sector(2.0, 2.5, 64, 1.0, 5.0);
        assert_eq!(mesh.vertices.len(), 65 * 2);
        assert_eq!(mesh.triangle_count(), 64 * 2);
        assert!((max_index(&mesh) as usize) < mesh.vertices.len());
        for v in &mesh.vertices {
            let r = (v.position[0] * v.position[0] + v.position[1] * v.position[1]).sqrt();
            assert!(r >= 2.0 - 1e-4 && r <= 2.5 + 1e-4);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn test_annulus_honors_start_angle() {
        let mesh = annulus_sector(1.0, 2.0, 8, std::f32::consts::FRAC_PI_2, 1.0);
        // first inner vertex sits at theta_start
        let first = mesh.vertices[0].position;
        assert_relative_eq!(first[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(first[1], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_tube_is_open_and_tapered() {
        let mesh = open_tube(2.0, 0.25, 35.0, 64, 24);
        assert_eq!(mesh.vertices.len(), 65 * 25);
        assert_eq!(mesh.triangle_count(), 64 * 24 * 2);
        assert!((max_index(&mesh) as usize) < mesh.vertices.len());
        // no cap vertices: every vertex sits on the lateral surface
        let top = mesh.vertices.iter().filter(|v| v.position[1] == 17.5);
        for v in top {
            let r = (v.position[0] * v.position[0] + v.position[2] * v.position[2]).sqrt();
            assert_relative_eq!(r, 2.0, epsilon = 1e-3);
        }
        let bottom = mesh.vertices.iter().filter(|v| v.position[1] == -17.5);
        for v in bottom {
            let r = (v.position[0] * v.position[0] + v.position[2] * v.position[2]).sqrt();
            assert_relative_eq!(r, 0.25, epsilon = 1e-3);
        }
    }

    #[test]
    #[should_panic(expected = "degenerate annulus radii")]
    fn test_annulus_rejects_inverted_radii() {
        annulus_sector(3.0, 2.0, 8, 0.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "sphere radius must be positive")]
    fn test_sphere_rejects_negative_radius() {
        uv_sphere(-1.0, 8, 8);
    }
}
