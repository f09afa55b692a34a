// Host-side tests for generated meshes.

use globe_core::mesh::{starfield, unit_box, uv_sphere};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn uv_sphere_vertices_lie_on_radius() {
    let mesh = uv_sphere(5.0, 32, 16);
    assert_eq!(mesh.vertices.len(), 33 * 17);
    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        let r = (x * x + y * y + z * z).sqrt();
        assert!((r - 5.0).abs() < 1e-4);
        let [nx, ny, nz] = v.normal;
        assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-4);
    }
    assert_eq!(mesh.indices.len() % 3, 0);
    // Pole rows contribute one triangle per segment instead of two.
    assert_eq!(mesh.indices.len(), (32 * 16 * 2 - 2 * 32) * 3);
    let n = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < n));
}

#[test]
fn uv_sphere_clamps_degenerate_segment_counts() {
    let mesh = uv_sphere(1.0, 0, 0);
    assert_eq!(mesh.vertices.len(), 4 * 3);
    assert!(!mesh.indices.is_empty());
}

#[test]
fn unit_box_is_centred_with_flat_faces() {
    let mesh = unit_box();
    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);
    for v in &mesh.vertices {
        assert!(v.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        // The face normal's axis is the coordinate pinned to ±0.5.
        let axis = v.normal.iter().position(|c| c.abs() == 1.0).unwrap();
        assert_eq!(v.position[axis], 0.5 * v.normal[axis]);
    }
}

#[test]
fn starfield_stays_inside_its_volume_and_replays_by_seed() {
    let a = starfield(500, 2000.0, &mut StdRng::seed_from_u64(7));
    let b = starfield(500, 2000.0, &mut StdRng::seed_from_u64(7));
    assert_eq!(a.len(), 500);
    assert_eq!(a, b);
    for [x, y, z] in a {
        assert!((-1000.0..=1000.0).contains(&x));
        assert!((-1000.0..=1000.0).contains(&y));
        assert!((-2000.0..=0.0).contains(&z));
    }
}
