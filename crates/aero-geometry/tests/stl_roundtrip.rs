//! Binary STL buffers through the normalizer.

use aero_geometry::{GeometryError, normalize_stl};
use nalgebra::Point3;
use proptest::prelude::*;

/// Encode triangles as a binary STL buffer.
fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        for _ in 0..3 {
            bytes.extend_from_slice(&0f32.to_le_bytes());
        }
        for vertex in tri {
            for c in vertex {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

fn wing_like() -> Vec<[[f32; 3]; 3]> {
    vec![
        [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[4.0, 0.0, 0.0], [4.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [2.0, 0.5, 0.4]],
    ]
}

#[test]
fn binary_stl_is_centered() {
    let mesh = normalize_stl(&binary_stl(&wing_like())).expect("valid stl");

    assert_eq!(mesh.triangle_count(), 3);
    // stl_io merges shared corners
    assert_eq!(mesh.vertex_count(), 5);

    let bounds = mesh.bounds();
    assert_eq!(bounds.center(), Point3::origin());
    assert_eq!(bounds.max, Point3::new(2.0, 0.5, 0.2));
    assert_eq!(mesh.source_bounds.center(), Point3::new(2.0, 0.5, 0.2));
}

#[test]
fn header_only_stl_is_rejected() {
    let bytes = binary_stl(&[]);
    assert!(matches!(normalize_stl(&bytes), Err(GeometryError::EmptyMesh)));
}

#[test]
fn truncated_stl_is_malformed() {
    let mut bytes = binary_stl(&wing_like());
    bytes.truncate(100);
    assert!(matches!(
        normalize_stl(&bytes),
        Err(GeometryError::MalformedMesh { .. })
    ));
}

proptest! {
    #[test]
    fn any_surface_is_centered_with_extents_preserved(
        corners in prop::collection::vec(
            prop::array::uniform3(prop::array::uniform3(-1000.0f32..1000.0f32)),
            1..16,
        )
    ) {
        let mesh = normalize_stl(&binary_stl(&corners)).expect("valid stl");
        let centered = mesh.bounds();
        let center = centered.center();
        let tol = 1e-3 * (1.0 + mesh.source_bounds.max_extent());
        prop_assert!(center.coords.norm() <= tol);
        prop_assert!((centered.extents() - mesh.source_bounds.extents()).norm() <= tol);
        for v in &mesh.vertices {
            prop_assert!(v.x >= centered.min.x - tol && v.x <= centered.max.x + tol);
        }
    }
}

#[test]
fn binary_stl_with_solid_header_is_read_as_binary() {
    let mut bytes = binary_stl(&wing_like());
    let header = b"solid exported by CAD";
    bytes[..header.len()].copy_from_slice(header);

    let mesh = normalize_stl(&bytes).expect("binary body behind a solid header");
    assert_eq!(mesh.triangle_count(), 3);
    assert_eq!(mesh.source_bounds.center(), Point3::new(2.0, 0.5, 0.2));
}
