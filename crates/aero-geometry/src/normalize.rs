//! Mesh parsing and re-centering.

use std::borrow::Cow;
use std::io::Cursor;

use nalgebra::Point3;
use tracing::debug;

use crate::{Aabb, GeometryError, GeometryResult, NormalizedMesh};

const BINARY_HEADER_LEN: usize = 80;
const BINARY_PREAMBLE_LEN: usize = BINARY_HEADER_LEN + 4;
const BINARY_TRIANGLE_LEN: usize = 50;

/// True when the buffer is exactly a binary STL of the face count it declares.
fn has_binary_layout(bytes: &[u8]) -> bool {
    let Some(count) = bytes.get(BINARY_HEADER_LEN..BINARY_PREAMBLE_LEN) else {
        return false;
    };
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize;
    count
        .checked_mul(BINARY_TRIANGLE_LEN)
        .and_then(|body| body.checked_add(BINARY_PREAMBLE_LEN))
        == Some(bytes.len())
}

/// Many exporters start binary headers with `solid`, which `stl_io` takes
/// for ASCII. The header carries no geometry, so such buffers get a blank one.
fn binary_safe(bytes: &[u8]) -> Cow<'_, [u8]> {
    if bytes.starts_with(b"solid") && has_binary_layout(bytes) {
        let mut owned = bytes.to_vec();
        owned[..BINARY_HEADER_LEN].fill(0);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(bytes)
    }
}

/// Parse ASCII or binary STL bytes and center the surface on its bounding box.
pub fn normalize_stl(bytes: &[u8]) -> GeometryResult<NormalizedMesh> {
    let bytes = binary_safe(bytes);
    let mut reader = Cursor::new(bytes.as_ref());
    let indexed = stl_io::read_stl(&mut reader).map_err(|e| GeometryError::MalformedMesh {
        message: e.to_string(),
    })?;

    let vertices = indexed
        .vertices
        .iter()
        .map(|v| Point3::new(v[0], v[1], v[2]))
        .collect();

    let triangles = indexed
        .faces
        .iter()
        .map(|face| {
            let mut tri = [0u32; 3];
            for (slot, &index) in tri.iter_mut().zip(face.vertices.iter()) {
                *slot = u32::try_from(index).map_err(|_| GeometryError::MalformedMesh {
                    message: format!("vertex index {index} exceeds u32"),
                })?;
            }
            Ok(tri)
        })
        .collect::<GeometryResult<Vec<_>>>()?;

    normalize_triangles(vertices, triangles)
}

/// Center an already-indexed surface on its bounding box.
pub fn normalize_triangles(
    mut vertices: Vec<Point3<f32>>,
    triangles: Vec<[u32; 3]>,
) -> GeometryResult<NormalizedMesh> {
    if triangles.is_empty() {
        return Err(GeometryError::EmptyMesh);
    }

    if let Some(index) = vertices
        .iter()
        .position(|v| !v.iter().all(|c| c.is_finite()))
    {
        return Err(GeometryError::NonFiniteVertex { index });
    }

    let vertex_count = vertices.len();
    if let Some(bad) = triangles
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(GeometryError::MalformedMesh {
            message: format!("triangle references vertex {bad} of {vertex_count}"),
        });
    }

    let source_bounds = Aabb::from_points(&vertices).ok_or(GeometryError::EmptyMesh)?;
    let offset = -source_bounds.center().coords;
    for v in &mut vertices {
        *v += offset;
    }

    debug!(
        vertices = vertex_count,
        triangles = triangles.len(),
        extent = source_bounds.max_extent(),
        "normalized mesh"
    );

    Ok(NormalizedMesh {
        vertices,
        triangles,
        source_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_tetrahedron() -> (Vec<Point3<f32>>, Vec<[u32; 3]>) {
        let vertices = vec![
            Point3::new(10.0, 20.0, 30.0),
            Point3::new(12.0, 20.0, 30.0),
            Point3::new(10.0, 24.0, 30.0),
            Point3::new(10.0, 20.0, 36.0),
        ];
        let triangles = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        (vertices, triangles)
    }

    #[test]
    fn centers_bounding_box_on_origin() {
        let (vertices, triangles) = offset_tetrahedron();
        let mesh = normalize_triangles(vertices, triangles).unwrap();

        let bounds = mesh.bounds();
        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertices[0], Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.source_bounds.center(), Point3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn tetrahedron_has_six_edges() {
        let (vertices, triangles) = offset_tetrahedron();
        let mesh = normalize_triangles(vertices, triangles).unwrap();
        assert_eq!(mesh.edges().len(), 6);
    }

    #[test]
    fn rejects_empty_surface() {
        let (vertices, _) = offset_tetrahedron();
        assert!(matches!(
            normalize_triangles(vertices, vec![]),
            Err(GeometryError::EmptyMesh)
        ));
    }

    #[test]
    fn rejects_dangling_index() {
        let (vertices, _) = offset_tetrahedron();
        let err = normalize_triangles(vertices, vec![[0, 1, 9]]).unwrap_err();
        assert!(matches!(err, GeometryError::MalformedMesh { .. }));
    }

    #[test]
    fn rejects_non_finite_vertex() {
        let (mut vertices, triangles) = offset_tetrahedron();
        vertices[2].y = f32::NAN;
        assert!(matches!(
            normalize_triangles(vertices, triangles),
            Err(GeometryError::NonFiniteVertex { index: 2 })
        ));
    }

    #[test]
    fn binary_layout_requires_exact_length() {
        let mut bytes = vec![0u8; BINARY_HEADER_LEN];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.resize(BINARY_PREAMBLE_LEN + 2 * BINARY_TRIANGLE_LEN, 0);
        assert!(has_binary_layout(&bytes));
        bytes.push(0);
        assert!(!has_binary_layout(&bytes));
        assert!(!has_binary_layout(b"solid cube\nendsolid cube\n"));
    }

    #[test]
    fn ascii_stl_is_left_alone() {
        let ascii: &[u8] = b"solid t\n\
            facet normal 0 0 1\n\
            outer loop\n\
            vertex 0 0 0\n\
            vertex 2 0 0\n\
            vertex 0 2 0\n\
            endloop\n\
            endfacet\n\
            endsolid t\n";
        assert!(matches!(binary_safe(ascii), Cow::Borrowed(_)));
        let mesh = normalize_stl(ascii).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.source_bounds.center(), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        for bytes in [&b""[..], &b"not an stl"[..]] {
            assert!(matches!(
                normalize_stl(bytes),
                Err(GeometryError::MalformedMesh { .. })
            ));
        }
    }
}
