use std::collections::BTreeSet;

use nalgebra::Point3;

use crate::Aabb;

/// Triangle surface translated into the scene frame.
#[derive(Debug, Clone)]
pub struct NormalizedMesh {
    pub vertices: Vec<Point3<f32>>,
    pub triangles: Vec<[u32; 3]>,
    /// Bounds before centering, in file units.
    pub source_bounds: Aabb,
}

impl NormalizedMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Bounds in the scene frame; centered on the origin by construction.
    pub fn bounds(&self) -> Aabb {
        let offset = -self.source_bounds.center().coords;
        self.source_bounds.translated(&offset)
    }

    /// Unique undirected edges, for wireframe drawing.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges = BTreeSet::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert(if a < b { [a, b] } else { [b, a] });
            }
        }
        edges.into_iter().collect()
    }
}
