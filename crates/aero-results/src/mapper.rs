//! Grid-index polylines to scene-space polylines.
//!
//! The service voxelizes a mesh scaled into the unit cube, so grid index `i`
//! along an axis sits at `i / resolution_used` in that cube. Subtracting 0.5
//! moves the cube center to the origin, which is where the displayed mesh is
//! centered as well.

use nalgebra::Point3;

use crate::{ResultsResult, SimulationResult, types::GridPoint};

/// Streamlines in the scene frame. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedStreamlines {
    polylines: Vec<Vec<Point3<f32>>>,
}

impl MappedStreamlines {
    pub fn polylines(&self) -> &[Vec<Point3<f32>>] {
        &self.polylines
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }

    pub fn first_point(&self) -> Option<Point3<f32>> {
        self.polylines.iter().find_map(|line| line.first().copied())
    }
}

/// Map a single grid point; `resolution_used` must be non-zero.
pub fn grid_to_scene(p: &GridPoint, resolution_used: u32) -> Point3<f64> {
    let scale = f64::from(resolution_used);
    Point3::new(p[0] / scale - 0.5, p[1] / scale - 0.5, p[2] / scale - 0.5)
}

/// Map every streamline of `result` into the scene frame using the result's
/// own `resolution_used`.
pub fn map_streamlines(result: &SimulationResult) -> ResultsResult<MappedStreamlines> {
    result.validate()?;

    let polylines = result
        .streamlines
        .iter()
        .map(|line| {
            line.iter()
                .map(|p| grid_to_scene(p, result.resolution_used).cast::<f32>())
                .collect()
        })
        .collect();

    Ok(MappedStreamlines { polylines })
}
