use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// `None` for an empty point set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest edge length of the box.
    pub fn max_extent(&self) -> f32 {
        self.extents().max()
    }

    pub fn translated(&self, offset: &Vector3<f32>) -> Self {
        Self {
            min: self.min + *offset,
            max: self.max + *offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_no_bounds() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = [
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-3.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 2.5),
        ];
        let bounds = Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, Point3::new(-3.0, -2.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 4.0, 2.5));
        assert_eq!(bounds.center(), Point3::new(-1.0, 1.0, 1.25));
        assert_eq!(bounds.max_extent(), 6.0);
    }
}
