use crate::{Interval, Vec3};

/// Axis-Aligned Bounding Box used for triangle extents and octree insertion.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// Returns the largest of the three axis extents.
    pub fn max_extent(&self) -> f32 {
        self.x.size().max(self.y.size()).max(self.z.size())
    }

    /// Enumerate all 8 corner points.
    ///
    /// Corner i uses the max bound on an axis when the matching bit of i is
    /// set: bit 2 selects x, bit 1 selects y, bit 0 selects z. This is the
    /// same bit layout the octree uses for octant codes.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (code, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if code & 0b100 != 0 { self.x.max } else { self.x.min },
                if code & 0b010 != 0 { self.y.max } else { self.y.min },
                if code & 0b001 != 0 { self.z.max } else { self.z.min },
            );
        }
        corners
    }

    /// Returns true if the point lies inside the box (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));

        assert_eq!(aabb.x.min, 0.0);
        assert_eq!(aabb.x.max, 10.0);
        assert_eq!(aabb.z.max, 10.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);
    }

    #[test]
    fn test_aabb_corners() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        let corners = aabb.corners();

        assert_eq!(corners.len(), 8);
        assert_eq!(corners[0b000], Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(corners[0b111], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(corners[0b100], Vec3::new(1.0, -2.0, -3.0));
        assert_eq!(corners[0b001], Vec3::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        assert!(aabb.contains(Vec3::ONE));
        assert!(!aabb.contains(Vec3::new(3.0, 1.0, 1.0)));
    }

    #[test]
    fn test_degenerate_box_is_padded() {
        // A flat triangle's box must still have volume for corner descent
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 1.0));
        assert!(aabb.z.size() > 0.0);
    }
}
