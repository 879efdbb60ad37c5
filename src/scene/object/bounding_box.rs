use crate::{
    math::{
        approx_eq::ApproxEq,
        matrix::Matrix,
        point::Point,
        transform::Transform,
        tuple::{Axis, Tuple},
    },
    render::ray::Ray,
};

/// Axis-aligned bounding box.
/// An axis along which the shape is unbounded carries `±f64::INFINITY`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Transform for BoundingBox {
    fn transform(&mut self, matrix: &Matrix) {
        if self.is_empty() {
            return;
        }
        // corners of an unbounded box would turn into NaN under rotation
        if self.is_infinitely_large() {
            *self = Self::infinite();
            return;
        }

        let mut transformed = Self::empty();
        for corner in self.corners() {
            transformed.add_point(matrix * corner);
        }
        *self = transformed;
    }
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point::splat(f64::INFINITY),
            max: Point::splat(f64::NEG_INFINITY),
        }
    }

    pub fn infinite() -> Self {
        Self {
            min: Point::splat(f64::NEG_INFINITY),
            max: Point::splat(f64::INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        Axis::ALL
            .iter()
            .any(|&axis| self.min[axis] > self.max[axis])
    }

    pub fn is_infinitely_large(&self) -> bool {
        !self.is_empty() && (self.min.has_infinite_component() || self.max.has_infinite_component())
    }

    fn corners(&self) -> [Point; 8] {
        let (min, max) = (self.min, self.max);
        [
            min,
            Point::new(min.x(), min.y(), max.z()),
            Point::new(min.x(), max.y(), min.z()),
            Point::new(min.x(), max.y(), max.z()),
            Point::new(max.x(), min.y(), min.z()),
            Point::new(max.x(), min.y(), max.z()),
            Point::new(max.x(), max.y(), min.z()),
            max,
        ]
    }

    /// Grows the box to contain the point. Points with a NaN or infinite coordinate are skipped.
    pub fn add_point(&mut self, point: Point) {
        if point.has_infinite_component() || Axis::ALL.iter().any(|&axis| point[axis].is_nan()) {
            return;
        }
        self.min = self.min.min_componentwise(point);
        self.max = self.max.max_componentwise(point);
    }

    pub fn add_bounding_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min_componentwise(other.min);
        self.max = self.max.max_componentwise(other.max);
    }

    fn axis_intersection_times(origin: f64, direction: f64, min: f64, max: f64) -> (f64, f64) {
        let tmin = (min - origin) / direction;
        let tmax = (max - origin) / direction;

        if tmin < tmax {
            (tmin, tmax)
        } else {
            (tmax, tmin)
        }
    }

    pub fn is_intersected(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_infinitely_large() {
            return true;
        }

        let (origin, direction) = (ray.origin(), ray.direction());
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for axis in Axis::ALL {
            let (axis_min, axis_max) = Self::axis_intersection_times(
                origin[axis],
                direction[axis],
                self.min[axis],
                self.max[axis],
            );
            // NaN from 0/0 is ignored by max/min
            tmin = tmin.max(axis_min);
            tmax = tmax.min(axis_max);
        }

        tmin <= tmax && tmax >= 0.
    }
}

impl ApproxEq for BoundingBox {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.min.approx_eq_epsilon(&other.min, epsilon)
            && self.max.approx_eq_epsilon(&other.max, epsilon)
    }
}
