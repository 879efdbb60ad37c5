use std::ops::{self, Index};

use super::{
    approx_eq::ApproxEq,
    tuple::{Axis, Tuple},
    vector::Vector,
};

#[derive(Copy, Clone, Debug, Default)]
pub struct Point {
    x: f64,
    y: f64,
    z: f64,
}

impl Tuple for Point {
    fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> f64 {
        self.z
    }

    fn w(&self) -> f64 {
        1.
    }
}

impl Point {
    pub fn zero() -> Self {
        Self::new(0., 0., 0.)
    }

    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Distance from the origin, used by radial patterns.
    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    pub fn min_componentwise(&self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max_componentwise(&self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn has_infinite_component(&self) -> bool {
        self.x.is_infinite() || self.y.is_infinite() || self.z.is_infinite()
    }
}

impl Index<Axis> for Point {
    type Output = f64;

    fn index(&self, index: Axis) -> &Self::Output {
        match index {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl ApproxEq for Point {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.tuple_approx_eq(other, epsilon)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Self::Output {
        Self::new(self.x + rhs.x(), self.y + rhs.y(), self.z + rhs.z())
    }
}

impl ops::Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Self::Output {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ops::Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Self::Output {
        Self::new(self.x - rhs.x(), self.y - rhs.y(), self.z - rhs.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq_low_prec;

    #[test]
    fn point_has_w_of_one() {
        let p = Point::new(4.3, -4.2, 3.1);
        assert_eq!(p.w(), 1.);
        assert!(p.is_point());
        assert!(!p.is_vector());
    }

    #[test]
    fn add_vector() {
        assert_approx_eq_low_prec!(
            Point::new(-2., 3., 1.) + Vector::new(3., -2., 5.),
            Point::new(1., 1., 6.)
        );
    }

    #[test]
    fn sub_points_gives_vector() {
        let v: Vector = Point::new(3., 2., 1.) - Point::new(5., 6., 7.);
        assert_approx_eq_low_prec!(v, Vector::new(-2., -4., -6.));
    }

    #[test]
    fn sub_vector() {
        assert_approx_eq_low_prec!(
            Point::new(3., 2., 1.) - Vector::new(5., 6., 7.),
            Point::new(-2., -4., -6.)
        );
    }

    #[test]
    fn componentwise_min_max() {
        let a = Point::new(1., -2., 3.);
        let b = Point::new(-1., 2., 5.);
        assert_approx_eq_low_prec!(a.min_componentwise(b), Point::new(-1., -2., 3.));
        assert_approx_eq_low_prec!(a.max_componentwise(b), Point::new(1., 2., 5.));
    }

    #[test]
    fn index_by_axis() {
        let p = Point::new(1., 2., 3.);
        assert_eq!(p[Axis::X], 1.);
        assert_eq!(p[Axis::Y], 2.);
        assert_eq!(p[Axis::Z], 3.);
    }
}
