use super::approx_eq::ApproxEq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Homogeneous coordinate tuple. The `w` component is fixed by the implementing type:
/// 1 for points and 0 for vectors, so translations only ever move points.
pub trait Tuple: Copy {
    fn new(x: f64, y: f64, z: f64) -> Self;

    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> f64;
    fn w(&self) -> f64;

    fn is_point(&self) -> bool {
        self.w() == 1.
    }

    fn is_vector(&self) -> bool {
        self.w() == 0.
    }

    fn tuple_approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x().approx_eq_epsilon(&other.x(), epsilon)
            && self.y().approx_eq_epsilon(&other.y(), epsilon)
            && self.z().approx_eq_epsilon(&other.z(), epsilon)
    }
}
