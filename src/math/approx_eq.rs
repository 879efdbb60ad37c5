pub const EPSILON: f64 = 1.0e-5;
/// Used by tests comparing against values printed with 4-5 significant digits.
pub const LOW_PREC_EPSILON: f64 = 1.0e-4;

pub trait ApproxEq<Rhs: ?Sized = Self> {
    fn approx_eq_epsilon(&self, other: &Rhs, epsilon: f64) -> bool;

    fn approx_eq(&self, other: &Rhs) -> bool {
        self.approx_eq_epsilon(other, EPSILON)
    }

    fn approx_eq_low_prec(&self, other: &Rhs) -> bool {
        self.approx_eq_epsilon(other, LOW_PREC_EPSILON)
    }
}

impl ApproxEq for f64 {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        if self.is_infinite() || other.is_infinite() {
            return self == other;
        }
        (self - other).abs() < epsilon
    }
}

impl<T: ApproxEq> ApproxEq for Option<T> {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (Some(lhs), Some(rhs)) => lhs.approx_eq_epsilon(rhs, epsilon),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ApproxEq> ApproxEq for [T] {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(lhs, rhs)| lhs.approx_eq_epsilon(rhs, epsilon))
    }
}

impl<T: ApproxEq> ApproxEq for Vec<T> {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.as_slice().approx_eq_epsilon(other.as_slice(), epsilon)
    }
}

#[macro_export]
macro_rules! assert_approx_eq_low_prec {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !$crate::math::approx_eq::ApproxEq::approx_eq_low_prec(left_val, right_val) {
                    panic!(
                        "assertion `left ≈ right` failed\n  left: {:?}\n right: {:?}",
                        left_val, right_val
                    );
                }
            }
        }
    };
}
