use std::ops;

use super::approx_eq::ApproxEq;

#[derive(Debug, Clone, Copy)]
pub struct Matrix2 {
    data: [f64; 4],
}

impl Matrix2 {
    pub fn new(data: [f64; 4]) -> Self {
        Self { data }
    }

    pub fn determinant(&self) -> f64 {
        self.data[0] * self.data[3] - self.data[1] * self.data[2]
    }
}

impl ApproxEq for Matrix2 {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.data[..].approx_eq_epsilon(&other.data[..], epsilon)
    }
}

impl PartialEq for Matrix2 {
    fn eq(&self, other: &Matrix2) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Index<(usize, usize)> for Matrix2 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < 2);
        debug_assert!(col < 2);
        &self.data[row * 2 + col]
    }
}
