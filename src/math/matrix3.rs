use std::ops;

use super::{approx_eq::ApproxEq, matrix2::Matrix2};

#[derive(Debug, Clone, Copy)]
pub struct Matrix3 {
    data: [f64; 9],
}

impl Matrix3 {
    pub fn new(data: [f64; 9]) -> Self {
        Self { data }
    }

    pub fn submatrix(&self, row_to_del: usize, col_to_del: usize) -> Matrix2 {
        let mut new_data = [0.; 4];
        let kept = (0..3)
            .filter(|&row| row != row_to_del)
            .flat_map(|row| {
                (0..3)
                    .filter(move |&col| col != col_to_del)
                    .map(move |col| (row, col))
            });
        for (slot, (row, col)) in new_data.iter_mut().zip(kept) {
            *slot = self[(row, col)];
        }
        Matrix2::new(new_data)
    }

    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let minor = self.minor(row, col);
        if (row + col) % 2 == 1 { -minor } else { minor }
    }

    pub fn determinant(&self) -> f64 {
        (0..3).map(|col| self[(0, col)] * self.cofactor(0, col)).sum()
    }
}

impl ApproxEq for Matrix3 {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.data[..].approx_eq_epsilon(&other.data[..], epsilon)
    }
}

impl PartialEq for Matrix3 {
    fn eq(&self, other: &Matrix3) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Index<(usize, usize)> for Matrix3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < 3);
        debug_assert!(col < 3);
        &self.data[row * 3 + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submatrix() {
        #[rustfmt::skip]
        let m = Matrix3::new([
            1., 5., 0.,
            -3., 2., 7.,
            0., 6., -3.,
        ]);

        assert_eq!(m.submatrix(0, 2), Matrix2::new([-3., 2., 0., 6.]));
        assert_eq!(m.submatrix(2, 2), Matrix2::new([1., 5., -3., 2.]));
    }

    #[test]
    fn minor_and_cofactor() {
        #[rustfmt::skip]
        let m = Matrix3::new([
            3., 5., 0.,
            2., -1., -7.,
            6., -1., 5.,
        ]);

        assert_eq!(m.submatrix(1, 0).determinant(), 25.);
        assert_eq!(m.minor(1, 0), 25.);
        assert_eq!(m.minor(0, 0), -12.);
        assert_eq!(m.cofactor(0, 0), -12.);
        assert_eq!(m.cofactor(1, 0), -25.);
    }

    #[test]
    fn determinant() {
        #[rustfmt::skip]
        let m = Matrix3::new([
            1., 2., 6.,
            -5., 8., -4.,
            2., 6., 4.,
        ]);

        assert_eq!(m.cofactor(0, 0), 56.);
        assert_eq!(m.cofactor(0, 1), 12.);
        assert_eq!(m.cofactor(0, 2), -46.);
        assert_eq!(m.determinant(), -196.);
    }
}
