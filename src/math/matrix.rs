use std::ops;

use super::{
    approx_eq::ApproxEq, matrix3::Matrix3, point::Point, tuple::Tuple, vector::Vector,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
/// 4x4 matrix in row-major order, used for every transformation in homogeneous coordinates.
pub struct Matrix {
    data: [f64; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(data: [f64; 16]) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self::new([0.; 16])
    }

    #[rustfmt::skip]
    pub fn identity() -> Self {
        Self::new([
            1., 0., 0., 0.,
            0., 1., 0., 0.,
            0., 0., 1., 0.,
            0., 0., 0., 1.,
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut res = *self;

        res.data.swap(1, 4);
        res.data.swap(2, 8);

        res.data.swap(3, 12);
        res.data.swap(6, 9);

        res.data.swap(7, 13);
        res.data.swap(11, 14);

        res
    }

    /// Multiplies the tuple by the transpose of this matrix without building the transpose.
    pub fn mul_transposed<T: Tuple>(&self, rhs: T) -> T {
        T::new(
            self[(0, 0)] * rhs.x()
                + self[(1, 0)] * rhs.y()
                + self[(2, 0)] * rhs.z()
                + self[(3, 0)] * rhs.w(),
            self[(0, 1)] * rhs.x()
                + self[(1, 1)] * rhs.y()
                + self[(2, 1)] * rhs.z()
                + self[(3, 1)] * rhs.w(),
            self[(0, 2)] * rhs.x()
                + self[(1, 2)] * rhs.y()
                + self[(2, 2)] * rhs.z()
                + self[(3, 2)] * rhs.w(),
        )
    }

    pub fn submatrix(&self, row_to_del: usize, col_to_del: usize) -> Matrix3 {
        let mut new_data = [0.; 9];
        let mut id = 0;

        for row in (0..4).filter(|&row| row != row_to_del) {
            for col in (0..4).filter(|&col| col != col_to_del) {
                new_data[id] = self[(row, col)];
                id += 1;
            }
        }
        Matrix3::new(new_data)
    }

    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let minor = self.minor(row, col);
        if (row + col) % 2 == 1 { -minor } else { minor }
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|col| self[(0, col)] * self.cofactor(0, col)).sum()
    }

    /// Fails with [`Error::NonInvertibleMatrix`] when the determinant is exactly zero.
    pub fn inverse(&self) -> Result<Matrix> {
        let determinant = self.determinant();
        if determinant == 0. {
            return Err(Error::NonInvertibleMatrix);
        }
        let mut res = Matrix::empty();

        for row in 0..4 {
            for col in 0..4 {
                // transposed on write
                res[(col, row)] = self.cofactor(row, col) / determinant;
            }
        }
        Ok(res)
    }

    #[rustfmt::skip]
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::new([
            1., 0., 0., x,
            0., 1., 0., y,
            0., 0., 1., z,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::new([
            x, 0., 0., 0.,
            0., y, 0., 0.,
            0., 0., z, 0.,
            0., 0., 0., 1.,
        ])
    }

    pub fn scaling_uniform(f: f64) -> Matrix {
        Self::scaling(f, f, f)
    }

    #[rustfmt::skip]
    pub fn rotation_x(radians: f64) -> Matrix {
        let (sin_r, cos_r) = radians.sin_cos();
        Matrix::new([
            1., 0., 0., 0.,
            0., cos_r, -sin_r, 0.,
            0., sin_r, cos_r, 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_y(radians: f64) -> Matrix {
        let (sin_r, cos_r) = radians.sin_cos();
        Matrix::new([
            cos_r, 0., sin_r, 0.,
            0., 1., 0., 0.,
            -sin_r, 0., cos_r, 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_z(radians: f64) -> Matrix {
        let (sin_r, cos_r) = radians.sin_cos();
        Matrix::new([
            cos_r, -sin_r, 0., 0.,
            sin_r, cos_r, 0., 0.,
            0., 0., 1., 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn shearing(
        x_prop_y: f64,
        x_prop_z: f64,
        y_prop_x: f64,
        y_prop_z: f64,
        z_prop_x: f64,
        z_prop_y: f64,
    ) -> Matrix {
        Matrix::new([
            1., x_prop_y, x_prop_z, 0.,
            y_prop_x, 1., y_prop_z, 0.,
            z_prop_x, z_prop_y, 1., 0.,
            0., 0., 0., 1.,
        ])
    }

    /// Orients the world relative to an eye at `from` looking at `to`.
    pub fn view_transformation(from: Point, to: Point, up_v: Vector) -> Matrix {
        let forward_v = (to - from).normalize();
        let left_v = forward_v.cross(up_v.normalize());
        let true_up_v = left_v.cross(forward_v);

        #[rustfmt::skip]
        let orientation = Matrix::new([
            left_v.x(), left_v.y(), left_v.z(), 0.,
            true_up_v.x(), true_up_v.y(), true_up_v.z(), 0.,
            -forward_v.x(), -forward_v.y(), -forward_v.z(), 0.,
            0., 0., 0., 1.,
        ]);

        orientation * Matrix::translation(-from.x(), -from.y(), -from.z())
    }
}

impl ApproxEq for Matrix {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.data[..].approx_eq_epsilon(&other.data[..], epsilon)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < 4);
        debug_assert!(col < 4);
        &self.data[row * 4 + col]
    }
}

impl ops::IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(row < 4);
        debug_assert!(col < 4);
        &mut self.data[row * 4 + col]
    }
}

impl ops::Mul<Matrix> for Matrix {
    type Output = Self;
    fn mul(self, rhs: Matrix) -> Self::Output {
        &self * &rhs
    }
}

impl ops::Mul<&Matrix> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Self::Output {
        let mut output = Matrix::empty();
        for row in 0..4 {
            for col in 0..4 {
                output[(row, col)] = self[(row, 0)] * rhs[(0, col)]
                    + self[(row, 1)] * rhs[(1, col)]
                    + self[(row, 2)] * rhs[(2, col)]
                    + self[(row, 3)] * rhs[(3, col)];
            }
        }
        output
    }
}

impl ops::MulAssign<Matrix> for Matrix {
    fn mul_assign(&mut self, rhs: Self) {
        *self = &*self * &rhs;
    }
}

impl<T> ops::Mul<T> for &Matrix
where
    T: Tuple,
{
    type Output = T;
    fn mul(self, rhs: T) -> Self::Output {
        T::new(
            self[(0, 0)] * rhs.x()
                + self[(0, 1)] * rhs.y()
                + self[(0, 2)] * rhs.z()
                + self[(0, 3)] * rhs.w(),
            self[(1, 0)] * rhs.x()
                + self[(1, 1)] * rhs.y()
                + self[(1, 2)] * rhs.z()
                + self[(1, 3)] * rhs.w(),
            self[(2, 0)] * rhs.x()
                + self[(2, 1)] * rhs.y()
                + self[(2, 2)] * rhs.z()
                + self[(2, 3)] * rhs.w(),
        )
    }
}

impl<T> ops::Mul<T> for Matrix
where
    T: Tuple,
{
    type Output = T;
    #[allow(clippy::op_ref)]
    fn mul(self, rhs: T) -> Self::Output {
        &self * rhs
    }
}
