use super::{matrix::Matrix, tuple::Axis};

/// A single named transformation, as written in scene files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transformation {
    Scaling(f64, f64, f64),
    Translation(f64, f64, f64),
    Rotation(Axis, f64),
    Shearing(f64, f64, f64, f64, f64, f64),
}

impl From<Transformation> for Matrix {
    fn from(val: Transformation) -> Self {
        match val {
            Transformation::Scaling(x, y, z) => Matrix::scaling(x, y, z),
            Transformation::Translation(x, y, z) => Matrix::translation(x, y, z),
            Transformation::Rotation(axis, radians) => match axis {
                Axis::X => Matrix::rotation_x(radians),
                Axis::Y => Matrix::rotation_y(radians),
                Axis::Z => Matrix::rotation_z(radians),
            },
            Transformation::Shearing(xpy, xpz, ypx, ypz, zpx, zpy) => {
                Matrix::shearing(xpy, xpz, ypx, ypz, zpx, zpy)
            }
        }
    }
}

/// Composes the transformations so that the first one in the slice is applied first.
impl From<&[Transformation]> for Matrix {
    fn from(val: &[Transformation]) -> Self {
        val.iter().fold(Matrix::identity(), |acc, t| {
            acc.transformed_by(&Matrix::from(*t))
        })
    }
}

/// Fluent composition of transformations. Each call is applied after the previous ones,
/// so `m.translate(..).scale(..)` translates first.
pub trait Transform: Sized + Clone {
    fn transform(&mut self, matrix: &Matrix);

    fn transformed_by(&self, matrix: &Matrix) -> Self {
        let mut copy = self.clone();
        copy.transform(matrix);
        copy
    }

    fn transformed(&mut self) -> Self {
        self.clone()
    }

    fn transform_chain(&mut self, transformation: &Matrix) -> &mut Self {
        self.transform(transformation);
        self
    }

    fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform_chain(&Matrix::translation(x, y, z))
    }

    fn scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform_chain(&Matrix::scaling(x, y, z))
    }

    fn scale_uniform(&mut self, factor: f64) -> &mut Self {
        self.transform_chain(&Matrix::scaling_uniform(factor))
    }

    fn rotate_x(&mut self, radians: f64) -> &mut Self {
        self.transform_chain(&Matrix::rotation_x(radians))
    }

    fn rotate_y(&mut self, radians: f64) -> &mut Self {
        self.transform_chain(&Matrix::rotation_y(radians))
    }

    fn rotate_z(&mut self, radians: f64) -> &mut Self {
        self.transform_chain(&Matrix::rotation_z(radians))
    }

    fn shear(
        &mut self,
        x_prop_y: f64,
        x_prop_z: f64,
        y_prop_x: f64,
        y_prop_z: f64,
        z_prop_x: f64,
        z_prop_y: f64,
    ) -> &mut Self {
        self.transform_chain(&Matrix::shearing(
            x_prop_y, x_prop_z, y_prop_x, y_prop_z, z_prop_x, z_prop_y,
        ))
    }
}

impl Transform for Matrix {
    fn transform(&mut self, matrix: &Matrix) {
        *self = matrix * &*self;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts;

    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::{point::Point, tuple::Tuple},
    };

    #[test]
    fn fluent_chain_applies_in_call_order() {
        let m = Matrix::identity()
            .rotate_x(consts::FRAC_PI_2)
            .scale(5., 5., 5.)
            .translate(10., 5., 7.)
            .transformed();

        assert_approx_eq_low_prec!(m * Point::new(1., 0., 1.), Point::new(15., 0., 7.));
    }

    #[test]
    fn transformation_slice_to_matrix() {
        let transformations = [
            Transformation::Rotation(Axis::X, consts::FRAC_PI_2),
            Transformation::Scaling(5., 5., 5.),
            Transformation::Translation(10., 5., 7.),
        ];
        let m = Matrix::from(&transformations[..]);

        assert_approx_eq_low_prec!(
            m,
            Matrix::translation(10., 5., 7.)
                * Matrix::scaling(5., 5., 5.)
                * Matrix::rotation_x(consts::FRAC_PI_2)
        );
    }

    #[test]
    fn shear_variant_and_empty_list() {
        assert_approx_eq_low_prec!(
            Matrix::from(Transformation::Shearing(1., 0., 0., 0., 0., 0.)),
            Matrix::shearing(1., 0., 0., 0., 0., 0.)
        );
        let none: &[Transformation] = &[];
        assert_approx_eq_low_prec!(Matrix::from(none), Matrix::identity());
    }
}
