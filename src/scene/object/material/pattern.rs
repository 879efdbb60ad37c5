use std::sync::Arc;

use crate::{
    error::Result,
    math::{color::Color, matrix::Matrix, noise::PerlinNoise, point::Point, tuple::Tuple},
};

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    Solid(Color),
    /// Alternates as x changes
    Stripe(Box<Pattern>, Box<Pattern>),
    /// Linear blend from the first to the second pattern, repeating every unit of x
    Gradient(Box<Pattern>, Box<Pattern>),
    /// Linear blend repeating every unit of distance from the origin
    RadialGradient(Box<Pattern>, Box<Pattern>),
    /// Concentric rings extending in x and z
    Ring(Box<Pattern>, Box<Pattern>),
    /// 3D checkerboard
    Checkers(Box<Pattern>, Box<Pattern>),
    /// Average of both patterns
    Blended(Box<Pattern>, Box<Pattern>),
    /// Samples the wrapped pattern at a point jittered by noise
    Perturbed {
        pattern: Box<Pattern>,
        noise: Arc<PerlinNoise>,
        scale: f64,
    },
    /// Returns the pattern space point as a color
    #[cfg(test)]
    Test,
}

/// A pattern with its own transformation, relative to the object (or enclosing pattern) it colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    kind: PatternKind,
    transformation: Matrix,
    transformation_inverse: Matrix,
}

impl From<Color> for Pattern {
    fn from(color: Color) -> Self {
        Self::solid(color)
    }
}

impl Pattern {
    pub const DEFAULT_PERTURBATION_SCALE: f64 = 0.2;

    pub fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            transformation: Matrix::identity(),
            transformation_inverse: Matrix::identity(),
        }
    }

    pub fn with_transformation(kind: PatternKind, transformation: Matrix) -> Result<Self> {
        let mut pattern = Self::new(kind);
        pattern.set_transformation(transformation)?;
        Ok(pattern)
    }

    pub fn solid(color: Color) -> Self {
        Self::new(PatternKind::Solid(color))
    }

    pub fn stripe(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::Stripe(Box::new(a.into()), Box::new(b.into())))
    }

    pub fn gradient(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::Gradient(Box::new(a.into()), Box::new(b.into())))
    }

    pub fn radial_gradient(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::RadialGradient(
            Box::new(a.into()),
            Box::new(b.into()),
        ))
    }

    pub fn ring(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::Ring(Box::new(a.into()), Box::new(b.into())))
    }

    pub fn checkers(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::Checkers(Box::new(a.into()), Box::new(b.into())))
    }

    pub fn blended(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Self {
        Self::new(PatternKind::Blended(Box::new(a.into()), Box::new(b.into())))
    }

    pub fn perturbed(pattern: impl Into<Pattern>, noise: Arc<PerlinNoise>, scale: f64) -> Self {
        Self::new(PatternKind::Perturbed {
            pattern: Box::new(pattern.into()),
            noise,
            scale,
        })
    }

    #[cfg(test)]
    pub fn test_pattern() -> Self {
        Self::new(PatternKind::Test)
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn transformation(&self) -> Matrix {
        self.transformation
    }

    pub fn set_transformation(&mut self, transformation: Matrix) -> Result<()> {
        self.transformation_inverse = transformation.inverse()?;
        self.transformation = transformation;
        Ok(())
    }

    /// Color at a point given in the space this pattern is attached to.
    pub fn color_at(&self, point: Point) -> Color {
        self.pattern_at(self.transformation_inverse * point)
    }

    /// Color at a point already in pattern space.
    pub fn pattern_at(&self, point: Point) -> Color {
        match &self.kind {
            PatternKind::Solid(color) => *color,
            PatternKind::Stripe(a, b) => {
                if is_even(point.x()) {
                    a.color_at(point)
                } else {
                    b.color_at(point)
                }
            }
            PatternKind::Gradient(a, b) => {
                let fraction = point.x() - point.x().floor();
                a.color_at(point).lerp(b.color_at(point), fraction)
            }
            PatternKind::RadialGradient(a, b) => {
                let distance = point.magnitude();
                let fraction = distance - distance.floor();
                a.color_at(point).lerp(b.color_at(point), fraction)
            }
            PatternKind::Ring(a, b) => {
                if is_even((point.x().powi(2) + point.z().powi(2)).sqrt()) {
                    a.color_at(point)
                } else {
                    b.color_at(point)
                }
            }
            PatternKind::Checkers(a, b) => {
                let sum = point.x().floor() + point.y().floor() + point.z().floor();
                if is_even(sum) {
                    a.color_at(point)
                } else {
                    b.color_at(point)
                }
            }
            PatternKind::Blended(a, b) => (a.color_at(point) + b.color_at(point)) / 2.,
            PatternKind::Perturbed {
                pattern,
                noise,
                scale,
            } => pattern.color_at(noise.perturb(point, *scale)),
            #[cfg(test)]
            PatternKind::Test => Color::new(point.x(), point.y(), point.z()),
        }
    }
}

fn is_even(value: f64) -> bool {
    value.floor().rem_euclid(2.) == 0.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq_low_prec, math::transform::Transform};

    fn stripes() -> Pattern {
        Pattern::stripe(Color::white(), Color::black())
    }

    #[test]
    fn stripe_is_constant_in_y_and_z() {
        let pattern = stripes();

        for point in [
            Point::new(0., 0., 0.),
            Point::new(0., 1., 0.),
            Point::new(0., 2., 0.),
            Point::new(0., 0., 1.),
            Point::new(0., 0., 2.),
        ] {
            assert_approx_eq_low_prec!(pattern.color_at(point), Color::white());
        }
    }

    #[test]
    fn stripe_alternates_in_x() {
        let pattern = stripes();
        let examples = [
            (0., Color::white()),
            (0.9, Color::white()),
            (1., Color::black()),
            (-0.1, Color::black()),
            (-1., Color::black()),
            (-1.1, Color::white()),
        ];

        for (x, color) in examples {
            assert_approx_eq_low_prec!(pattern.color_at(Point::new(x, 0., 0.)), color);
        }
    }

    #[test]
    fn stripes_with_pattern_transformation() {
        let pattern =
            Pattern::with_transformation(stripes().kind().clone(), Matrix::scaling_uniform(2.))
                .unwrap();

        assert_approx_eq_low_prec!(pattern.color_at(Point::new(1.5, 0., 0.)), Color::white());
    }

    #[test]
    fn pattern_transformation_must_be_invertible() {
        let mut pattern = stripes();
        assert!(pattern.set_transformation(Matrix::scaling(1., 0., 1.)).is_err());
    }

    #[test]
    fn test_pattern_with_transformation() {
        let pattern = Pattern::with_transformation(
            PatternKind::Test,
            Matrix::identity().scale(2., 2., 2.).translate(0.5, 1., 1.5).transformed(),
        )
        .unwrap();

        assert_approx_eq_low_prec!(
            pattern.color_at(Point::new(2.5, 3., 3.5)),
            Color::new(1., 1., 1.)
        );
    }

    #[test]
    fn gradient_linearly_interpolates() {
        let pattern = Pattern::gradient(Color::white(), Color::black());
        let examples = [
            (0., Color::white()),
            (0.25, Color::new(0.75, 0.75, 0.75)),
            (0.5, Color::new(0.5, 0.5, 0.5)),
            (0.75, Color::new(0.25, 0.25, 0.25)),
        ];

        for (x, color) in examples {
            assert_approx_eq_low_prec!(pattern.color_at(Point::new(x, 0., 0.)), color);
        }
    }

    #[test]
    fn radial_gradient_depends_on_distance() {
        let pattern = Pattern::radial_gradient(Color::white(), Color::black());

        assert_approx_eq_low_prec!(pattern.color_at(Point::zero()), Color::white());
        assert_approx_eq_low_prec!(
            pattern.color_at(Point::new(0., 0.5, 0.)),
            Color::new(0.5, 0.5, 0.5)
        );
        assert_approx_eq_low_prec!(
            pattern.color_at(Point::new(0., 0., 1.25)),
            Color::new(0.75, 0.75, 0.75)
        );
    }

    #[test]
    fn ring_extends_in_x_and_z() {
        let pattern = Pattern::ring(Color::white(), Color::black());
        let examples = [
            (Point::zero(), Color::white()),
            (Point::new(1., 0., 0.), Color::black()),
            (Point::new(0., 0., 1.), Color::black()),
            (Point::new(0.708, 0., 0.708), Color::black()),
        ];

        for (point, color) in examples {
            assert_approx_eq_low_prec!(pattern.color_at(point), color);
        }
    }

    #[test]
    fn checkers_repeat_in_each_dimension() {
        let pattern = Pattern::checkers(Color::white(), Color::black());
        let examples = [
            (Point::zero(), Color::white()),
            (Point::new(0.99, 0., 0.), Color::white()),
            (Point::new(1.01, 0., 0.), Color::black()),
            (Point::new(0., 0.99, 0.), Color::white()),
            (Point::new(0., 1.01, 0.), Color::black()),
            (Point::new(0., 0., 0.99), Color::white()),
            (Point::new(0., 0., 1.01), Color::black()),
            (Point::new(-0.5, 0., 0.), Color::black()),
        ];

        for (point, color) in examples {
            assert_approx_eq_low_prec!(pattern.color_at(point), color);
        }
    }

    #[test]
    fn blended_averages_patterns() {
        let pattern = Pattern::blended(Color::white(), Color::new(0., 0.5, 1.));

        assert_approx_eq_low_prec!(
            pattern.color_at(Point::new(3., -2., 7.)),
            Color::new(0.5, 0.75, 1.)
        );
    }

    #[test]
    fn nested_patterns_use_their_own_transformations() {
        let inner = Pattern::with_transformation(
            stripes().kind().clone(),
            Matrix::scaling_uniform(0.5),
        )
        .unwrap();
        let pattern = Pattern::checkers(inner, Color::new(1., 0., 0.));

        // checkers cell (0,0,0) delegates to stripes twice as dense
        assert_approx_eq_low_prec!(pattern.color_at(Point::new(0.25, 0., 0.)), Color::white());
        assert_approx_eq_low_prec!(pattern.color_at(Point::new(0.75, 0., 0.)), Color::black());
        assert_approx_eq_low_prec!(
            pattern.color_at(Point::new(1.5, 0., 0.)),
            Color::new(1., 0., 0.)
        );
    }

    #[test]
    fn perturbed_with_zero_scale_matches_wrapped_pattern() {
        let noise = Arc::new(PerlinNoise::with_seed(11));
        let pattern = Pattern::perturbed(stripes(), noise, 0.);

        for x in [-1.5, -0.2, 0.3, 1.7] {
            let point = Point::new(x, 0.4, 0.1);
            assert_approx_eq_low_prec!(pattern.color_at(point), stripes().color_at(point));
        }
    }

    #[test]
    fn perturbed_is_deterministic_for_a_seed() {
        let first = Pattern::perturbed(
            Pattern::gradient(Color::white(), Color::black()),
            Arc::new(PerlinNoise::with_seed(5)),
            Pattern::DEFAULT_PERTURBATION_SCALE,
        );
        let second = Pattern::perturbed(
            Pattern::gradient(Color::white(), Color::black()),
            Arc::new(PerlinNoise::with_seed(5)),
            Pattern::DEFAULT_PERTURBATION_SCALE,
        );
        let point = Point::new(0.3, 0.6, 0.9);

        assert_approx_eq_low_prec!(first.color_at(point), second.color_at(point));
    }
}
