pub mod pattern;

use pattern::Pattern;

use crate::math::{color::Color, point::Point};

pub const AIR_REFRACTIVE_INDEX: f64 = 1.0;
pub const GLASS_REFRACTIVE_INDEX: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Overrides `color` when set
    pub pattern: Option<Pattern>,
    pub ambient: f64,      // [0;1]
    pub diffuse: f64,      // [0;1]
    pub specular: f64,     // [0;1]
    pub shininess: f64,    // [10;+inf) (typically up to 200.0)
    pub reflectivity: f64, // [0;1]

    pub transparency: f64,     // [0;1]
    pub refractive_index: f64, // > 0
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::white(),
            pattern: None,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.,
            reflectivity: 0.,
            transparency: 0.,
            refractive_index: AIR_REFRACTIVE_INDEX,
        }
    }
}

impl Material {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_pattern(pattern: Pattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Default::default()
        }
    }

    pub fn matte_with_color(color: Color) -> Self {
        Self {
            color,
            specular: 0.05,
            shininess: 15.,
            ..Default::default()
        }
    }

    pub fn glass() -> Self {
        Self {
            color: Color::black(),
            pattern: None,
            ambient: 0.025,
            diffuse: 0.2,
            specular: 1.,
            shininess: 300.,
            reflectivity: 0.9,
            transparency: 0.9,
            refractive_index: GLASS_REFRACTIVE_INDEX,
        }
    }

    pub fn mirror() -> Self {
        Self {
            reflectivity: 0.98,
            transparency: 0.,
            refractive_index: AIR_REFRACTIVE_INDEX,
            ..Self::glass()
        }
    }

    /// Surface color at a point in object space.
    pub fn color_at_object_point(&self, object_point: Point) -> Color {
        match &self.pattern {
            Some(pattern) => pattern.color_at(object_point),
            None => self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::{matrix::Matrix, tuple::Tuple},
    };

    #[test]
    fn default_material() {
        let m = Material::default();

        assert_eq!(m.color, Color::white());
        assert!(m.pattern.is_none());
        assert_approx_eq_low_prec!(m.ambient, 0.1);
        assert_approx_eq_low_prec!(m.diffuse, 0.9);
        assert_approx_eq_low_prec!(m.specular, 0.9);
        assert_approx_eq_low_prec!(m.shininess, 200.0);
        assert_approx_eq_low_prec!(m.reflectivity, 0.0);
        assert_approx_eq_low_prec!(m.transparency, 0.0);
        assert_approx_eq_low_prec!(m.refractive_index, AIR_REFRACTIVE_INDEX);
    }

    #[test]
    fn pattern_overrides_color() {
        let mut material = Material::with_color(Color::red());
        assert_approx_eq_low_prec!(material.color_at_object_point(Point::zero()), Color::red());

        let mut stripes = Pattern::stripe(Color::white(), Color::black());
        stripes.set_transformation(Matrix::scaling_uniform(2.)).unwrap();
        material.pattern = Some(stripes);

        assert_approx_eq_low_prec!(
            material.color_at_object_point(Point::new(1.5, 0., 0.)),
            Color::white()
        );
        assert_approx_eq_low_prec!(
            material.color_at_object_point(Point::new(2.5, 0., 0.)),
            Color::black()
        );
    }

    #[test]
    fn mirror_reflects_without_transparency() {
        let mirror = Material::mirror();

        assert!(mirror.reflectivity > 0.9);
        assert_eq!(mirror.transparency, 0.);
        assert_eq!(Material::glass().refractive_index, GLASS_REFRACTIVE_INDEX);
    }
}
