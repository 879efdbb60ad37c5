use crate::{
    math::{color::Color, point::Point, tuple::Tuple, vector::Vector},
    scene::object::{ObjectArena, ObjectId},
};

#[derive(PartialEq, Debug, Clone)]
pub struct PointLightSource {
    position: Point,
    intensity: Color,
}

impl Default for PointLightSource {
    fn default() -> Self {
        Self {
            position: Point::zero(),
            intensity: Color::white(),
        }
    }
}

impl PointLightSource {
    pub fn new(position: Point, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// compute color of illuminated point using Phong reflection model
    pub fn color_of_illuminated_point(
        &self,
        arena: &ObjectArena,
        object: ObjectId,
        point: Point,
        eye_v: Vector,
        normal_v: Vector,
        in_shadow: bool,
    ) -> Color {
        let Some(material) = arena.get(object).map(|o| o.material()) else {
            return Color::black();
        };
        // combine surface color with lights's intensity (color)
        let effective_color = arena.surface_color(object, point) * self.intensity;

        let ambient = effective_color * material.ambient;
        if in_shadow {
            return ambient;
        }

        // direction to the light source
        let light_v = (self.position - point).normalize();
        let light_dot_normal = light_v.dot(normal_v);

        // light is on the other side of the surface
        if light_dot_normal < 0. {
            return ambient;
        }
        let diffuse = effective_color * material.diffuse * light_dot_normal;

        let reflect_v = (-light_v).reflect(normal_v);
        let reflect_dot_eye = reflect_v.dot(eye_v);

        // light reflects away from the eye
        let specular = if reflect_dot_eye <= 0. {
            Color::black()
        } else {
            self.intensity * material.specular * reflect_dot_eye.powf(material.shininess)
        };

        ambient + diffuse + specular
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        scene::object::{
            Object,
            material::{Material, pattern::Pattern},
            primitive::shape::Shape,
        },
    };

    fn sphere() -> (ObjectArena, ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Sphere));
        (arena, id)
    }

    fn lit(light_position: Point, eye_v: Vector, in_shadow: bool) -> Color {
        let (arena, id) = sphere();
        let light = PointLightSource::new(light_position, Color::white());
        light.color_of_illuminated_point(
            &arena,
            id,
            Point::zero(),
            eye_v,
            Vector::new(0., 0., -1.),
            in_shadow,
        )
    }

    #[test]
    fn lighting_with_surface_in_shadow() {
        assert_approx_eq_low_prec!(
            lit(Point::new(0., 0., -10.), Vector::new(0., 0., -1.), true),
            Color::new(0.1, 0.1, 0.1)
        );
    }

    #[test]
    fn lighting_with_eye_between_light_and_surface() {
        assert_approx_eq_low_prec!(
            lit(Point::new(0., 0., -10.), Vector::new(0., 0., -1.), false),
            Color::new(1.9, 1.9, 1.9)
        );
    }

    #[test]
    fn lighting_with_eye_between_light_and_surface_eye_offset_45() {
        assert_approx_eq_low_prec!(
            lit(
                Point::new(0., 0., -10.),
                Vector::new(0., FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
                false
            ),
            Color::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn lighting_with_eye_opposite_surface_light_offset_45() {
        let intensity = 0.1 + 0.9 * FRAC_1_SQRT_2;
        assert_approx_eq_low_prec!(
            lit(Point::new(0., 10., -10.), Vector::new(0., 0., -1.), false),
            Color::new(intensity, intensity, intensity)
        );
    }

    #[test]
    fn lighting_with_eye_in_path_of_reflection() {
        let intensity = 1. + 0.9 * FRAC_1_SQRT_2;
        assert_approx_eq_low_prec!(
            lit(
                Point::new(0., 10., -10.),
                Vector::new(0., -FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
                false
            ),
            Color::new(intensity, intensity, intensity)
        );
    }

    #[test]
    fn lighting_with_light_behind_surface() {
        assert_approx_eq_low_prec!(
            lit(Point::new(0., 0., 10.), Vector::new(0., 0., -1.), false),
            Color::new(0.1, 0.1, 0.1)
        );
    }

    #[test]
    fn lighting_with_pattern_applied() {
        let material = Material {
            pattern: Some(Pattern::stripe(Color::white(), Color::black())),
            ambient: 1.,
            diffuse: 0.,
            specular: 0.,
            ..Default::default()
        };
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Sphere).with_material(material));

        let eye_v = Vector::new(0., 0., -1.);
        let normal_v = Vector::new(0., 0., -1.);
        let light = PointLightSource::new(Point::new(0., 0., -10.), Color::white());

        assert_approx_eq_low_prec!(
            light.color_of_illuminated_point(
                &arena,
                id,
                Point::new(0.9, 0., 0.),
                eye_v,
                normal_v,
                false
            ),
            Color::white()
        );
        assert_approx_eq_low_prec!(
            light.color_of_illuminated_point(
                &arena,
                id,
                Point::new(1.1, 0., 0.),
                eye_v,
                normal_v,
                false
            ),
            Color::black()
        );
    }
}
