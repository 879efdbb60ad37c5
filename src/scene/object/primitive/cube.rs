use crate::{
    math::{approx_eq::EPSILON, point::Point, tuple::Tuple, vector::Vector},
    render::{intersection::IntersectionCollector, ray::Ray},
    scene::object::bounding_box::BoundingBox,
};

/// Axis-aligned cube spanning -1..1 on every axis.
pub struct UnitCube {}

impl UnitCube {
    pub fn local_normal_at(object_point: Point) -> Vector {
        let abs_x = object_point.x().abs();
        let abs_y = object_point.y().abs();
        let abs_z = object_point.z().abs();
        let max = abs_x.max(abs_y).max(abs_z);

        if max == abs_x {
            Vector::new(object_point.x(), 0., 0.)
        } else if max == abs_y {
            Vector::new(0., object_point.y(), 0.)
        } else {
            Vector::new(0., 0., object_point.z())
        }
    }

    pub fn local_intersect(object_ray: &Ray, collector: &mut IntersectionCollector) {
        let (origin, direction) = (object_ray.origin(), object_ray.direction());

        let (xtmin, xtmax) = Self::axis_intersection_times(origin.x(), direction.x());
        let (ytmin, ytmax) = Self::axis_intersection_times(origin.y(), direction.y());
        let (ztmin, ztmax) = Self::axis_intersection_times(origin.z(), direction.z());

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin > tmax {
            return;
        }

        collector.add(tmin);
        collector.add(tmax);
    }

    pub fn bounding_box() -> BoundingBox {
        BoundingBox::new(Point::splat(-1.), Point::splat(1.))
    }

    fn axis_intersection_times(origin: f64, direction: f64) -> (f64, f64) {
        let tmin_numerator = -1. - origin;
        let tmax_numerator = 1. - origin;

        let (tmin, tmax) = if direction.abs() >= EPSILON {
            (tmin_numerator / direction, tmax_numerator / direction)
        } else {
            (tmin_numerator * f64::INFINITY, tmax_numerator * f64::INFINITY)
        };

        if tmin < tmax { (tmin, tmax) } else { (tmax, tmin) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        scene::object::{Object, ObjectArena, primitive::shape::Shape},
    };

    fn cube_arena() -> (ObjectArena, crate::scene::object::ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Cube));
        (arena, id)
    }

    #[test]
    fn ray_intersects_cube() {
        let (arena, id) = cube_arena();
        let examples = [
            (Point::new(5., 0.5, 0.), Vector::new(-1., 0., 0.), 4., 6.),
            (Point::new(-5., 0.5, 0.), Vector::new(1., 0., 0.), 4., 6.),
            (Point::new(0.5, 5., 0.), Vector::new(0., -1., 0.), 4., 6.),
            (Point::new(0.5, -5., 0.), Vector::new(0., 1., 0.), 4., 6.),
            (Point::new(0.5, 0., 5.), Vector::new(0., 0., -1.), 4., 6.),
            (Point::new(0.5, 0., -5.), Vector::new(0., 0., 1.), 4., 6.),
            (Point::new(0., 0.5, 0.), Vector::new(0., 0., 1.), -1., 1.),
        ];

        for (origin, direction, t1, t2) in examples {
            let xs = arena.intersect_object(id, &Ray::new(origin, direction));
            assert_eq!(xs.len(), 2);
            assert_approx_eq_low_prec!(xs[0].time(), t1);
            assert_approx_eq_low_prec!(xs[1].time(), t2);
        }
    }

    #[test]
    fn ray_misses_cube() {
        let (arena, id) = cube_arena();
        let examples = [
            (Point::new(-2., 0., 0.), Vector::new(0.2673, 0.5345, 0.8018)),
            (Point::new(0., -2., 0.), Vector::new(0.8018, 0.2673, 0.5345)),
            (Point::new(0., 0., -2.), Vector::new(0.5345, 0.8018, 0.2673)),
            (Point::new(2., 0., 2.), Vector::new(0., 0., -1.)),
            (Point::new(0., 2., 2.), Vector::new(0., -1., 0.)),
            (Point::new(2., 2., 0.), Vector::new(-1., 0., 0.)),
        ];

        for (origin, direction) in examples {
            assert!(
                arena
                    .intersect_object(id, &Ray::new(origin, direction))
                    .is_empty()
            );
        }
    }

    #[test]
    fn normal_on_surface_of_cube() {
        let (arena, id) = cube_arena();
        let examples = [
            (Point::new(1., 0.5, -0.8), Vector::new(1., 0., 0.)),
            (Point::new(-1., -0.2, 0.9), Vector::new(-1., 0., 0.)),
            (Point::new(-0.4, 1., -0.1), Vector::new(0., 1., 0.)),
            (Point::new(0.3, -1., -0.7), Vector::new(0., -1., 0.)),
            (Point::new(-0.6, 0.3, 1.), Vector::new(0., 0., 1.)),
            (Point::new(0.4, 0.4, -1.), Vector::new(0., 0., -1.)),
            (Point::new(1., 1., 1.), Vector::new(1., 0., 0.)),
            (Point::new(-1., -1., -1.), Vector::new(-1., 0., 0.)),
        ];

        for (point, normal) in examples {
            assert_approx_eq_low_prec!(arena.normal_at(id, point, None).unwrap(), normal);
        }
    }
}
