use crate::{
    math::{approx_eq::EPSILON, point::Point, tuple::Tuple, vector::Vector},
    render::{intersection::IntersectionCollector, ray::Ray},
    scene::object::bounding_box::BoundingBox,
};

/// The infinite xz plane.
pub struct PlaneXZ {}

impl PlaneXZ {
    pub fn local_normal_at() -> Vector {
        Vector::new(0., 1., 0.)
    }

    pub fn local_intersect(object_ray: &Ray, collector: &mut IntersectionCollector) {
        if object_ray.direction().y().abs() < EPSILON {
            return;
        }
        collector.add(-object_ray.origin().y() / object_ray.direction().y());
    }

    pub fn bounding_box() -> BoundingBox {
        BoundingBox::new(
            Point::new(f64::NEG_INFINITY, 0., f64::NEG_INFINITY),
            Point::new(f64::INFINITY, 0., f64::INFINITY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        scene::object::{Object, ObjectArena, primitive::shape::Shape},
    };

    fn plane() -> (ObjectArena, crate::scene::object::ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Plane));
        (arena, id)
    }

    #[test]
    fn normal_is_constant_everywhere() {
        let (arena, id) = plane();

        for point in [
            Point::zero(),
            Point::new(10., 0., -10.),
            Point::new(-5., 0., 150.),
        ] {
            assert_approx_eq_low_prec!(
                arena.normal_at(id, point, None).unwrap(),
                Vector::new(0., 1., 0.)
            );
        }
    }

    #[test]
    fn ray_parallel_to_plane() {
        let (arena, id) = plane();
        let ray = Ray::new(Point::new(0., 10., 0.), Vector::new(0., 0., 1.));

        assert!(arena.intersect_object(id, &ray).is_empty());
    }

    #[test]
    fn coplanar_ray() {
        let (arena, id) = plane();
        let ray = Ray::new(Point::zero(), Vector::new(0., 0., 1.));

        assert!(arena.intersect_object(id, &ray).is_empty());
    }

    #[test]
    fn ray_intersecting_plane_from_above() {
        let (arena, id) = plane();
        let ray = Ray::new(Point::new(0., 1., 0.), Vector::new(0., -1., 0.));
        let xs = arena.intersect_object(id, &ray);

        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].time(), 1.);
        assert_eq!(xs[0].object(), id);
    }

    #[test]
    fn ray_intersecting_plane_from_below() {
        let (arena, id) = plane();
        let ray = Ray::new(Point::new(0., -1., 0.), Vector::new(0., 1., 0.));
        let xs = arena.intersect_object(id, &ray);

        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].time(), 1.);
    }
}
