use crate::{
    math::{approx_eq::EPSILON, point::Point, vector::Vector},
    render::{intersection::IntersectionCollector, ray::Ray},
    scene::object::bounding_box::BoundingBox,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    p1: Point,
    p2: Point,
    p3: Point,
    e1: Vector,
    e2: Vector,
    normal: Vector,
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = e2.cross(e1).normalize();

        Self {
            p1,
            p2,
            p3,
            e1,
            e2,
            normal,
        }
    }

    /// Möller–Trumbore. Returns the hit time with the barycentric `u` and `v` of the hit.
    pub fn solve(&self, object_ray: &Ray) -> Option<(f64, f64, f64)> {
        let dir_cross_e2 = object_ray.direction().cross(self.e2);
        let det = self.e1.dot(dir_cross_e2);

        if det.abs() < EPSILON {
            return None;
        }

        let f = 1. / det;
        let p1_to_origin = object_ray.origin() - self.p1;
        let u = f * p1_to_origin.dot(dir_cross_e2);
        if !(0.0..=1.).contains(&u) {
            return None;
        }

        let origin_cross_e1 = p1_to_origin.cross(self.e1);
        let v = f * object_ray.direction().dot(origin_cross_e1);
        if v < 0. || u + v > 1. {
            return None;
        }

        let t = f * self.e2.dot(origin_cross_e1);
        Some((t, u, v))
    }

    pub fn local_intersect(&self, object_ray: &Ray, collector: &mut IntersectionCollector) {
        if let Some((t, u, v)) = self.solve(object_ray) {
            collector.add_uv(t, u, v);
        }
    }

    pub fn local_normal_at(&self) -> Vector {
        self.normal
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounding_box = BoundingBox::empty();
        bounding_box.add_point(self.p1);
        bounding_box.add_point(self.p2);
        bounding_box.add_point(self.p3);
        bounding_box
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn p3(&self) -> Point {
        self.p3
    }

    pub fn e1(&self) -> Vector {
        self.e1
    }

    pub fn e2(&self) -> Vector {
        self.e2
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::tuple::Tuple,
        scene::object::{Object, ObjectArena, ObjectId, primitive::shape::Shape},
    };

    fn triangle() -> Triangle {
        Triangle::new(
            Point::new(0., 1., 0.),
            Point::new(-1., 0., 0.),
            Point::new(1., 0., 0.),
        )
    }

    fn triangle_arena() -> (ObjectArena, ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Triangle(triangle())));
        (arena, id)
    }

    #[test]
    fn constructing_triangle() {
        let t = triangle();

        assert_approx_eq_low_prec!(t.e1(), Vector::new(-1., -1., 0.));
        assert_approx_eq_low_prec!(t.e2(), Vector::new(1., -1., 0.));
        assert_approx_eq_low_prec!(t.normal(), Vector::new(0., 0., -1.));
    }

    #[test]
    fn normal_is_constant_on_triangle() {
        let (arena, id) = triangle_arena();

        for point in [
            Point::new(0., 0.5, 0.),
            Point::new(-0.5, 0.75, 0.),
            Point::new(0.5, 0.25, 0.),
        ] {
            assert_approx_eq_low_prec!(
                arena.normal_at(id, point, None).unwrap(),
                triangle().normal()
            );
        }
    }

    #[test]
    fn ray_parallel_to_triangle() {
        let (arena, id) = triangle_arena();
        let ray = Ray::new(Point::new(0., -1., -2.), Vector::new(0., 1., 0.));

        assert!(arena.intersect_object(id, &ray).is_empty());
    }

    #[test]
    fn ray_misses_each_edge() {
        let (arena, id) = triangle_arena();

        for origin in [
            Point::new(1., 1., -2.),
            Point::new(-1., 1., -2.),
            Point::new(0., -1., -2.),
        ] {
            let ray = Ray::new(origin, Vector::new(0., 0., 1.));
            assert!(arena.intersect_object(id, &ray).is_empty());
        }
    }

    #[test]
    fn ray_strikes_triangle() {
        let (arena, id) = triangle_arena();
        let ray = Ray::new(Point::new(0., 0.5, -2.), Vector::new(0., 0., 1.));
        let xs = arena.intersect_object(id, &ray);

        assert_eq!(xs.len(), 1);
        assert_approx_eq_low_prec!(xs[0].time(), 2.);
    }

    #[test]
    fn degenerate_triangle_is_never_hit() {
        let flat = Triangle::new(Point::zero(), Point::new(1., 0., 0.), Point::new(2., 0., 0.));
        let ray = Ray::new(Point::new(0.5, 0., -2.), Vector::new(0., 0., 1.));

        assert!(flat.solve(&ray).is_none());
    }
}
