use crate::{
    math::{
        approx_eq::{ApproxEq, EPSILON},
        point::Point,
        tuple::Tuple,
        vector::Vector,
    },
    render::{intersection::IntersectionCollector, ray::Ray},
    scene::object::bounding_box::BoundingBox,
};

/// Double-napped cone `x² + z² = y²` around the y axis, truncated to `y_min..y_max`.
/// The radius at any height equals `|y|`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cone {
    pub y_min: f64,
    pub y_max: f64,
    pub closed: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            y_min: f64::NEG_INFINITY,
            y_max: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cone {
    pub fn new(y_min: f64, y_max: f64, closed: bool) -> Self {
        Self {
            y_min,
            y_max,
            closed,
        }
    }

    pub fn local_normal_at(&self, object_point: Point) -> Vector {
        let dist = object_point.x().powi(2) + object_point.z().powi(2);

        if dist < self.y_max.powi(2) && object_point.y() >= self.y_max - EPSILON {
            Vector::new(0., 1., 0.)
        } else if dist < self.y_min.powi(2) && object_point.y() <= self.y_min + EPSILON {
            Vector::new(0., -1., 0.)
        } else {
            let mut y = dist.sqrt();
            if object_point.y() > 0. {
                y = -y;
            }
            Vector::new(object_point.x(), y, object_point.z())
        }
    }

    pub fn local_intersect(&self, object_ray: &Ray, collector: &mut IntersectionCollector) {
        self.intersect_caps(object_ray, collector);

        let (origin, direction) = (object_ray.origin(), object_ray.direction());

        let a = direction.x().powi(2) - direction.y().powi(2) + direction.z().powi(2);
        let b = 2.
            * (origin.x() * direction.x() - origin.y() * direction.y()
                + origin.z() * direction.z());
        let c = origin.x().powi(2) - origin.y().powi(2) + origin.z().powi(2);

        // parallel to one of the nappes, the quadratic degenerates to a linear equation
        if a.approx_eq(&0.) {
            if b.approx_eq(&0.) {
                return;
            }
            let t = -c / (2. * b);
            if self.contains_height(origin.y() + t * direction.y()) {
                collector.add(t);
            }
            return;
        }

        let discriminant = b * b - 4. * a * c;
        if discriminant < 0. {
            return;
        }

        let delta_sqrt = discriminant.sqrt();
        for t in [(-b - delta_sqrt) / (2. * a), (-b + delta_sqrt) / (2. * a)] {
            if self.contains_height(origin.y() + t * direction.y()) {
                collector.add(t);
            }
        }
    }

    fn contains_height(&self, y: f64) -> bool {
        self.y_min < y && y < self.y_max
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let limit = self.y_min.abs().max(self.y_max.abs());
        BoundingBox::new(
            Point::new(-limit, self.y_min, -limit),
            Point::new(limit, self.y_max, limit),
        )
    }

    fn cap_within_radius(ray: &Ray, t: f64, radius: f64) -> bool {
        let x = ray.origin().x() + t * ray.direction().x();
        let z = ray.origin().z() + t * ray.direction().z();

        x * x + z * z <= radius * radius
    }

    fn intersect_caps(&self, ray: &Ray, collector: &mut IntersectionCollector) {
        if !self.closed || ray.direction().y().approx_eq(&0.) {
            return;
        }

        // an infinite end has no cap
        for y in [self.y_min, self.y_max].into_iter().filter(|y| y.is_finite()) {
            let t = (y - ray.origin().y()) / ray.direction().y();
            if Self::cap_within_radius(ray, t, y.abs()) {
                collector.add(t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        scene::object::{Object, ObjectArena, ObjectId, primitive::shape::Shape},
    };

    fn cone_arena(cone: Cone) -> (ObjectArena, ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Cone(cone)));
        (arena, id)
    }

    #[test]
    fn intersect_cone_with_ray() {
        let (arena, id) = cone_arena(Cone::default());
        let examples = [
            (Point::new(0., 0., -5.), Vector::new(0., 0., 1.), 5., 5.),
            (Point::new(0., 0., -5.), Vector::new(1., 1., 1.), 8.66025, 8.66025),
            (Point::new(1., 1., -5.), Vector::new(-0.5, -1., 1.), 4.55006, 49.44994),
        ];

        for (origin, direction, t0, t1) in examples {
            let xs = arena.intersect_object(id, &Ray::new(origin, direction.normalize()));
            assert_eq!(xs.len(), 2);
            assert_approx_eq_low_prec!(xs[0].time(), t0);
            assert_approx_eq_low_prec!(xs[1].time(), t1);
        }
    }

    #[test]
    fn ray_parallel_to_one_nappe() {
        let (arena, id) = cone_arena(Cone::default());
        let ray = Ray::new(Point::new(0., 0., -1.), Vector::new(0., 1., 1.).normalize());
        let xs = arena.intersect_object(id, &ray);

        assert_eq!(xs.len(), 1);
        assert_approx_eq_low_prec!(xs[0].time(), 0.35355);
    }

    #[test]
    fn ray_through_apex_along_nappe_misses() {
        let (arena, id) = cone_arena(Cone::default());
        let ray = Ray::new(Point::zero(), Vector::new(0., 1., 1.).normalize());

        assert!(arena.intersect_object(id, &ray).is_empty());
    }

    #[test]
    fn intersect_caps_of_closed_cone() {
        let (arena, id) = cone_arena(Cone::new(-0.5, 0.5, true));
        let examples = [
            (Point::new(0., 0., -5.), Vector::new(0., 1., 0.), 0),
            (Point::new(0., 0., -0.25), Vector::new(0., 1., 1.), 2),
            (Point::new(0., 0., -0.25), Vector::new(0., 1., 0.), 4),
        ];

        for (origin, direction, count) in examples {
            let ray = Ray::new(origin, direction.normalize());
            assert_eq!(arena.intersect_object(id, &ray).len(), count);
        }
    }

    #[test]
    fn local_normal_on_cone() {
        let cone = Cone::default();
        let examples = [
            (Point::zero(), Vector::new(0., 0., 0.)),
            (Point::new(1., 1., 1.), Vector::new(1., -2_f64.sqrt(), 1.)),
            (Point::new(-1., -1., 0.), Vector::new(-1., 1., 0.)),
        ];

        for (point, normal) in examples {
            assert_approx_eq_low_prec!(cone.local_normal_at(point), normal);
        }
    }

    #[test]
    fn cap_normals_of_closed_cone() {
        let cone = Cone::new(-1., 2., true);

        assert_approx_eq_low_prec!(
            cone.local_normal_at(Point::new(0.5, 2., 0.5)),
            Vector::new(0., 1., 0.)
        );
        assert_approx_eq_low_prec!(
            cone.local_normal_at(Point::new(0.2, -1., 0.3)),
            Vector::new(0., -1., 0.)
        );
    }

    #[test]
    fn bounds_use_widest_cap() {
        let bbox = Cone::new(-5., 3., false).bounding_box();

        assert_approx_eq_low_prec!(bbox.min, Point::new(-5., -5., -5.));
        assert_approx_eq_low_prec!(bbox.max, Point::new(5., 3., 5.));
        assert!(Cone::default().bounding_box().is_infinitely_large());
    }

    #[test]
    fn closed_unbounded_cone_has_no_caps() {
        let (arena, id) = cone_arena(Cone::new(f64::NEG_INFINITY, f64::INFINITY, true));
        let ray = Ray::new(Point::new(1., 1., -5.), Vector::new(-0.5, -1., 1.).normalize());
        let xs = arena.intersect_object(id, &ray);

        assert_eq!(xs.len(), 2);
        assert!(xs.iter().all(|i| i.time().is_finite()));
        assert_approx_eq_low_prec!(xs[0].time(), 4.55006);
        assert_approx_eq_low_prec!(xs[1].time(), 49.44994);
    }
}
