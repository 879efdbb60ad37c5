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

/// Cylinder of radius 1 around the y axis, truncated to `y_min..y_max`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub y_min: f64,
    pub y_max: f64,
    pub closed: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            y_min: f64::NEG_INFINITY,
            y_max: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cylinder {
    pub fn new(y_min: f64, y_max: f64, closed: bool) -> Self {
        Self {
            y_min,
            y_max,
            closed,
        }
    }

    pub fn local_normal_at(&self, object_point: Point) -> Vector {
        let dist = object_point.x().powi(2) + object_point.z().powi(2);

        if dist < 1. && object_point.y() >= self.y_max - EPSILON {
            Vector::new(0., 1., 0.)
        } else if dist < 1. && object_point.y() <= self.y_min + EPSILON {
            Vector::new(0., -1., 0.)
        } else {
            Vector::new(object_point.x(), 0., object_point.z())
        }
    }

    pub fn local_intersect(&self, object_ray: &Ray, collector: &mut IntersectionCollector) {
        self.intersect_caps(object_ray, collector);

        let (origin, direction) = (object_ray.origin(), object_ray.direction());
        let a = direction.x().powi(2) + direction.z().powi(2);

        // parallel to the y axis, only the caps can be hit
        if a.approx_eq(&0.) {
            return;
        }

        let b = 2. * origin.x() * direction.x() + 2. * origin.z() * direction.z();
        let c = origin.x().powi(2) + origin.z().powi(2) - 1.;

        let discriminant = b * b - 4. * a * c;
        if discriminant < 0. {
            return;
        }

        let delta_sqrt = discriminant.sqrt();
        for t in [(-b - delta_sqrt) / (2. * a), (-b + delta_sqrt) / (2. * a)] {
            let y = origin.y() + t * direction.y();
            if self.y_min < y && y < self.y_max {
                collector.add(t);
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            Point::new(-1., self.y_min, -1.),
            Point::new(1., self.y_max, 1.),
        )
    }

    fn cap_within_radius(ray: &Ray, t: f64) -> bool {
        let x = ray.origin().x() + t * ray.direction().x();
        let z = ray.origin().z() + t * ray.direction().z();

        x * x + z * z <= 1.
    }

    fn intersect_caps(&self, ray: &Ray, collector: &mut IntersectionCollector) {
        if !self.closed || ray.direction().y().approx_eq(&0.) {
            return;
        }

        // an infinite end has no cap
        for y in [self.y_min, self.y_max].into_iter().filter(|y| y.is_finite()) {
            let t = (y - ray.origin().y()) / ray.direction().y();
            if Self::cap_within_radius(ray, t) {
                collector.add(t);
            }
        }
    }
}
