use crate::{
    math::{point::Point, vector::Vector},
    render::{intersection::IntersectionCollector, ray::Ray},
    scene::object::bounding_box::BoundingBox,
};

/// Sphere of radius 1 centered at the origin.
pub struct UnitSphere {}

impl UnitSphere {
    pub fn local_normal_at(object_point: Point) -> Vector {
        object_point - Point::zero()
    }

    pub fn bounding_box() -> BoundingBox {
        BoundingBox::new(Point::splat(-1.), Point::splat(1.))
    }

    pub fn local_intersect(object_ray: &Ray, collector: &mut IntersectionCollector) {
        let sphere_to_ray = object_ray.origin() - Point::zero();
        let direction = object_ray.direction();

        let a = direction.dot(direction);
        let b = 2. * direction.dot(sphere_to_ray);
        let c = sphere_to_ray.dot(sphere_to_ray) - 1.;

        let discriminant = b * b - 4. * a * c;
        if discriminant < 0. || a == 0. {
            return;
        }

        let delta_sqrt = discriminant.sqrt();
        collector.add((-b - delta_sqrt) / (2. * a));
        collector.add((-b + delta_sqrt) / (2. * a));
    }
}
