use crate::{
    error::{Error, Result},
    math::{point::Point, vector::Vector},
    render::{
        intersection::{Intersection, IntersectionCollector},
        ray::Ray,
    },
    scene::object::bounding_box::BoundingBox,
};

use super::triangle::Triangle;

/// Triangle with per-vertex normals, interpolated across the face.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothTriangle {
    triangle: Triangle,
    n1: Vector,
    n2: Vector,
    n3: Vector,
}

impl SmoothTriangle {
    pub fn new(p1: Point, p2: Point, p3: Point, n1: Vector, n2: Vector, n3: Vector) -> Self {
        Self {
            triangle: Triangle::new(p1, p2, p3),
            n1,
            n2,
            n3,
        }
    }

    /// The interpolation weights come from the hit, so a normal without one is undefined.
    pub fn local_normal_at(&self, hit: Option<&Intersection>) -> Result<Vector> {
        let (u, v) = hit
            .and_then(Intersection::uv)
            .ok_or(Error::MissingBarycentric)?;

        Ok(self.n2 * u + self.n3 * v + self.n1 * (1. - u - v))
    }

    pub fn local_intersect(&self, object_ray: &Ray, collector: &mut IntersectionCollector) {
        self.triangle.local_intersect(object_ray, collector);
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.triangle.bounding_box()
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn n1(&self) -> Vector {
        self.n1
    }

    pub fn n2(&self) -> Vector {
        self.n2
    }

    pub fn n3(&self) -> Vector {
        self.n3
    }
}
