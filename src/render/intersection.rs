use crate::{
    error::{Error, Result},
    math::{
        approx_eq::{ApproxEq, EPSILON},
        point::Point,
        vector::Vector,
    },
    scene::object::{ObjectArena, ObjectId},
};

use super::ray::Ray;

#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    time: f64,
    object: ObjectId,
    uv: Option<(f64, f64)>,
}

impl Intersection {
    pub fn new(time: f64, object: ObjectId) -> Self {
        Self {
            time,
            object,
            uv: None,
        }
    }

    pub fn with_uv(time: f64, object: ObjectId, u: f64, v: f64) -> Self {
        Self {
            time,
            object,
            uv: Some((u, v)),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Barycentric coordinates of the hit, only recorded by triangles.
    pub fn uv(&self) -> Option<(f64, f64)> {
        self.uv
    }
}

impl ApproxEq for Intersection {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.object == other.object && self.time.approx_eq_epsilon(&other.time, epsilon)
    }
}

impl PartialEq for Intersection {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

/// Accumulates intersections while the arena walks the object tree.
/// Primitives only report times; the collector tags them with the object currently being tested.
#[derive(Clone, Debug, Default)]
pub struct IntersectionCollector {
    object: ObjectId,
    vec: Vec<Intersection>,
}

impl IntersectionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_object(&mut self, object: ObjectId) {
        self.object = object;
    }

    pub fn add(&mut self, time: f64) {
        self.vec.push(Intersection::new(time, self.object));
    }

    pub fn add_uv(&mut self, time: f64, u: f64, v: f64) {
        self.vec.push(Intersection::with_uv(time, self.object, u, v));
    }

    pub fn push(&mut self, intersection: Intersection) {
        self.vec.push(intersection);
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Removes and returns everything collected since `start`.
    pub fn split_off(&mut self, start: usize) -> Vec<Intersection> {
        self.vec.split_off(start)
    }

    pub fn vec(&self) -> &[Intersection] {
        &self.vec
    }

    pub fn into_vec(self) -> Vec<Intersection> {
        self.vec
    }
}

impl Extend<Intersection> for IntersectionCollector {
    fn extend<T: IntoIterator<Item = Intersection>>(&mut self, iter: T) {
        self.vec.extend(iter);
    }
}

pub(crate) fn sort_by_time(vec: &mut [Intersection]) {
    vec.sort_by(|lhs, rhs| lhs.time().total_cmp(&rhs.time()));
}

/// Every intersection of one ray with a world, sorted by time.
#[derive(Clone, Debug)]
pub struct IntersectionCollection {
    ray: Ray,
    vec: Vec<Intersection>,
}

impl IntersectionCollection {
    pub fn new(ray: Ray, mut vec: Vec<Intersection>) -> Self {
        sort_by_time(&mut vec);
        Self { ray, vec }
    }

    pub fn from_collector(ray: Ray, collector: IntersectionCollector) -> Self {
        Self::new(ray, collector.into_vec())
    }

    pub fn from_times_and_obj(ray: Ray, times: Vec<f64>, object: ObjectId) -> Self {
        Self::new(
            ray,
            times
                .into_iter()
                .map(|time| Intersection::new(time, object))
                .collect(),
        )
    }

    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn vec(&self) -> &[Intersection] {
        &self.vec
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.vec.iter().map(Intersection::time).collect()
    }

    fn hit_index(&self) -> Option<usize> {
        self.vec.iter().position(|i| i.time() >= 0.)
    }

    /// The intersection with the smallest non-negative time.
    pub fn hit(&self) -> Option<&Intersection> {
        self.hit_index().map(|index| &self.vec[index])
    }

    pub fn computations(&self, arena: &ObjectArena, index: usize) -> Result<IntersecComputations> {
        IntersecComputations::new(arena, self, index)
    }

    pub fn hit_computations(&self, arena: &ObjectArena) -> Result<Option<IntersecComputations>> {
        self.hit_index()
            .map(|index| self.computations(arena, index))
            .transpose()
    }
}

/// Everything shading needs to know about a single hit.
#[derive(Clone, Debug)]
pub struct IntersecComputations {
    time: f64,
    object: ObjectId,
    point: Point,
    over_point: Point,
    under_point: Point,
    eye_v: Vector,
    normal_v: Vector,
    reflect_v: Vector,
    inside: bool,
    refractive_from: f64,
    refractive_to: f64,
}

impl IntersecComputations {
    fn new(arena: &ObjectArena, collection: &IntersectionCollection, index: usize) -> Result<Self> {
        let hit = *collection
            .vec
            .get(index)
            .ok_or(Error::IntersectionOutOfRange {
                index,
                len: collection.vec.len(),
            })?;
        let ray = collection.ray;

        let point = ray.position(hit.time());
        let eye_v = -ray.direction();
        let mut normal_v = arena.normal_at(hit.object(), point, Some(&hit))?;

        let inside = normal_v.dot(eye_v) < 0.;
        if inside {
            normal_v = -normal_v;
        }

        let reflect_v = ray.direction().reflect(normal_v);
        let over_point = point + normal_v * EPSILON;
        let under_point = point - normal_v * EPSILON;

        let (refractive_from, refractive_to) =
            Self::refractive_indices(arena, collection.vec(), index);

        Ok(Self {
            time: hit.time(),
            object: hit.object(),
            point,
            over_point,
            under_point,
            eye_v,
            normal_v,
            reflect_v,
            inside,
            refractive_from,
            refractive_to,
        })
    }

    /// Walks the sorted intersections up to the hit, tracking which objects the ray is inside of.
    fn refractive_indices(
        arena: &ObjectArena,
        intersections: &[Intersection],
        hit_index: usize,
    ) -> (f64, f64) {
        let index_of = |containers: &[ObjectId]| {
            containers
                .last()
                .and_then(|id| arena.get(*id))
                .map_or(1., |object| object.material().refractive_index)
        };

        let mut containers: Vec<ObjectId> = Vec::new();
        let mut refractive_from = 1.;

        for (i, intersection) in intersections.iter().enumerate().take(hit_index + 1) {
            if i == hit_index {
                refractive_from = index_of(&containers);
            }

            match containers.iter().position(|id| *id == intersection.object()) {
                Some(pos) => {
                    containers.remove(pos);
                }
                None => containers.push(intersection.object()),
            }
        }
        (refractive_from, index_of(&containers))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn over_point(&self) -> Point {
        self.over_point
    }

    pub fn under_point(&self) -> Point {
        self.under_point
    }

    pub fn eye_v(&self) -> Vector {
        self.eye_v
    }

    pub fn normal_v(&self) -> Vector {
        self.normal_v
    }

    pub fn reflect_v(&self) -> Vector {
        self.reflect_v
    }

    pub fn inside(&self) -> bool {
        self.inside
    }

    pub fn refractive_from(&self) -> f64 {
        self.refractive_from
    }

    pub fn refractive_to(&self) -> f64 {
        self.refractive_to
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::{matrix::Matrix, tuple::Tuple},
        scene::object::{Object, primitive::shape::Shape},
    };

    fn sphere_arena() -> (ObjectArena, ObjectId) {
        let mut arena = ObjectArena::default();
        let id = arena.insert(Object::primitive_with_shape(Shape::Sphere));
        (arena, id)
    }

    #[test]
    fn hit_all_times_positive() {
        let (_, id) = sphere_arena();
        let xs = IntersectionCollection::from_times_and_obj(Ray::default(), vec![2., 1.], id);

        assert_eq!(xs.hit().map(Intersection::time), Some(1.));
    }

    #[test]
    fn hit_with_negative_time() {
        let (_, id) = sphere_arena();
        let xs = IntersectionCollection::from_times_and_obj(Ray::default(), vec![1., -1.], id);

        assert_eq!(xs.hit().map(Intersection::time), Some(1.));
    }

    #[test]
    fn no_hit_when_all_times_negative() {
        let (_, id) = sphere_arena();
        let xs = IntersectionCollection::from_times_and_obj(Ray::default(), vec![-2., -1.], id);

        assert!(xs.hit().is_none());
    }

    #[test]
    fn hit_is_always_smallest_nonnegative() {
        let (_, id) = sphere_arena();
        let xs =
            IntersectionCollection::from_times_and_obj(Ray::default(), vec![5., 7., -3., 2.], id);

        assert_eq!(xs.hit().map(Intersection::time), Some(2.));
        assert_eq!(xs.times(), vec![-3., 2., 5., 7.]);
    }

    #[test]
    fn collector_tags_current_object() {
        let mut arena = ObjectArena::default();
        let first = arena.insert(Object::primitive_with_shape(Shape::Sphere));
        let second = arena.insert(Object::primitive_with_shape(Shape::Sphere));

        let mut collector = IntersectionCollector::new();
        collector.set_object(first);
        collector.add(1.);
        collector.set_object(second);
        collector.add_uv(2., 0.25, 0.5);

        assert_eq!(collector.vec()[0].object(), first);
        assert_eq!(collector.vec()[1].object(), second);
        assert_eq!(collector.vec()[1].uv(), Some((0.25, 0.5)));
    }

    #[test]
    fn computations_for_missing_intersection_is_an_error() {
        let (arena, id) = sphere_arena();
        let xs = IntersectionCollection::from_times_and_obj(Ray::default(), vec![4., 6.], id);

        assert!(matches!(
            xs.computations(&arena, 2),
            Err(Error::IntersectionOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn precompute_hit_outside() {
        let (arena, id) = sphere_arena();
        let ray = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let comps = IntersectionCollection::from_times_and_obj(ray, vec![4.], id)
            .hit_computations(&arena)
            .unwrap()
            .unwrap();

        assert_eq!(comps.object(), id);
        assert_approx_eq_low_prec!(comps.time(), 4.);
        assert_approx_eq_low_prec!(comps.point(), Point::new(0., 0., -1.));
        assert_approx_eq_low_prec!(comps.eye_v(), Vector::new(0., 0., -1.));
        assert_approx_eq_low_prec!(comps.normal_v(), Vector::new(0., 0., -1.));
        assert!(!comps.inside());
    }

    #[test]
    fn precompute_hit_inside() {
        let (arena, id) = sphere_arena();
        let ray = Ray::new(Point::zero(), Vector::new(0., 0., 1.));
        let comps = IntersectionCollection::from_times_and_obj(ray, vec![1.], id)
            .hit_computations(&arena)
            .unwrap()
            .unwrap();

        assert_approx_eq_low_prec!(comps.point(), Point::new(0., 0., 1.));
        assert_approx_eq_low_prec!(comps.eye_v(), Vector::new(0., 0., -1.));
        assert_approx_eq_low_prec!(comps.normal_v(), Vector::new(0., 0., -1.));
        assert!(comps.inside());
    }

    #[test]
    fn precompute_reflection_vector() {
        let mut arena = ObjectArena::default();
        let plane = arena.insert(Object::primitive_with_shape(Shape::Plane));
        let ray = Ray::new(
            Point::new(0., 1., -1.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let comps = IntersectionCollection::from_times_and_obj(ray, vec![2_f64.sqrt()], plane)
            .hit_computations(&arena)
            .unwrap()
            .unwrap();

        assert_approx_eq_low_prec!(
            comps.reflect_v(),
            Vector::new(0., FRAC_1_SQRT_2, FRAC_1_SQRT_2)
        );
    }

    #[test]
    fn hit_offsets_point_along_normal() {
        let mut arena = ObjectArena::default();
        let id = arena.insert(
            Object::primitive_with_transformation(Shape::Sphere, Matrix::translation(0., 0., 1.))
                .unwrap(),
        );
        let ray = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let comps = IntersectionCollection::from_times_and_obj(ray, vec![5.], id)
            .hit_computations(&arena)
            .unwrap()
            .unwrap();

        assert!(comps.over_point().z() < -EPSILON / 2.);
        assert!(comps.point().z() > comps.over_point().z());
        assert!(comps.under_point().z() > EPSILON / 2.);
        assert!(comps.point().z() < comps.under_point().z());
    }

    #[test]
    fn refractive_indices_at_various_intersections() {
        let mut arena = ObjectArena::default();

        let mut a = Object::glass_sphere();
        a.set_transformation(Matrix::scaling_uniform(2.)).unwrap();
        a.material_mut().refractive_index = 1.5;
        let a = arena.insert(a);

        let mut b = Object::glass_sphere();
        b.set_transformation(Matrix::translation(0., 0., -0.25))
            .unwrap();
        b.material_mut().refractive_index = 2.;
        let b = arena.insert(b);

        let mut c = Object::glass_sphere();
        c.set_transformation(Matrix::translation(0., 0., 0.25))
            .unwrap();
        c.material_mut().refractive_index = 2.5;
        let c = arena.insert(c);

        let ray = Ray::new(Point::new(0., 0., -4.), Vector::new(0., 0., 1.));
        let xs = IntersectionCollection::new(
            ray,
            vec![
                Intersection::new(2., a),
                Intersection::new(2.75, b),
                Intersection::new(3.25, c),
                Intersection::new(4.75, b),
                Intersection::new(5.25, c),
                Intersection::new(6., a),
            ],
        );

        let expected = [
            (1.0, 1.5),
            (1.5, 2.0),
            (2.0, 2.5),
            (2.5, 2.5),
            (2.5, 1.5),
            (1.5, 1.0),
        ];
        for (index, (n1, n2)) in expected.into_iter().enumerate() {
            let comps = xs.computations(&arena, index).unwrap();
            assert_approx_eq_low_prec!(comps.refractive_from(), n1);
            assert_approx_eq_low_prec!(comps.refractive_to(), n2);
        }
    }
}
