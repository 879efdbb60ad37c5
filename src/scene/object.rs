pub mod bounding_box;
pub mod csg;
pub mod group;
pub mod material;
pub mod primitive;

use bounding_box::BoundingBox;
use csg::{CsgObject, CsgOperation};
use group::ObjectGroup;
use material::Material;
use primitive::shape::Shape;

use crate::{
    error::{Error, Result},
    math::{color::Color, matrix::Matrix, point::Point, transform::Transform, vector::Vector},
    render::{
        intersection::{Intersection, IntersectionCollector, sort_by_time},
        ray::Ray,
    },
};

/// Handle of an object stored in an [`ObjectArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Primitive(Shape),
    Group(ObjectGroup),
    Csg(CsgObject),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    kind: ObjectKind,
    transformation: Matrix,
    transformation_inverse: Matrix,
    material: Material,
    parent: Option<ObjectId>,
}

impl Object {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            transformation: Matrix::identity(),
            transformation_inverse: Matrix::identity(),
            material: Material::default(),
            parent: None,
        }
    }

    pub fn primitive(shape: Shape, material: Material, transformation: Matrix) -> Result<Self> {
        let mut object = Self::primitive_with_shape(shape).with_material(material);
        object.set_transformation(transformation)?;
        Ok(object)
    }

    pub fn primitive_with_shape(shape: Shape) -> Self {
        Self::new(ObjectKind::Primitive(shape))
    }

    pub fn primitive_with_transformation(shape: Shape, transformation: Matrix) -> Result<Self> {
        Self::primitive(shape, Material::default(), transformation)
    }

    pub fn group() -> Self {
        Self::new(ObjectKind::Group(ObjectGroup::empty()))
    }

    /// Unit sphere of fully transparent glass.
    pub fn glass_sphere() -> Self {
        Self::primitive_with_shape(Shape::Sphere).with_material(Material {
            transparency: 1.,
            refractive_index: material::GLASS_REFRACTIVE_INDEX,
            ..Default::default()
        })
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn shape(&self) -> Option<&Shape> {
        match &self.kind {
            ObjectKind::Primitive(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&ObjectGroup> {
        match &self.kind {
            ObjectKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_csg(&self) -> Option<&CsgObject> {
        match &self.kind {
            ObjectKind::Csg(csg) => Some(csg),
            _ => None,
        }
    }

    pub fn transformation(&self) -> Matrix {
        self.transformation
    }

    pub fn transformation_inverse(&self) -> Matrix {
        self.transformation_inverse
    }

    /// Fails without modifying the object when the matrix has no inverse.
    pub fn set_transformation(&mut self, transformation: Matrix) -> Result<()> {
        self.transformation_inverse = transformation.inverse()?;
        self.transformation = transformation;
        Ok(())
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }
}

/// Owns every object of a scene. Groups and CSG nodes refer to their children by id,
/// children point back at their parent, and the hierarchy is kept acyclic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectArena {
    objects: Vec<Object>,
    use_bounding_boxes: bool,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    fn get_result(&self, id: ObjectId) -> Result<&Object> {
        self.get(id).ok_or(Error::UnknownObject(id))
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects.get_mut(id.0).ok_or(Error::UnknownObject(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0..self.objects.len()).map(ObjectId)
    }

    pub fn use_bounding_boxes(&self) -> bool {
        self.use_bounding_boxes
    }

    /// Enables testing rays against group bounding boxes before visiting the children.
    pub fn set_use_bounding_boxes(&mut self, use_bounding_boxes: bool) {
        self.use_bounding_boxes = use_bounding_boxes;
    }

    /// Adds a detached object. An inserted group always starts empty,
    /// children are attached with [`ObjectArena::add_child`].
    pub fn insert(&mut self, mut object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        object.parent = None;
        if let ObjectKind::Group(group) = &mut object.kind {
            *group = ObjectGroup::empty();
        }
        self.objects.push(object);
        id
    }

    pub fn insert_child(&mut self, group: ObjectId, child: Object) -> Result<ObjectId> {
        if self.get_result(group)?.as_group().is_none() {
            return Err(Error::NotAComposite(group));
        }
        let id = self.insert(child);
        self.add_child(group, id)?;
        Ok(id)
    }

    pub fn add_child(&mut self, group: ObjectId, child: ObjectId) -> Result<()> {
        if self.get_result(group)?.as_group().is_none() {
            return Err(Error::NotAComposite(group));
        }
        if self.get_result(child)?.parent.is_some() {
            return Err(Error::AlreadyParented(child));
        }
        if group == child || self.is_ancestor(child, group) {
            return Err(Error::CyclicHierarchy);
        }

        let child_bounds = self.bounds(child);
        self.get_mut(child)?.parent = Some(group);
        let group_object = self.get_mut(group)?;
        if let ObjectKind::Group(g) = &mut group_object.kind {
            g.push_child(child);
            let mut bounding_box = *g.bounding_box();
            bounding_box.add_bounding_box(&child_bounds);
            g.set_bounding_box(bounding_box);
        }
        let grandparent = group_object.parent;
        self.refresh_bounds(grandparent);
        Ok(())
    }

    /// Combines two detached objects into a new CSG node.
    pub fn insert_csg(
        &mut self,
        operation: CsgOperation,
        left: ObjectId,
        right: ObjectId,
    ) -> Result<ObjectId> {
        for operand in [left, right] {
            if self.get_result(operand)?.parent.is_some() {
                return Err(Error::AlreadyParented(operand));
            }
        }
        if left == right {
            return Err(Error::AlreadyParented(right));
        }

        let id = ObjectId(self.objects.len());
        self.objects
            .push(Object::new(ObjectKind::Csg(CsgObject::new(operation, left, right))));
        self.get_mut(left)?.parent = Some(id);
        self.get_mut(right)?.parent = Some(id);
        Ok(id)
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.get(id).and_then(Object::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(Object::parent);
        }
        false
    }

    pub fn set_transformation(&mut self, id: ObjectId, transformation: Matrix) -> Result<()> {
        let object = self.get_mut(id)?;
        object.set_transformation(transformation)?;
        let parent = object.parent;
        self.refresh_bounds(parent);
        Ok(())
    }

    pub fn material_mut(&mut self, id: ObjectId) -> Result<&mut Material> {
        Ok(self.get_mut(id)?.material_mut())
    }

    pub fn set_material(&mut self, id: ObjectId, material: Material) -> Result<()> {
        *self.material_mut(id)? = material;
        Ok(())
    }

    /// Recomputes cached group boxes from `start` up to the root.
    fn refresh_bounds(&mut self, start: Option<ObjectId>) {
        let mut current = start;
        while let Some(id) = current {
            let Some(object) = self.get(id) else {
                return;
            };
            let parent = object.parent;
            if let Some(group) = object.as_group() {
                let mut bounding_box = BoundingBox::empty();
                for &child in group.children() {
                    bounding_box.add_bounding_box(&self.bounds(child));
                }
                if let Some(ObjectKind::Group(group)) =
                    self.objects.get_mut(id.0).map(|object| &mut object.kind)
                {
                    group.set_bounding_box(bounding_box);
                }
            }
            current = parent;
        }
    }

    /// Bounds in the object's own space.
    pub fn local_bounds(&self, id: ObjectId) -> BoundingBox {
        match self.get(id).map(Object::kind) {
            Some(ObjectKind::Primitive(shape)) => shape.bounding_box(),
            Some(ObjectKind::Group(group)) => *group.bounding_box(),
            Some(ObjectKind::Csg(csg)) => {
                let mut bounding_box = self.bounds(csg.left());
                bounding_box.add_bounding_box(&self.bounds(csg.right()));
                bounding_box
            }
            None => BoundingBox::empty(),
        }
    }

    /// Bounds in the parent's space.
    pub fn bounds(&self, id: ObjectId) -> BoundingBox {
        match self.get(id) {
            Some(object) => self.local_bounds(id).transformed_by(&object.transformation),
            None => BoundingBox::empty(),
        }
    }

    /// Whether `id` is `container` itself or lies anywhere below it.
    /// Unknown objects are never included.
    pub fn includes(&self, container: ObjectId, id: ObjectId) -> bool {
        match self.get(container).map(Object::kind) {
            None => false,
            Some(_) if container == id => true,
            Some(ObjectKind::Primitive(_)) => false,
            Some(ObjectKind::Group(group)) => {
                group.children().iter().any(|&child| self.includes(child, id))
            }
            Some(ObjectKind::Csg(csg)) => {
                self.includes(csg.left(), id) || self.includes(csg.right(), id)
            }
        }
    }

    /// Intersects the object with a ray given in its parent's space.
    pub fn intersect(&self, id: ObjectId, ray: &Ray, collector: &mut IntersectionCollector) {
        let Some(object) = self.get(id) else {
            return;
        };
        let local_ray = ray.transformed_by(&object.transformation_inverse);

        match &object.kind {
            ObjectKind::Primitive(shape) => {
                collector.set_object(id);
                shape.local_intersect(&local_ray, collector);
            }
            ObjectKind::Group(group) => group.intersect(self, &local_ray, collector),
            ObjectKind::Csg(csg) => {
                let start = collector.len();
                self.intersect(csg.left(), &local_ray, collector);
                self.intersect(csg.right(), &local_ray, collector);
                let candidates = collector.split_off(start);
                collector.extend(csg.filter_intersections(self, candidates));
            }
        }
    }

    /// Every intersection of the ray with the object, sorted by time.
    pub fn intersect_object(&self, id: ObjectId, ray: &Ray) -> Vec<Intersection> {
        let mut collector = IntersectionCollector::new();
        self.intersect(id, ray, &mut collector);
        let mut xs = collector.into_vec();
        sort_by_time(&mut xs);
        xs
    }

    /// Converts a world space point into the object's space, outermost ancestor first.
    pub fn world_to_object(&self, id: ObjectId, point: Point) -> Point {
        let Some(object) = self.get(id) else {
            return point;
        };
        let point = match object.parent {
            Some(parent) => self.world_to_object(parent, point),
            None => point,
        };
        object.transformation_inverse * point
    }

    /// Converts an object space normal into world space, innermost object first.
    pub fn normal_to_world(&self, id: ObjectId, normal: Vector) -> Vector {
        let Some(object) = self.get(id) else {
            return normal;
        };
        let normal = object.transformation_inverse.mul_transposed(normal).normalize();
        match object.parent {
            Some(parent) => self.normal_to_world(parent, normal),
            None => normal,
        }
    }

    /// World space surface normal. Only primitives have one.
    pub fn normal_at(
        &self,
        id: ObjectId,
        world_point: Point,
        hit: Option<&Intersection>,
    ) -> Result<Vector> {
        let shape = match &self.get_result(id)?.kind {
            ObjectKind::Primitive(shape) => shape,
            ObjectKind::Group(_) | ObjectKind::Csg(_) => return Err(Error::IllegalGroupNormal),
        };
        let object_point = self.world_to_object(id, world_point);
        let object_normal = shape.local_normal_at(object_point, hit)?;
        Ok(self.normal_to_world(id, object_normal))
    }

    /// Material color of the object at a world space point.
    pub fn surface_color(&self, id: ObjectId, world_point: Point) -> Color {
        match self.get(id) {
            Some(object) => object
                .material
                .color_at_object_point(self.world_to_object(id, world_point)),
            None => Color::black(),
        }
    }
}
