use super::{ObjectArena, ObjectId, bounding_box::BoundingBox};
use crate::render::{intersection::IntersectionCollector, ray::Ray};

/// A group of objects that can be transformed simultaneously.
/// The cached bounding box is in group space and is kept up to date by the arena
/// whenever a child is added or a descendant's transformation changes.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ObjectGroup {
    children: Vec<ObjectId>,
    bounding_box: BoundingBox,
}

impl ObjectGroup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub(super) fn push_child(&mut self, child: ObjectId) {
        self.children.push(child);
    }

    pub(super) fn set_bounding_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
    }

    /// Intersects every child with a ray given in group space.
    /// With culling enabled, a ray missing the cached box skips all children.
    pub fn intersect(
        &self,
        arena: &ObjectArena,
        group_ray: &Ray,
        collector: &mut IntersectionCollector,
    ) {
        if arena.use_bounding_boxes() && !self.bounding_box.is_intersected(group_ray) {
            return;
        }
        for &child in &self.children {
            arena.intersect(child, group_ray, collector);
        }
    }
}
