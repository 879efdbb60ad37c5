pub mod camera;
pub mod light;
pub mod object;

pub mod io {
    pub mod obj_model;
    pub mod yaml;
}

use std::time::Instant;

use derive_builder::Builder;
use log::{debug, info};

use camera::Camera;
use light::{point_light::PointLightSource, schlick_reflectance};
use object::{
    Object, ObjectArena, ObjectId,
    csg::CsgOperation,
    material::Material,
};

use crate::{
    error::{Error, Result},
    math::{approx_eq::ApproxEq, color::Color, matrix::Matrix, point::Point},
    render::{
        canvas::Canvas,
        intersection::{IntersecComputations, IntersectionCollection, IntersectionCollector},
        ray::Ray,
    },
};

/// Objects, light and render settings.
/// `objects` lists the roots, everything below them lives in the arena only.
#[derive(PartialEq, Debug, Clone, Builder)]
#[builder(default)]
pub struct World {
    #[builder(setter(custom))]
    #[builder(field(
        ty = "Option<bool>",
        build = "World::arena_with_bounding_boxes(self.arena.unwrap_or(false))"
    ))]
    arena: ObjectArena,
    #[builder(setter(skip))]
    objects: Vec<ObjectId>,
    #[builder(setter(strip_option))]
    light: Option<PointLightSource>,
    /// Number of bounces allowed for reflected and refracted rays.
    /// 0 means no reflections or refractions
    #[builder(default = "World::MAX_RECURSIVE_DEPTH")]
    max_recursive_depth: usize,
}

impl Default for World {
    fn default() -> Self {
        Self::empty()
    }
}

impl WorldBuilder {
    /// Test rays against group bounding boxes before visiting the children.
    pub fn use_bounding_boxes(&mut self, use_bounding_boxes: bool) -> &mut Self {
        self.arena = Some(use_bounding_boxes);
        self
    }
}

impl World {
    pub const MAX_RECURSIVE_DEPTH: usize = 4;

    fn arena_with_bounding_boxes(use_bounding_boxes: bool) -> ObjectArena {
        let mut arena = ObjectArena::new();
        arena.set_use_bounding_boxes(use_bounding_boxes);
        arena
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    pub fn new(light: Option<PointLightSource>) -> Self {
        Self {
            arena: ObjectArena::new(),
            objects: Vec::new(),
            light,
            max_recursive_depth: Self::MAX_RECURSIVE_DEPTH,
        }
    }

    pub fn arena(&self) -> &ObjectArena {
        &self.arena
    }

    /// Root objects, in insertion order.
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn light(&self) -> Option<&PointLightSource> {
        self.light.as_ref()
    }

    pub fn set_light(&mut self, light: Option<PointLightSource>) {
        self.light = light;
    }

    pub fn max_recursive_depth(&self) -> usize {
        self.max_recursive_depth
    }

    pub fn set_max_recursive_depth(&mut self, max_recursive_depth: usize) {
        self.max_recursive_depth = max_recursive_depth;
    }

    pub fn use_bounding_boxes(&self) -> bool {
        self.arena.use_bounding_boxes()
    }

    pub fn set_use_bounding_boxes(&mut self, use_bounding_boxes: bool) {
        self.arena.set_use_bounding_boxes(use_bounding_boxes);
    }

    /// Adds an object at the top level of the world.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = self.arena.insert(object);
        self.objects.push(id);
        id
    }

    /// Stores an object without rendering it, so it can later become
    /// a child, a CSG operand or a root.
    pub fn insert_detached(&mut self, object: Object) -> ObjectId {
        self.arena.insert(object)
    }

    /// Makes a detached object a top level one.
    pub fn add_root(&mut self, id: ObjectId) -> Result<()> {
        let object = self.arena.get(id).ok_or(Error::UnknownObject(id))?;
        if object.parent().is_some() || self.objects.contains(&id) {
            return Err(Error::AlreadyParented(id));
        }
        self.objects.push(id);
        Ok(())
    }

    pub fn add_child(&mut self, group: ObjectId, child: Object) -> Result<ObjectId> {
        self.arena.insert_child(group, child)
    }

    /// Moves an existing object under a group. A root stops being one.
    pub fn attach_child(&mut self, group: ObjectId, child: ObjectId) -> Result<()> {
        self.arena.add_child(group, child)?;
        self.objects.retain(|&id| id != child);
        Ok(())
    }

    /// Combines two parentless objects. The new node is a root until attached elsewhere.
    pub fn add_csg(
        &mut self,
        operation: CsgOperation,
        left: ObjectId,
        right: ObjectId,
    ) -> Result<ObjectId> {
        let id = self.arena.insert_csg(operation, left, right)?;
        self.objects.retain(|&root| root != left && root != right);
        self.objects.push(id);
        Ok(id)
    }

    pub fn set_transformation(&mut self, id: ObjectId, transformation: Matrix) -> Result<()> {
        self.arena.set_transformation(id, transformation)
    }

    pub fn material_mut(&mut self, id: ObjectId) -> Result<&mut Material> {
        self.arena.material_mut(id)
    }

    /// Sets the material of an object and of everything below it.
    pub fn apply_material(&mut self, id: ObjectId, material: &Material) -> Result<()> {
        *self.arena.material_mut(id)? = material.clone();

        let object = self.arena.get(id).ok_or(Error::UnknownObject(id))?;
        let children = match (object.as_group(), object.as_csg()) {
            (Some(group), _) => group.children().to_vec(),
            (_, Some(csg)) => vec![csg.left(), csg.right()],
            _ => Vec::new(),
        };
        for child in children {
            self.apply_material(child, material)?;
        }
        Ok(())
    }

    fn material(&self, id: ObjectId) -> Result<&Material> {
        self.arena
            .get(id)
            .map(Object::material)
            .ok_or(Error::UnknownObject(id))
    }

    pub fn intersect(&self, ray: Ray) -> IntersectionCollection {
        let mut collector = IntersectionCollector::new();
        for &id in &self.objects {
            self.arena.intersect(id, &ray, &mut collector);
        }
        IntersectionCollection::from_collector(ray, collector)
    }

    /// Whether anything lies between the point and the light.
    /// Without a light nothing is shadowed.
    pub fn is_shadowed(&self, point: Point) -> bool {
        let Some(light) = &self.light else {
            return false;
        };
        let v = light.position() - point;
        let distance = v.magnitude();
        let ray = Ray::new(point, v.normalize());

        self.intersect(ray)
            .hit()
            .is_some_and(|hit| hit.time() < distance)
    }

    pub fn color_at(&self, ray: Ray) -> Result<Color> {
        self.color_at_depth(ray, self.max_recursive_depth)
    }

    /// `remaining` is the number of bounces secondary rays may still take.
    pub fn color_at_depth(&self, ray: Ray, remaining: usize) -> Result<Color> {
        match self.intersect(ray).hit_computations(&self.arena)? {
            Some(comps) => self.shade_hit(&comps, remaining),
            None => Ok(Color::black()),
        }
    }

    pub fn shade_hit(&self, comps: &IntersecComputations, remaining: usize) -> Result<Color> {
        let surface = match &self.light {
            Some(light) => light.color_of_illuminated_point(
                &self.arena,
                comps.object(),
                comps.over_point(),
                comps.eye_v(),
                comps.normal_v(),
                self.is_shadowed(comps.over_point()),
            ),
            None => Color::black(),
        };

        let reflected = self.reflected_color(comps, remaining)?;
        let refracted = self.refracted_color(comps, remaining)?;

        let material = self.material(comps.object())?;
        if material.reflectivity > 0. && material.transparency > 0. {
            let reflectance = schlick_reflectance(comps);
            return Ok(surface + reflected * reflectance + refracted * (1. - reflectance));
        }
        Ok(surface + reflected + refracted)
    }

    pub fn reflected_color(&self, comps: &IntersecComputations, remaining: usize) -> Result<Color> {
        let reflectivity = self.material(comps.object())?.reflectivity;
        if remaining < 1 || reflectivity.approx_eq(&0.) {
            return Ok(Color::black());
        }

        let reflected_ray = Ray::new(comps.over_point(), comps.reflect_v());
        Ok(self.color_at_depth(reflected_ray, remaining - 1)? * reflectivity)
    }

    pub fn refracted_color(&self, comps: &IntersecComputations, remaining: usize) -> Result<Color> {
        let transparency = self.material(comps.object())?.transparency;
        if remaining < 1 || transparency.approx_eq(&0.) {
            return Ok(Color::black());
        }

        // Snell's law
        let ratio = comps.refractive_from() / comps.refractive_to();
        let cos_i = comps.eye_v().dot(comps.normal_v());
        let sin2_t = ratio.powi(2) * (1. - cos_i.powi(2));

        // total internal reflection
        if sin2_t > 1. {
            return Ok(Color::black());
        }

        let cos_t = (1. - sin2_t).sqrt();
        let direction = comps.normal_v() * (ratio * cos_i - cos_t) - comps.eye_v() * ratio;
        let refracted_ray = Ray::new(comps.under_point(), direction);

        Ok(self.color_at_depth(refracted_ray, remaining - 1)? * transparency)
    }

    pub fn render(&self, camera: &Camera) -> Result<Canvas> {
        self.render_with_progress(camera, |_| {})
    }

    /// Renders rows in parallel, `on_row_done` is called with the index of each finished row.
    pub fn render_with_progress<P>(&self, camera: &Camera, on_row_done: P) -> Result<Canvas>
    where
        P: Fn(usize) + Sync,
    {
        let mut image = camera.canvas();

        info!(
            "rendering {}x{} image, {} root objects, {} maximum recursive depth",
            image.width(),
            image.height(),
            self.objects.len(),
            self.max_recursive_depth
        );
        debug!(
            "object arena holds {} objects, bounding boxes {}",
            self.arena.len(),
            if self.use_bounding_boxes() { "enabled" } else { "disabled" }
        );

        let now = Instant::now();
        image.try_fill_rows(|x, y| self.color_at(camera.ray_for_pixel(x, y)), on_row_done)?;
        info!("render time: {:?}", now.elapsed());

        Ok(image)
    }
}

// Two concentric spheres lit from the upper left
#[cfg(test)]
impl World {
    pub fn default_testing() -> Self {
        use crate::{math::tuple::Tuple, scene::object::primitive::shape::Shape};

        let mut world = Self::new(Some(PointLightSource::new(
            Point::new(-10., 10., -10.),
            Color::white(),
        )));

        world.add_object(Object::primitive_with_shape(Shape::Sphere).with_material(Material {
            color: Color::new(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        }));

        world.add_object(
            Object::primitive_with_transformation(Shape::Sphere, Matrix::scaling_uniform(0.5))
                .unwrap(),
        );
        world
    }
}
