use std::{
    cell::Cell,
    collections::HashMap,
    f64::consts::FRAC_PI_3,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, warn};
use saphyr::Yaml;
use thiserror::Error;

use super::obj_model::ObjModelParser;
use crate::{
    error::{Error, Result},
    math::{
        color::Color,
        matrix::Matrix,
        noise::PerlinNoise,
        point::Point,
        transform::Transformation,
        tuple::{Axis, Tuple},
        vector::Vector,
    },
    scene::{
        World,
        camera::Camera,
        light::point_light::PointLightSource,
        object::{
            Object, ObjectId,
            csg::CsgOperation,
            material::{Material, pattern::Pattern},
            primitive::{cone::Cone, cylinder::Cylinder, shape::Shape},
        },
    },
};

#[derive(Debug, Error)]
pub enum YamlParseError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("invalid value for `{0}`")]
    InvalidField(String),
    #[error("every entry has to be a mapping whose first key is the operation")]
    UnexpectedValue,
    #[error("unknown define `{0}`")]
    UnknownDefine(String),
    #[error("define `{0}` refers back to itself")]
    CyclicDefine(String),
    #[error("unknown variant `{0}`")]
    UnknownVariant(String),
    #[error("syntax error: {0}")]
    YamlSyntaxError(String),
    #[error("a scene file holds exactly one yaml document")]
    MultipleDocuments,
    #[error("failed to read `{path}`: {message}")]
    FileReadError { path: String, message: String },
    // an empty group is always a mistake in the scene file
    #[error("groups need at least one child")]
    EmptyGroup,
}

fn missing(field: &str) -> Error {
    YamlParseError::MissingField(field.to_string()).into()
}

fn invalid(field: &str) -> Error {
    YamlParseError::InvalidField(field.to_string()).into()
}

fn unknown_variant(name: &str) -> Error {
    YamlParseError::UnknownVariant(name.to_string()).into()
}

/// `None` when the key is absent.
fn field<'y>(body: &'y Yaml, key: &str) -> Option<&'y Yaml> {
    match &body[key] {
        Yaml::BadValue => None,
        value => Some(value),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| {
        YamlParseError::FileReadError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
        .into()
    })
}

// deeper chains of defines can only come from a cycle
const MAX_DEFINE_DEPTH: usize = 64;

const OBJECT_KINDS: [&str; 10] = [
    "sphere",
    "plane",
    "cube",
    "cylinder",
    "cone",
    "triangle",
    "smooth-triangle",
    "group",
    "csg",
    "obj",
];

const PREDEFINED_DEFINES: &str = r#"
- define: PI
  value: 3.141592653589793
- define: FRAC_PI_2
  value: 1.5707963267948966
- define: FRAC_PI_3
  value: 1.0471975511965979
- define: FRAC_PI_4
  value: 0.7853981633974483
- define: FRAC_PI_6
  value: 0.5235987755982989

- define: WHITE
  value: [ 1, 1, 1 ]
- define: BLACK
  value: [ 0, 0, 0 ]
- define: RED
  value: [ 1, 0, 0 ]
- define: GREEN
  value: [ 0, 1, 0 ]
- define: BLUE
  value: [ 0, 0, 1 ]

- define: GLASS_MATERIAL
  value:
    color: BLACK
    ambient: 0.025
    diffuse: 0.2
    specular: 1.0
    shininess: 300.0
    reflective: 0.9
    transparency: 0.9
    refractive-index: 1.5

- define: MIRROR_MATERIAL
  extend: GLASS_MATERIAL
  value:
    reflective: 0.98
    transparency: 0
    refractive-index: 1.0

- define: SCENE_LIGHT
  value:
    add: light
    at: [ -10, 10, -10 ]
    intensity: WHITE
"#;

/// Camera values found in the scene file. Anything left unset falls back to the defaults,
/// and the cli can overwrite any of them before the camera is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraSettings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub field_of_view: Option<f64>,
    pub view_transformation: Option<Matrix>,
}

impl CameraSettings {
    pub const DEFAULT_WIDTH: usize = 800;
    pub const DEFAULT_HEIGHT: usize = 600;
    pub const DEFAULT_FIELD_OF_VIEW: f64 = FRAC_PI_3;

    pub fn build(&self) -> Result<Camera> {
        let mut camera = Camera::new(
            self.width.unwrap_or(Self::DEFAULT_WIDTH),
            self.height.unwrap_or(Self::DEFAULT_HEIGHT),
            self.field_of_view.unwrap_or(Self::DEFAULT_FIELD_OF_VIEW),
        );
        if let Some(view) = self.view_transformation {
            camera.set_transformation(view)?;
        }
        Ok(camera)
    }
}

/// The output of the parser: the world ready to render, plus the settings
/// that cli options are allowed to override.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub world: World,
    pub camera: CameraSettings,
    pub max_reflective_depth: Option<usize>,
}

struct YamlParser<'a> {
    input_path: Option<&'a Path>,
    defines: HashMap<String, Yaml>,
    noise: Arc<PerlinNoise>,
    define_depth: Cell<usize>,

    world: World,
    camera: CameraSettings,
    max_reflective_depth: Option<usize>,
}

macro_rules! parse_optional_field {
    ($self:ident, $body:ident, $material:ident, $field:ident) => {
        parse_optional_field!($self, $body, $material, stringify!($field), $field)
    };
    ($self:ident, $body:ident, $material:ident, $key:expr, $field:ident) => {
        if let Some(value) = field($body, $key) {
            $material.$field = $self.parse_num(value)?;
        }
    };
}

impl<'a> YamlParser<'a> {
    fn with_predefined_defines(input_path: Option<&'a Path>, noise: Arc<PerlinNoise>) -> Result<Self> {
        let mut parser = Self {
            input_path,
            defines: HashMap::new(),
            noise,
            define_depth: Cell::new(0),
            world: World::empty(),
            camera: CameraSettings::default(),
            max_reflective_depth: None,
        };
        parser.parse(&str_to_yaml(PREDEFINED_DEFINES)?)?;
        Ok(parser)
    }

    fn define(&self, name: &str) -> Result<&Yaml> {
        self.defines
            .get(name)
            .ok_or_else(|| YamlParseError::UnknownDefine(name.to_string()).into())
    }

    /// Marks one more define being expanded, returns the depth to restore afterwards.
    fn enter_define(&self, name: &str) -> Result<usize> {
        let depth = self.define_depth.get();
        if depth >= MAX_DEFINE_DEPTH {
            return Err(YamlParseError::CyclicDefine(name.to_string()).into());
        }
        self.define_depth.set(depth + 1);
        Ok(depth)
    }

    fn resolve_define<T>(&self, name: &str, parse: impl FnOnce(&Yaml) -> Result<T>) -> Result<T> {
        let value = self.define(name)?;
        let depth = self.enter_define(name)?;
        let result = parse(value);
        self.define_depth.set(depth);
        result
    }

    fn parse_num(&self, value: &Yaml) -> Result<f64> {
        match value {
            Yaml::Integer(value) => Ok(*value as f64),
            // `as_f64` also resolves `.inf`, `-.inf` and `.nan`
            Yaml::Real(real) => value.as_f64().ok_or_else(|| invalid(real)),
            Yaml::String(name) => match name.strip_prefix('-') {
                Some(name) => self.resolve_define(name, |value| self.parse_num(value)).map(|v| -v),
                None => self.resolve_define(name, |value| self.parse_num(value)),
            },
            _ => Err(invalid("number")),
        }
    }

    fn parse_usize(&self, value: &Yaml, key: &str) -> Result<usize> {
        let value = self.parse_num(value)?;
        if !value.is_finite() || value < 0. || value.fract() != 0. {
            return Err(invalid(key));
        }
        Ok(value as usize)
    }

    fn parse_bool(&self, value: &Yaml, key: &str) -> Result<bool> {
        value.as_bool().ok_or_else(|| invalid(key))
    }

    fn parse_vec3(&self, value: &Yaml) -> Result<(f64, f64, f64)> {
        match value.as_vec().map(Vec::as_slice) {
            Some([x, y, z]) => Ok((self.parse_num(x)?, self.parse_num(y)?, self.parse_num(z)?)),
            _ => Err(invalid("triple")),
        }
    }

    fn parse_point(&self, value: &Yaml) -> Result<Point> {
        let (x, y, z) = self.parse_vec3(value)?;
        Ok(Point::new(x, y, z))
    }

    fn parse_vector(&self, value: &Yaml) -> Result<Vector> {
        let (x, y, z) = self.parse_vec3(value)?;
        Ok(Vector::new(x, y, z))
    }

    fn required_point(&self, body: &Yaml, key: &str) -> Result<Point> {
        self.parse_point(field(body, key).ok_or_else(|| missing(key))?)
    }

    fn required_vector(&self, body: &Yaml, key: &str) -> Result<Vector> {
        self.parse_vector(field(body, key).ok_or_else(|| missing(key))?)
    }

    fn parse_color(&self, value: &Yaml) -> Result<Color> {
        if let Yaml::String(name) = value {
            return self.resolve_define(name, |value| self.parse_color(value));
        }
        let (r, g, b) = self.parse_vec3(value)?;
        Ok(Color::new(r, g, b))
    }

    fn parse_pattern_operands(&self, body: &Yaml) -> Result<(Pattern, Pattern)> {
        let operands = match (field(body, "colors"), field(body, "patterns")) {
            (Some(colors), None) => colors
                .as_vec()
                .ok_or_else(|| invalid("colors"))?
                .iter()
                .map(|color| self.parse_color(color).map(Pattern::from))
                .collect::<Result<Vec<_>>>()?,
            (None, Some(patterns)) => patterns
                .as_vec()
                .ok_or_else(|| invalid("patterns"))?
                .iter()
                .map(|pattern| self.parse_pattern(pattern))
                .collect::<Result<Vec<_>>>()?,
            (None, None) => return Err(missing("colors")),
            (Some(_), Some(_)) => return Err(invalid("patterns")),
        };

        match <[Pattern; 2]>::try_from(operands) {
            Ok([a, b]) => Ok((a, b)),
            Err(_) => Err(invalid("colors")),
        }
    }

    fn parse_pattern(&self, body: &Yaml) -> Result<Pattern> {
        if let Yaml::String(name) = body {
            return self.resolve_define(name, |value| self.parse_pattern(value));
        }
        let kind = body["type"].as_str().ok_or_else(|| missing("type"))?;

        let mut pattern = match kind {
            "solid" => Pattern::solid(self.parse_color(field(body, "color").ok_or_else(|| missing("color"))?)?),
            "perturbed" => {
                let inner = self.parse_pattern(field(body, "pattern").ok_or_else(|| missing("pattern"))?)?;
                let scale = match field(body, "scale") {
                    Some(scale) => self.parse_num(scale)?,
                    None => Pattern::DEFAULT_PERTURBATION_SCALE,
                };
                Pattern::perturbed(inner, Arc::clone(&self.noise), scale)
            }
            _ => {
                let combine: fn(Pattern, Pattern) -> Pattern = match kind {
                    "stripe" | "stripes" => |a, b| Pattern::stripe(a, b),
                    "gradient" => |a, b| Pattern::gradient(a, b),
                    "radial-gradient" => |a, b| Pattern::radial_gradient(a, b),
                    "ring" | "rings" => |a, b| Pattern::ring(a, b),
                    "checker" | "checkers" => |a, b| Pattern::checkers(a, b),
                    "blended" => |a, b| Pattern::blended(a, b),
                    other => return Err(unknown_variant(other)),
                };
                let (a, b) = self.parse_pattern_operands(body)?;
                combine(a, b)
            }
        };

        if let Some(transform) = field(body, "transform") {
            pattern.set_transformation(self.parse_matrix(transform)?)?;
        }
        Ok(pattern)
    }

    fn parse_material(&self, body: &Yaml) -> Result<Material> {
        if let Yaml::String(name) = body {
            return self.resolve_define(name, |value| self.parse_material(value));
        }
        if body.as_hash().is_none() {
            return Err(invalid("material"));
        }
        let mut material = Material::default();

        // a pattern wins over the color, the color stays as the fallback
        if let Some(color) = field(body, "color") {
            material.color = self.parse_color(color)?;
        }
        if let Some(pattern) = field(body, "pattern") {
            material.pattern = Some(self.parse_pattern(pattern)?);
        }

        parse_optional_field!(self, body, material, ambient);
        parse_optional_field!(self, body, material, diffuse);
        parse_optional_field!(self, body, material, specular);
        parse_optional_field!(self, body, material, shininess);
        parse_optional_field!(self, body, material, transparency);
        parse_optional_field!(self, body, material, "reflective", reflectivity);
        parse_optional_field!(self, body, material, reflectivity);
        parse_optional_field!(self, body, material, "refractive-index", refractive_index);

        Ok(material)
    }

    fn parse_transformation_literal(&self, body: &Yaml) -> Result<Transformation> {
        let (kind, values) = match body.as_vec().map(Vec::as_slice) {
            Some([kind, values @ ..]) => (kind.as_str().ok_or_else(|| invalid("transform"))?, values),
            _ => return Err(invalid("transform")),
        };
        let values = values
            .iter()
            .map(|value| self.parse_num(value))
            .collect::<Result<Vec<_>>>()?;

        Ok(match (kind, values.as_slice()) {
            ("translate", &[x, y, z]) => Transformation::Translation(x, y, z),
            ("scale", &[x, y, z]) => Transformation::Scaling(x, y, z),
            ("scale-uniform", &[factor]) => Transformation::Scaling(factor, factor, factor),
            ("rotate-x", &[radians]) => Transformation::Rotation(Axis::X, radians),
            ("rotate-y", &[radians]) => Transformation::Rotation(Axis::Y, radians),
            ("rotate-z", &[radians]) => Transformation::Rotation(Axis::Z, radians),
            ("shear", &[xy, xz, yx, yz, zx, zy]) => Transformation::Shearing(xy, xz, yx, yz, zx, zy),
            (
                "translate" | "scale" | "scale-uniform" | "rotate-x" | "rotate-y" | "rotate-z"
                | "shear",
                _,
            ) => return Err(invalid(kind)),
            (other, _) => return Err(unknown_variant(other)),
        })
    }

    /// Transformations in the order they are applied. Names refer to defined lists.
    fn parse_transformations(&self, body: &Yaml) -> Result<Vec<Transformation>> {
        match body {
            Yaml::BadValue => Ok(Vec::new()),
            Yaml::String(name) => self.resolve_define(name, |value| self.parse_transformations(value)),
            Yaml::Array(items) => {
                let mut transformations = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Yaml::String(name) => {
                            transformations.extend(
                                self.resolve_define(name, |value| self.parse_transformations(value))?,
                            )
                        }
                        _ => transformations.push(self.parse_transformation_literal(item)?),
                    }
                }
                Ok(transformations)
            }
            _ => Err(invalid("transform")),
        }
    }

    fn parse_matrix(&self, body: &Yaml) -> Result<Matrix> {
        Ok(Matrix::from(self.parse_transformations(body)?.as_slice()))
    }

    fn parse_light(&self, body: &Yaml) -> Result<PointLightSource> {
        let at = self.required_point(body, "at")?;
        let intensity = self.parse_color(field(body, "intensity").ok_or_else(|| missing("intensity"))?)?;
        Ok(PointLightSource::new(at, intensity))
    }

    fn parse_camera(&mut self, body: &Yaml) -> Result<()> {
        if let Some(width) = field(body, "width") {
            self.camera.width = Some(self.parse_usize(width, "width")?);
        }
        if let Some(height) = field(body, "height") {
            self.camera.height = Some(self.parse_usize(height, "height")?);
        }
        for key in ["field-of-view", "fov"] {
            if let Some(fov) = field(body, key) {
                self.camera.field_of_view = Some(self.parse_num(fov)?);
            }
        }

        if ["from", "to", "up"].iter().all(|key| field(body, key).is_none()) {
            return Ok(());
        }
        let from = self.required_point(body, "from")?;
        let to = self.required_point(body, "to")?;
        let up = self.required_vector(body, "up")?;
        self.camera.view_transformation = Some(Matrix::view_transformation(from, to, up));
        Ok(())
    }

    fn parse_options(&mut self, body: &Yaml) -> Result<()> {
        if let Some(depth) = field(body, "reflective-depth") {
            self.max_reflective_depth = Some(self.parse_usize(depth, "reflective-depth")?);
        }
        Ok(())
    }

    fn resolve_path_from_scene(&self, path: &Path) -> PathBuf {
        let input_dir = self
            .input_path
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        input_dir.join(path)
    }

    fn parse_obj_model(&mut self, body: &Yaml) -> Result<ObjectId> {
        let file = body["file"].as_str().ok_or_else(|| missing("file"))?;
        let path = self.resolve_path_from_scene(Path::new(file));
        let source = read_file(&path)?;
        debug!("loading obj model {}", path.display());
        ObjModelParser::parse_to_object(&source, &mut self.world)
    }

    fn parse_group(&mut self, body: &Yaml) -> Result<ObjectId> {
        let children = match &body["children"] {
            Yaml::Array(children) if !children.is_empty() => children,
            _ => return Err(YamlParseError::EmptyGroup.into()),
        };

        let group = self.world.insert_detached(Object::group());
        for child in children {
            let child = self.parse_object(child)?;
            self.world.attach_child(group, child)?;
        }
        Ok(group)
    }

    fn parse_csg(&mut self, body: &Yaml) -> Result<ObjectId> {
        let name = body["operation"].as_str().ok_or_else(|| missing("operation"))?;
        let operation = name
            .parse::<CsgOperation>()
            .map_err(|_| unknown_variant(name))?;

        let left = self.parse_object(field(body, "left").ok_or_else(|| missing("left"))?)?;
        let right = self.parse_object(field(body, "right").ok_or_else(|| missing("right"))?)?;
        self.world.add_csg(operation, left, right)
    }

    fn parse_shape(&self, body: &Yaml, kind: &str) -> Result<Shape> {
        Ok(match kind {
            "sphere" => Shape::Sphere,
            "plane" => Shape::Plane,
            "cube" => Shape::Cube,
            "cylinder" => {
                let default = Cylinder::default();
                let (min, max, closed) =
                    self.parse_bounds(body, default.y_min, default.y_max, default.closed)?;
                Shape::cylinder(min, max, closed)
            }
            "cone" => {
                let default = Cone::default();
                let (min, max, closed) =
                    self.parse_bounds(body, default.y_min, default.y_max, default.closed)?;
                Shape::cone(min, max, closed)
            }
            "triangle" => Shape::triangle(
                self.required_point(body, "p1")?,
                self.required_point(body, "p2")?,
                self.required_point(body, "p3")?,
            ),
            "smooth-triangle" => Shape::smooth_triangle(
                self.required_point(body, "p1")?,
                self.required_point(body, "p2")?,
                self.required_point(body, "p3")?,
                self.required_vector(body, "n1")?,
                self.required_vector(body, "n2")?,
                self.required_vector(body, "n3")?,
            ),
            other => return Err(unknown_variant(other)),
        })
    }

    fn parse_bounds(&self, body: &Yaml, min: f64, max: f64, closed: bool) -> Result<(f64, f64, bool)> {
        Ok((
            field(body, "min").map_or(Ok(min), |min| self.parse_num(min))?,
            field(body, "max").map_or(Ok(max), |max| self.parse_num(max))?,
            field(body, "closed").map_or(Ok(closed), |closed| self.parse_bool(closed, "closed"))?,
        ))
    }

    fn parse_object(&mut self, body: &Yaml) -> Result<ObjectId> {
        let kind = body["add"].as_str().ok_or_else(|| missing("add"))?;
        self.parse_object_with_kind(body, kind)
    }

    /// Stores the object in the world without making it a root.
    fn parse_object_with_kind(&mut self, body: &Yaml, kind: &str) -> Result<ObjectId> {
        if !OBJECT_KINDS.contains(&kind) {
            let body = self.use_define(kind, body)?;
            let depth = self.enter_define(kind)?;
            let result = self.parse_object(&body);
            self.define_depth.set(depth);
            return result;
        }

        let material = field(body, "material")
            .map(|material| self.parse_material(material))
            .transpose()?;
        let transformation = self.parse_matrix(&body["transform"])?;

        let id = match kind {
            "group" => self.parse_group(body)?,
            "csg" => self.parse_csg(body)?,
            "obj" => self.parse_obj_model(body)?,
            _ => {
                let shape = self.parse_shape(body, kind)?;
                let object = Object::primitive(shape, material.unwrap_or_default(), transformation)?;
                return Ok(self.world.insert_detached(object));
            }
        };

        if let Some(material) = material {
            self.world.apply_material(id, &material)?;
        }
        self.world.set_transformation(id, transformation)?;
        Ok(id)
    }

    fn parse_add(&mut self, what: &str, body: &Yaml) -> Result<()> {
        match what {
            "camera" => self.parse_camera(body),
            "light" => {
                let light = self.parse_light(body)?;
                if self.world.light().is_some() {
                    warn!("scene file: only one light is supported, the last one is kept");
                }
                self.world.set_light(Some(light));
                Ok(())
            }
            kind if OBJECT_KINDS.contains(&kind) => {
                let id = self.parse_object_with_kind(body, kind)?;
                // csg nodes are roots as soon as they are built
                if !self.world.objects().contains(&id) {
                    self.world.add_root(id)?;
                }
                Ok(())
            }
            name => {
                let body = self.use_define(name, body)?;
                let depth = self.enter_define(name)?;
                let result = self.parse_operation(&body);
                self.define_depth.set(depth);
                result
            }
        }
    }

    /// The body of the define `name`, overridden by the keys of `body`.
    fn use_define(&self, name: &str, body: &Yaml) -> Result<Yaml> {
        let define = self.defines.get(name).ok_or_else(|| unknown_variant(name))?;
        let merged = self.merge_use_define(name, define, body)?;
        if merged["add"].as_str() == Some(name) {
            return Err(unknown_variant(name));
        }
        Ok(merged)
    }

    fn merge_hash(&self, name: &str, define_hash: &saphyr::Hash, use_hash: &saphyr::Hash) -> Result<Yaml> {
        let mut new_hash = define_hash.clone();

        for (key, value) in use_hash {
            if define_hash.contains_key(key) {
                let key_str = key.as_str().ok_or_else(|| invalid("key"))?;
                new_hash[key] = self.merge_yaml(name, key_str, &define_hash[key], value)?;
            } else {
                new_hash.insert(key.clone(), value.clone());
            }
        }
        Ok(Yaml::Hash(new_hash))
    }

    fn merge_yaml(&self, name: &str, key: &str, define_yaml: &Yaml, use_yaml: &Yaml) -> Result<Yaml> {
        Ok(match (define_yaml, use_yaml) {
            (Yaml::Hash(define_hash), Yaml::Hash(use_hash)) => {
                return self.merge_hash(name, define_hash, use_hash);
            }
            // transforms accumulate, the define's ones are applied first
            (Yaml::Array(define_array), Yaml::Array(use_array)) if key == "transform" => {
                let mut merged = define_array.clone();
                merged.extend(use_array.iter().cloned());
                Yaml::Array(merged)
            }
            // `add: NAME` keeps the kind the define was written with
            (Yaml::String(define_str), Yaml::String(use_str)) if use_str == name => {
                Yaml::String(define_str.clone())
            }
            (_, value) => value.clone(),
        })
    }

    fn merge_use_define(&self, name: &str, define: &Yaml, body: &Yaml) -> Result<Yaml> {
        let define_hash = define.as_hash().ok_or_else(|| invalid(name))?;
        let body_hash = body.as_hash().ok_or_else(|| invalid(name))?;
        self.merge_hash(name, define_hash, body_hash)
    }

    fn parse_define(&mut self, name: &str, extends: Option<&str>, body: &Yaml) -> Result<()> {
        let value = match extends {
            Some(base) => self.merge_use_define(name, self.define(base)?, body)?,
            None => body.clone(),
        };
        self.defines.insert(name.to_string(), value);
        Ok(())
    }

    fn parse_operation(&mut self, operation: &Yaml) -> Result<()> {
        let Yaml::Hash(hash) = operation else {
            return Err(YamlParseError::UnexpectedValue.into());
        };
        match hash.front() {
            Some((Yaml::String(name), Yaml::String(what))) => match name.as_str() {
                "add" => self.parse_add(what, operation),
                "define" => {
                    let body = field(operation, "value").ok_or_else(|| missing("value"))?;
                    self.parse_define(what, operation["extend"].as_str(), body)
                }
                other => Err(unknown_variant(other)),
            },
            Some((Yaml::String(name), Yaml::Null)) => match name.as_str() {
                "camera" => self.parse_camera(operation),
                "options" => self.parse_options(operation),
                other => Err(unknown_variant(other)),
            },
            _ => Err(YamlParseError::UnexpectedValue.into()),
        }
    }

    fn parse(&mut self, yaml: &Yaml) -> Result<()> {
        match yaml {
            Yaml::Array(operations) => operations
                .iter()
                .try_for_each(|operation| self.parse_operation(operation)),
            // a file with only comments
            Yaml::Null => Ok(()),
            _ => Err(YamlParseError::UnexpectedValue.into()),
        }
    }

    fn finish(self) -> SceneConfig {
        debug!(
            "scene file: {} root objects, {} objects in total, {} defines",
            self.world.objects().len(),
            self.world.arena().len(),
            self.defines.len()
        );
        SceneConfig {
            world: self.world,
            camera: self.camera,
            max_reflective_depth: self.max_reflective_depth,
        }
    }
}

fn str_to_yaml(source: &str) -> Result<Yaml> {
    let mut docs = Yaml::load_from_str(source)
        .map_err(|err| YamlParseError::YamlSyntaxError(err.to_string()))?;
    match docs.len() {
        0 => Ok(Yaml::Array(Vec::new())),
        1 => Ok(docs.remove(0)),
        _ => Err(YamlParseError::MultipleDocuments.into()),
    }
}

/// Parses a scene. Relative paths inside it are resolved against the directory of `input_path`,
/// or the working directory without one.
pub fn parse_str(source: &str, input_path: Option<&Path>, noise: Arc<PerlinNoise>) -> Result<SceneConfig> {
    let yaml = str_to_yaml(source)?;
    let mut parser = YamlParser::with_predefined_defines(input_path, noise)?;
    parser.parse(&yaml)?;
    Ok(parser.finish())
}

pub fn parse_file(path: &Path, noise: Arc<PerlinNoise>) -> Result<SceneConfig> {
    let source = read_file(path)?;
    parse_str(&source, Some(path), noise)
}
