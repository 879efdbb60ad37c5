use log::{debug, warn};

use crate::{
    error::{Error, Result},
    math::{point::Point, tuple::Tuple, vector::Vector},
    scene::{
        World,
        object::{Object, ObjectId, primitive::shape::Shape},
    },
};

/// Reads the subset of the Wavefront OBJ format made of `v`, `vn`, `f` and `g` records.
/// Every other line is counted and skipped.
#[derive(Debug, Default)]
pub struct ObjModelParser {
    ignored: usize,
    vertices: Vec<Point>,
    normals: Vec<Vector>,
    default_group: Vec<Shape>,
    /// named groups in order of first appearance
    groups: Vec<(String, Vec<Shape>)>,
    current_group: Option<usize>,
}

struct FaceVertex {
    vertex: usize,
    normal: Option<usize>,
}

impl ObjModelParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector] {
        &self.normals
    }

    /// Triangles outside of any `g` record.
    pub fn default_group(&self) -> &[Shape] {
        &self.default_group
    }

    pub fn group(&self, name: &str) -> Option<&[Shape]> {
        self.groups
            .iter()
            .find(|(group_name, _)| group_name == name)
            .map(|(_, shapes)| shapes.as_slice())
    }

    fn current_group_mut(&mut self) -> &mut Vec<Shape> {
        match self.current_group.and_then(|id| self.groups.get_mut(id)) {
            Some((_, shapes)) => shapes,
            None => &mut self.default_group,
        }
    }

    fn select_group(&mut self, name: &str) {
        let id = match self.groups.iter().position(|(group_name, _)| group_name == name) {
            Some(id) => id,
            None => {
                self.groups.push((name.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        self.current_group = Some(id);
    }

    /// Resolves a 1-based index, negative values count back from the last element.
    fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize> {
        let index: i64 = token.parse().map_err(|_| Error::ObjParse {
            line,
            message: format!("invalid index `{token}`"),
        })?;

        let resolved = match index {
            i if i > 0 => Some(i as usize - 1),
            i if i < 0 => len.checked_sub(i.unsigned_abs() as usize),
            _ => None,
        };
        resolved.filter(|&id| id < len).ok_or(Error::ObjParse {
            line,
            message: format!("index {index} out of range, {len} defined"),
        })
    }

    fn parse_tuple<'a>(
        iter: &mut impl Iterator<Item = &'a str>,
        line: usize,
    ) -> Result<(f64, f64, f64)> {
        let mut next = || -> Result<f64> {
            let token = iter.next().ok_or(Error::ObjParse {
                line,
                message: "expected three coordinates".to_string(),
            })?;
            token.parse().map_err(|_| Error::ObjParse {
                line,
                message: format!("invalid number `{token}`"),
            })
        };
        Ok((next()?, next()?, next()?))
    }

    fn parse_face_vertex(&self, token: &str, line: usize) -> Result<FaceVertex> {
        let mut indices = token.split('/');
        let vertex = Self::resolve_index(indices.next().unwrap_or(""), self.vertices.len(), line)?;
        // texture index is not used
        indices.next();
        let normal = match indices.next() {
            Some(normal) if !normal.is_empty() => {
                Some(Self::resolve_index(normal, self.normals.len(), line)?)
            }
            _ => None,
        };
        Ok(FaceVertex { vertex, normal })
    }

    /// Splits a polygon into a fan of triangles sharing its first vertex.
    fn face<'a>(&mut self, iter: impl Iterator<Item = &'a str>, line: usize) -> Result<()> {
        let face = iter
            .map(|token| self.parse_face_vertex(token, line))
            .collect::<Result<Vec<_>>>()?;

        if face.len() < 3 {
            return Err(Error::ObjParse {
                line,
                message: format!("face needs at least 3 vertices, got {}", face.len()),
            });
        }

        let normals: Option<Vec<Vector>> = face
            .iter()
            .map(|v| v.normal.map(|id| self.normals[id]))
            .collect();
        let points: Vec<Point> = face.iter().map(|v| self.vertices[v.vertex]).collect();

        let triangles: Vec<Shape> = (1..points.len() - 1)
            .map(|i| match &normals {
                Some(n) => Shape::smooth_triangle(
                    points[0],
                    points[i],
                    points[i + 1],
                    n[0],
                    n[i],
                    n[i + 1],
                ),
                None => Shape::triangle(points[0], points[i], points[i + 1]),
            })
            .collect();
        self.current_group_mut().extend(triangles);
        Ok(())
    }

    fn parse_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        if line.starts_with('#') || line.is_empty() {
            return Ok(());
        }

        let mut iter = line.split_whitespace();
        match iter.next() {
            Some("v") => {
                let (x, y, z) = Self::parse_tuple(&mut iter, line_number)?;
                self.vertices.push(Point::new(x, y, z));
            }
            Some("vn") => {
                let (x, y, z) = Self::parse_tuple(&mut iter, line_number)?;
                self.normals.push(Vector::new(x, y, z));
            }
            Some("f") => self.face(iter, line_number)?,
            Some("g") => match iter.next() {
                Some(name) => self.select_group(name),
                None => {
                    return Err(Error::ObjParse {
                        line: line_number,
                        message: "group without a name".to_string(),
                    });
                }
            },
            _ => self.ignored += 1,
        }
        Ok(())
    }

    pub fn parse_str(&mut self, source: &str) -> Result<()> {
        source
            .lines()
            .enumerate()
            .try_for_each(|(id, line)| self.parse_line(line.trim(), id + 1))?;

        if self.ignored > 0 {
            warn!("obj model: ignored {} unrecognized lines", self.ignored);
        }
        debug!(
            "obj model: {} vertices, {} normals, {} named groups",
            self.vertices.len(),
            self.normals.len(),
            self.groups.len()
        );
        Ok(())
    }

    /// Stores the parsed model in the world as a detached group: the default group's
    /// triangles first, then one subgroup per named group.
    pub fn into_object(self, world: &mut World) -> Result<ObjectId> {
        let root = world.insert_detached(Object::group());
        for shape in self.default_group {
            world.add_child(root, Object::primitive_with_shape(shape))?;
        }

        for (name, shapes) in self.groups {
            if shapes.is_empty() {
                warn!("obj model: group `{name}` has no faces");
                continue;
            }
            let group = world.insert_detached(Object::group());
            for shape in shapes {
                world.add_child(group, Object::primitive_with_shape(shape))?;
            }
            world.attach_child(root, group)?;
        }
        Ok(root)
    }

    pub fn parse_to_object(source: &str, world: &mut World) -> Result<ObjectId> {
        let mut parser = Self::new();
        parser.parse_str(source)?;
        parser.into_object(world)
    }
}
