use crate::{
    error::Result,
    math::{matrix::Matrix, point::Point, tuple::Tuple},
    render::{canvas::Canvas, ray::Ray},
};

// camera looks toward -z direction from point zero
// this makes +x to be on the left
#[derive(PartialEq, Debug, Clone)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,
    transformation: Matrix,
    inverse_transformation: Matrix,

    pixel_size: f64,
    half_width: f64,
    half_height: f64,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Self {
        let half_view = (field_of_view / 2.).tan();
        let aspect = hsize as f64 / vsize.max(1) as f64;

        let (half_width, half_height) = match aspect >= 1. {
            true => (half_view, half_view / aspect),
            false => (half_view * aspect, half_view),
        };

        let pixel_size = 2. * half_width / hsize.max(1) as f64;

        Self {
            hsize,
            vsize,
            field_of_view,
            transformation: Matrix::identity(),
            inverse_transformation: Matrix::identity(),

            pixel_size,
            half_width,
            half_height,
        }
    }

    pub fn with_transformation(
        hsize: usize,
        vsize: usize,
        field_of_view: f64,
        transformation: Matrix,
    ) -> Result<Self> {
        let mut camera = Self::new(hsize, vsize, field_of_view);
        camera.set_transformation(transformation)?;
        Ok(camera)
    }

    pub fn set_transformation(&mut self, transformation: Matrix) -> Result<()> {
        self.inverse_transformation = transformation.inverse()?;
        self.transformation = transformation;
        Ok(())
    }

    /// Ray from the camera through the center of the given pixel, in world space.
    pub fn ray_for_pixel(&self, x: usize, y: usize) -> Ray {
        let x_offset = (x as f64 + 0.5) * self.pixel_size;
        let y_offset = (y as f64 + 0.5) * self.pixel_size;

        let scene_x = self.half_width - x_offset;
        let scene_y = self.half_height - y_offset;

        let pixel = self.inverse_transformation * Point::new(scene_x, scene_y, -1.);
        let origin = self.inverse_transformation * Point::zero();
        let direction = pixel - origin;

        Ray::new(origin, direction.normalize())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.hsize, self.vsize)
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transformation(&self) -> Matrix {
        self.transformation
    }

    pub fn inverse_transformation(&self) -> Matrix {
        self.inverse_transformation
    }
}
