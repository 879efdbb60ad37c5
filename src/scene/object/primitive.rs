pub mod cone;
pub mod cube;
pub mod cylinder;
pub mod plane;
pub mod shape;
pub mod smooth_triangle;
pub mod sphere;
pub mod triangle;
