use thiserror::Error;

use crate::scene::{io::yaml::YamlParseError, object::ObjectId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("non-invertible matrix")]
    NonInvertibleMatrix,
    #[error("pixel ({x}, {y}) out of bounds for a {width}x{height} canvas")]
    PixelOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("intersection {index} out of range for {len} intersections")]
    IntersectionOutOfRange { index: usize, len: usize },
    #[error("illegal normal query on a composite object")]
    IllegalGroupNormal,
    #[error("smooth triangle normal requires the barycentric coordinates of the hit")]
    MissingBarycentric,
    #[error("object {0:?} is not a group")]
    NotAComposite(ObjectId),
    #[error("object {0:?} does not exist")]
    UnknownObject(ObjectId),
    #[error("object {0:?} already has a parent")]
    AlreadyParented(ObjectId),
    #[error("object would become its own ancestor")]
    CyclicHierarchy,
    #[error("obj parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },
    #[error("scene file: {0}")]
    Yaml(#[from] YamlParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    PngEncoding(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, Error>;
