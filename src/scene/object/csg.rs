use std::str::FromStr;

use super::{ObjectArena, ObjectId};
use crate::render::intersection::{Intersection, sort_by_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRight {
    Left,
    Right,
}

/// Where a candidate intersection lies: which operand it belongs to,
/// and whether the ray is inside each operand just before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsgIntersectionLocation {
    pub hit: LeftRight,
    pub inside_left: bool,
    pub inside_right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOperation {
    Union,
    Intersection,
    Difference,
}

impl FromStr for CsgOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "union" => Ok(CsgOperation::Union),
            "intersection" => Ok(CsgOperation::Intersection),
            "difference" => Ok(CsgOperation::Difference),
            _ => Err(format!("Invalid CSG operation: {}", s)),
        }
    }
}

// indexed by [hit is left][inside left][inside right]
type TruthTable = [[[bool; 2]; 2]; 2];

const UNION: TruthTable = [
    // hit right: kept when outside left
    [[true, true], [false, false]],
    // hit left: kept when outside right
    [[true, false], [true, false]],
];

const INTERSECTION: TruthTable = [
    // hit right: kept when inside left
    [[false, false], [true, true]],
    // hit left: kept when inside right
    [[false, true], [false, true]],
];

const DIFFERENCE: TruthTable = [
    // hit right: kept when inside left
    [[false, false], [true, true]],
    // hit left: kept when outside right
    [[true, false], [true, false]],
];

impl CsgOperation {
    fn truth_table(&self) -> &'static TruthTable {
        match self {
            CsgOperation::Union => &UNION,
            CsgOperation::Intersection => &INTERSECTION,
            CsgOperation::Difference => &DIFFERENCE,
        }
    }

    pub fn is_intersection_allowed(&self, location: CsgIntersectionLocation) -> bool {
        let hit_left = location.hit == LeftRight::Left;
        self.truth_table()[hit_left as usize][location.inside_left as usize]
            [location.inside_right as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsgObject {
    operation: CsgOperation,
    left: ObjectId,
    right: ObjectId,
}

impl CsgObject {
    pub(super) fn new(operation: CsgOperation, left: ObjectId, right: ObjectId) -> Self {
        Self {
            operation,
            left,
            right,
        }
    }

    pub fn operation(&self) -> CsgOperation {
        self.operation
    }

    pub fn left(&self) -> ObjectId {
        self.left
    }

    pub fn right(&self) -> ObjectId {
        self.right
    }

    /// Keeps only the intersections on the surface of the combined solid.
    /// Intersections belonging to neither operand are treated as right hits.
    pub fn filter_intersections(
        &self,
        arena: &ObjectArena,
        mut xs: Vec<Intersection>,
    ) -> Vec<Intersection> {
        sort_by_time(&mut xs);

        let mut inside_left = false;
        let mut inside_right = false;
        xs.retain(|i| {
            let hit = if arena.includes(self.left, i.object()) {
                LeftRight::Left
            } else {
                LeftRight::Right
            };
            let allowed = self.operation.is_intersection_allowed(CsgIntersectionLocation {
                hit,
                inside_left,
                inside_right,
            });

            match hit {
                LeftRight::Left => inside_left = !inside_left,
                LeftRight::Right => inside_right = !inside_right,
            }
            allowed
        });
        xs
    }
}
