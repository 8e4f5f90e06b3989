// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outline data model: primitives, rings with holes, nested collections
//! and axis-aligned bounds.

use std::fmt;

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Epsilon used to compare coordinates
pub const EPSILON_2D: f64 = 1e-9;

/// A closed ring with zero or more holes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon2D {
    /// Exterior boundary
    pub exterior: Vec<Point2<f64>>,
    /// Interior boundaries (holes)
    pub interiors: Vec<Vec<Point2<f64>>>,
}

impl Polygon2D {
    /// Create a polygon without holes
    pub fn new(exterior: Vec<Point2<f64>>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Create a polygon with holes
    pub fn with_holes(exterior: Vec<Point2<f64>>, interiors: Vec<Vec<Point2<f64>>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Add a hole to the polygon
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.interiors.push(hole);
    }

    /// Axis-aligned rectangle, counter-clockwise, closed
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
            Point2::new(x0, y0),
        ])
    }
}

/// A leaf of an outline.
///
/// Only `Path` and `Ring` are linear elements a tab zone can be cut from.
/// `Area` and `Point` travel through flattening untouched and are rejected
/// by the cutter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    /// Open polyline
    Path(Vec<Point2<f64>>),
    /// Closed polyline (first == last, or closed implicitly)
    Ring(Vec<Point2<f64>>),
    /// Filled area kept whole
    Area(Polygon2D),
    /// Isolated point
    Point(Point2<f64>),
}

impl Primitive {
    /// True for paths and rings
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Path(_) | Self::Ring(_))
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Path(_) => PrimitiveKind::Path,
            Self::Ring(_) => PrimitiveKind::Ring,
            Self::Area(_) => PrimitiveKind::Area,
            Self::Point(_) => PrimitiveKind::Point,
        }
    }

    /// Vertices of the primitive (exterior ring for areas)
    pub fn points(&self) -> &[Point2<f64>] {
        match self {
            Self::Path(points) | Self::Ring(points) => points,
            Self::Area(polygon) => &polygon.exterior,
            Self::Point(point) => std::slice::from_ref(point),
        }
    }

    /// Bounds of the primitive, `None` when it has no vertices
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::of_points(self.points())
    }
}

/// Discriminant of [`Primitive`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveKind {
    Path,
    Ring,
    Area,
    Point,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Path => "path",
            Self::Ring => "ring",
            Self::Area => "filled area",
            Self::Point => "point",
        };
        f.write_str(name)
    }
}

/// Nested outline supplied by a caller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outline {
    /// Ordered members; `None` marks an absent member
    Collection(Vec<Option<Outline>>),
    /// Ring with holes
    Polygon(Polygon2D),
    /// Single leaf
    Primitive(Primitive),
}

impl Outline {
    /// Empty collection
    pub fn empty() -> Self {
        Self::Collection(Vec::new())
    }

    /// Collection with every member present
    pub fn collection(members: impl IntoIterator<Item = Outline>) -> Self {
        Self::Collection(members.into_iter().map(Some).collect())
    }

    /// Open path leaf
    pub fn path(points: Vec<Point2<f64>>) -> Self {
        Self::Primitive(Primitive::Path(points))
    }

    /// Closed ring leaf
    pub fn ring(points: Vec<Point2<f64>>) -> Self {
        Self::Primitive(Primitive::Ring(points))
    }

    /// Bounds of every vertex in the outline
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::of_outline(self)
    }
}

impl From<Primitive> for Outline {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<Polygon2D> for Outline {
    fn from(polygon: Polygon2D) -> Self {
        Self::Polygon(polygon)
    }
}

impl From<Vec<Primitive>> for Outline {
    fn from(primitives: Vec<Primitive>) -> Self {
        Self::Collection(
            primitives
                .into_iter()
                .map(|p| Some(Outline::Primitive(p)))
                .collect(),
        )
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Bounds of a point list, `None` when empty
    pub fn of_points(points: &[Point2<f64>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for p in rest {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Bounds of a primitive sequence, `None` when it has no vertices
    pub fn of_primitives<'a>(primitives: impl IntoIterator<Item = &'a Primitive>) -> Option<Self> {
        primitives
            .into_iter()
            .filter_map(Primitive::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Bounds of a nested outline, `None` when it has no vertices
    pub fn of_outline(outline: &Outline) -> Option<Self> {
        match outline {
            Outline::Collection(members) => members
                .iter()
                .flatten()
                .filter_map(Self::of_outline)
                .reduce(|a, b| a.union(&b)),
            // Holes lie inside the exterior
            Outline::Polygon(polygon) => Self::of_points(&polygon.exterior),
            Outline::Primitive(primitive) => primitive.bounds(),
        }
    }

    /// Grow to contain a point
    pub fn include(&mut self, p: &Point2<f64>) {
        self.xmin = self.xmin.min(p.x);
        self.ymin = self.ymin.min(p.y);
        self.xmax = self.xmax.max(p.x);
        self.ymax = self.ymax.max(p.y);
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.xmin.min(other.xmin),
            self.ymin.min(other.ymin),
            self.xmax.max(other.xmax),
            self.ymax.max(other.ymax),
        )
    }

    /// Closed-interval overlap test
    pub fn overlaps(&self, other: &Self) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(0.5 * (self.xmin + self.xmax), 0.5 * (self.ymin + self.ymax))
    }
}
