// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outline flattening
//!
//! Walks a nested [`Outline`] depth-first and produces the ordered sequence of
//! leaves the cutter works on. Rings with holes are exploded into their
//! exterior ring followed by each hole, unless the caller asks to keep them
//! whole as filled areas.

use crate::outline::{Outline, Polygon2D, Primitive};

/// Flattening switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Expand rings with holes into `Ring` primitives. When unset they are
    /// emitted as `Primitive::Area`.
    pub explode_polygons: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            explode_polygons: true,
        }
    }
}

/// Flatten an outline into linear elements, exploding rings with holes
pub fn flatten(outline: &Outline) -> Vec<Primitive> {
    flatten_with(outline, FlattenOptions::default())
}

/// Flatten an outline with explicit options
pub fn flatten_with(outline: &Outline, options: FlattenOptions) -> Vec<Primitive> {
    let mut out = Vec::new();
    collect(outline, options, &mut out);
    out
}

/// Flatten a sequence of outlines, concatenating results in order
pub fn flatten_all<'a>(outlines: impl IntoIterator<Item = &'a Outline>) -> Vec<Primitive> {
    outlines.into_iter().flat_map(flatten).collect()
}

fn collect(outline: &Outline, options: FlattenOptions, out: &mut Vec<Primitive>) {
    match outline {
        Outline::Collection(members) => {
            for member in members.iter().flatten() {
                collect(member, options, out);
            }
        }
        Outline::Polygon(polygon) if options.explode_polygons => explode(polygon, out),
        Outline::Polygon(polygon) => out.push(Primitive::Area(polygon.clone())),
        Outline::Primitive(primitive) => out.push(primitive.clone()),
    }
}

fn explode(polygon: &Polygon2D, out: &mut Vec<Primitive>) {
    out.reserve(1 + polygon.interiors.len());
    out.push(Primitive::Ring(polygon.exterior.clone()));
    out.extend(polygon.interiors.iter().cloned().map(Primitive::Ring));
}
