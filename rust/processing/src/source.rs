// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutout sources and the registry they are resolved from.
//!
//! A source either carries its outline directly (`Solid`) or knows how to
//! derive one for a given tool radius (`Derived`, e.g. the isolation boundary
//! of a copper layer). Registration of results and the derivation algorithm
//! itself belong to the caller.

use std::fmt;

use anyhow::anyhow;
use rustc_hash::FxHashMap;
use tabcut_geometry::{BoundingBox, Outline};

/// Produces an outline for a tool radius
pub trait BoundaryDeriver: Send + Sync {
    fn derive_boundary(&self, tool_radius: f64) -> anyhow::Result<Outline>;
}

impl<F> BoundaryDeriver for F
where
    F: Fn(f64) -> anyhow::Result<Outline> + Send + Sync,
{
    fn derive_boundary(&self, tool_radius: f64) -> anyhow::Result<Outline> {
        self(tool_radius)
    }
}

/// What a source provides to cut from
pub enum SourceKind {
    /// Outline used as-is
    Solid(Outline),
    /// Outline computed on demand
    Derived(Box<dyn BoundaryDeriver>),
    /// Any other object kind, by label
    Unsupported(String),
}

impl SourceKind {
    pub fn label(&self) -> &str {
        match self {
            Self::Solid(_) => "geometry",
            Self::Derived(_) => "derived",
            Self::Unsupported(label) => label,
        }
    }
}

impl fmt::Debug for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(outline) => f.debug_tuple("Solid").field(outline).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
            Self::Unsupported(label) => f.debug_tuple("Unsupported").field(label).finish(),
        }
    }
}

/// A named object a cutout can be made from
#[derive(Debug)]
pub struct SourceObject {
    name: String,
    bounds: Option<BoundingBox>,
    kind: SourceKind,
}

impl SourceObject {
    /// Source with an explicit outline; bounds are taken from the outline
    pub fn solid(name: impl Into<String>, outline: Outline) -> Self {
        Self {
            name: name.into(),
            bounds: outline.bounds(),
            kind: SourceKind::Solid(outline),
        }
    }

    /// Source whose outline is derived on demand; bounds come from the object
    pub fn derived(
        name: impl Into<String>,
        bounds: BoundingBox,
        deriver: impl BoundaryDeriver + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            bounds: Some(bounds),
            kind: SourceKind::Derived(Box::new(deriver)),
        }
    }

    /// Object of a kind the pipeline cannot cut
    pub fn unsupported(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: None,
            kind: SourceKind::Unsupported(label.into()),
        }
    }

    /// Override the reported bounds
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }
}

/// Resolves source objects by name
pub trait SourceRegistry {
    fn resolve(&self, name: &str) -> anyhow::Result<&SourceObject>;
}

/// Hash-map backed registry
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    objects: FxHashMap<String, SourceObject>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object, returning any object it replaced
    pub fn insert(&mut self, object: SourceObject) -> Option<SourceObject> {
        self.objects.insert(object.name.clone(), object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SourceRegistry for InMemoryRegistry {
    fn resolve(&self, name: &str) -> anyhow::Result<&SourceObject> {
        self.objects
            .get(name)
            .ok_or_else(|| anyhow!("no object named `{name}`"))
    }
}
