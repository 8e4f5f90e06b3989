// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Board cutout pipeline built on `tabcut-geometry`.
//!
//! Resolves a source object, validates the cutout parameters, cuts the
//! planned tab zones out of the source outline and returns the result with
//! the source's bounding box. Registering the result and showing the status
//! are left to the caller.
//!
//! ```
//! use tabcut_geometry::{Outline, Polygon2D};
//! use tabcut_processing::{CutoutParams, CutoutPipeline, SourceObject};
//!
//! let board = SourceObject::solid("board", Outline::Polygon(Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0)));
//! let pipeline = CutoutPipeline::new(CutoutParams::new().with_tool_diameter(2.0).with_gaps("lr"));
//! let result = pipeline.run(&board).unwrap();
//! assert_eq!(result.primitives().len(), 2);
//! ```

pub mod error;
pub mod notify;
pub mod params;
pub mod pipeline;
pub mod source;

pub use error::{CutoutError, Result};
pub use notify::{Notification, NotifyLevel};
pub use params::{CutoutParams, GapsValue, ValidatedParams};
pub use pipeline::{CutoutPipeline, CutoutResult, ZoneWarning};
pub use source::{BoundaryDeriver, InMemoryRegistry, SourceKind, SourceObject, SourceRegistry};
