// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutout pipeline errors.

use thiserror::Error;

/// Result type for cutout operations
pub type Result<T> = std::result::Result<T, CutoutError>;

/// Fatal conditions. Any of these aborts the pipeline before a result exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CutoutError {
    #[error("The name of the object for which cutout is done is missing")]
    MissingSource,

    #[error("Could not retrieve object `{name}`: {cause}")]
    SourceNotFound { name: String, cause: String },

    #[error("Tool diameter must be a positive real number, got {0}")]
    InvalidToolDiameter(f64),

    #[error("Gap size must be a non-negative real number, got {0}")]
    InvalidGapSize(f64),

    #[error("Margin must be a finite number, got {0}")]
    InvalidMargin(f64),

    #[error("Gaps value `{0}` is not one of: lr, tb, 2lr, 2tb, 4, 8")]
    InvalidPattern(String),

    #[error("Object `{name}` is a {kind} object; cutout supports geometry and derivable outlines only")]
    UnsupportedSourceKind { name: String, kind: String },

    #[error("Object `{0}` has no geometry to take bounds from")]
    EmptySource(String),

    #[error("Could not derive the boundary of `{name}`: {cause}")]
    BoundaryDerivationFailed { name: String, cause: String },

    #[error("Geometry error: {0}")]
    Geometry(#[from] tabcut_geometry::Error),
}

impl CutoutError {
    /// True for errors caused by caller-supplied parameters
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MissingSource
                | Self::InvalidToolDiameter(_)
                | Self::InvalidGapSize(_)
                | Self::InvalidMargin(_)
                | Self::InvalidPattern(_)
        )
    }
}
