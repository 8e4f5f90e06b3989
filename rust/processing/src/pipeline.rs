// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutout pipeline
//!
//! Validates parameters, picks the initial outline for the source kind,
//! plans the tab zones once from the source bounds and subtracts them one
//! after another. The working outline is re-flattened before every zone
//! because a cut ring comes back as several separate paths.
//!
//! Nothing is returned unless every step succeeds; the bounding box attached
//! to the result is always the source's, not the notched outline's.

use serde::Serialize;
use std::fmt;
use tabcut_geometry::{
    flatten, merge_primitives, plan_zones, subtract_zone, BoundingBox, CutWarning, Outline,
    Primitive, TabZone,
};

use crate::error::{CutoutError, Result};
use crate::params::CutoutParams;
use crate::source::{SourceKind, SourceObject, SourceRegistry};

/// Suffix appended to the source name for the published result
pub const RESULT_SUFFIX: &str = "_cutout";

/// Non-fatal warning tagged with the zone that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneWarning {
    /// Index into [`CutoutResult::zones`]
    pub zone: usize,
    pub warning: CutWarning,
}

impl fmt::Display for ZoneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}: {}", self.zone, self.warning)
    }
}

/// Geometry and metadata ready to be registered by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoutResult {
    /// Name to register the result under
    pub name: String,
    pub geometry: Outline,
    /// Bounds of the source object
    pub bbox: BoundingBox,
    /// Zones removed, in application order
    pub zones: Vec<TabZone>,
    pub warnings: Vec<ZoneWarning>,
}

impl CutoutResult {
    /// Flat list of the resulting primitives
    pub fn primitives(&self) -> Vec<Primitive> {
        flatten(&self.geometry)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Runs board cutouts with one parameter set
#[derive(Debug, Clone, Default)]
pub struct CutoutPipeline {
    params: CutoutParams,
}

impl CutoutPipeline {
    pub fn new(params: CutoutParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CutoutParams {
        &self.params
    }

    /// Resolve `name` in `registry` and cut it
    pub fn run_named<R>(&self, registry: &R, name: Option<&str>) -> Result<CutoutResult>
    where
        R: SourceRegistry + ?Sized,
    {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(CutoutError::MissingSource)?;

        let source = registry.resolve(name).map_err(|err| {
            tracing::debug!(name, error = %err, "Source lookup failed");
            CutoutError::SourceNotFound {
                name: name.to_string(),
                cause: format!("{err:#}"),
            }
        })?;

        self.run(source)
    }

    /// Cut tabs into `source`
    pub fn run(&self, source: &SourceObject) -> Result<CutoutResult> {
        let params = self.params.validate()?;

        let initial = match source.kind() {
            SourceKind::Solid(outline) => outline.clone(),
            SourceKind::Derived(deriver) => deriver
                .derive_boundary(params.tool_radius)
                .map_err(|err| {
                    tracing::debug!(source = source.name(), error = %err, "Boundary derivation failed");
                    CutoutError::BoundaryDerivationFailed {
                        name: source.name().to_string(),
                        cause: format!("{err:#}"),
                    }
                })?,
            SourceKind::Unsupported(kind) => {
                return Err(CutoutError::UnsupportedSourceKind {
                    name: source.name().to_string(),
                    kind: kind.clone(),
                });
            }
        };

        let bbox = source
            .bounds()
            .ok_or_else(|| CutoutError::EmptySource(source.name().to_string()))?;

        tracing::info!(
            source = source.name(),
            kind = source.kind().label(),
            pattern = %params.pattern,
            tool_radius = params.tool_radius,
            "Starting cutout"
        );

        let zones = plan_zones(
            &bbox,
            params.margin,
            params.tool_radius,
            params.gap_half_width,
            params.pattern,
        )?;

        let mut warnings = Vec::new();
        let cut = zones
            .iter()
            .enumerate()
            .fold(initial, |geometry, (index, zone)| {
                let flat = flatten(&geometry);
                let outcome = subtract_zone(&flat, zone);
                tracing::debug!(
                    zone = index,
                    input = flat.len(),
                    output = outcome.primitives.len(),
                    "Applied tab zone"
                );
                warnings.extend(
                    outcome
                        .warnings
                        .into_iter()
                        .map(|warning| ZoneWarning { zone: index, warning }),
                );
                Outline::from(outcome.primitives)
            });

        let geometry = merge_primitives(flatten(&cut));

        tracing::info!(
            source = source.name(),
            zones = zones.len(),
            warnings = warnings.len(),
            "Cutout finished"
        );

        Ok(CutoutResult {
            name: format!("{}{}", source.name(), RESULT_SUFFIX),
            geometry,
            bbox,
            zones: zones.to_vec(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryRegistry;
    use tabcut_geometry::Polygon2D;

    fn board_source() -> SourceObject {
        SourceObject::solid(
            "board",
            Outline::Polygon(Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0)),
        )
    }

    #[test]
    fn test_result_named_after_source() {
        let result = CutoutPipeline::default().run(&board_source()).unwrap();
        assert_eq!(result.name, "board_cutout");
        assert_eq!(result.zones.len(), 2);
    }

    #[test]
    fn test_missing_name() {
        let registry = InMemoryRegistry::new();
        let pipeline = CutoutPipeline::default();
        assert_eq!(
            pipeline.run_named(&registry, None),
            Err(CutoutError::MissingSource)
        );
        assert_eq!(
            pipeline.run_named(&registry, Some("  ")),
            Err(CutoutError::MissingSource)
        );
    }

    #[test]
    fn test_unknown_name() {
        let registry = InMemoryRegistry::new();
        let err = CutoutPipeline::default()
            .run_named(&registry, Some("ghost"))
            .unwrap_err();
        assert!(matches!(err, CutoutError::SourceNotFound { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_unsupported_kind() {
        let source = SourceObject::unsupported("drills", "excellon");
        let err = CutoutPipeline::default().run(&source).unwrap_err();
        assert_eq!(
            err,
            CutoutError::UnsupportedSourceKind {
                name: "drills".into(),
                kind: "excellon".into()
            }
        );
    }

    #[test]
    fn test_empty_solid_source() {
        let source = SourceObject::solid("blank", Outline::empty());
        let err = CutoutPipeline::default().run(&source).unwrap_err();
        assert_eq!(err, CutoutError::EmptySource("blank".into()));
    }

    #[test]
    fn test_validation_precedes_kind_check() {
        let source = SourceObject::unsupported("drills", "excellon");
        let pipeline = CutoutPipeline::new(CutoutParams::new().with_gaps("xyz"));
        assert_eq!(
            pipeline.run(&source),
            Err(CutoutError::InvalidPattern("xyz".into()))
        );
    }

    #[test]
    fn test_derived_source_receives_tool_radius() {
        let source = SourceObject::derived(
            "copper",
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            |radius: f64| -> anyhow::Result<Outline> {
                anyhow::ensure!((radius - 1.0).abs() < 1e-12, "unexpected radius {radius}");
                Ok(Outline::Polygon(Polygon2D::rectangle(
                    -radius,
                    -radius,
                    10.0 + radius,
                    10.0 + radius,
                )))
            },
        );
        let pipeline = CutoutPipeline::new(CutoutParams::new().with_tool_diameter(2.0));
        let result = pipeline.run(&source).unwrap();
        assert_eq!(result.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(!result.primitives().is_empty());
    }

    #[test]
    fn test_result_serializes() {
        let result = CutoutPipeline::default().run(&board_source()).unwrap();
        let json = result.to_json().unwrap();
        assert!(json.contains("\"name\":\"board_cutout\""));
        assert!(json.contains("\"bbox\""));
    }

    #[test]
    fn test_zone_warning_display() {
        let warning = ZoneWarning {
            zone: 1,
            warning: CutWarning::UnsupportedPrimitive {
                index: 3,
                kind: tabcut_geometry::PrimitiveKind::Point,
            },
        };
        assert!(warning.to_string().starts_with("zone 1: element 3 is a point"));
    }
}
