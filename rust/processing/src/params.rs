// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutout parameters: defaults, environment and JSON loading, validation.

use serde::{Deserialize, Serialize};
use tabcut_geometry::GapPattern;

use crate::error::{CutoutError, Result};

/// Gap pattern as supplied by a caller: a name (`"2lr"`, `"4"`) or a count
/// (`4`, `8`). Normalized to [`GapPattern`] by [`CutoutParams::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GapsValue {
    Count(u32),
    Name(String),
}

impl GapsValue {
    pub fn to_pattern(&self) -> Result<GapPattern> {
        match self {
            Self::Count(count) => GapPattern::try_from(*count)
                .map_err(|_| CutoutError::InvalidPattern(count.to_string())),
            Self::Name(name) => name
                .parse()
                .map_err(|_| CutoutError::InvalidPattern(name.clone())),
        }
    }
}

impl Default for GapsValue {
    fn default() -> Self {
        Self::Name(GapPattern::default().as_str().to_string())
    }
}

impl From<GapPattern> for GapsValue {
    fn from(pattern: GapPattern) -> Self {
        Self::Name(pattern.as_str().to_string())
    }
}

impl From<&str> for GapsValue {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Parameters accepted by the cutout pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoutParams {
    /// Cutting tool diameter
    pub tool_diameter: f64,
    /// Margin added to the bounding-box reference lines
    pub margin: f64,
    /// Width of each bridge left in the outline
    pub gap_size: f64,
    /// Bridge layout
    pub gaps: GapsValue,
}

impl Default for CutoutParams {
    fn default() -> Self {
        Self {
            tool_diameter: 0.1,
            margin: 0.001,
            gap_size: 0.1,
            gaps: GapsValue::default(),
        }
    }
}

impl CutoutParams {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load parameters from environment variables, falling back to defaults.
    ///
    /// Reads `TABCUT_TOOL_DIAMETER`, `TABCUT_MARGIN`, `TABCUT_GAP_SIZE` and
    /// `TABCUT_GAPS`. Values that fail to parse keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tool_diameter: std::env::var("TABCUT_TOOL_DIAMETER")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.tool_diameter),
            margin: std::env::var("TABCUT_MARGIN")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.margin),
            gap_size: std::env::var("TABCUT_GAP_SIZE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.gap_size),
            gaps: std::env::var("TABCUT_GAPS")
                .map(|v| GapsValue::Name(v.trim().to_string()))
                .unwrap_or(defaults.gaps),
        }
    }

    /// Parse parameters from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Sets the tool diameter.
    pub fn with_tool_diameter(mut self, diameter: f64) -> Self {
        self.tool_diameter = diameter;
        self
    }

    /// Sets the margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the gap size.
    pub fn with_gap_size(mut self, gap_size: f64) -> Self {
        self.gap_size = gap_size;
        self
    }

    /// Sets the gap pattern.
    pub fn with_gaps(mut self, gaps: impl Into<GapsValue>) -> Self {
        self.gaps = gaps.into();
        self
    }

    /// Check every parameter and normalize the pattern.
    pub fn validate(&self) -> Result<ValidatedParams> {
        if !(self.tool_diameter > 0.0 && self.tool_diameter.is_finite()) {
            return Err(CutoutError::InvalidToolDiameter(self.tool_diameter));
        }
        if !(self.gap_size >= 0.0 && self.gap_size.is_finite()) {
            return Err(CutoutError::InvalidGapSize(self.gap_size));
        }
        if !self.margin.is_finite() {
            return Err(CutoutError::InvalidMargin(self.margin));
        }
        let pattern = self.gaps.to_pattern()?;

        Ok(ValidatedParams {
            tool_radius: self.tool_diameter / 2.0,
            gap_half_width: self.gap_size / 2.0,
            margin: self.margin,
            pattern,
        })
    }
}

/// Parameters after validation, in the form the planner consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedParams {
    pub tool_radius: f64,
    pub gap_half_width: f64,
    pub margin: f64,
    pub pattern: GapPattern,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = CutoutParams::default();
        assert_eq!(params.tool_diameter, 0.1);
        assert_eq!(params.margin, 0.001);
        assert_eq!(params.gap_size, 0.1);
        assert_eq!(params.gaps.to_pattern().unwrap(), GapPattern::Four);
    }

    #[test]
    fn test_builder() {
        let params = CutoutParams::new()
            .with_tool_diameter(3.0)
            .with_gap_size(0.6)
            .with_margin(0.0)
            .with_gaps(GapPattern::TwoTb);

        let validated = params.validate().unwrap();
        assert_eq!(validated.tool_radius, 1.5);
        assert_eq!(validated.gap_half_width, 0.3);
        assert_eq!(validated.pattern, GapPattern::TwoTb);
    }

    #[test]
    fn test_string_and_count_patterns_agree() {
        assert_eq!(
            GapsValue::Count(8).to_pattern().unwrap(),
            GapsValue::from("8").to_pattern().unwrap()
        );
        assert!(matches!(
            GapsValue::Count(3).to_pattern(),
            Err(CutoutError::InvalidPattern(value)) if value == "3"
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = CutoutParams::new().with_tool_diameter(0.0);
        assert_eq!(zero.validate(), Err(CutoutError::InvalidToolDiameter(0.0)));

        let negative = CutoutParams::new().with_tool_diameter(-1.0);
        assert!(matches!(
            negative.validate(),
            Err(CutoutError::InvalidToolDiameter(_))
        ));

        let nan = CutoutParams::new().with_tool_diameter(f64::NAN);
        assert!(matches!(nan.validate(), Err(CutoutError::InvalidToolDiameter(_))));

        let gap = CutoutParams::new().with_gap_size(-0.5);
        assert_eq!(gap.validate(), Err(CutoutError::InvalidGapSize(-0.5)));

        let margin = CutoutParams::new().with_margin(f64::INFINITY);
        assert!(matches!(margin.validate(), Err(CutoutError::InvalidMargin(_))));

        let pattern = CutoutParams::new().with_gaps("xyz");
        assert_eq!(
            pattern.validate(),
            Err(CutoutError::InvalidPattern("xyz".into()))
        );
    }

    #[test]
    fn test_diameter_checked_before_pattern() {
        let params = CutoutParams::new().with_tool_diameter(0.0).with_gaps("xyz");
        assert_eq!(params.validate(), Err(CutoutError::InvalidToolDiameter(0.0)));
    }

    #[test]
    fn test_from_json() {
        let params = CutoutParams::from_json(r#"{"tool_diameter": 3.0, "gaps": 8}"#).unwrap();
        assert_eq!(params.tool_diameter, 3.0);
        assert_eq!(params.margin, 0.001);
        assert_eq!(params.gaps, GapsValue::Count(8));

        let named = CutoutParams::from_json(r#"{"gaps": "2lr"}"#).unwrap();
        assert_eq!(named.gaps.to_pattern().unwrap(), GapPattern::TwoLr);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("TABCUT_TOOL_DIAMETER", "2.5");
        std::env::set_var("TABCUT_GAPS", " tb ");
        std::env::set_var("TABCUT_MARGIN", "not-a-number");
        let params = CutoutParams::from_env();
        std::env::remove_var("TABCUT_TOOL_DIAMETER");
        std::env::remove_var("TABCUT_GAPS");
        std::env::remove_var("TABCUT_MARGIN");

        assert_eq!(params.tool_diameter, 2.5);
        assert_eq!(params.margin, 0.001);
        assert_eq!(params.gaps.to_pattern().unwrap(), GapPattern::Tb);
    }
}
