// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tab layout planning
//!
//! A tab is left wherever the outline is interrupted. Each interruption is
//! produced by removing the part of the outline that falls inside a
//! rectangular [`TabZone`]. Zones are long bands that cross the whole part,
//! either horizontally (breaking the left and right sides) or vertically
//! (breaking the top and bottom sides).
//!
//! The band half-width is `gap / 2 + tool_radius`: the tool path stops one
//! tool radius before the bridge so the milled edge lands exactly on the
//! requested gap.

use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::outline::{BoundingBox, Polygon2D};

/// Named bridge layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GapPattern {
    /// One horizontal band: a bridge on the left and right sides
    Lr,
    /// One vertical band: a bridge on the top and bottom sides
    Tb,
    /// Two horizontal bands
    TwoLr,
    /// Two vertical bands
    TwoTb,
    /// `lr` + `tb`
    #[default]
    Four,
    /// `2lr` + `2tb`
    Eight,
}

impl GapPattern {
    pub const ALL: [GapPattern; 6] = [
        GapPattern::Lr,
        GapPattern::Tb,
        GapPattern::TwoLr,
        GapPattern::TwoTb,
        GapPattern::Four,
        GapPattern::Eight,
    ];

    /// Canonical name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lr => "lr",
            Self::Tb => "tb",
            Self::TwoLr => "2lr",
            Self::TwoTb => "2tb",
            Self::Four => "4",
            Self::Eight => "8",
        }
    }

    fn single_horizontal(&self) -> bool {
        matches!(self, Self::Lr | Self::Four)
    }

    fn single_vertical(&self) -> bool {
        matches!(self, Self::Tb | Self::Four)
    }

    fn double_horizontal(&self) -> bool {
        matches!(self, Self::TwoLr | Self::Eight)
    }

    fn double_vertical(&self) -> bool {
        matches!(self, Self::TwoTb | Self::Eight)
    }

    /// Number of zones this pattern plans
    pub fn zone_count(&self) -> usize {
        match self {
            Self::Lr | Self::Tb => 1,
            Self::TwoLr | Self::TwoTb | Self::Four => 2,
            Self::Eight => 4,
        }
    }
}

impl fmt::Display for GapPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GapPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GapPattern::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::InvalidPattern(s.to_string()))
    }
}

impl TryFrom<u32> for GapPattern {
    type Error = Error;

    fn try_from(count: u32) -> Result<Self> {
        match count {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(Error::InvalidPattern(other.to_string())),
        }
    }
}

/// Axis-aligned rectangle of outline to remove
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabZone {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TabZone {
    /// Create a zone, requiring finite corners with `x0 < x1` and `y0 < y1`
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self> {
        let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
        if !finite || x0 >= x1 || y0 >= y1 {
            return Err(Error::InvalidZone(format!(
                "({x0}, {y0}) - ({x1}, {y1}) is not a non-empty rectangle"
            )));
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Point2<f64> {
        self.bounds().center()
    }

    /// Closed containment test
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x0, self.y0, self.x1, self.y1)
    }

    /// Filled rectangle covering the zone
    pub fn to_polygon(&self) -> Polygon2D {
        Polygon2D::rectangle(self.x0, self.y0, self.x1, self.y1)
    }
}

/// Reference lines and band half-width derived from the source bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabLayout {
    bbox: BoundingBox,
    /// Vertical reference line
    pub px: f64,
    /// Horizontal reference line
    pub py: f64,
    pub len_x: f64,
    pub len_y: f64,
    /// Band half-width
    pub half_gap: f64,
}

impl TabLayout {
    pub fn new(bbox: &BoundingBox, margin: f64, tool_radius: f64, gap_half_width: f64) -> Self {
        Self {
            bbox: *bbox,
            px: 0.5 * (bbox.xmin + bbox.xmax) + margin,
            py: 0.5 * (bbox.ymin + bbox.ymax) + margin,
            len_x: bbox.width() + 2.0 * margin,
            len_y: bbox.height() + 2.0 * margin,
            half_gap: gap_half_width + tool_radius,
        }
    }

    /// Band across the full width, centred at `py + offset`
    pub fn horizontal_band(&self, offset: f64) -> Result<TabZone> {
        let g = self.half_gap;
        TabZone::new(
            self.bbox.xmin - g,
            self.py - g + offset,
            self.bbox.xmax + g,
            self.py + g + offset,
        )
    }

    /// Band across the full height, centred at `px + offset`
    pub fn vertical_band(&self, offset: f64) -> Result<TabZone> {
        let g = self.half_gap;
        TabZone::new(
            self.px - g + offset,
            self.bbox.ymin - g,
            self.px + g + offset,
            self.bbox.ymax + g,
        )
    }

    /// Zones for a pattern, in application order
    pub fn zones(&self, pattern: GapPattern) -> Result<SmallVec<[TabZone; 4]>> {
        let mut zones = SmallVec::new();
        if pattern.double_horizontal() {
            zones.push(self.horizontal_band(self.len_y / 4.0)?);
            zones.push(self.horizontal_band(-self.len_y / 4.0)?);
        }
        if pattern.double_vertical() {
            zones.push(self.vertical_band(self.len_x / 4.0)?);
            zones.push(self.vertical_band(-self.len_x / 4.0)?);
        }
        if pattern.single_horizontal() {
            zones.push(self.horizontal_band(0.0)?);
        }
        if pattern.single_vertical() {
            zones.push(self.vertical_band(0.0)?);
        }
        Ok(zones)
    }
}

/// Plan the tab zones for a bounding box and pattern
///
/// Fails only when the parameters produce an empty rectangle, i.e. when
/// `gap_half_width + tool_radius` is not positive or a value is not finite.
pub fn plan_zones(
    bbox: &BoundingBox,
    margin: f64,
    tool_radius: f64,
    gap_half_width: f64,
    pattern: GapPattern,
) -> Result<SmallVec<[TabZone; 4]>> {
    TabLayout::new(bbox, margin, tool_radius, gap_half_width).zones(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_pattern_parsing() {
        for pattern in GapPattern::ALL {
            assert_eq!(pattern.as_str().parse::<GapPattern>().unwrap(), pattern);
        }
        assert!("xyz".parse::<GapPattern>().is_err());
        assert!("LR".parse::<GapPattern>().is_err());
        assert!(" 4 ".parse::<GapPattern>().is_err());
        assert!("lr\n".parse::<GapPattern>().is_err());
        assert_eq!(GapPattern::try_from(4).unwrap(), GapPattern::Four);
        assert_eq!(GapPattern::try_from(8).unwrap(), GapPattern::Eight);
        assert!(GapPattern::try_from(2).is_err());
    }

    #[test]
    fn test_zone_counts() {
        for pattern in GapPattern::ALL {
            let zones = plan_zones(&unit_box(), 0.001, 0.05, 0.05, pattern).unwrap();
            assert_eq!(zones.len(), pattern.zone_count(), "pattern {pattern}");
        }
    }

    #[test]
    fn test_lr_zone_values() {
        let zones = plan_zones(&unit_box(), 0.001, 1.0, 0.5, GapPattern::Lr).unwrap();
        let zone = zones[0];
        assert_relative_eq!(zone.x0, -1.5);
        assert_relative_eq!(zone.x1, 11.5);
        assert_relative_eq!(zone.y0, 5.001 - 1.5);
        assert_relative_eq!(zone.y1, 5.001 + 1.5);
    }

    #[test]
    fn test_four_crosses_both_axes() {
        let zones = plan_zones(&unit_box(), 0.0, 0.5, 0.5, GapPattern::Four).unwrap();
        // Horizontal band first, then vertical
        assert!(zones[0].width() > zones[0].height());
        assert!(zones[1].height() > zones[1].width());
        assert_relative_eq!(zones[0].center().y, 5.0);
        assert_relative_eq!(zones[1].center().x, 5.0);
    }

    #[test]
    fn test_double_bands_are_symmetric() {
        let bbox = BoundingBox::new(-4.0, 2.0, 16.0, 8.0);
        let margin = 0.25;
        let layout = TabLayout::new(&bbox, margin, 0.1, 0.2);

        let lr = layout.zones(GapPattern::TwoLr).unwrap();
        assert_relative_eq!(lr[0].center().y - layout.py, layout.len_y / 4.0, epsilon = 1e-12);
        assert_relative_eq!(layout.py - lr[1].center().y, layout.len_y / 4.0, epsilon = 1e-12);

        let tb = layout.zones(GapPattern::TwoTb).unwrap();
        assert_relative_eq!(tb[0].center().x - layout.px, layout.len_x / 4.0, epsilon = 1e-12);
        assert_relative_eq!(layout.px - tb[1].center().x, layout.len_x / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gap_sizing() {
        for (gap, dia) in [(0.1, 0.1), (1.0, 2.0), (0.6, 3.0), (2.5, 0.01)] {
            let zones = plan_zones(&unit_box(), 0.001, dia / 2.0, gap / 2.0, GapPattern::Lr).unwrap();
            assert_relative_eq!(zones[0].height(), 2.0 * (gap / 2.0 + dia / 2.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_eight_order() {
        let zones = plan_zones(&unit_box(), 0.0, 0.5, 0.5, GapPattern::Eight).unwrap();
        assert!(zones[0].center().y > zones[1].center().y);
        assert!(zones[2].center().x > zones[3].center().x);
        assert!(zones[..2].iter().all(|z| z.width() > z.height()));
        assert!(zones[2..].iter().all(|z| z.height() > z.width()));
    }

    #[test]
    fn test_empty_band_is_rejected() {
        assert!(plan_zones(&unit_box(), 0.0, 0.0, 0.0, GapPattern::Lr).is_err());
        assert!(TabZone::new(1.0, 0.0, 1.0, 2.0).is_err());
        assert!(TabZone::new(0.0, 0.0, f64::NAN, 2.0).is_err());
    }

    #[test]
    fn test_zone_contains_boundary() {
        let zone = TabZone::new(0.0, 0.0, 2.0, 1.0).unwrap();
        assert!(zone.contains(&Point2::new(2.0, 1.0)));
        assert!(!zone.contains(&Point2::new(2.1, 1.0)));
    }
}
