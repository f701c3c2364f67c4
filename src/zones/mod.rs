//! Court zones and chart geometry.
//!
//! The ten zones form a fixed, ordered set: every table, vector, and report
//! in the system iterates them in the order of [`ZoneName::ALL`]. The enum is
//! declared in that order so the derived `Ord` (and therefore `BTreeMap`
//! iteration) matches it.
//!
//! Zone rectangles are pixel regions on the reference shot chart layout
//! (roughly 800x600); they mark where each zone's stat text is printed, not
//! the painted court area itself.

pub mod infer;
pub mod mapper;

pub use mapper::{ZoneMapper, ZoneReading, ZoneStat};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named court region. Declaration order is the canonical zone order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ZoneName {
    #[serde(rename = "Left Corner 3")]
    LeftCorner3,
    #[serde(rename = "Left Wing 3")]
    LeftWing3,
    #[serde(rename = "Top of Key 3")]
    TopOfKey3,
    #[serde(rename = "Right Wing 3")]
    RightWing3,
    #[serde(rename = "Right Corner 3")]
    RightCorner3,
    #[serde(rename = "Left Mid Range")]
    LeftMidRange,
    #[serde(rename = "Left Free Throw")]
    LeftFreeThrow,
    #[serde(rename = "Right Free Throw")]
    RightFreeThrow,
    #[serde(rename = "Right Mid Range")]
    RightMidRange,
    #[serde(rename = "Paint")]
    Paint,
}

impl ZoneName {
    /// All zones in canonical order.
    pub const ALL: [ZoneName; 10] = [
        ZoneName::LeftCorner3,
        ZoneName::LeftWing3,
        ZoneName::TopOfKey3,
        ZoneName::RightWing3,
        ZoneName::RightCorner3,
        ZoneName::LeftMidRange,
        ZoneName::LeftFreeThrow,
        ZoneName::RightFreeThrow,
        ZoneName::RightMidRange,
        ZoneName::Paint,
    ];

    /// The five three-point zones, used for style profiling.
    pub const THREE_POINT: [ZoneName; 5] = [
        ZoneName::LeftCorner3,
        ZoneName::LeftWing3,
        ZoneName::TopOfKey3,
        ZoneName::RightWing3,
        ZoneName::RightCorner3,
    ];

    /// Human-readable label, also used as the JSON map key.
    pub fn label(self) -> &'static str {
        match self {
            ZoneName::LeftCorner3 => "Left Corner 3",
            ZoneName::LeftWing3 => "Left Wing 3",
            ZoneName::TopOfKey3 => "Top of Key 3",
            ZoneName::RightWing3 => "Right Wing 3",
            ZoneName::RightCorner3 => "Right Corner 3",
            ZoneName::LeftMidRange => "Left Mid Range",
            ZoneName::LeftFreeThrow => "Left Free Throw",
            ZoneName::RightFreeThrow => "Right Free Throw",
            ZoneName::RightMidRange => "Right Mid Range",
            ZoneName::Paint => "Paint",
        }
    }

    /// The pixel region of the reference chart where this zone's stat text
    /// is printed.
    pub fn rect(self) -> ZoneRect {
        match self {
            ZoneName::LeftCorner3 => ZoneRect::new(50.0, 20.0, 70.0, 60.0),
            ZoneName::LeftWing3 => ZoneRect::new(80.0, 350.0, 50.0, 70.0),
            ZoneName::TopOfKey3 => ZoneRect::new(350.0, 480.0, 50.0, 70.0),
            ZoneName::RightWing3 => ZoneRect::new(610.0, 350.0, 50.0, 70.0),
            ZoneName::RightCorner3 => ZoneRect::new(650.0, 20.0, 70.0, 60.0),
            ZoneName::LeftMidRange => ZoneRect::new(170.0, 100.0, 40.0, 60.0),
            ZoneName::LeftFreeThrow => ZoneRect::new(270.0, 240.0, 105.0, 30.0),
            ZoneName::RightFreeThrow => ZoneRect::new(375.0, 240.0, 105.0, 30.0),
            ZoneName::RightMidRange => ZoneRect::new(540.0, 100.0, 40.0, 60.0),
            ZoneName::Paint => ZoneRect::new(300.0, 20.0, 140.0, 20.0),
        }
    }

    pub fn is_free_throw(self) -> bool {
        matches!(self, ZoneName::LeftFreeThrow | ZoneName::RightFreeThrow)
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ZoneName {
    type Err = String;

    /// Parses a zone from its label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ZoneName::ALL
            .into_iter()
            .find(|z| z.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown zone '{}'", s))
    }
}

/// An axis-aligned pixel rectangle on the reference chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ZoneRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// The union of the two free-throw zones. Used to recognize the case where
/// one text group carries both the left and the right sub-position stat.
pub fn free_throw_lane() -> ZoneRect {
    let left = ZoneName::LeftFreeThrow.rect();
    let right = ZoneName::RightFreeThrow.rect();
    ZoneRect::new(
        left.x,
        left.y,
        (right.x + right.width) - left.x,
        left.height.max(right.height),
    )
}

/// Assigns a point to a zone: the first zone (in canonical order) whose
/// rectangle contains it, or the zone with the nearest rectangle center.
/// Always resolves to some zone; a point outside every rectangle is not an
/// error.
pub fn zone_for_point(px: f32, py: f32) -> ZoneName {
    for zone in ZoneName::ALL {
        if zone.rect().contains(px, py) {
            return zone;
        }
    }
    nearest_zone(px, py)
}

/// The zone whose rectangle center is closest to the point (Euclidean);
/// ties go to the earlier zone in canonical order.
fn nearest_zone(px: f32, py: f32) -> ZoneName {
    let mut best = ZoneName::Paint;
    let mut best_dist = f32::INFINITY;

    for zone in ZoneName::ALL {
        let (cx, cy) = zone.rect().center();
        let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best = zone;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_canonical_order_matches_ord() {
        let mut sorted = ZoneName::ALL;
        sorted.sort();
        assert_eq!(sorted, ZoneName::ALL);
    }

    #[test]
    fn test_btreemap_iterates_in_canonical_order() {
        let mut map = BTreeMap::new();
        for zone in ZoneName::ALL.into_iter().rev() {
            map.insert(zone, 0.0f64);
        }
        let keys: Vec<ZoneName> = map.keys().copied().collect();
        assert_eq!(keys, ZoneName::ALL.to_vec());
    }

    #[test]
    fn test_label_parse_roundtrip() {
        for zone in ZoneName::ALL {
            assert_eq!(zone.label().parse::<ZoneName>().unwrap(), zone);
        }
        assert_eq!("paint".parse::<ZoneName>().unwrap(), ZoneName::Paint);
        assert!("Half Court Heave".parse::<ZoneName>().is_err());
    }

    #[test]
    fn test_serde_uses_labels_as_keys() {
        let mut map = BTreeMap::new();
        map.insert(ZoneName::LeftCorner3, 45.0f64);
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"Left Corner 3\""));

        let back: BTreeMap<ZoneName, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&ZoneName::LeftCorner3), Some(&45.0));
    }

    #[test]
    fn test_point_inside_rect() {
        // (100, 50) sits inside the Left Corner 3 text region
        assert_eq!(zone_for_point(100.0, 50.0), ZoneName::LeftCorner3);
        assert_eq!(zone_for_point(370.0, 30.0), ZoneName::Paint);
    }

    #[test]
    fn test_point_outside_every_rect_falls_back_to_nearest() {
        // Nowhere near any text region, but must still resolve
        let zone = zone_for_point(0.0, 0.0);
        assert_eq!(zone, ZoneName::LeftCorner3);
    }

    #[test]
    fn test_free_throw_split_at_lane_midpoint() {
        assert_eq!(zone_for_point(280.0, 250.0), ZoneName::LeftFreeThrow);
        assert_eq!(zone_for_point(420.0, 250.0), ZoneName::RightFreeThrow);
    }

    #[test]
    fn test_free_throw_lane_spans_both_zones() {
        let lane = free_throw_lane();
        assert!(lane.contains(280.0, 250.0));
        assert!(lane.contains(420.0, 250.0));
        assert!(!lane.contains(100.0, 50.0));
    }
}
