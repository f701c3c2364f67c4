//! Qualitative shooting profile.
//!
//! Derives strengths, weaknesses, and a playing-style summary from a
//! player's per-zone percentages. Zones at literal 0.0 are "no data", not
//! "shoots 0%", and are excluded from the averages.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::zones::ZoneName;

/// A zone is a strength/weakness when it sits this far from the overall
/// average.
const STRENGTH_MARGIN: f64 = 10.0;
/// Three-point specialist when the three-point mean beats the overall
/// average by this much.
const THREE_POINT_MARGIN: f64 = 5.0;
/// Well-rounded requires at most this many weaknesses...
const WELL_ROUNDED_MAX_WEAKNESSES: usize = 2;
/// ...and a consistency score above this.
const WELL_ROUNDED_CONSISTENCY: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    /// Mean of the nonzero zone percentages
    pub overall_average: f64,
    /// 100 minus the population standard deviation of the nonzero
    /// percentages, floored at 0; 0 with fewer than two values
    pub consistency: f64,
    /// Zones above `overall_average + 10`, canonical order
    pub strengths: Vec<ZoneName>,
    /// Nonzero zones below `overall_average - 10`, canonical order
    pub weaknesses: Vec<ZoneName>,
    pub three_point_specialist: bool,
    pub paint_presence: bool,
    pub well_rounded: bool,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            overall_average: 0.0,
            consistency: 0.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            three_point_specialist: false,
            paint_presence: false,
            well_rounded: false,
        }
    }
}

/// Analyzes a percentage map into a [`PlayerProfile`].
pub fn profile(percentages: &BTreeMap<ZoneName, f64>) -> PlayerProfile {
    let nonzero: Vec<f64> = percentages.values().copied().filter(|&v| v > 0.0).collect();
    if nonzero.is_empty() {
        return PlayerProfile::default();
    }

    let overall_average = mean(&nonzero);

    let consistency = if nonzero.len() > 1 {
        (100.0 - std_dev(&nonzero)).max(0.0)
    } else {
        0.0
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for zone in ZoneName::ALL {
        let pct = percentages.get(&zone).copied().unwrap_or(0.0);
        if pct > overall_average + STRENGTH_MARGIN {
            strengths.push(zone);
        } else if pct > 0.0 && pct < overall_average - STRENGTH_MARGIN {
            weaknesses.push(zone);
        }
    }

    // Style flags use the zone values directly, missing treated as 0
    let three_point_values: Vec<f64> = ZoneName::THREE_POINT
        .into_iter()
        .map(|z| percentages.get(&z).copied().unwrap_or(0.0))
        .collect();
    let three_point_avg = mean(&three_point_values);
    let paint_pct = percentages.get(&ZoneName::Paint).copied().unwrap_or(0.0);

    let three_point_specialist = three_point_avg > overall_average + THREE_POINT_MARGIN;
    let paint_presence = paint_pct > overall_average + STRENGTH_MARGIN;
    let well_rounded =
        weaknesses.len() <= WELL_ROUNDED_MAX_WEAKNESSES && consistency > WELL_ROUNDED_CONSISTENCY;

    PlayerProfile {
        overall_average,
        consistency,
        strengths,
        weaknesses,
        three_point_specialist,
        paint_presence,
        well_rounded,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentages(values: &[(ZoneName, f64)]) -> BTreeMap<ZoneName, f64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_zero_percentages_excluded_from_average() {
        // {80, 20, 50, 0}: overall average over nonzero = 50
        let data = percentages(&[
            (ZoneName::LeftCorner3, 80.0),
            (ZoneName::RightCorner3, 20.0),
            (ZoneName::Paint, 50.0),
            (ZoneName::LeftWing3, 0.0),
        ]);
        let result = profile(&data);

        assert_eq!(result.overall_average, 50.0);
        assert_eq!(result.strengths, vec![ZoneName::LeftCorner3]);
        assert_eq!(result.weaknesses, vec![ZoneName::RightCorner3]);
    }

    #[test]
    fn test_consistency_from_population_std_dev() {
        // stddev([80, 20, 50]) = sqrt(600); consistency = 100 - 24.49...
        let data = percentages(&[
            (ZoneName::LeftCorner3, 80.0),
            (ZoneName::RightCorner3, 20.0),
            (ZoneName::Paint, 50.0),
        ]);
        let result = profile(&data);
        let expected = 100.0 - 600.0f64.sqrt();
        assert!((result.consistency - expected).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_needs_two_nonzero_values() {
        let data = percentages(&[(ZoneName::Paint, 60.0)]);
        assert_eq!(profile(&data).consistency, 0.0);
    }

    #[test]
    fn test_consistency_floored_at_zero() {
        // stddev > 100 is impossible for percentages... except when values
        // span the whole range in two points: stddev([0.1, 100]) < 100,
        // so use extreme spread with many points staying within bounds.
        // The floor still matters for the formula's contract.
        let data = percentages(&[
            (ZoneName::LeftCorner3, 0.5),
            (ZoneName::RightCorner3, 100.0),
        ]);
        let result = profile(&data);
        assert!(result.consistency >= 0.0);
    }

    #[test]
    fn test_empty_profile_defaults() {
        let result = profile(&BTreeMap::new());
        assert_eq!(result, PlayerProfile::default());

        let all_zero = percentages(&[(ZoneName::Paint, 0.0)]);
        assert_eq!(profile(&all_zero), PlayerProfile::default());
    }

    #[test]
    fn test_three_point_specialist() {
        // All five threes at 50, interior at 30: overall avg = (5*50 + 3*30)/8
        // = 42.5, three-point mean 50 > 47.5
        let mut data = BTreeMap::new();
        for zone in ZoneName::THREE_POINT {
            data.insert(zone, 50.0);
        }
        data.insert(ZoneName::Paint, 30.0);
        data.insert(ZoneName::LeftMidRange, 30.0);
        data.insert(ZoneName::RightMidRange, 30.0);

        let result = profile(&data);
        assert!(result.three_point_specialist);
        assert!(!result.paint_presence);
    }

    #[test]
    fn test_paint_presence() {
        // Paint 75 vs overall avg (40*4 + 75)/5 = 47: 75 > 57
        let data = percentages(&[
            (ZoneName::LeftCorner3, 40.0),
            (ZoneName::RightCorner3, 40.0),
            (ZoneName::LeftMidRange, 40.0),
            (ZoneName::RightMidRange, 40.0),
            (ZoneName::Paint, 75.0),
        ]);
        let result = profile(&data);
        assert!(result.paint_presence);
        assert!(!result.three_point_specialist);
    }

    #[test]
    fn test_well_rounded() {
        // Tight spread: high consistency, no weaknesses
        let data: BTreeMap<ZoneName, f64> =
            ZoneName::ALL.into_iter().map(|z| (z, 45.0)).collect();
        let result = profile(&data);
        assert_eq!(result.consistency, 100.0);
        assert!(result.well_rounded);

        // Wild spread: consistency collapses
        let scattered = percentages(&[
            (ZoneName::LeftCorner3, 90.0),
            (ZoneName::RightCorner3, 10.0),
            (ZoneName::LeftWing3, 85.0),
            (ZoneName::RightWing3, 15.0),
        ]);
        assert!(!profile(&scattered).well_rounded);
    }

    #[test]
    fn test_strengths_and_weaknesses_in_canonical_order() {
        let data = percentages(&[
            (ZoneName::Paint, 80.0),
            (ZoneName::LeftCorner3, 75.0),
            (ZoneName::RightWing3, 20.0),
            (ZoneName::LeftWing3, 25.0),
            (ZoneName::TopOfKey3, 50.0),
        ]);
        let result = profile(&data);
        // overall avg = 50; strengths > 60, weaknesses < 40 (and > 0)
        assert_eq!(result.strengths, vec![ZoneName::LeftCorner3, ZoneName::Paint]);
        assert_eq!(result.weaknesses, vec![ZoneName::LeftWing3, ZoneName::RightWing3]);
    }
}
