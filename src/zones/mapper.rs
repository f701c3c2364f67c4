//! Token-to-zone mapping.
//!
//! Takes the pooled recognizer output and turns it into per-zone statistics:
//! duplicate collapse, proximity clustering, zone assignment with nearest
//! fallback, per-group stat extraction, and cross-group conflict resolution.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{free_throw_lane, zone_for_point, ZoneName};
use crate::analysis::scaling::percentage_of;
use crate::config::ExtractionConfig;
use crate::ocr::classify::{classify, StatToken};
use crate::ocr::engine::RecognizedToken;

/// What was actually read for a zone. Consumers must branch; there is no
/// sentinel value standing in for "no data".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ZoneReading {
    /// A made/attempts token covered the zone. `percentage` comes from a
    /// standalone percentage token in the same group when one exists,
    /// otherwise it is derived from made/attempts.
    Measured {
        made: u32,
        attempts: u32,
        percentage: f64,
    },
    /// Only a percentage token covered the zone.
    PercentageOnly { percentage: f64 },
    /// An explicit N/A marker (read or synthesized).
    NotAvailable,
}

impl ZoneReading {
    pub fn made(&self) -> u32 {
        match self {
            ZoneReading::Measured { made, .. } => *made,
            _ => 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ZoneReading::Measured { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    pub fn percentage(&self) -> f64 {
        match self {
            ZoneReading::Measured { percentage, .. } => *percentage,
            ZoneReading::PercentageOnly { percentage } => *percentage,
            ZoneReading::NotAvailable => 0.0,
        }
    }
}

/// One zone's extracted statistics plus the token centers that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneStat {
    pub reading: ZoneReading,
    pub coordinates: Vec<(f32, f32)>,
}

impl ZoneStat {
    pub fn not_available(center: (f32, f32)) -> Self {
        Self {
            reading: ZoneReading::NotAvailable,
            coordinates: vec![center],
        }
    }

    /// "5/10", "-" when only a percentage was read, "N/A" for markers.
    pub fn made_attempts_label(&self) -> String {
        match &self.reading {
            ZoneReading::Measured { made, attempts, .. } => format!("{}/{}", made, attempts),
            ZoneReading::PercentageOnly { .. } => "-".to_string(),
            ZoneReading::NotAvailable => "N/A".to_string(),
        }
    }
}

/// Maps classified tokens onto court zones.
pub struct ZoneMapper {
    proximity_threshold: f32,
    duplicate_tolerance: f32,
}

/// Everything stat-shaped found in one proximity group.
struct GroupStats {
    /// (made, attempts, center), in token order
    made_attempts: Vec<(u32, u32, (f32, f32))>,
    percentage: Option<f64>,
    saw_na: bool,
    coordinates: Vec<(f32, f32)>,
}

impl ZoneMapper {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            proximity_threshold: config.proximity_threshold,
            duplicate_tolerance: config.duplicate_tolerance,
        }
    }

    /// Produces the per-zone statistics for one extraction.
    ///
    /// A zone is only emitted when it carries a nonzero made count or a
    /// nonzero percentage; an all-zero group is noise and must not
    /// overwrite a real stat. Explicit N/A markers are the exception: they
    /// fill zones no numeric group claimed.
    pub fn map_to_zones(&self, tokens: &[RecognizedToken]) -> BTreeMap<ZoneName, ZoneStat> {
        let tokens = self.collapse_duplicates(tokens);
        let groups = self.group_by_proximity(&tokens);

        let mut candidates: Vec<(ZoneName, ZoneStat)> = Vec::new();
        for group in &groups {
            let members: Vec<&RecognizedToken> = group.iter().map(|&i| &tokens[i]).collect();
            self.extract_group(&members, &mut candidates);
        }

        let mut result: BTreeMap<ZoneName, ZoneStat> = BTreeMap::new();
        let mut na_candidates: Vec<(ZoneName, ZoneStat)> = Vec::new();

        for (zone, stat) in candidates {
            if stat.reading == ZoneReading::NotAvailable {
                na_candidates.push((zone, stat));
                continue;
            }
            if stat.reading.made() == 0 && stat.reading.percentage() == 0.0 {
                log::debug!("Dropping all-zero group for {}", zone);
                continue;
            }
            match result.get(&zone) {
                // Strictly greater attempts wins; ties keep the first seen
                Some(existing) if stat.reading.attempts() <= existing.reading.attempts() => {
                    log::debug!("Keeping earlier, more complete stat for {}", zone);
                }
                _ => {
                    result.insert(zone, stat);
                }
            }
        }

        for (zone, stat) in na_candidates {
            result.entry(zone).or_insert(stat);
        }

        result
    }

    /// Tokens with identical text whose centers sit within the duplicate
    /// tolerance are the same detection seen by different passes; the
    /// highest-confidence instance survives.
    fn collapse_duplicates(&self, tokens: &[RecognizedToken]) -> Vec<RecognizedToken> {
        let mut kept: Vec<RecognizedToken> = Vec::new();

        'next: for token in tokens {
            for existing in kept.iter_mut() {
                if existing.text == token.text
                    && distance(existing.center(), token.center()) <= self.duplicate_tolerance
                {
                    if token.confidence > existing.confidence {
                        *existing = token.clone();
                    }
                    continue 'next;
                }
            }
            kept.push(token.clone());
        }

        kept
    }

    /// Single-link clustering: tokens whose centers are within the
    /// proximity threshold of any group member (transitively) share a
    /// group. Groups keep the original token order.
    fn group_by_proximity(&self, tokens: &[RecognizedToken]) -> Vec<Vec<usize>> {
        let mut groups = Vec::new();
        let mut visited = vec![false; tokens.len()];

        for start in 0..tokens.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut group = vec![start];
            let mut frontier = vec![start];

            while let Some(i) = frontier.pop() {
                for j in 0..tokens.len() {
                    if visited[j] {
                        continue;
                    }
                    if distance(tokens[i].center(), tokens[j].center()) <= self.proximity_threshold
                    {
                        visited[j] = true;
                        group.push(j);
                        frontier.push(j);
                    }
                }
            }

            group.sort_unstable();
            groups.push(group);
        }

        groups
    }

    /// Turns one proximity group into zero, one, or (free-throw split) two
    /// zone candidates.
    fn extract_group(
        &self,
        members: &[&RecognizedToken],
        candidates: &mut Vec<(ZoneName, ZoneStat)>,
    ) {
        let Some(first) = members.first() else {
            return;
        };
        let (cx, cy) = first.center();
        let zone = zone_for_point(cx, cy);

        let stats = collect_group_stats(members);

        // The free-throw line prints left and right sub-position stats side
        // by side; when both land in one group they must not overwrite each
        // other. Ascending x decides which side is which.
        let lane = free_throw_lane();
        if zone.is_free_throw()
            && stats.made_attempts.len() == 2
            && stats
                .made_attempts
                .iter()
                .all(|&(_, _, (x, y))| lane.contains(x, y))
        {
            let mut shots = stats.made_attempts.clone();
            shots.sort_by(|a, b| a.2 .0.total_cmp(&b.2 .0));
            for ((made, attempts, center), side) in shots
                .into_iter()
                .zip([ZoneName::LeftFreeThrow, ZoneName::RightFreeThrow])
            {
                candidates.push((
                    side,
                    ZoneStat {
                        reading: ZoneReading::Measured {
                            made,
                            attempts,
                            percentage: percentage_of(made, attempts),
                        },
                        coordinates: vec![center],
                    },
                ));
            }
            return;
        }

        let reading = if let Some(&(made, attempts, _)) = stats.made_attempts.first() {
            ZoneReading::Measured {
                made,
                attempts,
                percentage: stats
                    .percentage
                    .unwrap_or_else(|| percentage_of(made, attempts)),
            }
        } else if let Some(percentage) = stats.percentage {
            ZoneReading::PercentageOnly { percentage }
        } else if stats.saw_na {
            ZoneReading::NotAvailable
        } else {
            return;
        };

        candidates.push((
            zone,
            ZoneStat {
                reading,
                coordinates: stats.coordinates,
            },
        ));
    }
}

fn collect_group_stats(members: &[&RecognizedToken]) -> GroupStats {
    let mut stats = GroupStats {
        made_attempts: Vec::new(),
        percentage: None,
        saw_na: false,
        coordinates: Vec::new(),
    };
    let mut decimal: Option<f64> = None;

    for token in members {
        stats.coordinates.push(token.center());

        match classify(&token.text) {
            Some(StatToken::MadeAttempts { made, attempts }) => {
                if made > attempts {
                    // OCR noise; a real stat never makes more than it attempts
                    log::debug!("Discarding implausible stat '{}'", token.text);
                    continue;
                }
                stats.made_attempts.push((made, attempts, token.center()));
            }
            Some(StatToken::Percentage(value)) => {
                if stats.percentage.is_none() {
                    stats.percentage = Some(value);
                }
            }
            Some(StatToken::NotAvailable) => stats.saw_na = true,
            Some(StatToken::Decimal(value)) => {
                if decimal.is_none() {
                    decimal = Some(value);
                }
            }
            // Bare counts anchor grouping but carry no usable stat
            Some(StatToken::Count(_)) | None => {}
        }
    }

    // A bare decimal is a percentage whose % glyph the chart (or the
    // recognizer) dropped; it only counts when no marked percentage exists.
    if stats.percentage.is_none() {
        stats.percentage = decimal.filter(|v| (0.0..=100.0).contains(v));
    }

    stats
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
