//! Plain-text rendering for the CLI.

use std::collections::BTreeMap;

use crate::analysis::PlayerProfile;
use crate::zones::{ZoneName, ZoneReading, ZoneStat};

/// Renders the per-zone stat table in canonical zone order. Zones with no
/// reading at all show as "-"; the two free-throw zones are additionally
/// summarized as one combined line when both carry measured stats.
pub fn zone_table(stats: &BTreeMap<ZoneName, ZoneStat>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<3} {:<17} {:>12} {:>8}\n", "#", "Zone", "Shots", "Pct"));

    for (index, zone) in ZoneName::ALL.into_iter().enumerate() {
        let (shots, pct) = match stats.get(&zone) {
            Some(stat) => (stat.made_attempts_label(), percentage_label(&stat.reading)),
            None => ("-".to_string(), "-".to_string()),
        };
        out.push_str(&format!("{:<3} {:<17} {:>12} {:>8}\n", index, zone.label(), shots, pct));
    }

    if let Some(combined) = free_throw_line(stats) {
        out.push_str(&format!("\nFree Throw Line: {}\n", combined));
    }

    out
}

/// Joins the left and right free-throw stats, left first (ascending x on
/// the chart), when both were measured.
pub fn free_throw_line(stats: &BTreeMap<ZoneName, ZoneStat>) -> Option<String> {
    let left = stats.get(&ZoneName::LeftFreeThrow)?;
    let right = stats.get(&ZoneName::RightFreeThrow)?;

    match (&left.reading, &right.reading) {
        (ZoneReading::Measured { .. }, ZoneReading::Measured { .. }) => Some(format!(
            "{} + {}",
            left.made_attempts_label(),
            right.made_attempts_label()
        )),
        _ => None,
    }
}

fn percentage_label(reading: &ZoneReading) -> String {
    match reading {
        ZoneReading::Measured { percentage, .. }
        | ZoneReading::PercentageOnly { percentage } => format!("{:.1}%", percentage),
        ZoneReading::NotAvailable => "N/A".to_string(),
    }
}

/// Renders a ranked similarity listing.
pub fn similarity_table(results: &[(String, f64)]) -> String {
    let mut out = String::new();
    for (rank, (name, score)) in results.iter().enumerate() {
        out.push_str(&format!("{:>2}. {:<24} {:.3}\n", rank + 1, name, score));
    }
    out
}

/// Renders the full similarity matrix with row/column labels.
pub fn matrix_table(matrix: &[Vec<f64>], names: &[String]) -> String {
    let label_width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(6);

    let mut out = String::new();
    out.push_str(&format!("{:<width$}", "", width = label_width + 1));
    for name in names {
        out.push_str(&format!(" {:>width$}", name, width = label_width));
    }
    out.push('\n');

    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("{:<width$}", name, width = label_width + 1));
        for value in &matrix[i] {
            out.push_str(&format!(" {:>width$.3}", value, width = label_width));
        }
        out.push('\n');
    }

    out
}

/// Renders a player's qualitative profile.
pub fn profile_summary(name: &str, profile: &PlayerProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Profile: {}\n", name));
    out.push_str(&format!("  Overall average: {:.1}%\n", profile.overall_average));
    out.push_str(&format!("  Consistency:     {:.1}\n", profile.consistency));
    out.push_str(&format!("  Strengths:  {}\n", zone_list(&profile.strengths)));
    out.push_str(&format!("  Weaknesses: {}\n", zone_list(&profile.weaknesses)));

    let mut styles = Vec::new();
    if profile.three_point_specialist {
        styles.push("three-point specialist");
    }
    if profile.paint_presence {
        styles.push("paint presence");
    }
    if profile.well_rounded {
        styles.push("well-rounded");
    }
    if styles.is_empty() {
        styles.push("no pronounced style");
    }
    out.push_str(&format!("  Style: {}\n", styles.join(", ")));

    out
}

fn zone_list(zones: &[ZoneName]) -> String {
    if zones.is_empty() {
        return "none".to_string();
    }
    zones
        .iter()
        .map(|z| z.label())
        .collect::<Vec<_>>()
        .join(", ")
}
