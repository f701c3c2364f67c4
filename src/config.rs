//! Extraction tunables loaded from config.json at startup.
//!
//! Every threshold that was tuned against real shot charts lives here as a
//! named field instead of a literal, so a chart with a different layout or
//! print quality can be handled without rebuilding.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::zones::ZoneName;

/// Extraction pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum OCR confidence for the unmodified grayscale and original-color
    /// passes (these see the cleanest glyphs, so the floor is permissive)
    #[serde(default = "default_base_confidence_floor")]
    pub base_confidence_floor: f32,
    /// Minimum OCR confidence for the binarized passes (thresholding can
    /// mangle glyphs, so the floor is stricter)
    #[serde(default = "default_derived_confidence_floor")]
    pub derived_confidence_floor: f32,
    /// Maximum center-to-center distance (pixels) for two tokens to be
    /// grouped as one zone's statistics
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: f32,
    /// Maximum center-to-center distance (pixels) at which two tokens with
    /// identical text are treated as the same detection
    #[serde(default = "default_duplicate_tolerance")]
    pub duplicate_tolerance: f32,
    /// Zones that sometimes carry only an "N/A" marker instead of a stat;
    /// these get a second restricted pass when the main pass finds nothing
    #[serde(default = "default_na_scan_zones")]
    pub na_scan_zones: Vec<ZoneName>,
    /// Confidence assigned to a synthesized N/A token when even the
    /// restricted pass finds no marker
    #[serde(default = "default_na_synth_confidence")]
    pub na_synth_confidence: f32,
    /// Game count all stored players are scaled to for fair comparison
    #[serde(default = "default_target_games")]
    pub target_games: u32,
}

fn default_base_confidence_floor() -> f32 {
    20.0
}

fn default_derived_confidence_floor() -> f32 {
    30.0
}

fn default_proximity_threshold() -> f32 {
    100.0
}

fn default_duplicate_tolerance() -> f32 {
    20.0
}

fn default_na_scan_zones() -> Vec<ZoneName> {
    vec![ZoneName::LeftCorner3, ZoneName::RightCorner3]
}

fn default_na_synth_confidence() -> f32 {
    50.0
}

fn default_target_games() -> u32 {
    44
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_confidence_floor: default_base_confidence_floor(),
            derived_confidence_floor: default_derived_confidence_floor(),
            proximity_threshold: default_proximity_threshold(),
            duplicate_tolerance: default_duplicate_tolerance(),
            na_scan_zones: default_na_scan_zones(),
            na_synth_confidence: default_na_synth_confidence(),
            target_games: default_target_games(),
        }
    }
}

impl ExtractionConfig {
    /// Loads configuration from the given path, or returns defaults if the
    /// file is missing or malformed. Unknown fields are ignored; missing
    /// fields fall back individually.
    pub fn load(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(config) => {
                        log::info!("Config loaded from {}", config_path.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!(
                            "Failed to parse {}: {}. Using defaults.",
                            config_path.display(),
                            e
                        );
                    }
                },
                Err(e) => {
                    log::warn!(
                        "Failed to read {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                }
            }
        } else {
            log::debug!("{} not found, using default config", config_path.display());
        }

        ExtractionConfig::default()
    }
}
