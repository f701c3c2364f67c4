//! Missing-zone inference.
//!
//! Some zones print an explicit "N/A" instead of a numeric stat, and the
//! main passes routinely miss it (two faint glyphs and a slash). For each
//! NA-prone zone with no confirmed stat, a second, highly restricted pass
//! runs against that zone's rectangle; if even that finds nothing, a marker
//! is synthesized so downstream consumers never branch on a missing key.

use image::DynamicImage;
use std::collections::BTreeMap;

use super::{ZoneName, ZoneStat};
use crate::config::ExtractionConfig;
use crate::ocr::engine::{PassKind, RecognizeOpts, RecognizedToken, TextRecognizer};
use crate::ocr::preprocess;

const NA_ALLOWLIST: &str = "NA/";
/// Pixels around the zone rectangle included in the crop.
const SCAN_MARGIN: f32 = 10.0;
/// Brightness lift applied after the contrast stretch.
const SCAN_BRIGHTNESS: i32 = 40;

/// Produces one canonical `N/A` token for every NA-prone zone the main
/// passes left uncovered.
pub fn infer_missing<R: TextRecognizer>(
    recognizer: &R,
    image: &DynamicImage,
    confirmed: &BTreeMap<ZoneName, ZoneStat>,
    config: &ExtractionConfig,
) -> Vec<RecognizedToken> {
    let mut inferred = Vec::new();

    for &zone in &config.na_scan_zones {
        if confirmed.contains_key(&zone) {
            continue;
        }

        match scan_zone(recognizer, image, zone) {
            Some(token) => {
                log::info!("Confirmed N/A marker in {}", zone);
                inferred.push(token);
            }
            None => {
                log::info!("No marker found in {}, synthesizing N/A", zone);
                inferred.push(synthesize_na(zone, config.na_synth_confidence));
            }
        }
    }

    inferred
}

/// Runs the restricted pass over one zone's rectangle. Returns a normalized
/// `N/A` token in full-image coordinates when a marker-like fragment shows
/// up, `None` otherwise (including on recognition failure).
fn scan_zone<R: TextRecognizer>(
    recognizer: &R,
    image: &DynamicImage,
    zone: ZoneName,
) -> Option<RecognizedToken> {
    let rect = zone.rect();
    let (crop, x0, y0) = preprocess::crop_zone(image, &rect, SCAN_MARGIN);
    let enhanced = preprocess::enhance_contrast(&crop.to_luma8(), SCAN_BRIGHTNESS);

    let opts = RecognizeOpts {
        pass: PassKind::NaScan,
        psm: 7,
        allowlist: Some(NA_ALLOWLIST.to_string()),
    };

    let tokens = match recognizer.recognize(&DynamicImage::ImageLuma8(enhanced), &opts) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::warn!("N/A scan failed for {}: {}", zone, e);
            return None;
        }
    };

    tokens.into_iter().find(|t| is_na_marker(&t.text)).map(|t| {
        RecognizedToken {
            text: "N/A".to_string(),
            x: t.x + x0,
            y: t.y + y0,
            ..t
        }
    })
}

/// Marker-like under the restricted allow-list: at least two characters,
/// containing both an N and an A ("NA", "N/A", "NA/" and similar smears).
fn is_na_marker(text: &str) -> bool {
    let upper = text.trim().to_ascii_uppercase();
    upper.len() >= 2 && upper.contains('N') && upper.contains('A')
}

fn synthesize_na(zone: ZoneName, confidence: f32) -> RecognizedToken {
    let (cx, cy) = zone.rect().center();
    RecognizedToken {
        text: "N/A".to_string(),
        x: cx as u32,
        y: cy as u32,
        width: 0,
        height: 0,
        confidence,
        pass: PassKind::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::testing::{token, ScriptedRecognizer};
    use crate::zones::ZoneReading;

    fn chart() -> DynamicImage {
        DynamicImage::new_luma8(800, 600)
    }

    fn confirmed(zones: &[ZoneName]) -> BTreeMap<ZoneName, ZoneStat> {
        zones
            .iter()
            .map(|&z| {
                (
                    z,
                    ZoneStat {
                        reading: ZoneReading::Measured {
                            made: 5,
                            attempts: 10,
                            percentage: 50.0,
                        },
                        coordinates: vec![],
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_confirmed_zones_skipped() {
        let recognizer = ScriptedRecognizer::new();
        let config = ExtractionConfig::default();
        let covered = confirmed(&[ZoneName::LeftCorner3, ZoneName::RightCorner3]);

        let inferred = infer_missing(&recognizer, &chart(), &covered, &config);
        assert!(inferred.is_empty());
        assert!(recognizer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_found_marker_normalized_to_canonical_text() {
        // The restricted pass reads a smeared "NA/" at (5, 8) in crop space
        let recognizer = ScriptedRecognizer::new().with_tokens(
            PassKind::NaScan,
            vec![token("NA/", 5, 8, 62.0, PassKind::NaScan)],
        );
        let config = ExtractionConfig::default();
        let covered = confirmed(&[ZoneName::RightCorner3]);

        let inferred = infer_missing(&recognizer, &chart(), &covered, &config);
        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].text, "N/A");
        assert_eq!(inferred[0].pass, PassKind::NaScan);
        // Left Corner 3 rect starts at (50, 20); crop margin is 10
        assert_eq!(inferred[0].x, 5 + 40);
        assert_eq!(inferred[0].y, 8 + 10);
        assert_eq!(inferred[0].confidence, 62.0);
    }

    #[test]
    fn test_nothing_found_synthesizes_marker_at_zone_center() {
        let recognizer = ScriptedRecognizer::new();
        let config = ExtractionConfig::default();

        let inferred = infer_missing(&recognizer, &chart(), &BTreeMap::new(), &config);
        assert_eq!(inferred.len(), 2);
        for token in &inferred {
            assert_eq!(token.text, "N/A");
            assert_eq!(token.pass, PassKind::Synthetic);
            assert_eq!(token.confidence, 50.0);
        }
        // Synthesized at the Left Corner 3 rect center (85, 50)
        assert_eq!((inferred[0].x, inferred[0].y), (85, 50));
    }

    #[test]
    fn test_scan_failure_falls_back_to_synthesis() {
        let recognizer = ScriptedRecognizer::new().failing_on(PassKind::NaScan);
        let config = ExtractionConfig::default();
        let covered = confirmed(&[ZoneName::RightCorner3]);

        let inferred = infer_missing(&recognizer, &chart(), &covered, &config);
        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].pass, PassKind::Synthetic);
    }

    #[test]
    fn test_non_marker_text_ignored() {
        let recognizer = ScriptedRecognizer::new().with_tokens(
            PassKind::NaScan,
            vec![token("//", 5, 8, 70.0, PassKind::NaScan)],
        );
        let config = ExtractionConfig::default();
        let covered = confirmed(&[ZoneName::RightCorner3]);

        let inferred = infer_missing(&recognizer, &chart(), &covered, &config);
        assert_eq!(inferred[0].pass, PassKind::Synthetic);
    }

    #[test]
    fn test_is_na_marker() {
        assert!(is_na_marker("NA"));
        assert!(is_na_marker("N/A"));
        assert!(is_na_marker("na"));
        assert!(is_na_marker("NA/"));
        assert!(!is_na_marker("N"));
        assert!(!is_na_marker("//"));
        assert!(!is_na_marker(""));
    }
}
