//! Shot chart extraction pipeline.
//!
//! [`ShotChartOcr`] is the long-lived extraction service: it owns the
//! recognizer and the tuning config, runs the preprocessing variants in a
//! fixed order, filters the output down to stat-shaped tokens, and hands
//! them to the zone mapper. Missing-zone inference runs last so every
//! expected zone ends up with some reading.

pub mod classify;
pub mod engine;
pub mod error;
pub mod preprocess;
pub mod setup;

pub use engine::{PassKind, RecognizeOpts, RecognizedToken, TesseractEngine, TextRecognizer};
pub use error::ExtractError;

use image::DynamicImage;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ExtractionConfig;
use crate::zones::{infer, ZoneMapper, ZoneName, ZoneStat};

/// Characters allowed in the restricted original-color pass.
const STAT_ALLOWLIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz/%. ";

/// The extraction service. Construct once per process and pass to callers.
pub struct ShotChartOcr<R> {
    recognizer: R,
    config: ExtractionConfig,
}

impl<R: TextRecognizer> ShotChartOcr<R> {
    pub fn new(recognizer: R, config: ExtractionConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The externally-facing entrypoint: image file to per-zone stats.
    pub fn extract_stats(
        &self,
        image_path: &Path,
    ) -> Result<BTreeMap<ZoneName, ZoneStat>, ExtractError> {
        let image = image::open(image_path).map_err(|source| ExtractError::ImageRead {
            path: image_path.to_path_buf(),
            source,
        })?;

        let tokens = self.extract_tokens(&image, image_path)?;
        log::info!(
            "{}: {} stat tokens across all passes",
            image_path.display(),
            tokens.len()
        );

        let mapper = ZoneMapper::new(&self.config);
        let mut stats = mapper.map_to_zones(&tokens);

        for token in infer::infer_missing(&self.recognizer, &image, &stats, &self.config) {
            let zone = crate::zones::zone_for_point(token.center().0, token.center().1);
            stats
                .entry(zone)
                .or_insert_with(|| ZoneStat::not_available(token.center()));
        }

        Ok(stats)
    }

    /// Runs all preprocessing variants in fixed order and pools the tokens
    /// that pass the per-variant confidence floor and the stat classifier.
    ///
    /// A failing variant is skipped; only when every variant fails does the
    /// call escalate. Duplicates across variants are kept here on purpose;
    /// collapsing them is the zone mapper's job.
    pub fn extract_tokens(
        &self,
        image: &DynamicImage,
        image_path: &Path,
    ) -> Result<Vec<RecognizedToken>, ExtractError> {
        let gray = preprocess::to_grayscale(image);

        let variants: Vec<(DynamicImage, RecognizeOpts, f32)> = vec![
            (
                DynamicImage::ImageLuma8(gray.clone()),
                RecognizeOpts::sparse(PassKind::Grayscale),
                self.config.base_confidence_floor,
            ),
            (
                DynamicImage::ImageLuma8(preprocess::otsu_threshold(&gray)),
                RecognizeOpts::sparse(PassKind::Otsu),
                self.config.derived_confidence_floor,
            ),
            (
                DynamicImage::ImageLuma8(preprocess::adaptive_threshold(&gray, 15, 10)),
                RecognizeOpts::sparse(PassKind::Adaptive),
                self.config.derived_confidence_floor,
            ),
            (
                DynamicImage::ImageLuma8(preprocess::blur_threshold(&gray, 1.5)),
                RecognizeOpts::sparse(PassKind::BlurOtsu),
                self.config.derived_confidence_floor,
            ),
            (
                image.clone(),
                RecognizeOpts::sparse(PassKind::OriginalColor).with_allowlist(STAT_ALLOWLIST),
                self.config.base_confidence_floor,
            ),
        ];

        let mut tokens = Vec::new();
        let mut succeeded = 0usize;

        for (variant, opts, floor) in &variants {
            match self.recognizer.recognize(variant, opts) {
                Ok(raw) => {
                    succeeded += 1;
                    let before = tokens.len();
                    tokens.extend(raw.into_iter().filter(|t| {
                        t.confidence >= *floor && classify::is_basketball_stat(&t.text)
                    }));
                    log::debug!(
                        "{} pass: {} stat tokens kept",
                        opts.pass,
                        tokens.len() - before
                    );
                }
                Err(e) => {
                    log::warn!("Skipping {} pass: {}", opts.pass, e);
                }
            }
        }

        if succeeded == 0 {
            return Err(ExtractError::AllVariantsFailed {
                path: image_path.to_path_buf(),
            });
        }

        Ok(tokens)
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted recognizer for pipeline tests; no Tesseract required.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use image::DynamicImage;

    use super::engine::{PassKind, RecognizeOpts, RecognizedToken, TextRecognizer};
    use super::error::ExtractError;

    /// Returns canned tokens per pass and records the pass order.
    #[derive(Default)]
    pub struct ScriptedRecognizer {
        responses: HashMap<PassKind, Vec<RecognizedToken>>,
        failing: Vec<PassKind>,
        pub calls: Mutex<Vec<PassKind>>,
    }

    impl ScriptedRecognizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tokens(mut self, pass: PassKind, tokens: Vec<RecognizedToken>) -> Self {
            self.responses.insert(pass, tokens);
            self
        }

        pub fn failing_on(mut self, pass: PassKind) -> Self {
            self.failing.push(pass);
            self
        }

        pub fn fail_all(mut self) -> Self {
            self.failing = vec![
                PassKind::Grayscale,
                PassKind::Otsu,
                PassKind::Adaptive,
                PassKind::BlurOtsu,
                PassKind::OriginalColor,
                PassKind::NaScan,
            ];
            self
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(
            &self,
            _image: &DynamicImage,
            opts: &RecognizeOpts,
        ) -> Result<Vec<RecognizedToken>, ExtractError> {
            self.calls.lock().unwrap().push(opts.pass);
            if self.failing.contains(&opts.pass) {
                return Err(ExtractError::recognition(opts.pass, "scripted failure"));
            }
            Ok(self.responses.get(&opts.pass).cloned().unwrap_or_default())
        }
    }

    pub fn token(text: &str, cx: u32, cy: u32, confidence: f32, pass: PassKind) -> RecognizedToken {
        RecognizedToken {
            text: text.to_string(),
            x: cx,
            y: cy,
            width: 0,
            height: 0,
            confidence,
            pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{token, ScriptedRecognizer};
    use super::*;

    fn service(recognizer: ScriptedRecognizer) -> ShotChartOcr<ScriptedRecognizer> {
        ShotChartOcr::new(recognizer, ExtractionConfig::default())
    }

    #[test]
    fn test_variant_order_is_fixed() {
        let ocr = service(ScriptedRecognizer::new());
        let image = DynamicImage::new_rgb8(800, 600);
        ocr.extract_tokens(&image, Path::new("chart.png")).unwrap();

        let calls = ocr.recognizer.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                PassKind::Grayscale,
                PassKind::Otsu,
                PassKind::Adaptive,
                PassKind::BlurOtsu,
                PassKind::OriginalColor,
            ]
        );
    }

    #[test]
    fn test_tokens_pooled_without_deduplication() {
        let recognizer = ScriptedRecognizer::new()
            .with_tokens(
                PassKind::Grayscale,
                vec![token("27/70", 100, 100, 90.0, PassKind::Grayscale)],
            )
            .with_tokens(
                PassKind::Otsu,
                vec![token("27/70", 101, 100, 85.0, PassKind::Otsu)],
            );
        let ocr = service(recognizer);
        let image = DynamicImage::new_rgb8(800, 600);

        let tokens = ocr.extract_tokens(&image, Path::new("chart.png")).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].pass, PassKind::Grayscale);
        assert_eq!(tokens[1].pass, PassKind::Otsu);
    }

    #[test]
    fn test_confidence_floor_per_variant() {
        // 25 passes the base floor (20) but not the derived floor (30)
        let recognizer = ScriptedRecognizer::new()
            .with_tokens(
                PassKind::Grayscale,
                vec![token("5/10", 100, 100, 25.0, PassKind::Grayscale)],
            )
            .with_tokens(
                PassKind::Otsu,
                vec![token("8/12", 300, 100, 25.0, PassKind::Otsu)],
            );
        let ocr = service(recognizer);
        let image = DynamicImage::new_rgb8(800, 600);

        let tokens = ocr.extract_tokens(&image, Path::new("chart.png")).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "5/10");
    }

    #[test]
    fn test_non_stat_tokens_filtered() {
        let recognizer = ScriptedRecognizer::new().with_tokens(
            PassKind::Grayscale,
            vec![
                token("FIELD", 10, 10, 95.0, PassKind::Grayscale),
                token("27/70", 100, 100, 95.0, PassKind::Grayscale),
                token("12345", 200, 200, 95.0, PassKind::Grayscale),
            ],
        );
        let ocr = service(recognizer);
        let image = DynamicImage::new_rgb8(800, 600);

        let tokens = ocr.extract_tokens(&image, Path::new("chart.png")).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "27/70");
    }

    #[test]
    fn test_failed_variant_skipped() {
        let recognizer = ScriptedRecognizer::new()
            .failing_on(PassKind::Otsu)
            .with_tokens(
                PassKind::Grayscale,
                vec![token("27/70", 100, 100, 90.0, PassKind::Grayscale)],
            );
        let ocr = service(recognizer);
        let image = DynamicImage::new_rgb8(800, 600);

        let tokens = ocr.extract_tokens(&image, Path::new("chart.png")).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_all_variants_failing_escalates() {
        let ocr = service(ScriptedRecognizer::new().fail_all());
        let image = DynamicImage::new_rgb8(800, 600);

        let err = ocr
            .extract_tokens(&image, Path::new("chart.png"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::AllVariantsFailed { .. }));
    }

    #[test]
    fn test_extract_stats_missing_image_is_image_read_error() {
        let ocr = service(ScriptedRecognizer::new());
        let err = ocr
            .extract_stats(Path::new("no_such_chart.png"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::ImageRead { .. }));
    }
}
