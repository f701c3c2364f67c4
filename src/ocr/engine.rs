//! Tesseract adapter.
//!
//! Wraps the external Tesseract CLI behind the [`TextRecognizer`] trait so
//! the pipeline (and its tests) never depend on a real install. Each call
//! writes the image variant to a temp file, asks Tesseract for TSV output,
//! and parses the word rows into positioned tokens.

use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::error::ExtractError;
use super::setup::{find_tesseract_executable, find_tessdata_dir};

/// Which preprocessing variant (or later pass) produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Unmodified grayscale conversion
    Grayscale,
    /// Global Otsu binarization
    Otsu,
    /// Adaptive local mean threshold
    Adaptive,
    /// Gaussian blur followed by Otsu binarization
    BlurOtsu,
    /// Original color image with a restricted character allow-list
    OriginalColor,
    /// Restricted N/A scan cropped to a single zone
    NaScan,
    /// Synthesized token, no recognition behind it
    Synthetic,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassKind::Grayscale => "grayscale",
            PassKind::Otsu => "otsu-threshold",
            PassKind::Adaptive => "adaptive-threshold",
            PassKind::BlurOtsu => "blur-threshold",
            PassKind::OriginalColor => "original-color",
            PassKind::NaScan => "na-scan",
            PassKind::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

/// A positioned text fragment from one recognition pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedToken {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// 0-100, as reported by the recognizer
    pub confidence: f32,
    pub pass: PassKind,
}

impl RecognizedToken {
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Per-pass recognition settings.
#[derive(Debug, Clone)]
pub struct RecognizeOpts {
    pub pass: PassKind,
    /// Tesseract page segmentation mode. 11 (sparse text) for whole-chart
    /// passes, 7 (single line) for the zone-scoped N/A scan.
    pub psm: u32,
    /// Restrict recognition to these characters when set.
    pub allowlist: Option<String>,
}

impl RecognizeOpts {
    pub fn sparse(pass: PassKind) -> Self {
        Self {
            pass,
            psm: 11,
            allowlist: None,
        }
    }

    pub fn with_allowlist(mut self, chars: &str) -> Self {
        self.allowlist = Some(chars.to_string());
        self
    }
}

/// The seam between the pipeline and the external OCR capability.
pub trait TextRecognizer {
    fn recognize(
        &self,
        image: &DynamicImage,
        opts: &RecognizeOpts,
    ) -> Result<Vec<RecognizedToken>, ExtractError>;
}

/// Recognizer backed by the Tesseract CLI.
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: PathBuf,
}

impl TesseractEngine {
    /// Locates (or provisions) Tesseract on the host.
    pub fn new() -> Result<Self, ExtractError> {
        let executable = find_tesseract_executable()?;
        let tessdata = find_tessdata_dir()?;
        log::debug!(
            "Using tesseract at {} (tessdata: {})",
            executable.display(),
            tessdata.display()
        );
        Ok(Self {
            executable,
            tessdata,
        })
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(
        &self,
        image: &DynamicImage,
        opts: &RecognizeOpts,
    ) -> Result<Vec<RecognizedToken>, ExtractError> {
        let temp_input = NamedTempFile::with_suffix(".png")
            .map_err(|e| ExtractError::recognition(opts.pass, e.to_string()))?;
        image
            .save(temp_input.path())
            .map_err(|e| ExtractError::recognition(opts.pass, e.to_string()))?;

        // Tesseract appends .tsv to the output base itself
        let temp_output = NamedTempFile::new()
            .map_err(|e| ExtractError::recognition(opts.pass, e.to_string()))?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let mut command = Command::new(&self.executable);
        command
            .arg(temp_input.path())
            .arg(&output_base)
            .arg("--tessdata-dir")
            .arg(&self.tessdata)
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg(opts.psm.to_string());
        if let Some(chars) = &opts.allowlist {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={}", chars));
        }
        command.arg("tsv");

        let output = command
            .output()
            .map_err(|e| ExtractError::recognition(opts.pass, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::recognition(
                opts.pass,
                format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)
            .map_err(|e| ExtractError::recognition(opts.pass, e.to_string()))?;
        let _ = std::fs::remove_file(&tsv_path);

        Ok(parse_tsv_words(&tsv_content, opts.pass))
    }
}

/// Parses Tesseract TSV output, keeping word rows (level 5) with a
/// nonnegative confidence and nonempty text.
fn parse_tsv_words(tsv: &str, pass: PassKind) -> Vec<RecognizedToken> {
    let mut tokens = Vec::new();

    for line in tsv.lines().skip(1) {
        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let x: u32 = fields[6].parse().unwrap_or(0);
        let y: u32 = fields[7].parse().unwrap_or(0);
        let width: u32 = fields[8].parse().unwrap_or(0);
        let height: u32 = fields[9].parse().unwrap_or(0);

        tokens.push(RecognizedToken {
            text: text.to_string(),
            x,
            y,
            width,
            height,
            confidence: conf,
            pass,
        });
    }

    tokens
}
