//! Tesseract provisioning.
//!
//! Locates the Tesseract executable and a tessdata directory on the host,
//! and downloads `eng.traineddata` into the app data directory when no
//! install carries it. Runs once at engine construction.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::error::ExtractError;
use crate::paths;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Well-known install locations checked after PATH.
const COMMON_EXECUTABLES: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

const COMMON_TESSDATA_DIRS: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];

/// Finds the Tesseract executable: PATH first, then well-known locations.
pub fn find_tesseract_executable() -> Result<PathBuf, ExtractError> {
    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for path in COMMON_EXECUTABLES {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(ExtractError::Setup(
        "tesseract executable not found; install Tesseract-OCR or add it to PATH".to_string(),
    ))
}

/// Finds a tessdata directory holding `eng.traineddata`.
///
/// Order: `TESSDATA_PREFIX` (directly or its `tessdata/` subdirectory), the
/// app data directory, then system install locations. Falls back to
/// downloading the trained data into the app data directory.
pub fn find_tessdata_dir() -> Result<PathBuf, ExtractError> {
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        for candidate in [PathBuf::from(&prefix), PathBuf::from(&prefix).join("tessdata")] {
            if candidate.join("eng.traineddata").exists() {
                return Ok(candidate);
            }
        }
    }

    let app_tessdata = paths::tessdata_dir();
    if app_tessdata.join("eng.traineddata").exists() {
        return Ok(app_tessdata);
    }

    for path in COMMON_TESSDATA_DIRS {
        let p = PathBuf::from(path);
        if p.join("eng.traineddata").exists() {
            return Ok(p);
        }
    }

    log::info!("eng.traineddata not found on host, downloading...");
    download_tessdata(&app_tessdata)?;
    Ok(app_tessdata)
}

/// Downloads `eng.traineddata` from the upstream tessdata repository.
fn download_tessdata(tessdata_dir: &PathBuf) -> Result<(), ExtractError> {
    fs::create_dir_all(tessdata_dir)?;

    let url = format!("{}/eng.traineddata", TESSDATA_REPO);
    let target = tessdata_dir.join("eng.traineddata");

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .map_err(|e| ExtractError::Setup(e.to_string()))?;

    let response = client
        .get(&url)
        .header("User-Agent", "shotchart-analyzer")
        .send()
        .map_err(|e| ExtractError::Setup(format!("download failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ExtractError::Setup(format!(
            "failed to download eng.traineddata: HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .map_err(|e| ExtractError::Setup(e.to_string()))?;
    let mut file = fs::File::create(&target)?;
    file.write_all(&bytes)?;

    log::info!(
        "Downloaded eng.traineddata ({} bytes) to {}",
        bytes.len(),
        target.display()
    );
    Ok(())
}
