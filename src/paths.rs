use std::path::PathBuf;
use std::sync::OnceLock;

static APP_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the application data directory:
/// `<platform local data dir>/shotchart-analyzer/`
pub fn app_data_dir() -> &'static PathBuf {
    APP_DATA_DIR.get_or_init(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shotchart-analyzer")
    })
}

/// Returns the player store file: `<app_data_dir>/players.json`
pub fn player_store_path() -> PathBuf {
    app_data_dir().join("players.json")
}

/// Returns the directory holding downloaded Tesseract language data:
/// `<app_data_dir>/tessdata/`
pub fn tessdata_dir() -> PathBuf {
    app_data_dir().join("tessdata")
}

/// Ensures the data directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(app_data_dir())?;
    std::fs::create_dir_all(tessdata_dir())?;
    Ok(())
}
