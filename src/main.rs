//! Shot Chart Analyzer
//!
//! Extracts per-zone shooting statistics from basketball shot chart images
//! via multi-pass Tesseract OCR, stores them per player on a normalized
//! game-count basis, and compares players by similarity and profile.

mod analysis;
mod config;
mod ocr;
mod paths;
mod report;
mod store;
mod zones;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use analysis::{SimilarityError, SimilarityMethod};
use config::ExtractionConfig;
use ocr::{ShotChartOcr, TesseractEngine};
use store::{percentages_by_player, JsonPlayerStore, PlayerStore};
use zones::{ZoneName, ZoneReading};

#[derive(Parser)]
#[command(
    name = "shotchart-analyzer",
    about = "Extract per-zone shooting stats from shot chart images and compare players"
)]
struct Cli {
    /// Path to a config.json overriding the extraction defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract zone statistics from a shot chart image
    Extract {
        /// Shot chart image (PNG/JPEG)
        image: PathBuf,
        /// Save the result under this player name
        #[arg(long)]
        player: Option<String>,
        /// Games the chart's raw data was collected over
        #[arg(long)]
        games: Option<u32>,
        /// Also write the raw zone stats to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List stored players
    List,
    /// Remove a stored player
    Remove { name: String },
    /// Set one zone's made/attempts for a player, rescaled to the target games
    Edit {
        name: String,
        /// Zone label, e.g. "Left Corner 3"
        zone: String,
        made: u32,
        attempts: u32,
        /// Games the corrected numbers were collected over
        #[arg(long)]
        games: Option<u32>,
    },
    /// Show a player's shooting profile
    Profile {
        name: String,
        /// Also write the profile to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Find the players most similar to the given one
    Similar {
        name: String,
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// "cosine" or "euclidean"
        #[arg(long, default_value = "cosine")]
        method: String,
    },
    /// Compare two players zone by zone
    Compare {
        first: String,
        second: String,
        #[arg(long, default_value = "cosine")]
        method: String,
    },
    /// Print the full similarity matrix over all stored players
    Matrix {
        #[arg(long, default_value = "cosine")]
        method: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    paths::ensure_directories().context("Failed to create app data directories")?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| paths::app_data_dir().join("config.json"));
    let config = ExtractionConfig::load(&config_path);

    let mut store = JsonPlayerStore::open(&paths::player_store_path());

    match cli.command {
        Command::Extract {
            image,
            player,
            games,
            json,
        } => cmd_extract(&mut store, &config, &image, player, games, json),
        Command::List => cmd_list(&store),
        Command::Remove { name } => cmd_remove(&mut store, &name),
        Command::Edit {
            name,
            zone,
            made,
            attempts,
            games,
        } => cmd_edit(&mut store, &config, &name, &zone, made, attempts, games),
        Command::Profile { name, json } => cmd_profile(&store, &name, json),
        Command::Similar { name, top, method } => cmd_similar(&store, &name, top, &method),
        Command::Compare {
            first,
            second,
            method,
        } => cmd_compare(&store, &first, &second, &method),
        Command::Matrix { method } => cmd_matrix(&store, &method),
    }
}

fn cmd_extract(
    store: &mut JsonPlayerStore,
    config: &ExtractionConfig,
    image: &PathBuf,
    player: Option<String>,
    games: Option<u32>,
    json: Option<PathBuf>,
) -> Result<()> {
    let engine = TesseractEngine::new()?;
    let ocr = ShotChartOcr::new(engine, config.clone());

    let stats = ocr
        .extract_stats(image)
        .with_context(|| format!("Extraction failed for {}", image.display()))?;

    print!("{}", report::zone_table(&stats));

    if let Some(path) = &json {
        analysis::export::export_to_json(&stats, path)?;
        log::info!("Zone stats written to {}", path.display());
    }

    if let Some(name) = player {
        let mut made = BTreeMap::new();
        let mut attempts = BTreeMap::new();
        for (&zone, stat) in &stats {
            if let ZoneReading::Measured {
                made: m,
                attempts: a,
                ..
            } = &stat.reading
            {
                made.insert(zone, *m);
                attempts.insert(zone, *a);
            }
        }

        let original_games = games.unwrap_or(config.target_games);
        let record = analysis::add_player_with_scaling(
            store,
            &name,
            &made,
            &attempts,
            original_games,
            config.target_games,
        )?;
        log::info!(
            "Saved '{}': {} zones, scaled {} -> {} games",
            name,
            record.made_shots.len(),
            original_games,
            record.games_played
        );
    }

    Ok(())
}

fn cmd_list(store: &JsonPlayerStore) -> Result<()> {
    if store.count() == 0 {
        println!("No players stored.");
        return Ok(());
    }

    for (name, record) in store.get_all() {
        println!(
            "{:<24} {} zones, {} games (from {}), updated {}",
            name,
            record.percentages.len(),
            record.games_played,
            record.original_games,
            record.updated_at
        );
    }
    println!("{} player(s).", store.count());
    Ok(())
}

fn cmd_remove(store: &mut JsonPlayerStore, name: &str) -> Result<()> {
    if store.remove(name)? {
        println!("Removed '{}'.", name);
    } else {
        println!("No player named '{}'.", name);
    }
    Ok(())
}

fn cmd_edit(
    store: &mut JsonPlayerStore,
    config: &ExtractionConfig,
    name: &str,
    zone: &str,
    made: u32,
    attempts: u32,
    games: Option<u32>,
) -> Result<()> {
    let zone: ZoneName = zone.parse().map_err(|e: String| anyhow!(e))?;

    let record =
        analysis::edit_zone(store, name, zone, made, attempts, games, config.target_games)
            .with_context(|| format!("Failed to edit {} for '{}'", zone, name))?;

    println!(
        "{}: {} set to {}/{} ({:.1}%).",
        name,
        zone,
        record.made_shots[&zone],
        record.attempts[&zone],
        record.percentages[&zone]
    );
    Ok(())
}

fn cmd_profile(store: &JsonPlayerStore, name: &str, json: Option<PathBuf>) -> Result<()> {
    let record = store
        .get(name)
        .ok_or_else(|| SimilarityError::PlayerNotFound(name.to_string()))?;

    let profile = analysis::profile(&record.percentages);
    print!("{}", report::profile_summary(name, &profile));

    if let Some(path) = &json {
        analysis::export::export_to_json(&profile, path)?;
        log::info!("Profile written to {}", path.display());
    }
    Ok(())
}

fn cmd_similar(store: &JsonPlayerStore, name: &str, top: usize, method: &str) -> Result<()> {
    let method: SimilarityMethod = method.parse()?;
    let players = percentages_by_player(store);

    let results = analysis::top_similar(name, &players, top, method, true)?;
    if results.is_empty() {
        println!("No other players to compare against.");
    } else {
        print!("{}", report::similarity_table(&results));
    }
    Ok(())
}

fn cmd_compare(store: &JsonPlayerStore, first: &str, second: &str, method: &str) -> Result<()> {
    let method_parsed: SimilarityMethod = method.parse()?;
    let record_a = store
        .get(first)
        .ok_or_else(|| SimilarityError::PlayerNotFound(first.to_string()))?;
    let record_b = store
        .get(second)
        .ok_or_else(|| SimilarityError::PlayerNotFound(second.to_string()))?;

    println!("{:<17} {:>8} {:>8}", "Zone", first, second);
    for zone in ZoneName::ALL {
        let a = record_a.percentages.get(&zone).copied().unwrap_or(0.0);
        let b = record_b.percentages.get(&zone).copied().unwrap_or(0.0);
        println!("{:<17} {:>7.1}% {:>7.1}%", zone.label(), a, b);
    }

    let score = analysis::similarity(
        &analysis::vector(&record_a.percentages),
        &analysis::vector(&record_b.percentages),
        method_parsed,
    );
    println!("\nSimilarity ({}): {:.3}", method, score);
    Ok(())
}

fn cmd_matrix(store: &JsonPlayerStore, method: &str) -> Result<()> {
    let method: SimilarityMethod = method.parse()?;
    let players = percentages_by_player(store);
    if players.is_empty() {
        println!("No players stored.");
        return Ok(());
    }

    let (matrix, names) = analysis::similarity_matrix(&players, method);
    print!("{}", report::matrix_table(&matrix, &names));
    Ok(())
}
