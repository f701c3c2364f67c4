//! Stat normalization and game-count scaling.
//!
//! Players are stored on a common game-count basis (default 44 games) so a
//! 20-game season and a 60-game season compare fairly. Counts scale
//! linearly and round half-to-even; percentages are one decimal,
//! half-to-even.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::store::{PlayerRecord, PlayerStore};
use crate::zones::ZoneName;

/// Scales a made/attempts pair from `original_games` to `target_games`.
/// Identity when `original_games` is zero (nothing meaningful to scale by).
pub fn scale_to_games(
    made: u32,
    attempts: u32,
    original_games: u32,
    target_games: u32,
) -> (u32, u32) {
    if original_games == 0 {
        return (made, attempts);
    }

    let factor = target_games as f64 / original_games as f64;
    (
        (made as f64 * factor).round_ties_even() as u32,
        (attempts as f64 * factor).round_ties_even() as u32,
    )
}

/// `100 * made / attempts`, one decimal, half-to-even; exactly 0.0 when
/// there are no attempts.
pub fn percentage_of(made: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    let pct = made as f64 / attempts as f64 * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

/// Scales a player's per-zone counts to the target game count, derives the
/// percentages, and writes the assembled record through the store.
pub fn add_player_with_scaling(
    store: &mut dyn PlayerStore,
    name: &str,
    made_shots: &BTreeMap<ZoneName, u32>,
    attempts: &BTreeMap<ZoneName, u32>,
    original_games: u32,
    target_games: u32,
) -> Result<PlayerRecord> {
    let mut scaled_made = BTreeMap::new();
    let mut scaled_attempts = BTreeMap::new();
    let mut percentages = BTreeMap::new();

    for (&zone, &made) in made_shots {
        let zone_attempts = attempts.get(&zone).copied().unwrap_or(0);
        let (m, a) = scale_to_games(made, zone_attempts, original_games, target_games);
        scaled_made.insert(zone, m);
        scaled_attempts.insert(zone, a);
        percentages.insert(zone, percentage_of(m, a));
    }

    let record = PlayerRecord::new(
        percentages,
        scaled_made,
        scaled_attempts,
        target_games,
        original_games,
    );
    store.put(name, record.clone())?;
    Ok(record)
}

/// Applies a manual per-zone correction to a player's record, rescaled to
/// the target game count. Creates the record when the player is new;
/// otherwise only the edited zone changes. The zone's percentage is always
/// recomputed from the scaled counts.
///
/// `games` overrides the game count the corrected numbers were collected
/// over; when absent, the record's own `original_games` applies (or the
/// target count for a new player).
pub fn edit_zone(
    store: &mut dyn PlayerStore,
    name: &str,
    zone: ZoneName,
    made: u32,
    attempts: u32,
    games: Option<u32>,
    target_games: u32,
) -> Result<PlayerRecord> {
    if made > attempts {
        bail!("made ({}) cannot exceed attempts ({})", made, attempts);
    }

    let mut record = store.get(name).cloned().unwrap_or_else(|| {
        PlayerRecord::new(
            BTreeMap::new(),
            BTreeMap::new(),
            BTreeMap::new(),
            target_games,
            games.unwrap_or(target_games),
        )
    });

    let original_games = games.unwrap_or(record.original_games);
    let (scaled_made, scaled_attempts) =
        scale_to_games(made, attempts, original_games, target_games);

    record.made_shots.insert(zone, scaled_made);
    record.attempts.insert(zone, scaled_attempts);
    record
        .percentages
        .insert(zone, percentage_of(scaled_made, scaled_attempts));
    record.touch();

    store.put(name, record.clone())?;
    Ok(record)
}
