//! Analysis of extracted shooting data.
//!
//! This module provides:
//! - Game-count scaling and percentage derivation
//! - Fixed-order similarity vectors and pairwise player similarity
//! - Qualitative strengths/weaknesses/style profiles
//! - JSON export of results

pub mod export;
pub mod profile;
pub mod scaling;
pub mod similarity;

pub use profile::{profile, PlayerProfile};
pub use scaling::{add_player_with_scaling, edit_zone, percentage_of, scale_to_games};
pub use similarity::{
    similarity, similarity_matrix, top_similar, vector, SimilarityError, SimilarityMethod,
};
