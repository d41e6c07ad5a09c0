#![warn(clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::missing_panics_doc
)]

mod geometry;
mod moves;
pub mod pattern;
mod solvability;
mod state;

pub use geometry::{Corner, Edge, FACELET_COUNT, FaceletPermutation};
pub use moves::{Algorithm, Layer, MalformedMoveNotation, Move, Turns, algorithm_permutation, parse_notation};
pub use solvability::{
    Parity, SolvabilityDetail, SolvabilityError, SolvabilityReport, check_solvability,
    permutation_parity,
};
pub use state::{Color, CubeState, Face, InvalidCubeState};

/// A cube with every face showing a single color
#[must_use]
pub fn create_solved_cube() -> CubeState {
    CubeState::solved()
}

/// Apply whitespace separated moves to a state, consuming it and returning the result.
///
/// # Errors
///
/// Returns the first malformed token; no moves are applied in that case.
pub fn apply_move_sequence(
    mut state: CubeState,
    notation: &str,
) -> Result<CubeState, MalformedMoveNotation> {
    let algorithm = parse_notation(notation)?;
    state.apply_algorithm(&algorithm);
    Ok(state)
}
