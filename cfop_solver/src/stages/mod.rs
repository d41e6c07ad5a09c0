//! The four CFOP stages and what it means for each one to be done.

use cube_core::{Algorithm, Corner, CubeState, Edge, Face};
use internment::ArcIntern;
use serde::{Deserialize, Serialize};

use crate::StageFailure;

mod cross;
mod f2l;
mod last_layer;

pub use cross::CrossSolver;
pub use f2l::F2lSolver;
pub use last_layer::{OllSolver, PllSolver};

/// A stage of the solve, in the order they run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Cross,
    F2l,
    Oll,
    Pll,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Cross, Stage::F2l, Stage::Oll, Stage::Pll];

    /// The stage that must be complete before this one can run
    #[must_use]
    pub fn prerequisite(self) -> Option<Stage> {
        match self {
            Stage::Cross => None,
            Stage::F2l => Some(Stage::Cross),
            Stage::Oll => Some(Stage::F2l),
            Stage::Pll => Some(Stage::Oll),
        }
    }
}

/// How far a state is from completing a stage. Lower is better and zero means complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StageMetric {
    pub stage: Stage,
    pub complete: bool,
    pub metric: u32,
}

impl StageMetric {
    pub(crate) fn new(stage: Stage, metric: u32) -> StageMetric {
        StageMetric {
            stage,
            complete: metric == 0,
            metric,
        }
    }
}

/// A named sequence of moves a stage proposes to apply next
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub name: ArcIntern<str>,
    pub algorithm: Algorithm,
}

impl Step {
    pub(crate) fn new(name: &str, algorithm: Algorithm) -> Step {
        Step {
            name: ArcIntern::from(name),
            algorithm,
        }
    }
}

/// One stage of the solve.
///
/// The pipeline calls `analyze` to decide whether the stage is done and `next_step` to make progress. A step is only committed if it strictly lowers the metric.
pub trait StageSolver {
    fn stage(&self) -> Stage;

    fn analyze(&self, state: &CubeState) -> StageMetric;

    /// Propose the next step.
    ///
    /// # Errors
    ///
    /// Returns a failure if the stage cannot find any step for this state.
    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure>;
}

/// The edges of the cross, in `DR DF DL DB` order
pub(crate) const CROSS_EDGES: [Edge; 4] = [Edge::DR, Edge::DF, Edge::DL, Edge::DB];

/// The corner and edge of each F2L slot
pub(crate) const SLOTS: [(Corner, Edge); 4] = [
    (Corner::DFR, Edge::FR),
    (Corner::DLF, Edge::FL),
    (Corner::DBL, Edge::BL),
    (Corner::DRB, Edge::BR),
];

pub(crate) fn misplaced_cross_edges(state: &CubeState) -> u32 {
    let misplaced = CROSS_EDGES
        .iter()
        .filter(|&&edge| !state.is_edge_solved(edge))
        .count();

    u32::try_from(misplaced).unwrap_or(u32::MAX)
}

pub(crate) fn slot_solved(state: &CubeState, slot: usize) -> bool {
    let (corner, edge) = SLOTS[slot];
    state.is_corner_solved(corner) && state.is_edge_solved(edge)
}

pub(crate) fn unsolved_slots(state: &CubeState) -> Vec<usize> {
    (0..SLOTS.len())
        .filter(|&slot| !slot_solved(state, slot))
        .collect()
}

pub(crate) fn first_two_layers_solved(state: &CubeState) -> bool {
    state.centers_home() && misplaced_cross_edges(state) == 0 && unsolved_slots(state).is_empty()
}

pub(crate) fn last_layer_oriented(state: &CubeState) -> bool {
    first_two_layers_solved(state) && state.is_face_uniform(Face::U)
}

/// The U turns that finish a cube whose last layer is solved apart from its alignment
pub(crate) fn finishing_auf(state: &CubeState) -> Option<u8> {
    (0..4).find(|&k| state.with_algorithm(&Algorithm::u_turns(k)).is_fully_solved())
}

/// A stage checks its own metric, but the pipeline also needs a yes/no answer per stage to enforce ordering.
pub(crate) fn stage_complete(stage: Stage, state: &CubeState) -> bool {
    match stage {
        Stage::Cross => state.centers_home() && misplaced_cross_edges(state) == 0,
        Stage::F2l => first_two_layers_solved(state),
        Stage::Oll => last_layer_oriented(state),
        Stage::Pll => state.centers_home() && state.is_fully_solved(),
    }
}

#[cfg(test)]
mod tests {
    use cube_core::parse_notation;

    use super::*;

    #[test]
    fn solved_cube_completes_every_stage() {
        let cube = CubeState::solved();
        for stage in Stage::ALL {
            assert!(stage_complete(stage, &cube));
        }
        assert_eq!(finishing_auf(&cube), Some(0));
    }

    #[test]
    fn u_turn_only_breaks_the_last_stage() {
        let cube = CubeState::solved().with_algorithm(&parse_notation("U").unwrap());

        assert!(stage_complete(Stage::Cross, &cube));
        assert!(stage_complete(Stage::F2l, &cube));
        assert!(stage_complete(Stage::Oll, &cube));
        assert!(!stage_complete(Stage::Pll, &cube));
        assert_eq!(finishing_auf(&cube), Some(3));
    }

    #[test]
    fn sexy_move_breaks_one_slot() {
        let cube = CubeState::solved().with_algorithm(&parse_notation("R U R' U'").unwrap());

        assert_eq!(misplaced_cross_edges(&cube), 0);
        assert_eq!(unsolved_slots(&cube), vec![0]);
    }
}
