use std::{collections::VecDeque, sync::LazyLock};

use cube_core::{Algorithm, CubeState, Edge, FACELET_COUNT, FaceletPermutation, Move, algorithm_permutation};
use log::{debug, trace};

use super::{CROSS_EDGES, Stage, StageMetric, StageSolver, Step, misplaced_cross_edges};
use crate::StageFailure;

const EDGE_FACELETS: usize = 24;
const UNREACHED: u8 = u8::MAX;

/// Index of every edge facelet among the 24 edge facelets, or `None` for corners and centers
static EDGE_FACELET_INDEX: LazyLock<[Option<u8>; FACELET_COUNT]> = LazyLock::new(|| {
    let mut index = [None; FACELET_COUNT];
    for (i, facelet) in Edge::ALL.iter().flat_map(|edge| edge.facelets()).enumerate() {
        index[facelet] = u8::try_from(i).ok();
    }
    index
});

/// Where the D sticker of each cross edge sits, as an index into the edge facelets
type Placement = [u8; 4];

fn placement_index(placement: Placement) -> usize {
    placement
        .iter()
        .fold(0, |acc, &facelet| acc * EDGE_FACELETS + usize::from(facelet))
}

/// Move tables restricted to edge facelets
struct CrossTables {
    moves: [Move; 18],
    /// `edge_moves[m][i]` is where edge facelet `i` goes under move `m`
    edge_moves: [[u8; EDGE_FACELETS]; 18],
    /// Moves to solve the cross, by placement
    distance: Vec<u8>,
}

impl CrossTables {
    fn new() -> CrossTables {
        let moves = Move::face_moves();
        let edge_facelets = Edge::ALL.map(Edge::facelets).concat();

        let edge_moves = moves.map(|move_| {
            let permutation: FaceletPermutation = algorithm_permutation(&Algorithm::new(vec![move_]));
            let mut table = [0; EDGE_FACELETS];
            for (slot, &facelet) in table.iter_mut().zip(&edge_facelets) {
                *slot = EDGE_FACELET_INDEX[usize::from(permutation[facelet])]
                    .unwrap_or_else(|| panic!("{move_} sends edge facelet {facelet} to a non edge facelet"));
            }
            table
        });

        let solved = CROSS_EDGES.map(|edge| {
            EDGE_FACELET_INDEX[edge.facelets()[0]].unwrap_or_else(|| panic!("{edge:?} has no edge facelets"))
        });

        let mut distance = vec![UNREACHED; EDGE_FACELETS.pow(4)];
        distance[placement_index(solved)] = 0;

        let mut queue = VecDeque::from([solved]);
        while let Some(placement) = queue.pop_front() {
            let next_distance = distance[placement_index(placement)] + 1;

            for table in &edge_moves {
                let next = placement.map(|facelet| table[usize::from(facelet)]);
                let slot = &mut distance[placement_index(next)];
                if *slot == UNREACHED {
                    *slot = next_distance;
                    queue.push_back(next);
                }
            }
        }

        debug!(
            "Built the cross table: {} placements, at most {} moves",
            distance.iter().filter(|&&d| d != UNREACHED).count(),
            distance.iter().filter(|&&d| d != UNREACHED).max().unwrap_or(&0)
        );

        CrossTables {
            moves,
            edge_moves,
            distance,
        }
    }
}

static CROSS_TABLES: LazyLock<CrossTables> = LazyLock::new(CrossTables::new);

/// Find where the D sticker of the piece that belongs at `home` currently is
fn locate(state: &CubeState, home: Edge) -> Option<u8> {
    let [d_color, side_color] = state.home_edge_colors(home);

    Edge::ALL.iter().find_map(|&edge| {
        let [a, b] = edge.facelets();
        let (ca, cb) = (state.facelet(a), state.facelet(b));

        if (ca, cb) == (d_color, side_color) {
            EDGE_FACELET_INDEX[a]
        } else if (ca, cb) == (side_color, d_color) {
            EDGE_FACELET_INDEX[b]
        } else {
            None
        }
    })
}

/// Solves the four D edges optimally
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossSolver;

impl StageSolver for CrossSolver {
    fn stage(&self) -> Stage {
        Stage::Cross
    }

    fn analyze(&self, state: &CubeState) -> StageMetric {
        StageMetric::new(Stage::Cross, misplaced_cross_edges(state))
    }

    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure> {
        let no_solution = || StageFailure::NoAlgorithmFound {
            stage: Stage::Cross,
            pattern: state.to_string(),
        };

        let tables = &*CROSS_TABLES;
        let mut placement: Placement = [0; 4];
        for (slot, &edge) in placement.iter_mut().zip(&CROSS_EDGES) {
            *slot = locate(state, edge).ok_or_else(no_solution)?;
        }

        let mut algorithm = Algorithm::default();
        let mut distance = tables.distance[placement_index(placement)];
        if distance == UNREACHED {
            return Err(no_solution());
        }

        // Every placement other than the solved one has a neighbour one move closer
        while distance > 0 {
            let (move_, next) = tables
                .moves
                .iter()
                .zip(&tables.edge_moves)
                .map(|(&move_, table)| (move_, placement.map(|facelet| table[usize::from(facelet)])))
                .find(|(_, next)| tables.distance[placement_index(*next)] == distance - 1)
                .ok_or_else(no_solution)?;

            trace!("Cross: {move_} leaves {}", distance - 1);
            algorithm.push(move_);
            placement = next;
            distance -= 1;
        }

        Ok(Step::new("cross", algorithm))
    }
}
