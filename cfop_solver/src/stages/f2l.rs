//! Pair by pair F2L.
//!
//! Each step inserts one corner-edge pair. The search does not work with single moves but with macros: a U turn, or an insert `X U^k X'` where `X` is a quarter turn of a side face. An insert never breaks the cross and disturbs exactly one slot, so restricting the inserts to unsolved slots keeps every solved slot intact without checking it.

use std::sync::LazyLock;

use cube_core::{
    Algorithm, Corner, CubeState, Edge, FACELET_COUNT, Layer, Move, Turns, algorithm_permutation,
};
use itertools::Itertools;
use log::{debug, trace};

use super::{
    SLOTS, Stage, StageMetric, StageSolver, Step, misplaced_cross_edges, slot_solved,
    unsolved_slots,
};
use crate::StageFailure;

const PIECE_FACELETS: usize = 24;
const UNREACHED: u8 = u8::MAX;
const SLOT_NAMES: [&str; 4] = ["FR pair", "FL pair", "BL pair", "BR pair"];

struct Macro {
    algorithm: Algorithm,
    /// The slot an insert disturbs, `None` for U turns
    slot: Option<usize>,
    /// The side face turn an insert is built around
    conjugator: Option<Move>,
    corner_moves: [u8; PIECE_FACELETS],
    edge_moves: [u8; PIECE_FACELETS],
}

struct PieceFacelets {
    corner: [Option<u8>; FACELET_COUNT],
    edge: [Option<u8>; FACELET_COUNT],
}

static PIECE_FACELETS_INDEX: LazyLock<PieceFacelets> = LazyLock::new(|| {
    let mut corner = [None; FACELET_COUNT];
    let mut edge = [None; FACELET_COUNT];

    for (i, facelet) in Corner::ALL.iter().flat_map(|c| c.facelets()).enumerate() {
        corner[facelet] = u8::try_from(i).ok();
    }
    for (i, facelet) in Edge::ALL.iter().flat_map(|e| e.facelets()).enumerate() {
        edge[facelet] = u8::try_from(i).ok();
    }

    PieceFacelets { corner, edge }
});

fn pair_index(corner: u8, edge: u8) -> usize {
    usize::from(corner) * PIECE_FACELETS + usize::from(edge)
}

struct F2lTables {
    macros: Vec<Macro>,
    /// Macros needed to solve each slot's pair on its own, by `pair_index`
    pair_distance: [Vec<u8>; 4],
}

impl F2lTables {
    fn new() -> F2lTables {
        let index = &*PIECE_FACELETS_INDEX;
        let corner_facelets = Corner::ALL.map(Corner::facelets).concat();
        let edge_facelets = Edge::ALL.map(Edge::facelets).concat();

        let make_macro = |algorithm: Algorithm, slot, conjugator| {
            let permutation = algorithm_permutation(&algorithm);
            let follow = |facelets: &[usize], lookup: &[Option<u8>; FACELET_COUNT]| {
                let mut table = [0; PIECE_FACELETS];
                for (target, &facelet) in table.iter_mut().zip(facelets) {
                    *target = lookup[usize::from(permutation[facelet])]
                        .unwrap_or_else(|| panic!("{algorithm} moves a piece facelet onto a center"));
                }
                table
            };

            Macro {
                corner_moves: follow(&corner_facelets, &index.corner),
                edge_moves: follow(&edge_facelets, &index.edge),
                algorithm,
                slot,
                conjugator,
            }
        };

        let mut macros = [Turns::Clockwise, Turns::CounterClockwise, Turns::Half]
            .into_iter()
            .map(|turns| make_macro(Algorithm::new(vec![Move::new(Layer::U, turns)]), None, None))
            .collect_vec();

        for (layer, turns) in [Layer::R, Layer::L, Layer::F, Layer::B]
            .into_iter()
            .cartesian_product([Turns::Clockwise, Turns::CounterClockwise])
        {
            let conjugator = Move::new(layer, turns);

            for k in 1..4 {
                let algorithm = Algorithm::new(vec![conjugator])
                    .compose(&Algorithm::u_turns(k))
                    .compose(&Algorithm::new(vec![conjugator.inverse()]));

                let after = CubeState::solved().with_algorithm(&algorithm);
                let disturbed = unsolved_slots(&after);
                assert!(
                    misplaced_cross_edges(&after) == 0 && disturbed.len() == 1,
                    "{algorithm} is not an insert"
                );

                macros.push(make_macro(algorithm, Some(disturbed[0]), Some(conjugator)));
            }
        }

        let pair_distance = std::array::from_fn(|slot| {
            let (corner, edge) = SLOTS[slot];
            let solved = (
                index.corner[corner.facelets()[0]].unwrap_or_default(),
                index.edge[edge.facelets()[0]].unwrap_or_default(),
            );

            let mut distance = vec![UNREACHED; PIECE_FACELETS * PIECE_FACELETS];
            distance[pair_index(solved.0, solved.1)] = 0;
            let mut frontier = vec![solved];
            let mut depth = 0;

            while !frontier.is_empty() {
                depth += 1;
                let mut next_frontier = Vec::new();

                for (c, e) in frontier {
                    for macro_ in &macros {
                        let next = (
                            macro_.corner_moves[usize::from(c)],
                            macro_.edge_moves[usize::from(e)],
                        );
                        let entry = &mut distance[pair_index(next.0, next.1)];
                        if *entry == UNREACHED {
                            *entry = depth;
                            next_frontier.push(next);
                        }
                    }
                }

                frontier = next_frontier;
            }

            distance
        });

        debug!("Built F2L tables with {} macros", macros.len());

        F2lTables {
            macros,
            pair_distance,
        }
    }
}

static F2L_TABLES: LazyLock<F2lTables> = LazyLock::new(F2lTables::new);

/// The tracked sticker of each piece of a slot: the D sticker of the corner and the F/B sticker of the edge
fn locate_pair(state: &CubeState, slot: usize) -> Option<(u8, u8)> {
    let index = &*PIECE_FACELETS_INDEX;
    let (home_corner, home_edge) = SLOTS[slot];

    let corner_colors = state.home_corner_colors(home_corner);
    let corner = Corner::ALL.iter().find_map(|&c| {
        let colors = state.corner_colors(c);
        let same = colors.iter().all(|color| corner_colors.contains(color));
        let tracked = colors.iter().position(|&color| color == corner_colors[0])?;
        same.then(|| index.corner[c.facelets()[tracked]])?
    })?;

    let edge_colors = state.home_edge_colors(home_edge);
    let edge = Edge::ALL.iter().find_map(|&e| {
        let colors = state.edge_colors(e);
        let same = colors.iter().all(|color| edge_colors.contains(color));
        let tracked = colors.iter().position(|&color| color == edge_colors[0])?;
        same.then(|| index.edge[e.facelets()[tracked]])?
    })?;

    Some((corner, edge))
}

struct Search<'a> {
    tables: &'a F2lTables,
    slot: usize,
    allowed: Vec<usize>,
    path: Vec<usize>,
    nodes: u64,
}

impl Search<'_> {
    fn heuristic(&self, corner: u8, edge: u8) -> u8 {
        self.tables.pair_distance[self.slot][pair_index(corner, edge)]
    }

    /// Depth first search bounded by `budget` macros, leaving the solution in `path`
    fn search(&mut self, corner: u8, edge: u8, budget: u8) -> bool {
        self.nodes += 1;

        let h = self.heuristic(corner, edge);
        if h == 0 {
            return true;
        }
        if h > budget {
            return false;
        }

        for i in 0..self.allowed.len() {
            let candidate = self.allowed[i];
            let macro_ = &self.tables.macros[candidate];

            if let Some(&last) = self.path.last() {
                let previous = &self.tables.macros[last];
                // Adjacent U turns merge, and so do inserts around the same face turn
                if previous.slot.is_none() && macro_.slot.is_none() {
                    continue;
                }
                if macro_.conjugator.is_some() && previous.conjugator == macro_.conjugator {
                    continue;
                }
            }

            let next = (
                macro_.corner_moves[usize::from(corner)],
                macro_.edge_moves[usize::from(edge)],
            );

            self.path.push(candidate);
            if self.search(next.0, next.1, budget - 1) {
                return true;
            }
            self.path.pop();
        }

        false
    }
}

/// Inserts one pair per step
#[derive(Clone, Copy, Debug)]
pub struct F2lSolver {
    max_depth: u8,
}

impl F2lSolver {
    /// `max_depth` bounds the search in macros per pair
    #[must_use]
    pub fn new(max_depth: u8) -> F2lSolver {
        F2lSolver { max_depth }
    }

    fn solve_slot(&self, state: &CubeState, slot: usize, allowed: &[usize]) -> Option<Algorithm> {
        let tables = &*F2L_TABLES;
        let (corner, edge) = locate_pair(state, slot)?;

        let mut search = Search {
            tables,
            slot,
            allowed: allowed.to_vec(),
            path: Vec::new(),
            nodes: 0,
        };

        let start = search.heuristic(corner, edge);
        if start == UNREACHED {
            return None;
        }

        for budget in start..=self.max_depth {
            trace!("F2L slot {slot}: searching {budget} macros deep");
            if search.search(corner, edge, budget) {
                debug!(
                    "F2L slot {slot}: found {} macros after {} nodes",
                    search.path.len(),
                    search.nodes
                );

                let algorithm = search
                    .path
                    .iter()
                    .map(|&i| tables.macros[i].algorithm.clone())
                    .fold(Algorithm::default(), |acc, next| acc.compose(&next));

                return Some(algorithm.simplified());
            }
        }

        None
    }
}

impl Default for F2lSolver {
    fn default() -> Self {
        F2lSolver::new(9)
    }
}

impl StageSolver for F2lSolver {
    fn stage(&self) -> Stage {
        Stage::F2l
    }

    fn analyze(&self, state: &CubeState) -> StageMetric {
        let unsolved = u32::try_from(unsolved_slots(state).len()).unwrap_or(u32::MAX);
        StageMetric::new(Stage::F2l, unsolved + misplaced_cross_edges(state))
    }

    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure> {
        let tables = &*F2L_TABLES;
        let unsolved = unsolved_slots(state);

        let allowed = tables
            .macros
            .iter()
            .enumerate()
            .filter(|(_, m)| m.slot.is_none_or(|slot| unsolved.contains(&slot)))
            .map(|(i, _)| i)
            .collect_vec();

        // Closest pair first
        let order = unsolved
            .iter()
            .copied()
            .sorted_by_key(|&slot| {
                locate_pair(state, slot).map_or(UNREACHED, |(c, e)| {
                    tables.pair_distance[slot][pair_index(c, e)]
                })
            })
            .collect_vec();

        for slot in order {
            if let Some(algorithm) = self.solve_slot(state, slot, &allowed) {
                debug_assert!(slot_solved(&state.with_algorithm(&algorithm), slot));
                return Ok(Step::new(SLOT_NAMES[slot], algorithm));
            }
        }

        Err(StageFailure::NoAlgorithmFound {
            stage: Stage::F2l,
            pattern: state.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use cube_core::parse_notation;

    use super::*;

    #[test]
    fn every_insert_disturbs_one_slot() {
        let tables = &*F2L_TABLES;
        assert_eq!(tables.macros.len(), 27);

        for slot in 0..4 {
            let inserts = tables
                .macros
                .iter()
                .filter(|m| m.slot == Some(slot))
                .count();
            assert_eq!(inserts, 6);
        }
    }

    #[test]
    fn inserts_a_simple_pair() {
        let solver = F2lSolver::default();
        let state = CubeState::solved().with_algorithm(&parse_notation("R U R'").unwrap());

        let step = solver.next_step(&state).unwrap();
        assert_eq!(step.algorithm.to_string(), "R U' R'");
        assert_eq!(&*step.name, "FR pair");
    }

    #[test]
    fn finishes_f2l_after_random_crosses() {
        let solver = F2lSolver::default();
        let cross = super::super::CrossSolver;
        let mut rng = fastrand::Rng::with_seed(77);
        let moves = Move::face_moves();

        for _ in 0..20 {
            let mut state = CubeState::solved();
            for _ in 0..25 {
                state.apply(moves[rng.usize(..moves.len())]);
            }
            state.apply_algorithm(&cross.next_step(&state).unwrap().algorithm);

            for _ in 0..4 {
                let before = solver.analyze(&state);
                if before.complete {
                    break;
                }

                let step = solver.next_step(&state).unwrap();
                state.apply_algorithm(&step.algorithm);
                assert!(solver.analyze(&state).metric < before.metric);
                assert_eq!(misplaced_cross_edges(&state), 0);
            }

            assert!(solver.analyze(&state).complete);
        }
    }
}
