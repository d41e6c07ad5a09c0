use cube_core::{
    Algorithm, CubeState, Face,
    pattern::{PATTERN_FACELETS, PatternKind, extract},
};
use log::{debug, trace};

use super::{
    Stage, StageMetric, StageSolver, Step, finishing_auf, first_two_layers_solved,
    last_layer_oriented, stage_complete,
};
use crate::{AlgorithmDatabase, StageFailure};

/// Metric for a state whose case the database knows
const KNOWN_CASE: u32 = 1;
/// Unknown cases start above every known one
const UNKNOWN_CASE: u32 = 2;

fn misoriented_stickers(state: &CubeState) -> u32 {
    let up = state.center(Face::U);
    let count = state.face(Face::U).iter().filter(|&&color| color != up).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Last layer stickers out of place, at the best alignment of the U layer
fn misplaced_stickers(state: &CubeState) -> u32 {
    (0..4)
        .map(|k| {
            let aligned = state.with_algorithm(&Algorithm::u_turns(k));
            PATTERN_FACELETS
                .iter()
                .filter(|&&facelet| !aligned.is_facelet_solved(facelet))
                .count()
        })
        .min()
        .map_or(u32::MAX, |count| u32::try_from(count).unwrap_or(u32::MAX))
}

/// The OLL and PLL stages differ only in the pattern they read and in when they are done
struct LastLayer<'a> {
    database: &'a AlgorithmDatabase,
    stage: Stage,
    kind: PatternKind,
}

impl LastLayer<'_> {
    fn metric(&self, state: &CubeState) -> u32 {
        if stage_complete(self.stage, state) {
            return 0;
        }

        match self.kind {
            PatternKind::Orientation => {
                if self.database.match_state(state, self.kind).is_some() {
                    KNOWN_CASE
                } else {
                    UNKNOWN_CASE + misoriented_stickers(state)
                }
            }
            PatternKind::Permutation => {
                if (first_two_layers_solved(state) && finishing_auf(state).is_some())
                    || self.database.match_state(state, self.kind).is_some()
                {
                    KNOWN_CASE
                } else {
                    UNKNOWN_CASE + misplaced_stickers(state)
                }
            }
        }
    }

    /// Whether `algorithm` finishes the stage from `state` without breaking the first two layers
    fn finishes(&self, state: &CubeState, algorithm: &Algorithm) -> bool {
        let after = state.with_algorithm(algorithm);
        match self.kind {
            PatternKind::Orientation => last_layer_oriented(&after),
            PatternKind::Permutation => {
                first_two_layers_solved(&after) && finishing_auf(&after).is_some()
            }
        }
    }

    /// PLL steps also align the U layer so they leave the cube solved
    fn with_alignment(&self, state: &CubeState, algorithm: Algorithm) -> Algorithm {
        if self.kind == PatternKind::Orientation {
            return algorithm;
        }

        match finishing_auf(&state.with_algorithm(&algorithm)) {
            Some(k) => algorithm.compose(&Algorithm::u_turns(k)).simplified(),
            None => algorithm,
        }
    }

    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure> {
        if stage_complete(self.stage, state) {
            return Ok(Step::new("skip", Algorithm::default()));
        }

        if self.kind == PatternKind::Permutation
            && first_two_layers_solved(state)
            && let Some(k) = finishing_auf(state)
        {
            return Ok(Step::new("AUF", Algorithm::u_turns(k)));
        }

        if let Some(found) = self.database.match_state(state, self.kind) {
            let algorithm = found.algorithm();
            if self.finishes(state, &algorithm) {
                debug!(
                    "{:?}: matched `{}` after {} U turns",
                    self.stage, found.entry.name(), found.rotation_offset
                );
                return Ok(Step::new(
                    found.entry.name(),
                    self.with_alignment(state, algorithm),
                ));
            }

            debug!(
                "{:?}: `{}` matches the pattern but does not finish the stage",
                self.stage,
                found.entry.name()
            );
        }

        self.lookahead(state)
    }

    /// Try every entry at every alignment and keep the one that leaves the lowest metric
    fn lookahead(&self, state: &CubeState) -> Result<Step, StageFailure> {
        let current = self.metric(state);
        let mut best: Option<(u32, usize, Step)> = None;

        for entry in self.database.entries(self.kind) {
            for k in 0..4 {
                let algorithm = self.with_alignment(state, entry.adapted(k));
                let after = state.with_algorithm(&algorithm);
                if !first_two_layers_solved(&after) {
                    continue;
                }

                let metric = self.metric(&after);
                trace!("{:?}: `{entry}` after {k} U turns leaves {metric}", self.stage);

                let better = best.as_ref().is_none_or(|(best_metric, best_len, _)| {
                    (metric, algorithm.move_count()) < (*best_metric, *best_len)
                });
                if metric < current && better {
                    best = Some((
                        metric,
                        algorithm.move_count(),
                        Step::new(entry.name(), algorithm),
                    ));
                }
            }
        }

        match best {
            Some((metric, _, step)) => {
                debug!(
                    "{:?}: no exact match, `{}` brings the metric from {current} to {metric}",
                    self.stage, step.name
                );
                Ok(step)
            }
            None => Err(StageFailure::NoAlgorithmFound {
                stage: self.stage,
                pattern: extract(state, self.kind).canonicalize().canonical.to_string(),
            }),
        }
    }
}

/// Orients the last layer with one database algorithm
#[derive(Clone, Copy, Debug)]
pub struct OllSolver<'a> {
    database: &'a AlgorithmDatabase,
}

impl<'a> OllSolver<'a> {
    #[must_use]
    pub fn new(database: &'a AlgorithmDatabase) -> OllSolver<'a> {
        OllSolver { database }
    }

    fn inner(&self) -> LastLayer<'a> {
        LastLayer {
            database: self.database,
            stage: Stage::Oll,
            kind: PatternKind::Orientation,
        }
    }
}

impl StageSolver for OllSolver<'_> {
    fn stage(&self) -> Stage {
        Stage::Oll
    }

    fn analyze(&self, state: &CubeState) -> StageMetric {
        StageMetric::new(Stage::Oll, self.inner().metric(state))
    }

    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure> {
        self.inner().next_step(state)
    }
}

/// Permutes the last layer with one database algorithm and the final U turn
#[derive(Clone, Copy, Debug)]
pub struct PllSolver<'a> {
    database: &'a AlgorithmDatabase,
}

impl<'a> PllSolver<'a> {
    #[must_use]
    pub fn new(database: &'a AlgorithmDatabase) -> PllSolver<'a> {
        PllSolver { database }
    }

    fn inner(&self) -> LastLayer<'a> {
        LastLayer {
            database: self.database,
            stage: Stage::Pll,
            kind: PatternKind::Permutation,
        }
    }
}

impl StageSolver for PllSolver<'_> {
    fn stage(&self) -> Stage {
        Stage::Pll
    }

    fn analyze(&self, state: &CubeState) -> StageMetric {
        StageMetric::new(Stage::Pll, self.inner().metric(state))
    }

    fn next_step(&self, state: &CubeState) -> Result<Step, StageFailure> {
        self.inner().next_step(state)
    }
}
