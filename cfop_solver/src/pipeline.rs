//! Runs the stages in order with bounded attempts and move budgets.

use cube_core::{Algorithm, CubeState, check_solvability};
use internment::ArcIntern;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    AlgorithmDatabase, CubeError, LimitScope, SolverConfig, StageFailure,
    stages::{CrossSolver, F2lSolver, OllSolver, PllSolver, Stage, StageSolver, stage_complete},
};

/// A step that was committed to the cube
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedAlgorithm {
    pub stage: Stage,
    pub name: ArcIntern<str>,
    pub algorithm: Algorithm,
    pub move_count: usize,
}

/// A step a stage proposed, whether or not it was applied
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttemptedStep {
    pub name: ArcIntern<str>,
    pub algorithm: Algorithm,
    pub metric_before: u32,
    pub metric_after: u32,
    pub committed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub initial_metric: u32,
    pub final_metric: u32,
    pub moves: usize,
    pub attempts: usize,
    /// The stage was done before it started, so nothing ran
    pub already_complete: bool,
    pub trail: Vec<AttemptedStep>,
}

impl StageReport {
    fn new(stage: Stage, metric: u32) -> StageReport {
        StageReport {
            stage,
            initial_metric: metric,
            final_metric: metric,
            moves: 0,
            attempts: 0,
            already_complete: metric == 0,
            trail: Vec::new(),
        }
    }
}

/// The outcome of one solve. Stage failures end up in `failure` with `success` false, and `final_state` is wherever the solve stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SolveResult {
    pub success: bool,
    pub applied_algorithms: Vec<AppliedAlgorithm>,
    pub total_moves: usize,
    pub final_state: CubeState,
    /// Whole cube rotations applied before the first stage to put the centers home
    pub centering: Algorithm,
    pub stage_reports: Vec<StageReport>,
    pub failure: Option<StageFailure>,
}

impl SolveResult {
    /// Every applied step in order, starting with the centering rotation
    #[must_use]
    pub fn solution(&self) -> Algorithm {
        self.applied_algorithms
            .iter()
            .fold(self.centering.clone(), |acc, applied| {
                acc.compose(&applied.algorithm)
            })
    }

    #[must_use]
    pub fn report(&self, stage: Stage) -> Option<&StageReport> {
        self.stage_reports.iter().find(|report| report.stage == stage)
    }
}

/// The state a solve carries from stage to stage
struct Progress {
    state: CubeState,
    applied: Vec<AppliedAlgorithm>,
    total_moves: usize,
}

/// Solves a cube stage by stage with a fixed algorithm database
#[derive(Clone, Debug)]
pub struct CfopSolver<'a> {
    database: &'a AlgorithmDatabase,
    config: SolverConfig,
}

impl<'a> CfopSolver<'a> {
    #[must_use]
    pub fn new(database: &'a AlgorithmDatabase) -> CfopSolver<'a> {
        CfopSolver {
            database,
            config: SolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `state`.
    ///
    /// # Errors
    ///
    /// Returns `CubeError::UnsolvableState` if the state could not have come from a solved cube, or if its centers cannot be brought home. Stages that give up do not produce an error; see `SolveResult::failure`.
    pub fn solve(&self, mut state: CubeState) -> Result<SolveResult, CubeError> {
        if self.config.validate_solvability {
            let report = check_solvability(&state);
            if !report.is_solvable {
                warn!("Refusing to solve an unsolvable cube: {:?}", report.errors);
                return Err(CubeError::UnsolvableState(report));
            }
        }

        let Some(centering) = state.centering_rotation() else {
            return Err(CubeError::UnsolvableState(check_solvability(&state)));
        };
        if !centering.is_empty() {
            debug!("Centering with {centering}");
            state.apply_algorithm(&centering);
        }

        let cross = CrossSolver;
        let f2l = F2lSolver::new(self.config.f2l_search_depth);
        let oll = OllSolver::new(self.database);
        let pll = PllSolver::new(self.database);
        let solvers: [&dyn StageSolver; 4] = [&cross, &f2l, &oll, &pll];

        let mut progress = Progress {
            state,
            applied: Vec::new(),
            total_moves: 0,
        };
        let mut stage_reports = Vec::with_capacity(solvers.len());
        let mut failure = None;

        for solver in solvers {
            let mut report = StageReport::new(solver.stage(), solver.analyze(&progress.state).metric);
            let outcome = self.run_stage(solver, &mut progress, &mut report);
            stage_reports.push(report);

            if let Err(e) = outcome {
                info!("Giving up in {:?}: {e}", solver.stage());
                failure = Some(e);
                break;
            }
        }

        let success = failure.is_none();
        if success {
            assert!(
                progress.state.is_fully_solved(),
                "every stage finished but the cube is not solved: {}",
                progress.state
            );
            info!("Solved in {} moves", progress.total_moves);
        }

        Ok(SolveResult {
            success,
            applied_algorithms: progress.applied,
            total_moves: progress.total_moves,
            final_state: progress.state,
            centering,
            stage_reports,
            failure,
        })
    }

    fn run_stage(
        &self,
        solver: &dyn StageSolver,
        progress: &mut Progress,
        report: &mut StageReport,
    ) -> Result<(), StageFailure> {
        let stage = solver.stage();

        if report.already_complete {
            info!("{stage:?} is already complete");
            return Ok(());
        }

        if let Some(missing) = stage.prerequisite()
            && !stage_complete(missing, &progress.state)
        {
            return Err(StageFailure::PrerequisiteIncomplete { stage, missing });
        }

        info!("Starting {stage:?} at metric {}", report.initial_metric);

        let mut metric = report.initial_metric;
        for attempt in 1..=self.config.max_attempts {
            report.attempts = attempt;

            let step = solver.next_step(&progress.state)?;
            let after = progress.state.with_algorithm(&step.algorithm);
            let next_metric = solver.analyze(&after).metric;
            let committed = next_metric < metric;

            report.trail.push(AttemptedStep {
                name: step.name.clone(),
                algorithm: step.algorithm.clone(),
                metric_before: metric,
                metric_after: next_metric,
                committed,
            });

            if !committed {
                debug!("{stage:?}: `{}` leaves the metric at {next_metric}", step.name);
                return Err(StageFailure::StageStalled {
                    stage,
                    attempts: attempt,
                    metric,
                });
            }

            let needed = step.algorithm.move_count();
            let stage_remaining = self.config.max_moves_per_stage.saturating_sub(report.moves);
            let solve_remaining = self.config.max_total_moves.saturating_sub(progress.total_moves);

            for (remaining, scope) in [
                (stage_remaining, LimitScope::Stage),
                (solve_remaining, LimitScope::Solve),
            ] {
                if needed > remaining {
                    return Err(StageFailure::MoveLimitExceeded {
                        step: step.name.to_string(),
                        needed,
                        remaining,
                        scope,
                    });
                }
            }

            debug!(
                "{stage:?}: applying `{}` ({}), metric {metric} -> {next_metric}",
                step.name, step.algorithm
            );

            progress.state = after;
            progress.total_moves += needed;
            progress.applied.push(AppliedAlgorithm {
                stage,
                name: step.name,
                algorithm: step.algorithm,
                move_count: needed,
            });

            report.moves += needed;
            report.final_metric = next_metric;
            metric = next_metric;

            if metric == 0 {
                info!("{stage:?} complete after {} moves", report.moves);
                return Ok(());
            }
        }

        Err(StageFailure::StageStalled {
            stage,
            attempts: self.config.max_attempts,
            metric,
        })
    }
}
