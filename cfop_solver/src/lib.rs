#![warn(clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::missing_panics_doc
)]

mod config;
mod database;
mod error;
mod pipeline;
mod stages;

pub use config::SolverConfig;
pub use cube_core::{
    apply_move_sequence, check_solvability, create_solved_cube,
    pattern::{Pattern, PatternKind},
};
pub use database::{
    AlgorithmDatabase, AlgorithmEntry, AlgorithmMatch, EntryRecord, Provenance, Registration,
};
pub use error::{CubeError, LimitScope, PatternCollisionError, RecordError, StageFailure};
pub use pipeline::{AppliedAlgorithm, AttemptedStep, CfopSolver, SolveResult, StageReport};
pub use stages::{
    CrossSolver, F2lSolver, OllSolver, PllSolver, Stage, StageMetric, StageSolver, Step,
};

use cube_core::CubeState;

/// Solve with the built in algorithm database
///
/// # Errors
///
/// See `CfopSolver::solve`.
pub fn solve_cube(state: CubeState, config: &SolverConfig) -> Result<SolveResult, CubeError> {
    solve_cube_with_database(state, config, AlgorithmDatabase::builtin())
}

/// Solve a cube given as 54 color letters, face by face in U R F D L B order
///
/// # Errors
///
/// Returns `CubeError::InvalidCubeState` if the letters do not describe a cube, otherwise see `CfopSolver::solve`.
pub fn solve_facelets(facelets: &str, config: &SolverConfig) -> Result<SolveResult, CubeError> {
    let state = facelets.parse::<CubeState>()?;
    solve_cube(state, config)
}

/// Solve with a caller supplied algorithm database
///
/// # Errors
///
/// See `CfopSolver::solve`.
pub fn solve_cube_with_database(
    state: CubeState,
    config: &SolverConfig,
    database: &AlgorithmDatabase,
) -> Result<SolveResult, CubeError> {
    CfopSolver::new(database)
        .with_config(config.clone())
        .solve(state)
}

/// How far `state` is from completing `stage`, using the built in database for the last layer stages
#[must_use]
pub fn analyze_stage(stage: Stage, state: &CubeState) -> StageMetric {
    let database = AlgorithmDatabase::builtin();

    match stage {
        Stage::Cross => CrossSolver.analyze(state),
        Stage::F2l => F2lSolver::default().analyze(state),
        Stage::Oll => OllSolver::new(database).analyze(state),
        Stage::Pll => PllSolver::new(database).analyze(state),
    }
}

/// Add an entry to `database`
///
/// # Errors
///
/// Returns `PatternCollisionError` if the database holds a different solution for the same case.
pub fn register_algorithm(
    database: &mut AlgorithmDatabase,
    entry: AlgorithmEntry,
) -> Result<Registration, PatternCollisionError> {
    database.register(entry)
}
