use cube_core::{InvalidCubeState, MalformedMoveNotation, SolvabilityReport, pattern::Pattern};
use serde::Serialize;
use thiserror::Error;

use crate::Stage;

/// An input the solver refuses to work on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error(transparent)]
    MalformedMoveNotation(#[from] MalformedMoveNotation),
    #[error(transparent)]
    InvalidCubeState(#[from] InvalidCubeState),
    #[error("The cube cannot be reached from a solved cube: {:?}", .0.errors)]
    UnsolvableState(SolvabilityReport),
}

/// Why a stage gave up. Carried inside a `SolveResult` rather than returned as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StageFailure {
    #[error("No algorithm is known for the {stage:?} case {pattern} and no fallback made progress")]
    NoAlgorithmFound { stage: Stage, pattern: String },
    #[error("The {stage:?} stage made no progress after {attempts} attempts (metric stuck at {metric})")]
    StageStalled {
        stage: Stage,
        attempts: usize,
        metric: u32,
    },
    #[error("Applying `{step}` would use {needed} moves but only {remaining} remain for the {scope}")]
    MoveLimitExceeded {
        step: String,
        needed: usize,
        remaining: usize,
        scope: LimitScope,
    },
    #[error("The {stage:?} stage needs {missing:?} to be complete first")]
    PrerequisiteIncomplete { stage: Stage, missing: Stage },
}

/// Which move budget was exhausted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LimitScope {
    Stage,
    Solve,
}

impl std::fmt::Display for LimitScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitScope::Stage => write!(f, "stage"),
            LimitScope::Solve => write!(f, "whole solve"),
        }
    }
}

/// Two entries share a canonical pattern but do not solve each other's cases
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{new}` collides with `{existing}`: both have the pattern {pattern} but they solve it differently")]
pub struct PatternCollisionError {
    pub pattern: Pattern,
    pub existing: String,
    pub new: String,
}

/// Failure to load persisted database entries
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Line {line}: {source}")]
    Notation {
        line: usize,
        source: MalformedMoveNotation,
    },
    #[error("Line {line}: the record claims the pattern {claimed} but its algorithm solves {derived}")]
    PatternMismatch {
        line: usize,
        claimed: String,
        derived: String,
    },
    #[error("Line {line}: {source}")]
    Collision {
        line: usize,
        source: PatternCollisionError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
