use cfop_solver::{
    AlgorithmDatabase, CubeError, LimitScope, SolverConfig, Stage, StageFailure, analyze_stage,
    apply_move_sequence, create_solved_cube, solve_cube, solve_cube_with_database, solve_facelets,
};
use cube_core::{Corner, CubeState};
use log::info;

const SCRAMBLE_MOVES: [&str; 23] = [
    "U", "U'", "U2", "D", "D'", "D2", "R", "R'", "R2", "L", "L'", "L2", "F", "F'", "F2", "B", "B'",
    "B2", "M", "E", "S", "x", "y'",
];

fn random_scramble(rng: &mut fastrand::Rng, length: usize) -> String {
    (0..length)
        .map(|_| SCRAMBLE_MOVES[rng.usize(..SCRAMBLE_MOVES.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

#[test_log::test]
fn sune_case_is_solved() {
    let state = apply_move_sequence(create_solved_cube(), "R U R' U R U2 R'").unwrap();
    let result = solve_cube(state, &SolverConfig::default()).unwrap();

    assert!(result.success);
    assert!(result.final_state.is_fully_solved());
    assert!(result.failure.is_none());
}

#[test_log::test]
fn u_turn_skips_the_first_two_layers() {
    let state = apply_move_sequence(create_solved_cube(), "U").unwrap();
    assert!(analyze_stage(Stage::Cross, &state).complete);
    assert!(analyze_stage(Stage::F2l, &state).complete);

    let result = solve_cube(state, &SolverConfig::default()).unwrap();
    assert!(result.success);

    for stage in [Stage::Cross, Stage::F2l, Stage::Oll] {
        let report = result.report(stage).unwrap();
        assert!(report.already_complete);
        assert_eq!(report.moves, 0);
    }

    assert_eq!(result.total_moves, 1);
    assert_eq!(result.applied_algorithms.len(), 1);
    assert_eq!(result.applied_algorithms[0].stage, Stage::Pll);
    assert_eq!(result.applied_algorithms[0].algorithm.to_string(), "U'");
}

#[test_log::test]
fn unknown_last_layer_case_fails_within_budget() {
    let config = SolverConfig::default();
    let state = apply_move_sequence(create_solved_cube(), "R U R' U R U2 R'").unwrap();
    let result = solve_cube_with_database(state.clone(), &config, &AlgorithmDatabase::empty())
        .unwrap();

    assert!(!result.success);
    assert!(result.total_moves <= config.max_total_moves);
    assert!(matches!(
        result.failure,
        Some(StageFailure::NoAlgorithmFound {
            stage: Stage::Oll,
            ..
        })
    ));
    assert_eq!(result.final_state, state);
}

#[test_log::test]
fn random_scrambles_are_solved() {
    let config = SolverConfig::default();
    let mut rng = fastrand::Rng::with_seed(2024);

    for _ in 0..25 {
        let scramble = random_scramble(&mut rng, 25);
        let state = apply_move_sequence(create_solved_cube(), &scramble).unwrap();

        let result = solve_cube(state.clone(), &config).unwrap();
        assert!(result.success, "{scramble}: {:?}", result.failure);
        assert!(result.total_moves <= config.max_total_moves);
        assert!(state.with_algorithm(&result.solution()).is_fully_solved());

        for report in &result.stage_reports {
            assert!(report.moves <= config.max_moves_per_stage);
            assert_eq!(report.final_metric, 0);
        }

        info!("{scramble}: {} moves", result.total_moves);
    }
}

#[test_log::test]
fn twisted_corner_is_refused() {
    let mut facelets = *create_solved_cube().facelets();
    let [a, b, c] = Corner::URF.facelets();
    (facelets[a], facelets[b], facelets[c]) = (facelets[c], facelets[a], facelets[b]);

    let state = CubeState::from_facelets(facelets).unwrap();
    let err = solve_cube(state, &SolverConfig::default()).unwrap_err();

    let CubeError::UnsolvableState(report) = err else {
        panic!("expected an unsolvable state, got {err}");
    };
    assert!(!report.is_solvable);
}

#[test_log::test]
fn total_move_budget_stops_the_solve() {
    let config = SolverConfig::default().with_max_total_moves(20);
    let scramble = random_scramble(&mut fastrand::Rng::with_seed(5), 30);
    let state = apply_move_sequence(create_solved_cube(), &scramble).unwrap();

    let result = solve_cube(state, &config).unwrap();
    assert!(!result.success);
    assert!(result.total_moves <= 20);
    assert!(matches!(
        result.failure,
        Some(StageFailure::MoveLimitExceeded {
            scope: LimitScope::Solve,
            ..
        })
    ));
}

#[test_log::test]
fn attempts_run_out_while_still_improving() {
    // Three slots out with the cross intact, and each F2L step fixes one slot
    let state =
        apply_move_sequence(create_solved_cube(), "R U R' L' U' L F U F' B' U B").unwrap();
    assert!(analyze_stage(Stage::Cross, &state).complete);
    assert_eq!(analyze_stage(Stage::F2l, &state).metric, 3);

    let config = SolverConfig::default().with_max_attempts(2);
    let result = solve_cube(state, &config).unwrap();

    assert!(!result.success);
    assert_eq!(
        result.failure,
        Some(StageFailure::StageStalled {
            stage: Stage::F2l,
            attempts: 2,
            metric: 1,
        })
    );

    let report = result.report(Stage::F2l).unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.final_metric, 1);
    assert!(report.trail.iter().all(|step| step.committed));
    assert_eq!(result.applied_algorithms.len(), 2);
}

#[test_log::test]
fn facelet_strings_are_parsed_before_solving() {
    let err = solve_facelets("WWW", &SolverConfig::default()).unwrap_err();
    assert!(matches!(err, CubeError::InvalidCubeState(_)));

    let scrambled = apply_move_sequence(create_solved_cube(), "R U R' U R U2 R'").unwrap();
    let result = solve_facelets(&scrambled.to_string(), &SolverConfig::default()).unwrap();
    assert!(result.success);
    assert!(result.final_state.is_fully_solved());
}

#[test_log::test]
fn malformed_scrambles_are_rejected() {
    let err = apply_move_sequence(create_solved_cube(), "R U Q").unwrap_err();
    assert_eq!(err.position, 4);

    let err = CubeError::from(err);
    assert!(matches!(err, CubeError::MalformedMoveNotation(_)));
}

#[test_log::test]
fn configuration_can_come_from_toml() {
    let config = SolverConfig::from_toml("max_total_moves = 200\nf2l_search_depth = 10").unwrap();
    let state = apply_move_sequence(create_solved_cube(), "F R U R' U' F'").unwrap();

    let result = solve_cube(state, &config).unwrap();
    assert!(result.success);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["stage_reports"].as_array().unwrap().len(), 4);
}
