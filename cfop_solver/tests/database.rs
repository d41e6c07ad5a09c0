use cfop_solver::{
    AlgorithmDatabase, AlgorithmEntry, PatternKind, Provenance, Registration, SolverConfig,
    apply_move_sequence, create_solved_cube, register_algorithm, solve_cube_with_database,
};
use cube_core::parse_notation;
use pretty_assertions::assert_eq;

fn entry(kind: PatternKind, name: &str, notation: &str) -> AlgorithmEntry {
    AlgorithmEntry::derive(
        kind,
        name,
        parse_notation(notation).unwrap(),
        Provenance::Registered,
    )
}

#[test_log::test]
fn colliding_registration_is_rejected() {
    let mut database = AlgorithmDatabase::empty();

    // D and D2 leave the last layer alone but do not undo each other
    let first = register_algorithm(&mut database, entry(PatternKind::Orientation, "down", "D"));
    assert_eq!(first, Ok(Registration::Added));

    let err = register_algorithm(
        &mut database,
        entry(PatternKind::Orientation, "down twice", "D2"),
    )
    .unwrap_err();

    assert!(err.new.starts_with("down twice"));
    assert_eq!(database.len(), 1);
}

#[test_log::test]
fn registered_algorithms_are_used_by_the_solver() {
    let mut database = AlgorithmDatabase::empty();
    register_algorithm(
        &mut database,
        entry(PatternKind::Orientation, "sune", "R U R' U R U2 R'"),
    )
    .unwrap();

    // The sune case with a U turn on top, so the match needs an offset
    let state = apply_move_sequence(create_solved_cube(), "R U2 R' U' R U' R' U").unwrap();
    let result = solve_cube_with_database(state, &SolverConfig::default(), &database).unwrap();

    assert!(result.success, "{:?}", result.failure);
    assert_eq!(&*result.applied_algorithms[0].name, "sune");
}

#[test_log::test]
fn records_survive_a_round_trip_through_text() {
    let mut database = AlgorithmDatabase::empty();
    register_algorithm(
        &mut database,
        AlgorithmEntry::derive(
            PatternKind::Permutation,
            "T perm",
            parse_notation("R U R' U' R' F R2 U' R' U' R U R' F'").unwrap(),
            Provenance::Mined {
                source: "search".to_owned(),
            },
        ),
    )
    .unwrap();

    let mut text = Vec::new();
    database.write_records(&mut text).unwrap();

    let mut loaded = AlgorithmDatabase::empty();
    assert_eq!(loaded.load_records(text.as_slice()).unwrap(), 1);

    let original = database.entries(PatternKind::Permutation).next().unwrap();
    assert_eq!(loaded.get(original.pattern()), Some(original));
}
