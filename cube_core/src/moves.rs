//! Move notation and the mechanics of turning layers.

use std::{
    fmt,
    ops::{Deref, Index},
    str::FromStr,
    sync::LazyLock,
};

use chumsky::prelude::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CubeState, Face,
    geometry::{FaceletPermutation, LayerSpan, compose, invert, quarter_turn},
};

/// The part of the cube a move turns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    U,
    R,
    F,
    D,
    L,
    B,
    /// The slice between L and R, turning like L
    M,
    /// The slice between U and D, turning like D
    E,
    /// The slice between F and B, turning like F
    S,
    /// The whole cube, turning like R
    X,
    /// The whole cube, turning like U
    Y,
    /// The whole cube, turning like F
    Z,
}

impl Layer {
    pub const ALL: [Layer; 12] = [
        Layer::U,
        Layer::R,
        Layer::F,
        Layer::D,
        Layer::L,
        Layer::B,
        Layer::M,
        Layer::E,
        Layer::S,
        Layer::X,
        Layer::Y,
        Layer::Z,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face for outer layer turns
    #[must_use]
    pub fn face(self) -> Option<Face> {
        match self {
            Layer::U => Some(Face::U),
            Layer::R => Some(Face::R),
            Layer::F => Some(Face::F),
            Layer::D => Some(Face::D),
            Layer::L => Some(Face::L),
            Layer::B => Some(Face::B),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_face(face: Face) -> Layer {
        Layer::ALL[face.index()]
    }

    /// Whether this turns the whole cube rather than part of it
    #[must_use]
    pub fn is_rotation(self) -> bool {
        matches!(self, Layer::X | Layer::Y | Layer::Z)
    }

    /// The face whose clockwise direction this layer turns in
    fn turning_face(self) -> Face {
        match self {
            Layer::M => Face::L,
            Layer::E => Face::D,
            Layer::S | Layer::Z => Face::F,
            Layer::X => Face::R,
            Layer::Y => Face::U,
            face => face.face().unwrap_or(Face::U),
        }
    }

    fn letter(self) -> char {
        match self {
            Layer::U => 'U',
            Layer::R => 'R',
            Layer::F => 'F',
            Layer::D => 'D',
            Layer::L => 'L',
            Layer::B => 'B',
            Layer::M => 'M',
            Layer::E => 'E',
            Layer::S => 'S',
            Layer::X => 'x',
            Layer::Y => 'y',
            Layer::Z => 'z',
        }
    }
}

/// How far a move turns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Turns {
    Clockwise,
    CounterClockwise,
    Half,
}

impl Turns {
    /// The number of clockwise quarter turns this is equivalent to
    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        match self {
            Turns::Clockwise => 1,
            Turns::Half => 2,
            Turns::CounterClockwise => 3,
        }
    }

    /// The signed turn count: +1, -1 or +2
    #[must_use]
    pub fn signed(self) -> i8 {
        match self {
            Turns::Clockwise => 1,
            Turns::CounterClockwise => -1,
            Turns::Half => 2,
        }
    }

    /// Convert a number of clockwise quarter turns. Returns `None` for a multiple of four.
    #[must_use]
    pub fn from_quarter_turns(amount: u8) -> Option<Turns> {
        match amount % 4 {
            1 => Some(Turns::Clockwise),
            2 => Some(Turns::Half),
            3 => Some(Turns::CounterClockwise),
            _ => None,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Turns {
        match self {
            Turns::Clockwise => Turns::CounterClockwise,
            Turns::CounterClockwise => Turns::Clockwise,
            Turns::Half => Turns::Half,
        }
    }
}

/// A single move. Wide moves only exist for the six faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    layer: Layer,
    turns: Turns,
    wide: bool,
}

impl Move {
    #[must_use]
    pub fn new(layer: Layer, turns: Turns) -> Move {
        Move {
            layer,
            turns,
            wide: false,
        }
    }

    /// A wide move of a face layer, or `None` if `layer` is not a face
    #[must_use]
    pub fn wide(layer: Layer, turns: Turns) -> Option<Move> {
        layer.face().map(|_| Move {
            layer,
            turns,
            wide: true,
        })
    }

    /// `k` clockwise quarter turns of U, or `None` if `k` is a multiple of four
    #[must_use]
    pub fn u_turns(k: u8) -> Option<Move> {
        Turns::from_quarter_turns(k).map(|turns| Move::new(Layer::U, turns))
    }

    #[must_use]
    pub fn layer(self) -> Layer {
        self.layer
    }

    #[must_use]
    pub fn turns(self) -> Turns {
        self.turns
    }

    #[must_use]
    pub fn is_wide(self) -> bool {
        self.wide
    }

    #[must_use]
    pub fn is_rotation(self) -> bool {
        self.layer.is_rotation()
    }

    #[must_use]
    pub fn inverse(self) -> Move {
        Move {
            turns: self.turns.inverse(),
            ..self
        }
    }

    /// The eighteen outer layer moves
    #[must_use]
    pub fn face_moves() -> [Move; 18] {
        std::array::from_fn(|i| {
            Move::new(
                Layer::from_face(Face::ALL[i / 3]),
                [Turns::Clockwise, Turns::CounterClockwise, Turns::Half][i % 3],
            )
        })
    }

    /// Whether `self` and `other` turn the same layer in the same way and can be merged
    #[must_use]
    pub fn same_axis_layer(self, other: Move) -> bool {
        self.layer == other.layer && self.wide == other.wide
    }

    fn permutation(self) -> &'static FaceletPermutation {
        &MOVE_TABLES[self]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = if self.wide {
            self.layer.letter().to_ascii_lowercase()
        } else {
            self.layer.letter()
        };

        match self.turns {
            Turns::Clockwise => write!(f, "{letter}"),
            Turns::CounterClockwise => write!(f, "{letter}'"),
            Turns::Half => write!(f, "{letter}2"),
        }
    }
}

/// Notation that could not be parsed. Nothing is applied when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed move notation at offset {position}: {reason}")]
pub struct MalformedMoveNotation {
    pub position: usize,
    pub found: Option<char>,
    pub reason: String,
}

fn layer_from_char(c: char) -> Option<(Layer, bool)> {
    Some(match c {
        'U' => (Layer::U, false),
        'R' => (Layer::R, false),
        'F' => (Layer::F, false),
        'D' => (Layer::D, false),
        'L' => (Layer::L, false),
        'B' => (Layer::B, false),
        'u' => (Layer::U, true),
        'r' => (Layer::R, true),
        'f' => (Layer::F, true),
        'd' => (Layer::D, true),
        'l' => (Layer::L, true),
        'b' => (Layer::B, true),
        'M' => (Layer::M, false),
        'E' => (Layer::E, false),
        'S' => (Layer::S, false),
        'x' => (Layer::X, false),
        'y' => (Layer::Y, false),
        'z' => (Layer::Z, false),
        _ => return None,
    })
}

fn notation<'src>() -> impl Parser<'src, &'src str, Vec<Move>, extra::Err<Rich<'src, char>>> {
    let layer = any().try_map(|c: char, span| {
        layer_from_char(c).ok_or_else(|| Rich::custom(span, format!("`{c}` is not a move")))
    });

    let turns = choice((
        just('2').to(Turns::Half),
        just('\'').to(Turns::CounterClockwise),
    ))
    .or_not()
    .map(|turns| turns.unwrap_or(Turns::Clockwise));

    let move_ = layer
        .then(just('w').or_not())
        .then(turns)
        .try_map(|(((layer, lowercase), w), turns), span| {
            if w.is_some() && layer.face().is_none() {
                return Err(Rich::custom(
                    span,
                    format!("`{}` cannot be turned wide", layer.letter()),
                ));
            }

            Ok(Move {
                layer,
                turns,
                wide: lowercase || w.is_some(),
            })
        });

    move_
        .separated_by(one_of(" \t\r\n").repeated().at_least(1))
        .allow_leading()
        .allow_trailing()
        .collect::<Vec<Move>>()
        .then_ignore(end())
}

/// Parse whitespace separated moves such as `R U R' U' r2 M' x`.
///
/// # Errors
///
/// Returns the position of the first malformed move; a partially valid string yields no moves.
pub fn parse_notation(text: &str) -> Result<Algorithm, MalformedMoveNotation> {
    notation()
        .parse(text)
        .into_result()
        .map(Algorithm)
        .map_err(|errors| match errors.into_iter().next() {
            Some(error) => MalformedMoveNotation {
                position: error.span().start,
                found: text
                    .get(error.span().start..)
                    .and_then(|rest| rest.chars().next()),
                reason: error.to_string(),
            },
            None => MalformedMoveNotation {
                position: 0,
                found: None,
                reason: "unknown error".to_owned(),
            },
        })
}

/// An ordered sequence of moves
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Algorithm(Vec<Move>);

impl Algorithm {
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Algorithm {
        Algorithm(moves)
    }

    /// `k` clockwise quarter turns of U as an algorithm (empty for multiples of four)
    #[must_use]
    pub fn u_turns(k: u8) -> Algorithm {
        Algorithm(Move::u_turns(k).into_iter().collect())
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    pub fn push(&mut self, move_: Move) {
        self.0.push(move_);
    }

    /// `self` followed by `other`
    #[must_use]
    pub fn compose(&self, other: &Algorithm) -> Algorithm {
        Algorithm(self.0.iter().chain(other.0.iter()).copied().collect())
    }

    /// The algorithm that undoes this one
    #[must_use]
    pub fn inverse(&self) -> Algorithm {
        Algorithm(self.0.iter().rev().map(|move_| move_.inverse()).collect())
    }

    /// The number of moves, not counting whole cube rotations
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.0.iter().filter(|move_| !move_.is_rotation()).count()
    }

    /// Merge adjacent turns of the same layer, dropping the ones that cancel out
    #[must_use]
    pub fn simplified(&self) -> Algorithm {
        let mut out: Vec<Move> = Vec::with_capacity(self.0.len());

        for &move_ in &self.0 {
            match out.last() {
                Some(&last) if last.same_axis_layer(move_) => {
                    out.pop();
                    let total = last.turns.quarter_turns() + move_.turns.quarter_turns();
                    if let Some(turns) = Turns::from_quarter_turns(total) {
                        out.push(Move { turns, ..last });
                    }
                }
                _ => out.push(move_),
            }
        }

        Algorithm(out)
    }
}

impl Deref for Algorithm {
    type Target = [Move];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Move> for Algorithm {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        Algorithm(iter.into_iter().collect())
    }
}

impl Extend<Move> for Algorithm {
    fn extend<T: IntoIterator<Item = Move>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Algorithm {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Algorithm {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

impl FromStr for Algorithm {
    type Err = MalformedMoveNotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_notation(s)
    }
}

impl Serialize for Algorithm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_notation(&text).map_err(serde::de::Error::custom)
    }
}

/// Precomputed sticker permutations for every move
struct MoveTables {
    /// Indexed by layer (or face layer + 12 when wide), then by quarter turns - 1
    permutations: Vec<[FaceletPermutation; 3]>,
}

impl Index<Move> for MoveTables {
    type Output = FaceletPermutation;

    fn index(&self, move_: Move) -> &Self::Output {
        let row = if move_.wide {
            Layer::ALL.len() + move_.layer.index()
        } else {
            move_.layer.index()
        };

        &self.permutations[row][usize::from(move_.turns.quarter_turns()) - 1]
    }
}

static MOVE_TABLES: LazyLock<MoveTables> = LazyLock::new(|| {
    let row = |quarter: FaceletPermutation| {
        let half = compose(&quarter, &quarter);
        [quarter, half, invert(&quarter)]
    };

    let span = |layer: Layer| match layer {
        Layer::M | Layer::E | Layer::S => LayerSpan::Middle,
        Layer::X | Layer::Y | Layer::Z => LayerSpan::Whole,
        _ => LayerSpan::Outer,
    };

    let permutations = Layer::ALL
        .into_iter()
        .map(|layer| row(quarter_turn(layer.turning_face().normal(), span(layer))))
        .chain(Layer::ALL.into_iter().map(|layer| {
            // Only faces have wide variants; the other rows are never indexed
            row(quarter_turn(layer.turning_face().normal(), LayerSpan::Wide))
        }))
        .collect();

    MoveTables { permutations }
});

impl CubeState {
    /// Perform a move, mutating the state in place.
    pub fn apply(&mut self, move_: Move) {
        self.permute(move_.permutation());
    }

    /// Perform every move of the algorithm in order.
    pub fn apply_algorithm(&mut self, algorithm: &Algorithm) {
        for &move_ in algorithm {
            self.apply(move_);
        }
    }

    /// Move every sticker to `destination[i]`.
    pub(crate) fn permute(&mut self, destination: &FaceletPermutation) {
        let old = self.facelets;

        for (facelet, &to) in destination.iter().enumerate() {
            self.facelets[to as usize] = old[facelet];
        }
    }

    /// Whether every center shows the color of its face on a solved cube
    #[must_use]
    pub fn centers_home(&self) -> bool {
        Face::ALL
            .into_iter()
            .all(|face| self.center(face) == face.solved_color())
    }

    /// The whole cube rotation that brings every center back to its home face.
    ///
    /// Returns `None` if the centers are not a rotation of the solved layout, which no sequence of moves can produce.
    #[must_use]
    pub fn centering_rotation(&self) -> Option<Algorithm> {
        let rotations = [Layer::X, Layer::Y, Layer::Z]
            .into_iter()
            .cartesian_product([Turns::Clockwise, Turns::CounterClockwise, Turns::Half])
            .map(|(layer, turns)| Move::new(layer, turns))
            .collect_vec();

        // Every orientation is at most two rotations away
        std::iter::once(Algorithm::default())
            .chain(rotations.iter().map(|&r| Algorithm(vec![r])))
            .chain(
                rotations
                    .iter()
                    .cartesian_product(rotations.iter())
                    .map(|(&a, &b)| Algorithm(vec![a, b])),
            )
            .find(|candidate| self.with_algorithm(candidate).centers_home())
    }

    /// A copy of the state with the algorithm applied
    #[must_use]
    pub fn with_algorithm(&self, algorithm: &Algorithm) -> CubeState {
        let mut out = self.clone();
        out.apply_algorithm(algorithm);
        out
    }
}

/// The destination of every sticker after the algorithm, composed into a single permutation.
#[must_use]
pub fn algorithm_permutation(algorithm: &Algorithm) -> FaceletPermutation {
    #[allow(clippy::cast_possible_truncation)]
    let identity: FaceletPermutation = std::array::from_fn(|i| i as u8);

    algorithm
        .iter()
        .fold(identity, |acc, move_| compose(&acc, move_.permutation()))
}

impl CubeState {
    /// Perform a precomposed permutation from `algorithm_permutation`.
    pub fn apply_permutation(&mut self, destination: &FaceletPermutation) {
        self.permute(destination);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn random_state(rng: &mut fastrand::Rng, length: usize) -> CubeState {
        let moves = Move::face_moves();
        let mut cube = CubeState::solved();
        for _ in 0..length {
            cube.apply(moves[rng.usize(..moves.len())]);
        }
        cube
    }

    fn every_move() -> Vec<Move> {
        Layer::ALL
            .into_iter()
            .flat_map(|layer| {
                [Turns::Clockwise, Turns::CounterClockwise, Turns::Half]
                    .into_iter()
                    .flat_map(move |turns| {
                        std::iter::once(Move::new(layer, turns)).chain(Move::wide(layer, turns))
                    })
            })
            .collect()
    }

    #[test]
    fn move_then_inverse_is_identity() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let moves = Move::face_moves();

        for _ in 0..500 {
            let state = random_state(&mut rng, 25);
            for move_ in moves {
                let mut cube = state.clone();
                cube.apply(move_);
                cube.apply(move_.inverse());
                assert_eq!(cube, state);
            }
        }

        let state = random_state(&mut rng, 25);
        for move_ in every_move() {
            let mut cube = state.clone();
            cube.apply(move_);
            cube.apply(move_.inverse());
            assert_eq!(cube, state, "{move_}");
        }
    }

    #[test]
    fn two_quarters_equal_a_half() {
        let mut rng = fastrand::Rng::with_seed(42);
        let state = random_state(&mut rng, 30);

        for layer in Layer::ALL {
            let quarters = std::iter::once(Move::new(layer, Turns::Clockwise))
                .chain(Move::wide(layer, Turns::Clockwise));

            for quarter in quarters {
                let half = Move { turns: Turns::Half, ..quarter };

                let mut twice = state.clone();
                twice.apply(quarter);
                twice.apply(quarter);

                let mut once = state.clone();
                once.apply(half);

                assert_eq!(twice, once, "{quarter}");
            }
        }
    }

    #[test]
    fn sequences_compose() {
        let mut rng = fastrand::Rng::with_seed(7);
        let a = parse_notation("R U R' U' F2 M E' S x").unwrap();
        let b = parse_notation("r' u2 D L B' y z'").unwrap();

        for _ in 0..20 {
            let state = random_state(&mut rng, 20);

            let mut separately = state.clone();
            separately.apply_algorithm(&a);
            separately.apply_algorithm(&b);

            assert_eq!(separately, state.with_algorithm(&a.compose(&b)));

            let mut precomposed = state.clone();
            precomposed.apply_permutation(&algorithm_permutation(&a.compose(&b)));
            assert_eq!(separately, precomposed);

            assert_eq!(
                state.with_algorithm(&a).with_algorithm(&a.inverse()),
                state
            );
        }
    }

    #[test]
    fn face_turns_move_the_right_stickers() {
        let mut cube = CubeState::solved();
        cube.apply(Move::new(Layer::U, Turns::Clockwise));

        assert!(cube.is_face_uniform(Face::U));
        assert!(cube.is_face_uniform(Face::D));
        // The front top row now shows the right face color
        assert_eq!(&cube.face(Face::F)[..3], &[crate::Color::Red; 3]);
        assert_eq!(&cube.face(Face::L)[..3], &[crate::Color::Green; 3]);

        let mut cube = CubeState::solved();
        cube.apply(Move::new(Layer::R, Turns::Clockwise));
        // The front right column goes up
        assert_eq!(cube.face(Face::U)[2], crate::Color::Green);
        assert_eq!(cube.face(Face::U)[8], crate::Color::Green);
        assert_eq!(cube.face(Face::F)[8], crate::Color::Yellow);
    }

    #[test]
    fn slices_and_rotations_are_consistent() {
        let cube = CubeState::solved();

        let wide = cube.with_algorithm(&parse_notation("r").unwrap());
        let split = cube.with_algorithm(&parse_notation("R M'").unwrap());
        assert_eq!(wide, split);

        let rotated = cube.with_algorithm(&parse_notation("x").unwrap());
        let layers = cube.with_algorithm(&parse_notation("R M' L'").unwrap());
        assert_eq!(rotated, layers);

        let rotated = cube.with_algorithm(&parse_notation("y").unwrap());
        let layers = cube.with_algorithm(&parse_notation("U E' D'").unwrap());
        assert_eq!(rotated, layers);

        let rotated = cube.with_algorithm(&parse_notation("z").unwrap());
        let layers = cube.with_algorithm(&parse_notation("F S B'").unwrap());
        assert_eq!(rotated, layers);
    }

    #[test]
    fn notation_round_trips() {
        let text = "R U R' U' r2 Uw M' E2 S x y' z2 b";
        let alg = parse_notation(text).unwrap();
        assert_eq!(alg.len(), 13);
        assert_eq!(alg.to_string(), "R U R' U' r2 u M' E2 S x y' z2 b");
        assert_eq!(alg.move_count(), 10);

        let again: Algorithm = alg.to_string().parse().unwrap();
        assert_eq!(again, alg);

        assert_eq!(parse_notation("  R   U \n").unwrap().len(), 2);
        assert_eq!(parse_notation("").unwrap().len(), 0);
    }

    #[test]
    fn every_move_formats_and_parses() {
        let mut rng = fastrand::Rng::with_seed(99);
        let moves = every_move();

        for _ in 0..200 {
            let alg = (0..rng.usize(1..12))
                .map(|_| moves[rng.usize(..moves.len())])
                .collect::<Algorithm>();
            assert_eq!(parse_notation(&alg.to_string()).unwrap(), alg);
        }
    }

    #[test]
    fn malformed_notation_is_rejected() {
        let err = parse_notation("R U Q").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.found, Some('Q'));

        assert!(parse_notation("RU").is_err());
        assert!(parse_notation("R3").is_err());
        assert!(parse_notation("R''").is_err());
        assert!(parse_notation("Mw").is_err());
        assert!(parse_notation("R, U").is_err());
    }

    #[test]
    fn centering_undoes_rotations() {
        assert_eq!(
            CubeState::solved().centering_rotation(),
            Some(Algorithm::default())
        );

        for text in ["x", "y'", "z2", "x y", "M E", "S' x2", "x z' y2"] {
            let cube = CubeState::solved().with_algorithm(&parse_notation(text).unwrap());
            let rotation = cube.centering_rotation().unwrap();
            assert!(rotation.len() <= 2);
            assert!(cube.with_algorithm(&rotation).centers_home(), "{text}");
        }
    }

    #[test]
    fn inverse_and_simplify() {
        let alg = parse_notation("R U2 F'").unwrap();
        assert_eq!(alg.inverse().to_string(), "F U2 R'");

        let alg = parse_notation("R U R' R U R'").unwrap();
        assert_eq!(alg.simplified().to_string(), "R U2 R'");

        let alg = parse_notation("R R'").unwrap();
        assert!(alg.simplified().is_empty());
    }
}
