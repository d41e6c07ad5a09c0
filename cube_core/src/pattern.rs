//! Last-layer sticker patterns and their canonical forms.
//!
//! A pattern looks at the 21 stickers of the U layer: the nine stickers of the U face followed by the top rows of F, R, B and L. Two cases that differ only by turning U (or, for permutation, by which side color ends up where) share one canonical pattern.

use std::{fmt, sync::LazyLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Algorithm, CubeState, Face, algorithm_permutation};

/// The number of stickers a pattern describes
pub const PATTERN_LEN: usize = 21;

/// The facelets a pattern reads, in order
pub const PATTERN_FACELETS: [usize; PATTERN_LEN] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, // U
    18, 19, 20, // F
    9, 10, 11, // R
    45, 46, 47, // B
    36, 37, 38, // L
];

/// The side faces in the cyclic order used for permutation symbols
const SIDES: [Face; 4] = [Face::F, Face::R, Face::B, Face::L];

/// Which property of the last layer a pattern captures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    /// Whether each sticker shows the U color
    Orientation,
    /// Which face each sticker belongs to
    Permutation,
}

impl PatternKind {
    /// One more than the largest symbol a pattern of this kind may hold
    #[must_use]
    pub fn symbol_count(self) -> u8 {
        match self {
            PatternKind::Orientation => 2,
            PatternKind::Permutation => 6,
        }
    }
}

/// For permutation patterns, the symbol of a U colored sticker
pub const UP_SYMBOL: u8 = 4;
/// For permutation patterns, the symbol of a D colored sticker
pub const DOWN_SYMBOL: u8 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPattern {
    #[error("A pattern has {PATTERN_LEN} symbols but {0} were given")]
    WrongLength(usize),
    #[error("`{symbol}` is not a valid {kind:?} symbol")]
    BadSymbol { kind: PatternKind, symbol: char },
}

/// The stickers of the last layer reduced to small symbols.
///
/// Orientation symbols are 1 for a U colored sticker and 0 otherwise. Permutation symbols index the side colors cyclically from F (`F R B L`), with `UP_SYMBOL` and `DOWN_SYMBOL` for the remaining two colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern {
    kind: PatternKind,
    symbols: [u8; PATTERN_LEN],
}

impl Pattern {
    /// # Errors
    ///
    /// Returns an error if a symbol is out of range for the kind.
    pub fn new(kind: PatternKind, symbols: [u8; PATTERN_LEN]) -> Result<Pattern, InvalidPattern> {
        if let Some(&bad) = symbols.iter().find(|&&s| s >= kind.symbol_count()) {
            return Err(InvalidPattern::BadSymbol {
                kind,
                symbol: char::from_digit(u32::from(bad), 36).unwrap_or('?'),
            });
        }

        Ok(Pattern { kind, symbols })
    }

    /// Parse the digit string produced by `Display`.
    ///
    /// # Errors
    ///
    /// Returns an error for the wrong length or a symbol that is not valid for the kind.
    pub fn parse(kind: PatternKind, text: &str) -> Result<Pattern, InvalidPattern> {
        let digits = text.trim().chars().collect::<Vec<_>>();
        if digits.len() != PATTERN_LEN {
            return Err(InvalidPattern::WrongLength(digits.len()));
        }

        let mut symbols = [0; PATTERN_LEN];
        for (slot, &c) in symbols.iter_mut().zip(&digits) {
            let digit = c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .filter(|&d| d < kind.symbol_count())
                .ok_or(InvalidPattern::BadSymbol { kind, symbol: c })?;
            *slot = digit;
        }

        Ok(Pattern { kind, symbols })
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    #[must_use]
    pub fn symbols(&self) -> &[u8; PATTERN_LEN] {
        &self.symbols
    }

    /// The symbols of the nine U face stickers
    #[must_use]
    pub fn top(&self) -> &[u8] {
        &self.symbols[..9]
    }

    /// The pattern of the same state after `k` clockwise U turns
    #[must_use]
    pub fn rotate(&self, k: u8) -> Pattern {
        let mut symbols = self.symbols;

        for _ in 0..k % 4 {
            let old = symbols;
            for (slot, &to) in ROTATION.iter().enumerate() {
                symbols[to] = old[slot];
            }
        }

        Pattern {
            kind: self.kind,
            symbols,
        }
    }

    /// Relabel the side colors as if every side center were `shift` faces further along `F R B L`.
    ///
    /// Orientation patterns have no side colors and are returned unchanged.
    #[must_use]
    pub fn color_shift(&self, shift: u8) -> Pattern {
        match self.kind {
            PatternKind::Orientation => *self,
            PatternKind::Permutation => Pattern {
                kind: self.kind,
                symbols: self
                    .symbols
                    .map(|s| if s < 4 { (s + shift) % 4 } else { s }),
            },
        }
    }

    /// The canonical representative of every pattern equivalent to this one.
    ///
    /// The offset is the smallest number of clockwise U turns that, together with a color shift for permutation patterns, turns this pattern into the canonical one.
    #[must_use]
    pub fn canonicalize(&self) -> CanonicalPattern {
        let shifts = match self.kind {
            PatternKind::Orientation => 1,
            PatternKind::Permutation => 4,
        };

        let mut best: Option<CanonicalPattern> = None;

        for k in 0..4 {
            let rotated = self.rotate(k);
            for shift in 0..shifts {
                let candidate = rotated.color_shift(shift);
                if best.as_ref().is_none_or(|b| candidate < b.canonical) {
                    best = Some(CanonicalPattern {
                        canonical: candidate,
                        rotation_offset: k,
                    });
                }
            }
        }

        // The loop runs at least once
        best.unwrap_or(CanonicalPattern {
            canonical: *self,
            rotation_offset: 0,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.symbols {
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

/// A canonical pattern together with the U turns that led to it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalPattern {
    pub canonical: Pattern,
    /// Clockwise U turns applied to the input pattern, in `0..4`
    pub rotation_offset: u8,
}

/// Where each pattern slot goes under one clockwise U turn
static ROTATION: LazyLock<[usize; PATTERN_LEN]> = LazyLock::new(|| {
    let permutation = algorithm_permutation(&Algorithm::u_turns(1));

    let rotation = PATTERN_FACELETS.map(|facelet| {
        let to = usize::from(permutation[facelet]);
        PATTERN_FACELETS
            .iter()
            .position(|&f| f == to)
            .unwrap_or_else(|| panic!("U moves facelet {facelet} out of the last layer"))
    });

    let mut seen = [false; PATTERN_LEN];
    for &to in &rotation {
        assert!(!seen[to], "U does not permute the last layer");
        seen[to] = true;
    }

    rotation
});

/// Read the pattern of the last layer of a state, relative to its centers.
#[must_use]
pub fn extract(state: &CubeState, kind: PatternKind) -> Pattern {
    let up = state.center(Face::U);
    let down = state.center(Face::D);
    let sides = SIDES.map(|face| state.center(face));

    let symbols = PATTERN_FACELETS.map(|facelet| {
        let color = state.facelet(facelet);

        match kind {
            PatternKind::Orientation => u8::from(color == up),
            PatternKind::Permutation => {
                if color == up {
                    UP_SYMBOL
                } else if color == down {
                    DOWN_SYMBOL
                } else {
                    sides
                        .iter()
                        .position(|&side| side == color)
                        .and_then(|i| u8::try_from(i).ok())
                        .unwrap_or(DOWN_SYMBOL)
                }
            }
        }
    });

    Pattern { kind, symbols }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Move, parse_notation};

    fn random_pattern(rng: &mut fastrand::Rng, kind: PatternKind) -> Pattern {
        let symbols = std::array::from_fn(|_| rng.u8(..kind.symbol_count()));
        Pattern::new(kind, symbols).unwrap()
    }

    fn random_state(rng: &mut fastrand::Rng) -> CubeState {
        let moves = Move::face_moves();
        let mut cube = CubeState::solved();
        for _ in 0..30 {
            cube.apply(moves[rng.usize(..moves.len())]);
        }
        cube
    }

    #[test]
    fn solved_patterns() {
        let solved = CubeState::solved();

        let orientation = extract(&solved, PatternKind::Orientation);
        assert_eq!(orientation.to_string(), "111111111000000000000");

        let permutation = extract(&solved, PatternKind::Permutation);
        assert_eq!(permutation.to_string(), "444444444000111222333");
    }

    #[test]
    fn display_round_trips() {
        let mut rng = fastrand::Rng::with_seed(3);

        for kind in [PatternKind::Orientation, PatternKind::Permutation] {
            for _ in 0..50 {
                let pattern = random_pattern(&mut rng, kind);
                assert_eq!(Pattern::parse(kind, &pattern.to_string()).unwrap(), pattern);
            }
        }

        assert_eq!(
            Pattern::parse(PatternKind::Orientation, "0123"),
            Err(InvalidPattern::WrongLength(4))
        );
        assert!(Pattern::parse(PatternKind::Orientation, "111111111000000000002").is_err());
        assert!(Pattern::new(PatternKind::Permutation, [6; PATTERN_LEN]).is_err());
    }

    #[test]
    fn extraction_follows_u_turns() {
        let mut rng = fastrand::Rng::with_seed(11);
        let u = parse_notation("U").unwrap();

        for _ in 0..50 {
            let state = random_state(&mut rng);
            for kind in [PatternKind::Orientation, PatternKind::Permutation] {
                assert_eq!(
                    extract(&state.with_algorithm(&u), kind),
                    extract(&state, kind).rotate(1)
                );
            }
        }
    }

    #[test]
    fn four_rotations_are_identity() {
        let mut rng = fastrand::Rng::with_seed(5);
        let pattern = random_pattern(&mut rng, PatternKind::Permutation);

        assert_eq!(pattern.rotate(4), pattern);
        assert_eq!(pattern.rotate(1).rotate(3), pattern);
        assert_eq!(pattern.color_shift(4), pattern);
    }

    #[test]
    fn canonical_form_is_invariant() {
        let mut rng = fastrand::Rng::with_seed(17);

        for _ in 0..200 {
            for kind in [PatternKind::Orientation, PatternKind::Permutation] {
                let pattern = random_pattern(&mut rng, kind);
                let canonical = pattern.canonicalize();

                for k in 0..4 {
                    for shift in 0..4 {
                        let other = pattern.rotate(k).color_shift(shift).canonicalize();
                        assert_eq!(other.canonical, canonical.canonical);
                    }
                }
            }
        }
    }

    #[test]
    fn offset_reaches_the_canonical_form() {
        let mut rng = fastrand::Rng::with_seed(23);

        for _ in 0..200 {
            let pattern = random_pattern(&mut rng, PatternKind::Orientation);
            let CanonicalPattern {
                canonical,
                rotation_offset,
            } = pattern.canonicalize();

            assert!(rotation_offset < 4);
            assert_eq!(pattern.rotate(rotation_offset), canonical);

            let pattern = random_pattern(&mut rng, PatternKind::Permutation);
            let CanonicalPattern {
                canonical,
                rotation_offset,
            } = pattern.canonicalize();

            let rotated = pattern.rotate(rotation_offset);
            assert!((0..4).any(|shift| rotated.color_shift(shift) == canonical));
        }
    }

    #[test]
    fn offset_composes_with_rotation() {
        let mut rng = fastrand::Rng::with_seed(29);
        let mut checked = 0;

        while checked < 200 {
            let pattern = random_pattern(&mut rng, PatternKind::Orientation);
            // Symmetric patterns reach the canonical form at more than one offset
            if pattern.rotate(1) == pattern || pattern.rotate(2) == pattern {
                continue;
            }

            let offset = pattern.canonicalize().rotation_offset;
            for k in 0..4 {
                assert_eq!(
                    pattern.rotate(k).canonicalize().rotation_offset,
                    (offset + 4 - k) % 4
                );
            }
            checked += 1;
        }
    }
}
