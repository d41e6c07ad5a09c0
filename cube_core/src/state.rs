use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Corner, Edge, FACELET_COUNT, Vector};

/// A face of the cube, in the `U R F D L B` order used to lay out the facelets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The outward normal of the face
    #[must_use]
    pub fn normal(self) -> [i8; 3] {
        match self {
            Face::U => [0, 1, 0],
            Face::R => [1, 0, 0],
            Face::F => [0, 0, 1],
            Face::D => [0, -1, 0],
            Face::L => [-1, 0, 0],
            Face::B => [0, 0, -1],
        }
    }

    pub(crate) fn from_normal(normal: Vector) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.normal() == normal)
    }

    #[must_use]
    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::R => Face::L,
            Face::F => Face::B,
            Face::D => Face::U,
            Face::L => Face::R,
            Face::B => Face::F,
        }
    }

    /// The index of the center sticker of the face
    #[must_use]
    pub fn center_facelet(self) -> usize {
        self.index() * 9 + 4
    }

    /// The face a facelet index belongs to
    #[must_use]
    pub fn of_facelet(facelet: usize) -> Face {
        Face::ALL[facelet / 9]
    }

    /// The color this face shows on a solved cube
    #[must_use]
    pub fn solved_color(self) -> Color {
        match self {
            Face::U => Color::White,
            Face::R => Color::Red,
            Face::F => Color::Green,
            Face::D => Color::Yellow,
            Face::L => Color::Orange,
            Face::B => Color::Blue,
        }
    }
}

/// The color of a sticker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Blue,
    ];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Blue => 'B',
        }
    }

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|color| color.letter() == letter.to_ascii_uppercase())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A structural violation that makes a collection of stickers not a cube
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCubeState {
    #[error("Face {face:?} has {count} facelets, expected 9")]
    WrongFaceletCount { face: Face, count: usize },
    #[error("Expected {expected} facelets in total but got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("Face {0:?} is missing")]
    MissingFace(Face),
    #[error("`{0}` is not a color")]
    UnknownColor(char),
    #[error("The color {color:?} appears {count} times, expected 9")]
    ColorCount { color: Color, count: usize },
    #[error("The centers of {0:?} and {1:?} have the same color")]
    DuplicateCenters(Face, Face),
}

/// The stickers of a 3x3x3 cube.
///
/// Facelets are stored face by face in `U R F D L B` order, each face row by row as seen from outside the cube with the standard net orientation (U has B at the top, D has F at the top, the side faces have U at the top).
///
/// Every `CubeState` upholds the invariant that each face has nine stickers and each of the six colors appears nine times. Cloning is a deep copy.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CubeState {
    pub(crate) facelets: [Color; FACELET_COUNT],
}

impl CubeState {
    /// A solved cube
    #[must_use]
    pub fn solved() -> CubeState {
        CubeState {
            facelets: std::array::from_fn(|facelet| Face::of_facelet(facelet).solved_color()),
        }
    }

    /// Build a cube from a sticker array per face.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing, a face does not have nine stickers, or the colors are not distributed nine per color with distinct centers.
    pub fn from_faces(faces: &BTreeMap<Face, Vec<Color>>) -> Result<CubeState, InvalidCubeState> {
        let mut facelets = [Color::White; FACELET_COUNT];

        for face in Face::ALL {
            let stickers = faces.get(&face).ok_or(InvalidCubeState::MissingFace(face))?;

            if stickers.len() != 9 {
                return Err(InvalidCubeState::WrongFaceletCount {
                    face,
                    count: stickers.len(),
                });
            }

            facelets[face.index() * 9..face.index() * 9 + 9].copy_from_slice(stickers);
        }

        CubeState::from_facelets(facelets)
    }

    /// Build a cube from all 54 facelets.
    ///
    /// # Errors
    ///
    /// Returns an error if the colors are not distributed nine per color with distinct centers.
    pub fn from_facelets(facelets: [Color; FACELET_COUNT]) -> Result<CubeState, InvalidCubeState> {
        for color in Color::ALL {
            let count = facelets.iter().filter(|&&c| c == color).count();
            if count != 9 {
                return Err(InvalidCubeState::ColorCount { color, count });
            }
        }

        for (i, a) in Face::ALL.into_iter().enumerate() {
            for b in Face::ALL.into_iter().skip(i + 1) {
                if facelets[a.center_facelet()] == facelets[b.center_facelet()] {
                    return Err(InvalidCubeState::DuplicateCenters(a, b));
                }
            }
        }

        Ok(CubeState { facelets })
    }

    #[must_use]
    pub fn facelets(&self) -> &[Color; FACELET_COUNT] {
        &self.facelets
    }

    #[must_use]
    pub fn facelet(&self, facelet: usize) -> Color {
        self.facelets[facelet]
    }

    /// The nine stickers of a face
    #[must_use]
    pub fn face(&self, face: Face) -> &[Color] {
        &self.facelets[face.index() * 9..face.index() * 9 + 9]
    }

    /// The color of the center of a face
    #[must_use]
    pub fn center(&self, face: Face) -> Color {
        self.facelets[face.center_facelet()]
    }

    /// The face whose center currently shows `color`
    #[must_use]
    pub fn face_of_color(&self, color: Color) -> Option<Face> {
        Face::ALL.into_iter().find(|face| self.center(*face) == color)
    }

    /// Whether every sticker of the face matches its center
    #[must_use]
    pub fn is_face_uniform(&self, face: Face) -> bool {
        let center = self.center(face);
        self.face(face).iter().all(|&color| color == center)
    }

    /// Whether every face is a single color
    #[must_use]
    pub fn is_fully_solved(&self) -> bool {
        Face::ALL.into_iter().all(|face| self.is_face_uniform(face))
    }

    /// Whether the sticker matches the center of the face it is on
    #[must_use]
    pub fn is_facelet_solved(&self, facelet: usize) -> bool {
        self.facelets[facelet] == self.center(Face::of_facelet(facelet))
    }

    #[must_use]
    pub fn is_corner_solved(&self, corner: Corner) -> bool {
        corner
            .facelets()
            .into_iter()
            .all(|facelet| self.is_facelet_solved(facelet))
    }

    #[must_use]
    pub fn is_edge_solved(&self, edge: Edge) -> bool {
        edge.facelets()
            .into_iter()
            .all(|facelet| self.is_facelet_solved(facelet))
    }

    /// The colors of the stickers on a corner position, U/D sticker first and then clockwise
    #[must_use]
    pub fn corner_colors(&self, corner: Corner) -> [Color; 3] {
        corner.facelets().map(|facelet| self.facelets[facelet])
    }

    #[must_use]
    pub fn edge_colors(&self, edge: Edge) -> [Color; 2] {
        edge.facelets().map(|facelet| self.facelets[facelet])
    }

    /// The colors that belong on a corner position given where the centers are
    #[must_use]
    pub fn home_corner_colors(&self, corner: Corner) -> [Color; 3] {
        corner
            .facelets()
            .map(|facelet| self.center(Face::of_facelet(facelet)))
    }

    #[must_use]
    pub fn home_edge_colors(&self, edge: Edge) -> [Color; 2] {
        edge.facelets()
            .map(|facelet| self.center(Face::of_facelet(facelet)))
    }
}

impl Default for CubeState {
    fn default() -> Self {
        CubeState::solved()
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.facelets {
            write!(f, "{color}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for face in Face::ALL {
            map.entry(&face, &self.face(face).iter().map(|c| c.letter()).collect::<String>());
        }
        map.finish()
    }
}

impl FromStr for CubeState {
    type Err = InvalidCubeState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>();

        if letters.len() != FACELET_COUNT {
            return Err(InvalidCubeState::WrongLength {
                expected: FACELET_COUNT,
                got: letters.len(),
            });
        }

        let mut facelets = [Color::White; FACELET_COUNT];
        for (slot, letter) in facelets.iter_mut().zip(letters) {
            *slot = Color::from_letter(letter).ok_or(InvalidCubeState::UnknownColor(letter))?;
        }

        CubeState::from_facelets(facelets)
    }
}

impl From<CubeState> for String {
    fn from(state: CubeState) -> Self {
        state.to_string()
    }
}

impl TryFrom<String> for CubeState {
    type Error = InvalidCubeState;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn solved_cube_is_solved() {
        let cube = CubeState::solved();
        assert!(cube.is_fully_solved());
        assert_eq!(cube.center(Face::F), Color::Green);
        assert!(Corner::ALL.into_iter().all(|c| cube.is_corner_solved(c)));
        assert!(Edge::ALL.into_iter().all(|e| cube.is_edge_solved(e)));
    }

    #[test]
    fn string_round_trip() {
        let cube = CubeState::solved();
        let text = cube.to_string();
        assert_eq!(&text[..9], "WWWWWWWWW");
        assert_eq!(text.parse::<CubeState>().unwrap(), cube);

        let json = serde_json::to_string(&cube).unwrap();
        assert_eq!(serde_json::from_str::<CubeState>(&json).unwrap(), cube);
    }

    #[test]
    fn rejects_bad_states() {
        let mut text = CubeState::solved().to_string();
        text.replace_range(0..1, "R");
        assert_eq!(
            text.parse::<CubeState>(),
            Err(InvalidCubeState::ColorCount {
                color: Color::White,
                count: 8
            })
        );

        assert_eq!(
            "WWW".parse::<CubeState>(),
            Err(InvalidCubeState::WrongLength {
                expected: 54,
                got: 3
            })
        );

        let mut text = CubeState::solved().to_string();
        text.replace_range(0..1, "X");
        assert_eq!(
            text.parse::<CubeState>(),
            Err(InvalidCubeState::UnknownColor('X'))
        );

        let mut faces = Face::ALL
            .into_iter()
            .map(|face| (face, vec![face.solved_color(); 9]))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(CubeState::from_faces(&faces), Ok(CubeState::solved()));

        faces.get_mut(&Face::U).unwrap().pop();
        assert_eq!(
            CubeState::from_faces(&faces),
            Err(InvalidCubeState::WrongFaceletCount {
                face: Face::U,
                count: 8
            })
        );

        faces.remove(&Face::B);
        assert!(CubeState::from_faces(&faces).is_err());
    }

    #[test]
    fn clones_do_not_alias() {
        let a = CubeState::solved();
        let mut b = a.clone();
        b.facelets.swap(0, 9);
        assert_ne!(a, b);
        assert!(a.is_fully_solved());
    }
}
