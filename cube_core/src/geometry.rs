//! Sticker coordinates and the facelet permutations they induce.
//!
//! Every facelet is identified by the position of the cubie it sits on and the
//! outward normal of the face it belongs to. Both live in `{-1, 0, 1}^3` with
//! `x` pointing at R, `y` at U and `z` at F. Turning a layer clockwise (as seen
//! from outside the face) is a -90° rotation about the face normal, so the
//! permutation of every move falls out of the geometry instead of being written
//! by hand.

use std::sync::LazyLock;

use itertools::Itertools;

use crate::Face;

/// The number of stickers on a 3x3x3 cube
pub const FACELET_COUNT: usize = 54;

/// Where every sticker ends up after a move: the sticker at index `i` moves to `destination[i]`.
pub type FaceletPermutation = [u8; FACELET_COUNT];

pub(crate) type Vector = [i8; 3];

fn dot(a: Vector, b: Vector) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vector, b: Vector) -> Vector {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn det(a: Vector, b: Vector, c: Vector) -> i8 {
    dot(a, cross(b, c))
}

/// Rotate `v` by -90° about the unit axis `axis`.
fn rotate_clockwise(v: Vector, axis: Vector) -> Vector {
    let c = cross(axis, v);
    let d = dot(axis, v);

    [
        axis[0] * d - c[0],
        axis[1] * d - c[1],
        axis[2] * d - c[2],
    ]
}

/// The cubie position and outward normal of a facelet.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) fn facelet_geometry(facelet: usize) -> (Vector, Vector) {
    let face = Face::ALL[facelet / 9];
    let r = (facelet % 9 / 3) as i8;
    let c = (facelet % 3) as i8;

    let position = match face {
        Face::U => [c - 1, 1, r - 1],
        Face::R => [1, 1 - r, 1 - c],
        Face::F => [c - 1, 1 - r, 1],
        Face::D => [c - 1, -1, 1 - r],
        Face::L => [-1, 1 - r, c - 1],
        Face::B => [1 - c, 1 - r, -1],
    };

    (position, face.normal())
}

/// The inverse of `facelet_geometry`.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn facelet_at(position: Vector, normal: Vector) -> usize {
    let face = Face::from_normal(normal).unwrap_or_else(|| panic!("{normal:?} is not a face normal"));
    let [x, y, z] = position;

    let (r, c) = match face {
        Face::U => (z + 1, x + 1),
        Face::R => (1 - y, 1 - z),
        Face::F => (1 - y, x + 1),
        Face::D => (1 - z, x + 1),
        Face::L => (1 - y, z + 1),
        Face::B => (1 - y, 1 - x),
    };

    debug_assert!((0..3).contains(&r) && (0..3).contains(&c));

    face.index() * 9 + r as usize * 3 + c as usize
}

/// Which slices along an axis a turn moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LayerSpan {
    /// Only the outer layer
    Outer,
    /// The outer layer and the middle slice behind it
    Wide,
    /// Only the middle slice
    Middle,
    /// The whole cube
    Whole,
}

impl LayerSpan {
    fn contains(self, depth: i8) -> bool {
        match self {
            LayerSpan::Outer => depth == 1,
            LayerSpan::Wide => depth >= 0,
            LayerSpan::Middle => depth == 0,
            LayerSpan::Whole => true,
        }
    }
}

/// The permutation of a clockwise quarter turn of `span` around `axis`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn quarter_turn(axis: Vector, span: LayerSpan) -> FaceletPermutation {
    let mut destination = [0_u8; FACELET_COUNT];

    for (facelet, slot) in destination.iter_mut().enumerate() {
        let (position, normal) = facelet_geometry(facelet);

        *slot = if span.contains(dot(position, axis)) {
            facelet_at(
                rotate_clockwise(position, axis),
                rotate_clockwise(normal, axis),
            ) as u8
        } else {
            facelet as u8
        };
    }

    assert!(
        is_permutation(&destination),
        "A quarter turn around {axis:?} does not permute the stickers"
    );

    destination
}

pub(crate) fn is_permutation(destination: &[u8]) -> bool {
    let mut seen = vec![false; destination.len()];

    for &to in destination {
        match seen.get_mut(to as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }

    true
}

/// Perform `first` and then `second`.
pub(crate) fn compose(first: &FaceletPermutation, second: &FaceletPermutation) -> FaceletPermutation {
    let mut out = [0; FACELET_COUNT];

    for (facelet, slot) in out.iter_mut().enumerate() {
        *slot = second[first[facelet] as usize];
    }

    out
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn invert(permutation: &FaceletPermutation) -> FaceletPermutation {
    let mut out = [0; FACELET_COUNT];

    for (facelet, &to) in permutation.iter().enumerate() {
        out[to as usize] = facelet as u8;
    }

    out
}

/// The eight corner positions, in `URF UFL ULB UBR DFR DLF DBL DRB` order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Corner {
    URF,
    UFL,
    ULB,
    UBR,
    DFR,
    DLF,
    DBL,
    DRB,
}

impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner::URF,
        Corner::UFL,
        Corner::ULB,
        Corner::UBR,
        Corner::DFR,
        Corner::DLF,
        Corner::DBL,
        Corner::DRB,
    ];

    fn position(self) -> Vector {
        match self {
            Corner::URF => [1, 1, 1],
            Corner::UFL => [-1, 1, 1],
            Corner::ULB => [-1, 1, -1],
            Corner::UBR => [1, 1, -1],
            Corner::DFR => [1, -1, 1],
            Corner::DLF => [-1, -1, 1],
            Corner::DBL => [-1, -1, -1],
            Corner::DRB => [1, -1, -1],
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The three stickers of the corner, starting with the U or D sticker and continuing clockwise.
    #[must_use]
    pub fn facelets(self) -> [usize; 3] {
        SLOTS.corners[self.index()]
    }
}

/// The twelve edge positions, in `UR UF UL UB DR DF DL DB FR FL BL BR` order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    UR,
    UF,
    UL,
    UB,
    DR,
    DF,
    DL,
    DB,
    FR,
    FL,
    BL,
    BR,
}

impl Edge {
    pub const ALL: [Edge; 12] = [
        Edge::UR,
        Edge::UF,
        Edge::UL,
        Edge::UB,
        Edge::DR,
        Edge::DF,
        Edge::DL,
        Edge::DB,
        Edge::FR,
        Edge::FL,
        Edge::BL,
        Edge::BR,
    ];

    fn position(self) -> Vector {
        match self {
            Edge::UR => [1, 1, 0],
            Edge::UF => [0, 1, 1],
            Edge::UL => [-1, 1, 0],
            Edge::UB => [0, 1, -1],
            Edge::DR => [1, -1, 0],
            Edge::DF => [0, -1, 1],
            Edge::DL => [-1, -1, 0],
            Edge::DB => [0, -1, -1],
            Edge::FR => [1, 0, 1],
            Edge::FL => [-1, 0, 1],
            Edge::BL => [-1, 0, -1],
            Edge::BR => [1, 0, -1],
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two stickers of the edge. The first one is the U/D sticker, or the F/B sticker for the middle layer edges.
    #[must_use]
    pub fn facelets(self) -> [usize; 2] {
        SLOTS.edges[self.index()]
    }
}

struct Slots {
    corners: [[usize; 3]; 8],
    edges: [[usize; 2]; 12],
}

static SLOTS: LazyLock<Slots> = LazyLock::new(|| {
    let corners = Corner::ALL.map(|corner| {
        let position = corner.position();
        let axes = [
            [0, position[1], 0],
            [position[0], 0, 0],
            [0, 0, position[2]],
        ];

        // Clockwise seen from outside the corner means a negative determinant
        let [n0, mut n1, mut n2] = axes;
        if det(n0, n1, n2) > 0 {
            std::mem::swap(&mut n1, &mut n2);
        }

        [n0, n1, n2].map(|normal| facelet_at(position, normal))
    });

    let edges = Edge::ALL.map(|edge| {
        let position = edge.position();
        let normals = (0..3)
            .filter(|&axis| position[axis] != 0)
            .map(|axis| {
                let mut normal = [0; 3];
                normal[axis] = position[axis];
                normal
            })
            // U/D first, then F/B, then R/L
            .sorted_by_key(|normal| match normal {
                [0, y, 0] if *y != 0 => 0,
                [0, 0, _] => 1,
                _ => 2,
            })
            .collect_vec();

        [facelet_at(position, normals[0]), facelet_at(position, normals[1])]
    });

    let mut covered = [false; FACELET_COUNT];
    for facelet in corners.iter().flatten().chain(edges.iter().flatten()) {
        assert!(!covered[*facelet], "Facelet {facelet} belongs to two pieces");
        covered[*facelet] = true;
    }
    for face in Face::ALL {
        covered[face.center_facelet()] = true;
    }
    assert!(covered.iter().all(|v| *v), "Some facelet belongs to no piece");

    Slots { corners, edges }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_round_trips() {
        for facelet in 0..FACELET_COUNT {
            let (position, normal) = facelet_geometry(facelet);
            assert_eq!(facelet_at(position, normal), facelet);
        }
    }

    #[test]
    fn quarter_turns_have_order_four() {
        for face in Face::ALL {
            for span in [LayerSpan::Outer, LayerSpan::Wide, LayerSpan::Middle, LayerSpan::Whole] {
                let quarter = quarter_turn(face.normal(), span);
                let mut acc = quarter;
                for _ in 0..3 {
                    acc = compose(&acc, &quarter);
                }
                assert!(acc.iter().enumerate().all(|(i, &to)| i == to as usize));
                assert_ne!(quarter, compose(&quarter, &quarter));
            }
        }
    }

    #[test]
    fn u_turn_sends_front_to_left() {
        let u = quarter_turn(Face::U.normal(), LayerSpan::Outer);
        // F's top row lands on L's top row
        assert_eq!(u[Face::F.index() * 9], (Face::L.index() * 9) as u8);
        assert_eq!(u[Face::F.index() * 9 + 2], (Face::L.index() * 9 + 2) as u8);
        // The down face is untouched
        for facelet in Face::D.index() * 9..Face::D.index() * 9 + 9 {
            assert_eq!(u[facelet] as usize, facelet);
        }
    }

    #[test]
    fn corner_facelets_start_on_u_or_d() {
        for corner in Corner::ALL {
            let first = corner.facelets()[0] / 9;
            assert!(first == Face::U.index() || first == Face::D.index());
        }

        // URF is U, R, F in clockwise order
        assert_eq!(Corner::URF.facelets(), [8, 9, 20]);
    }
}
