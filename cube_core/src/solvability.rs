//! Proving whether a sticker configuration can be reached from a solved cube.
//!
//! Pieces are recognised by their color sets relative to the current centers. A configuration is reachable exactly when every piece is a real piece that appears once, the corner twists sum to zero mod 3, the edge flips sum to zero mod 2, and the corner permutation has the same parity as the edge permutation.

use itertools::Itertools;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::{Color, CubeState, Face, geometry::Corner, geometry::Edge};

/// Even or odd
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Parity {
    Even,
    Odd,
}

/// The parity of a permutation given as `perm[i] = where i goes`
#[must_use]
pub fn permutation_parity(perm: &[usize]) -> Parity {
    let mut visited = vec![false; perm.len()];
    let mut cycles = 0;

    for start in 0..perm.len() {
        if visited[start] {
            continue;
        }

        cycles += 1;
        let mut at = start;
        while !visited[at] {
            visited[at] = true;
            at = perm[at];
        }
    }

    if (perm.len() - cycles) % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

/// A reason a configuration cannot come from a solved cube
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SolvabilityError {
    #[error("The centers are not a rotation of the solved cube")]
    InvalidCenters,
    #[error("The piece at {slot} has colors {colors:?} which belong to no piece")]
    InvalidPieceConfiguration { slot: String, colors: Vec<Color> },
    #[error("The piece with colors {colors:?} appears more than once")]
    DuplicatePiece { colors: Vec<Color> },
    #[error("The corner twists sum to {0} mod 3")]
    CornerTwist(u8),
    #[error("The edge flips sum to {0} mod 2")]
    EdgeFlip(u8),
    #[error("The corner permutation is {corners:?} but the edge permutation is {edges:?}")]
    ParityMismatch { corners: Parity, edges: Parity },
}

/// The outcome of each individual check
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolvabilityDetail {
    /// The sum of corner twists mod 3, if every corner was recognised
    pub corner_twist: Option<u8>,
    /// The sum of edge flips mod 2, if every edge was recognised
    pub edge_flip: Option<u8>,
    pub corner_parity: Option<Parity>,
    pub edge_parity: Option<Parity>,
}

/// The structured result of a solvability proof
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SolvabilityReport {
    pub is_solvable: bool,
    pub errors: Vec<SolvabilityError>,
    pub detail: SolvabilityDetail,
}

fn same_colors(a: &[Color], b: &[Color]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c)) && b.iter().all(|c| a.contains(c))
}

/// Identify every piece of one kind: which home slot it belongs to and its orientation there.
///
/// `slots` yields (name, current colors, home colors) per position and `orientation` maps a position's colors to its orientation.
fn identify<const N: usize>(
    slots: &[(String, [Color; N], [Color; N])],
    orientation: impl Fn(&[Color; N]) -> Option<u8>,
    errors: &mut Vec<SolvabilityError>,
) -> Option<(Vec<usize>, Vec<u8>)> {
    let mut permutation = Vec::with_capacity(slots.len());
    let mut orientations = Vec::with_capacity(slots.len());
    let mut seen = vec![false; slots.len()];
    let mut valid = true;

    for (name, colors, _) in slots {
        let Some(home) = slots
            .iter()
            .position(|(_, _, home_colors)| same_colors(colors, home_colors))
        else {
            errors.push(SolvabilityError::InvalidPieceConfiguration {
                slot: name.clone(),
                colors: colors.to_vec(),
            });
            valid = false;
            continue;
        };

        if seen[home] {
            errors.push(SolvabilityError::DuplicatePiece {
                colors: colors.to_vec(),
            });
            valid = false;
            continue;
        }
        seen[home] = true;

        match orientation(colors) {
            Some(o) => {
                permutation.push(home);
                orientations.push(o);
            }
            None => {
                errors.push(SolvabilityError::InvalidPieceConfiguration {
                    slot: name.clone(),
                    colors: colors.to_vec(),
                });
                valid = false;
            }
        }
    }

    valid.then_some((permutation, orientations))
}

/// Check whether the state could have been produced from a solved cube by legal moves.
///
/// Failures are returned in the report rather than as an error so diagnostic callers can inspect them.
#[must_use]
pub fn check_solvability(state: &CubeState) -> SolvabilityReport {
    let mut errors = Vec::new();
    let mut detail = SolvabilityDetail::default();

    if state.centering_rotation().is_none() {
        errors.push(SolvabilityError::InvalidCenters);

        return SolvabilityReport {
            is_solvable: false,
            errors,
            detail,
        };
    }

    let up_down = [state.center(Face::U), state.center(Face::D)];
    let front_back = [state.center(Face::F), state.center(Face::B)];

    let corners = Corner::ALL
        .into_iter()
        .map(|corner| {
            (
                format!("{corner:?}"),
                state.corner_colors(corner),
                state.home_corner_colors(corner),
            )
        })
        .collect_vec();

    // The twist is how far clockwise the U/D sticker sits from the U/D facelet
    let corner_pieces = identify(
        &corners,
        |colors| {
            colors
                .iter()
                .position(|c| up_down.contains(c))
                .and_then(|i| u8::try_from(i).ok())
        },
        &mut errors,
    );

    let edges = Edge::ALL
        .into_iter()
        .map(|edge| {
            (
                format!("{edge:?}"),
                state.edge_colors(edge),
                state.home_edge_colors(edge),
            )
        })
        .collect_vec();

    // An edge is flipped when its U/D color (or F/B color, lacking one) is not on the slot's first facelet
    let edge_pieces = identify(
        &edges,
        |colors| {
            let primary = colors
                .iter()
                .position(|c| up_down.contains(c))
                .or_else(|| colors.iter().position(|c| front_back.contains(c)))?;
            Some(u8::from(primary != 0))
        },
        &mut errors,
    );

    if let Some((permutation, twists)) = &corner_pieces {
        let twist = twists.iter().map(|&t| u32::from(t)).sum::<u32>() % 3;
        #[allow(clippy::cast_possible_truncation)]
        let twist = twist as u8;
        detail.corner_twist = Some(twist);
        detail.corner_parity = Some(permutation_parity(permutation));

        if twist != 0 {
            errors.push(SolvabilityError::CornerTwist(twist));
        }
    }

    if let Some((permutation, flips)) = &edge_pieces {
        let flip = flips.iter().map(|&f| u32::from(f)).sum::<u32>() % 2;
        #[allow(clippy::cast_possible_truncation)]
        let flip = flip as u8;
        detail.edge_flip = Some(flip);
        detail.edge_parity = Some(permutation_parity(permutation));

        if flip != 0 {
            errors.push(SolvabilityError::EdgeFlip(flip));
        }
    }

    if let (Some(corners), Some(edges)) = (detail.corner_parity, detail.edge_parity)
        && corners != edges
    {
        errors.push(SolvabilityError::ParityMismatch { corners, edges });
    }

    debug!("Solvability of {state}: {errors:?}");

    SolvabilityReport {
        is_solvable: errors.is_empty(),
        errors,
        detail,
    }
}
