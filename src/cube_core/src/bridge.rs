//! Reading a smart cube. Once decrypted, a message either names a single face turn or reports
//! which piece sits in each of eleven edge and seven corner slots; the last piece of each group
//! follows from the others. The hardware numbers its slots in its own order.

use std::sync::LazyLock;

use itertools::Itertools;
use thiserror::Error;

use crate::{
    codec::{Widths, convert_byte_size},
    convert::CubeModel,
    facelets::{Face, Facelets},
    geometry::{CENTER_SLOTS, SlotKind, modulus},
    state::{CubeState, StateError},
};

/// Engine slot `i` holds what the hardware reports for its slot `HARDWARE_ORDER[i]`. Edges and
/// corners stay within their groups.
pub const HARDWARE_ORDER: [usize; 20] = [
    5, 9, 1, 8, 6, 2, 4, 0, 7, 10, 3, 11, 17, 16, 12, 13, 19, 18, 14, 15,
];

/// The engine slot of every hardware slot
const ENGINE_ORDER: [usize; 20] = {
    let mut order = [0; 20];

    let mut i = 0;
    while i < order.len() {
        order[HARDWARE_ORDER[i]] = i;
        i += 1;
    }

    order
};

/// Faces in the order the hardware numbers them in turn messages
const TURN_FACES: [Face; 6] = [
    Face::Up,
    Face::Front,
    Face::Left,
    Face::Down,
    Face::Back,
    Face::Right,
];

const MODE_BITS: u32 = 4;
const TURN_MESSAGE: u32 = 2;
const PIECE_MESSAGE: u32 = 4;

/// The mode, eight unused bits and the raw turn
const TURN_FIELDS: [u32; 3] = [MODE_BITS, 8, 5];

/// The mode, eight unused bits, then corner pieces, corner twists, edge pieces and edge twists
static PIECE_FIELDS: LazyLock<Vec<u32>> = LazyLock::new(|| {
    [(MODE_BITS, 1), (8, 1), (3, 7), (2, 7), (4, 11), (1, 11)]
        .into_iter()
        .flat_map(|(width, count)| std::iter::repeat_n(width, count))
        .collect()
});

/// For the first slots of each group in hardware order, which piece of the group sits there
/// and its twist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceReport {
    pub edges: [(u8, u8); 11],
    pub corners: [(u8, u8); 7],
}

/// A decrypted smart cube message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A face turned, written as a move name
    Turn(String),
    Pieces(PieceReport),
    /// A message kind without cube state, such as battery or gyroscope readings
    Other(u8),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("The report names piece {piece} for hardware slot {slot}, which has no such piece")]
    UnknownPiece { slot: usize, piece: u8 },
    #[error("The twist {twist} reported for hardware slot {slot} is out of range")]
    InvalidTwist { slot: usize, twist: u8 },
    #[error("Piece {piece} is reported a second time in hardware slot {slot}")]
    RepeatedPiece { slot: usize, piece: u8 },
    #[error("The message holds {actual} bytes but {expected} are needed")]
    Truncated { expected: usize, actual: usize },
    #[error("Unknown turn code {0}")]
    UnknownTurn(u8),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Check the reported pieces of a group and fill in its last slot: the piece nobody reported,
/// twisted so the twists of the group sum to a multiple of the modulus. Pieces are pushed as
/// hardware slot indices.
fn complete_group(
    reported: &[(u8, u8)],
    kind: SlotKind,
    pieces: &mut Vec<(usize, u8)>,
) -> Result<(), ReportError> {
    let slots = kind.slots();
    // Moduli are at most 4
    #[allow(clippy::cast_possible_truncation)]
    let modulus = kind.modulus() as u8;
    let mut seen = vec![false; slots.len()];
    let mut twist_sum = 0;

    for (offset, &(piece, twist)) in reported.iter().enumerate() {
        let slot = slots.start + offset;

        if usize::from(piece) >= slots.len() {
            return Err(ReportError::UnknownPiece { slot, piece });
        }
        if twist >= modulus {
            return Err(ReportError::InvalidTwist { slot, twist });
        }
        if seen[usize::from(piece)] {
            return Err(ReportError::RepeatedPiece { slot, piece });
        }

        seen[usize::from(piece)] = true;
        twist_sum += twist;
        pieces.push((slots.start + usize::from(piece), twist));
    }

    let missing = seen.iter().position(|&seen| !seen).unwrap_or_default();
    pieces.push((
        slots.start + missing,
        (modulus - twist_sum % modulus) % modulus,
    ));

    Ok(())
}

impl PieceReport {
    /// The state the report describes, in engine slot order with the centers in place
    // Homes are below 20 and moduli at most 3
    #[allow(clippy::cast_possible_truncation)]
    pub fn complete(&self) -> Result<CubeState, ReportError> {
        let mut pieces = Vec::with_capacity(HARDWARE_ORDER.len());

        complete_group(&self.edges, SlotKind::Edge, &mut pieces)?;
        complete_group(&self.corners, SlotKind::Corner, &mut pieces)?;

        let identity = CubeState::identity();
        let values = HARDWARE_ORDER
            .iter()
            .enumerate()
            .map(|(slot, &source)| {
                let (piece, twist) = pieces[source];
                (modulus(slot) * ENGINE_ORDER[piece]) as u8 + twist
            })
            .chain(CENTER_SLOTS.map(|slot| identity.value(slot)))
            .collect_vec();

        Ok(CubeState::try_from(values)?)
    }

    /// The stickers the report describes
    pub fn to_facelets(&self, model: &CubeModel) -> Result<Facelets, ReportError> {
        Ok(model.to_facelets(&self.complete()?))
    }
}

/// The move named by a raw turn code: the face in the hardware's numbering, then a bit set for
/// counter-clockwise turns
#[must_use]
pub fn decode_turn(raw: u8) -> Option<String> {
    let face = TURN_FACES.get(usize::from(raw >> 1))?;
    let suffix = if raw & 1 == 1 { "'" } else { "" };

    Some(format!("{}{suffix}", face.letter()))
}

fn read_fields(payload: &[u8], widths: &[u32]) -> Result<Vec<u32>, ReportError> {
    let expected = widths.iter().sum::<u32>().div_ceil(8) as usize;
    if payload.len() < expected {
        return Err(ReportError::Truncated {
            expected,
            actual: payload.len(),
        });
    }

    let bytes = payload.iter().copied().map(u32::from).collect_vec();
    Ok(convert_byte_size(
        &bytes,
        Widths::Fixed(8),
        Widths::Each(widths),
    ))
}

/// Read a decrypted message
// Fields are at most eight bits wide
#[allow(clippy::cast_possible_truncation)]
pub fn decode_message(payload: &[u8]) -> Result<Message, ReportError> {
    let mode = read_fields(payload, &[MODE_BITS])?[0];

    match mode {
        TURN_MESSAGE => {
            let raw = read_fields(payload, &TURN_FIELDS)?[2] as u8;
            decode_turn(raw)
                .map(Message::Turn)
                .ok_or(ReportError::UnknownTurn(raw))
        }
        PIECE_MESSAGE => {
            let fields = read_fields(payload, &PIECE_FIELDS)?;
            let field = |index: usize| fields[index] as u8;

            Ok(Message::Pieces(PieceReport {
                corners: std::array::from_fn(|i| (field(2 + i), field(9 + i))),
                edges: std::array::from_fn(|i| (field(16 + i), field(27 + i))),
            }))
        }
        other => Ok(Message::Other(other as u8)),
    }
}
