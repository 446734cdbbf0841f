//! Where every piece of the cube sits and which stickers belong to it.
//!
//! A cube has 26 slots: twelve edges, eight corners and six centers. Edges and corners are
//! addressed by their position in a coordinate system where every component is -1, 0 or 1,
//! with +x pointing right, +y up and +z towards the front face.

use std::{ops::Range, sync::LazyLock};

use crate::facelets::{CENTER_INDEX, Face, FaceletAddress};

pub const SLOT_COUNT: usize = 26;
pub const EDGE_SLOTS: Range<usize> = 0..12;
pub const CORNER_SLOTS: Range<usize> = 12..20;
pub const CENTER_SLOTS: Range<usize> = 20..26;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Edge,
    Corner,
    Center,
}

impl SlotKind {
    #[must_use]
    pub fn of(slot: usize) -> SlotKind {
        if EDGE_SLOTS.contains(&slot) {
            SlotKind::Edge
        } else if CORNER_SLOTS.contains(&slot) {
            SlotKind::Corner
        } else {
            SlotKind::Center
        }
    }

    /// The number of distinct orientations a piece of this kind can take
    #[must_use]
    pub fn modulus(self) -> usize {
        match self {
            SlotKind::Edge => 2,
            SlotKind::Corner => 3,
            SlotKind::Center => 4,
        }
    }

    /// The slots belonging to this kind
    #[must_use]
    pub fn slots(self) -> Range<usize> {
        match self {
            SlotKind::Edge => EDGE_SLOTS,
            SlotKind::Corner => CORNER_SLOTS,
            SlotKind::Center => CENTER_SLOTS,
        }
    }
}

#[must_use]
pub fn modulus(slot: usize) -> usize {
    SlotKind::of(slot).modulus()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// The outward axis of a face followed by the axes that run along its sticker columns and rows
struct FaceFrame {
    normal: (Axis, i8),
    u: (Axis, i8),
    v: (Axis, i8),
}

const FACE_FRAMES: [FaceFrame; 6] = {
    use Axis::*;
    [
        FaceFrame {
            normal: (Y, 1),
            u: (X, 1),
            v: (Z, 1),
        },
        FaceFrame {
            normal: (X, -1),
            u: (Z, 1),
            v: (Y, -1),
        },
        FaceFrame {
            normal: (Z, 1),
            u: (X, 1),
            v: (Y, -1),
        },
        FaceFrame {
            normal: (X, 1),
            u: (Z, -1),
            v: (Y, -1),
        },
        FaceFrame {
            normal: (Z, -1),
            u: (X, -1),
            v: (Y, -1),
        },
        FaceFrame {
            normal: (Y, -1),
            u: (X, 1),
            v: (Z, -1),
        },
    ]
};

/// Positions of the edge slots followed by the corner slots
const COORDS: [[i8; 3]; 20] = [
    [-1, -1, 0],
    [-1, 0, -1],
    [-1, 1, 0],
    [-1, 0, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
    [0, 1, 1],
    [1, -1, 0],
    [1, 0, -1],
    [1, 1, 0],
    [1, 0, 1],
    [-1, -1, -1],
    [-1, -1, 1],
    [-1, 1, 1],
    [-1, 1, -1],
    [1, -1, 1],
    [1, -1, -1],
    [1, 1, -1],
    [1, 1, 1],
];

fn face_on(axis: Axis, direction: i8) -> Face {
    match (axis, direction > 0) {
        (Axis::X, true) => Face::Right,
        (Axis::X, false) => Face::Left,
        (Axis::Y, true) => Face::Up,
        (Axis::Y, false) => Face::Down,
        (Axis::Z, true) => Face::Front,
        (Axis::Z, false) => Face::Back,
    }
}

/// The sticker of the piece at `position` lying on the face that points along `axis`
fn facelet_on(position: [i8; 3], axis: Axis) -> FaceletAddress {
    let face = face_on(axis, position[axis as usize]);
    let frame = &FACE_FRAMES[face as usize];

    let u = position[frame.u.0 as usize] * frame.u.1;
    let v = position[frame.v.0 as usize] * frame.v.1;

    debug_assert_eq!(position[frame.normal.0 as usize], frame.normal.1);

    let index = 3 * v + u + 4;
    debug_assert!((0..9).contains(&index), "{position:?} is off the {face} face");
    #[allow(clippy::cast_sign_loss)]
    let index = index as usize;

    FaceletAddress { face, index }
}

/// The stickers of a slot in their canonical order. Edges list the x sticker first, or the y
/// sticker when the edge has none. Corners go x, y, z or x, z, y so that each corner is read
/// with the same handedness.
fn slot_facelets(slot: usize) -> Vec<FaceletAddress> {
    if CENTER_SLOTS.contains(&slot) {
        let face = Face::ALL[slot - CENTER_SLOTS.start];
        return vec![FaceletAddress {
            face,
            index: CENTER_INDEX,
        }];
    }

    let position = COORDS[slot];
    let [x, y, z] = position;

    let axes: &[Axis] = if EDGE_SLOTS.contains(&slot) {
        match (x != 0, y != 0) {
            (true, true) => &[Axis::X, Axis::Y],
            (true, false) => &[Axis::X, Axis::Z],
            _ => &[Axis::Y, Axis::Z],
        }
    } else if x * y * z > 0 {
        &[Axis::X, Axis::Y, Axis::Z]
    } else {
        &[Axis::X, Axis::Z, Axis::Y]
    };

    axes.iter()
        .map(|&axis| facelet_on(position, axis))
        .collect()
}

/// The stickers of every slot, indexed by slot
pub static SLOT_FACELETS: LazyLock<[Vec<FaceletAddress>; SLOT_COUNT]> =
    LazyLock::new(|| std::array::from_fn(slot_facelets));

/// The slot of the center piece on `face`
#[must_use]
pub fn center_slot(face: Face) -> usize {
    CENTER_SLOTS.start + face as usize
}
