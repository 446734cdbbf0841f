use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{SLOT_COUNT, SlotKind, modulus};

/// The permutation form of a cube. Every slot holds `modulus * home_slot + orientation`, where
/// `home_slot` is the slot the piece sits in when solved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct CubeState([u8; SLOT_COUNT]);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("Expected {SLOT_COUNT} slots but got {0}")]
    WrongLength(usize),
    #[error("Slot {slot} holds {value} which is not a piece of its kind")]
    WrongKind { slot: usize, value: u8 },
    #[error("The piece from slot {home} appears more than once")]
    Repeated { home: usize },
}

impl CubeState {
    /// Every piece at home with zero orientation
    #[must_use]
    pub fn identity() -> CubeState {
        CubeState(std::array::from_fn(|slot| {
            u8::try_from(modulus(slot) * slot).unwrap_or(u8::MAX)
        }))
    }

    /// Build a state without checking it. Only use this for values produced by the engine.
    pub(crate) fn from_raw(values: [u8; SLOT_COUNT]) -> CubeState {
        CubeState(values)
    }

    #[must_use]
    pub fn values(&self) -> &[u8; SLOT_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn value(&self, slot: usize) -> u8 {
        self.0[slot]
    }

    /// The slot the piece currently in `slot` belongs to
    #[must_use]
    pub fn home(&self, slot: usize) -> usize {
        usize::from(self.0[slot]) / modulus(slot)
    }

    #[must_use]
    pub fn orientation(&self, slot: usize) -> u8 {
        // The modulus is at most 4
        #[allow(clippy::cast_possible_truncation)]
        let modulus = modulus(slot) as u8;
        self.0[slot] % modulus
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == CubeState::identity()
    }
}

impl TryFrom<&[u8]> for CubeState {
    type Error = StateError;

    fn try_from(values: &[u8]) -> Result<Self, Self::Error> {
        let values: [u8; SLOT_COUNT] = values
            .try_into()
            .map_err(|_| StateError::WrongLength(values.len()))?;

        let mut seen = [false; SLOT_COUNT];

        for (slot, &value) in values.iter().enumerate() {
            let home = usize::from(value) / modulus(slot);

            if home >= SLOT_COUNT || SlotKind::of(home) != SlotKind::of(slot) {
                return Err(StateError::WrongKind { slot, value });
            }

            if std::mem::replace(&mut seen[home], true) {
                return Err(StateError::Repeated { home });
            }
        }

        Ok(CubeState(values))
    }
}

impl TryFrom<Vec<u8>> for CubeState {
    type Error = StateError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        CubeState::try_from(values.as_slice())
    }
}

impl From<CubeState> for Vec<u8> {
    fn from(state: CubeState) -> Self {
        state.0.to_vec()
    }
}

impl Default for CubeState {
    fn default() -> Self {
        CubeState::identity()
    }
}

impl Display for CubeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
