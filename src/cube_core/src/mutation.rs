use thiserror::Error;

use crate::{
    convert::{ConversionError, facelets_to_state, state_to_facelets},
    cubies::{CubieError, CubieTable},
    facelets::Facelets,
    geometry::{SLOT_COUNT, modulus},
    state::CubeState,
};

/// A change to a cube. Slot `i` receives the piece from slot `i + position[i]`, twisted by
/// `orientation[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mutation {
    position: [i8; SLOT_COUNT],
    orientation: [u8; SLOT_COUNT],
}

#[derive(Error, Debug)]
pub enum MutationError {
    #[error(transparent)]
    Cubie(#[from] CubieError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

fn twist(value: u8, slot: usize, orientation: u8) -> u8 {
    // Moduli are at most 4
    #[allow(clippy::cast_possible_truncation)]
    let modulus = modulus(slot) as u8;
    modulus * (value / modulus) + (value % modulus + orientation) % modulus
}

// Slot indices fit in an i8
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(from: usize, to: usize) -> i8 {
    to as i8 - from as i8
}

impl Mutation {
    #[must_use]
    pub fn identity() -> Mutation {
        Mutation {
            position: [0; SLOT_COUNT],
            orientation: [0; SLOT_COUNT],
        }
    }

    /// The mutation that takes the identity state to `state`
    #[must_use]
    pub fn from_state(state: &CubeState) -> Mutation {
        Mutation {
            position: std::array::from_fn(|slot| offset(slot, state.home(slot))),
            orientation: std::array::from_fn(|slot| state.orientation(slot)),
        }
    }

    #[must_use]
    pub fn position(&self) -> &[i8; SLOT_COUNT] {
        &self.position
    }

    #[must_use]
    pub fn orientation(&self) -> &[u8; SLOT_COUNT] {
        &self.orientation
    }

    /// Replace the twist given to the piece landing in `slot`
    #[must_use]
    pub fn with_orientation(mut self, slot: usize, orientation: u8) -> Mutation {
        // Moduli are at most 4
        #[allow(clippy::cast_possible_truncation)]
        let modulus = modulus(slot) as u8;
        self.orientation[slot] = orientation % modulus;
        self
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Mutation::identity()
    }

    fn source(&self, slot: usize) -> usize {
        slot.saturating_add_signed(isize::from(self.position[slot]))
    }

    /// The mutation that performs `self` and then `then`
    #[must_use]
    pub fn compose(&self, then: &Mutation) -> Mutation {
        let mut composed = Mutation::identity();

        for slot in 0..SLOT_COUNT {
            let middle = then.source(slot);
            let source = self.source(middle);

            composed.position[slot] = offset(slot, source);
            // Moduli are at most 4
            #[allow(clippy::cast_possible_truncation)]
            let modulus = modulus(slot) as u8;
            composed.orientation[slot] = (self.orientation[middle] + then.orientation[slot]) % modulus;
        }

        composed
    }
}

/// Apply a mutation to a state
#[must_use]
pub fn mutate(state: &CubeState, mutation: &Mutation) -> CubeState {
    let values = state.values();

    CubeState::from_raw(std::array::from_fn(|slot| {
        twist(
            values[mutation.source(slot)],
            slot,
            mutation.orientation[slot],
        )
    }))
}

/// Apply mutations one after another
#[must_use]
pub fn mutate_sequence<'a>(
    state: &CubeState,
    mutations: impl IntoIterator<Item = &'a Mutation>,
) -> CubeState {
    mutations
        .into_iter()
        .fold(*state, |state, mutation| mutate(&state, mutation))
}

/// Find the mutation that undoes `mutation`. The mutation is applied to a solved cube, the
/// scrambled stickers become the reference for a new cubie table, and reading the solved
/// stickers against that table gives the way back.
pub fn negate(
    mutation: &Mutation,
    solved: &Facelets,
    table: &CubieTable,
) -> Result<Mutation, MutationError> {
    let solved_state = facelets_to_state(solved, table)?;
    let scrambled = state_to_facelets(&mutate(&solved_state, mutation), table);

    let scrambled_table = CubieTable::new(&scrambled)?;

    Ok(Mutation::from_state(&facelets_to_state(
        solved,
        &scrambled_table,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap_state() -> CubeState {
        // Swap the first two edges, flipping both, and twist the first corner
        let mut values = *CubeState::identity().values();
        values[0] = 3;
        values[1] = 1;
        values[12] = 37;
        CubeState::try_from(&values[..]).unwrap()
    }

    #[test]
    fn identity_does_nothing() {
        let state = swap_state();
        assert_eq!(mutate(&state, &Mutation::identity()), state);
        assert!(Mutation::from_state(&CubeState::identity()).is_identity());
    }

    #[test]
    fn from_state_reproduces_the_state() {
        let state = swap_state();
        let mutation = Mutation::from_state(&state);

        assert_eq!(mutation.position()[0], 1);
        assert_eq!(mutation.position()[1], -1);
        assert_eq!(mutation.orientation()[12], 1);
        assert_eq!(mutate(&CubeState::identity(), &mutation), state);
    }

    #[test]
    fn composition_matches_sequencing() {
        let a = Mutation::from_state(&swap_state());
        let b = Mutation::identity().with_orientation(0, 1).with_orientation(22, 3);

        let state = swap_state();
        assert_eq!(
            mutate(&state, &a.compose(&b)),
            mutate_sequence(&state, [&a, &b])
        );
    }

    #[test]
    fn negation_undoes() {
        let solved = Facelets::solved();
        let table = CubieTable::new(&solved).unwrap();

        let mutation = Mutation::from_state(&swap_state()).with_orientation(21, 1);
        let negated = negate(&mutation, &solved, &table).unwrap();

        assert!(mutation.compose(&negated).is_identity());
        assert!(negated.compose(&mutation).is_identity());
    }
}
