use thiserror::Error;

use crate::{
    cubies::{Cubie, CubieError, CubieTable},
    facelets::Facelets,
    geometry::{SLOT_COUNT, modulus},
    state::CubeState,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversionError {
    #[error("The stickers {cubie} in slot {slot} do not form a known piece")]
    UnknownCubie { slot: usize, cubie: Cubie },
    #[error("The piece in slot {slot} already appears in slot {first}")]
    DuplicateCubie { slot: usize, first: usize },
}

/// Read the permutation state off a sticker arrangement
pub fn facelets_to_state(
    facelets: &Facelets,
    table: &CubieTable,
) -> Result<CubeState, ConversionError> {
    let mut values = [0; SLOT_COUNT];
    let mut seen_in = [None; SLOT_COUNT];

    for (slot, value) in values.iter_mut().enumerate() {
        let cubie = Cubie::read(facelets, slot);

        *value = table
            .find(&cubie)
            .ok_or(ConversionError::UnknownCubie { slot, cubie })?;

        let home = usize::from(*value) / modulus(slot);

        if let Some(first) = seen_in[home].replace(slot) {
            return Err(ConversionError::DuplicateCubie { slot, first });
        }
    }

    // Every piece was found once in a slot of its own kind
    Ok(CubeState::from_raw(values))
}

/// Paint the stickers of every piece in the state
#[must_use]
pub fn state_to_facelets(state: &CubeState, table: &CubieTable) -> Facelets {
    let mut facelets = Facelets::new([[0; 9]; 6]);

    for slot in 0..SLOT_COUNT {
        table
            .cubie(state.home(slot), usize::from(state.orientation(slot)))
            .write(&mut facelets, slot);
    }

    facelets
}

/// A solved coloring together with the cubie table read from it
#[derive(Debug, Clone)]
pub struct CubeModel {
    solved: Facelets,
    cubies: CubieTable,
}

impl CubeModel {
    pub fn new(solved: Facelets) -> Result<CubeModel, CubieError> {
        let cubies = CubieTable::new(&solved)?;
        Ok(CubeModel { solved, cubies })
    }

    #[must_use]
    pub fn solved(&self) -> &Facelets {
        &self.solved
    }

    #[must_use]
    pub fn cubies(&self) -> &CubieTable {
        &self.cubies
    }

    pub fn to_state(&self, facelets: &Facelets) -> Result<CubeState, ConversionError> {
        facelets_to_state(facelets, &self.cubies)
    }

    #[must_use]
    pub fn to_facelets(&self, state: &CubeState) -> Facelets {
        state_to_facelets(state, &self.cubies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelets::{Face, FaceletAddress, with_rotation};

    fn table() -> CubieTable {
        CubieTable::new(&Facelets::solved()).unwrap()
    }

    #[test]
    fn solved_is_identity() {
        let table = table();
        let state = facelets_to_state(&Facelets::solved(), &table).unwrap();

        assert!(state.is_identity());
        assert_eq!(state_to_facelets(&state, &table), Facelets::solved());
    }

    #[test]
    fn turned_center() {
        let table = table();
        let mut facelets = Facelets::solved();
        facelets[FaceletAddress {
            face: Face::Right,
            index: 4,
        }] = with_rotation(3, 1);

        let state = facelets_to_state(&facelets, &table).unwrap();
        assert_eq!(state.orientation(23), 1);
        assert_eq!(state_to_facelets(&state, &table), facelets);
    }

    #[test]
    fn flipped_edge() {
        let table = table();
        let mut facelets = Facelets::solved();
        // left-down edge
        facelets[Face::Left][7] = 5;
        facelets[Face::Down][3] = 1;

        let state = facelets_to_state(&facelets, &table).unwrap();
        assert_eq!(state.home(0), 0);
        assert_eq!(state.orientation(0), 1);
    }

    #[test]
    fn malformed_colorings() {
        let table = table();

        let mut facelets = Facelets::solved();
        facelets[Face::Left][7] = 0;
        assert!(matches!(
            facelets_to_state(&facelets, &table),
            Err(ConversionError::UnknownCubie { slot: 0, .. })
        ));

        // The up-left edge copied over the down-left edge
        let mut facelets = Facelets::solved();
        facelets[Face::Left][7] = 1;
        facelets[Face::Down][3] = 0;
        assert_eq!(
            facelets_to_state(&facelets, &table),
            Err(ConversionError::DuplicateCubie { slot: 2, first: 0 })
        );
    }
}
