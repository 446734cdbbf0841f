use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use log::debug;
use thiserror::Error;

use crate::{
    facelets::{Facelets, Sticker, rotation, with_rotation},
    geometry::{SLOT_COUNT, SLOT_FACELETS, modulus},
};

/// The stickers one piece shows, read in the facelet order of the slot it sits in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cubie {
    stickers: [Sticker; 3],
    len: u8,
}

impl Cubie {
    #[must_use]
    pub fn new(stickers: &[Sticker]) -> Cubie {
        let mut cubie = Cubie {
            stickers: [0; 3],
            len: 0,
        };

        for (dst, &src) in cubie.stickers.iter_mut().zip(stickers) {
            *dst = src;
            cubie.len += 1;
        }

        cubie
    }

    /// Read the cubie sitting in `slot`
    #[must_use]
    pub fn read(facelets: &Facelets, slot: usize) -> Cubie {
        Cubie::new(
            &SLOT_FACELETS[slot]
                .iter()
                .map(|&address| facelets[address])
                .collect_vec(),
        )
    }

    #[must_use]
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers[..usize::from(self.len)]
    }

    /// The same piece twisted by `orientation` steps. Edges and corners cycle their stickers,
    /// centers turn their art.
    #[must_use]
    pub fn twisted(&self, orientation: usize) -> Cubie {
        let stickers = self.stickers();

        if stickers.len() == 1 {
            // Orientations are below four
            #[allow(clippy::cast_possible_truncation)]
            let turns = orientation as u8;
            return Cubie::new(&[with_rotation(stickers[0], rotation(stickers[0]) + turns)]);
        }

        let mut twisted = *self;
        for (k, &sticker) in stickers.iter().enumerate() {
            twisted.stickers[(k + orientation) % stickers.len()] = sticker;
        }

        twisted
    }

    /// Write the cubie into the stickers of `slot`
    pub fn write(&self, facelets: &mut Facelets, slot: usize) {
        for (&address, &sticker) in SLOT_FACELETS[slot].iter().zip(self.stickers()) {
            facelets[address] = sticker;
        }
    }
}

impl Display for Cubie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.stickers().iter().join(", "))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CubieError {
    #[error(
        "The stickers {cubie} identify both slot {first} and slot {second}; the solved coloring does not tell its pieces apart"
    )]
    Ambiguous {
        cubie: Cubie,
        first: usize,
        second: usize,
    },
}

/// Identifies every piece by the stickers it shows. Built from the facelets of a solved cube,
/// where every slot holds its own piece.
#[derive(Debug, Clone)]
pub struct CubieTable {
    entries: Vec<Vec<Cubie>>,
    lookup: HashMap<Cubie, u8>,
}

impl CubieTable {
    pub fn new(solved: &Facelets) -> Result<CubieTable, CubieError> {
        let mut entries = Vec::with_capacity(SLOT_COUNT);
        let mut lookup = HashMap::new();

        for slot in 0..SLOT_COUNT {
            let modulus = modulus(slot);
            let cubie = Cubie::read(solved, slot);

            let mut orientations = Vec::with_capacity(modulus);

            for orientation in 0..modulus {
                let twisted = cubie.twisted(orientation);
                // Slot values are below 104
                #[allow(clippy::cast_possible_truncation)]
                let value = (modulus * slot + orientation) as u8;

                if let Some(&existing) = lookup.get(&twisted) {
                    return Err(CubieError::Ambiguous {
                        cubie: twisted,
                        first: usize::from(existing) / modulus,
                        second: slot,
                    });
                }

                lookup.insert(twisted, value);
                orientations.push(twisted);
            }

            entries.push(orientations);
        }

        debug!("Built a cubie table with {} entries", lookup.len());

        Ok(CubieTable { entries, lookup })
    }

    /// The stickers of piece `home` twisted by `orientation`
    #[must_use]
    pub fn cubie(&self, home: usize, orientation: usize) -> Cubie {
        self.entries[home][orientation]
    }

    /// The slot value of the piece showing these stickers
    #[must_use]
    pub fn find(&self, cubie: &Cubie) -> Option<u8> {
        self.lookup.get(cubie).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelets::Face;

    #[test]
    fn twisting() {
        let corner = Cubie::new(&[1, 2, 3]);
        assert_eq!(corner.twisted(0), corner);
        assert_eq!(corner.twisted(1).stickers(), &[3, 1, 2]);
        assert_eq!(corner.twisted(2).stickers(), &[2, 3, 1]);

        let edge = Cubie::new(&[4, 5]);
        assert_eq!(edge.twisted(1).stickers(), &[5, 4]);

        let center = Cubie::new(&[with_rotation(2, 3)]);
        assert_eq!(center.twisted(1).stickers(), &[2]);
        assert_eq!(center.twisted(2).stickers(), &[with_rotation(2, 1)]);
    }

    #[test]
    fn solved_table() {
        let table = CubieTable::new(&Facelets::solved()).unwrap();

        for slot in 0..SLOT_COUNT {
            let cubie = Cubie::read(&Facelets::solved(), slot);
            assert_eq!(
                table.find(&cubie).map(usize::from),
                Some(modulus(slot) * slot)
            );
        }

        assert_eq!(table.find(&Cubie::new(&[0, 0])), None);
    }

    #[test]
    fn ambiguous_coloring() {
        let mut facelets = Facelets::solved();
        // Paint the front face like the back so front and back pieces look alike
        facelets[Face::Front] = [4; 9];

        assert!(matches!(
            CubieTable::new(&facelets),
            Err(CubieError::Ambiguous { .. })
        ));
    }
}
