use itertools::Itertools;
use log::warn;

use crate::{geometry::CENTER_SLOTS, operations::OperationTable, state::CubeState};

/// Each arrangement of the centers, written as the home face of every center slot, and the whole
/// cube rotation that produces it from the standard orientation.
pub const ORIENTATIONS: [(&str, &str); 24] = [
    ("012345", ""),
    ("023415", "Y"),
    ("034125", "Y2"),
    ("041235", "Y'"),
    ("104523", "X2 Z"),
    ("120453", "X' Z"),
    ("145203", "X Z"),
    ("152043", "Z"),
    ("201534", "X Y'"),
    ("215304", "X"),
    ("230154", "X Y2"),
    ("253014", "X Y"),
    ("302541", "Z'"),
    ("325401", "X Z'"),
    ("340251", "X' Z'"),
    ("354021", "X2 Z'"),
    ("403512", "X' Y"),
    ("410352", "X'"),
    ("435102", "X Z2"),
    ("451032", "X' Y'"),
    ("514320", "X2"),
    ("521430", "X2 Y'"),
    ("532140", "Z2"),
    ("543210", "X2 Y"),
];

/// The home face of the center in every center slot, as used to pick sticker rotations when
/// drawing
#[must_use]
pub fn core_permutation(state: &CubeState) -> String {
    CENTER_SLOTS
        .map(|slot| state.home(slot) - CENTER_SLOTS.start)
        .join("")
}

/// The rotation that brings a standard cube into this center arrangement
#[must_use]
pub fn rotation_for(core_permutation: &str) -> Option<&'static str> {
    ORIENTATIONS
        .iter()
        .find(|(key, _)| *key == core_permutation)
        .map(|&(_, algorithm)| algorithm)
}

/// Rotate the whole cube so the centers are back in their standard places. The state is left
/// alone when the rotation cannot be undone with the given operations.
#[must_use]
pub fn orientate(state: &CubeState, operations: &OperationTable) -> CubeState {
    let key = core_permutation(state);

    let Some(rotation) = rotation_for(&key) else {
        warn!(target: "orientation", "Unknown center arrangement: key={key}");
        return *state;
    };

    match operations.reverse_algorithm(rotation) {
        Ok(Some(reverse)) => operations.operate(state, &reverse).unwrap_or(*state),
        Ok(None) => {
            warn!(target: "orientation", "No reverse for the rotation: key={key} rotation={rotation}");
            *state
        }
        Err(e) => {
            warn!(target: "orientation", "Cannot undo the rotation: key={key} error={e}");
            *state
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        convert::CubeModel,
        facelets::Facelets,
        fundamental::fundamental_operations,
        operations::{RawOperation, RawTable, resolve_all},
    };

    fn model() -> CubeModel {
        CubeModel::new(Facelets::solved()).unwrap()
    }

    fn full_table() -> OperationTable {
        resolve_all(&fundamental_operations().unwrap(), &model()).unwrap()
    }

    #[test]
    fn keys_are_permutations() {
        let keys: HashSet<_> = ORIENTATIONS.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), 24);

        for key in keys {
            let digits: HashSet<_> = key.chars().collect();
            assert_eq!(digits.len(), 6, "{key}");
        }
    }

    #[test]
    fn identity_arrangement() {
        assert_eq!(core_permutation(&CubeState::identity()), "012345");
        assert_eq!(rotation_for("012345"), Some(""));
        assert_eq!(rotation_for("000000"), None);
    }

    #[test]
    fn unknown_arrangement_is_left_alone() {
        let mut values = *CubeState::identity().values();
        values.swap(CENTER_SLOTS.start, CENTER_SLOTS.start + 1);
        let state = CubeState::try_from(&values[..]).unwrap();

        assert_eq!(core_permutation(&state), "102345");
        assert_eq!(orientate(&state, &full_table()), state);
    }

    #[test]
    fn rotation_missing_from_table() {
        let full = full_table();
        let state = full.operate(&CubeState::identity(), "X R").unwrap();
        assert_eq!(core_permutation(&orientate(&state, &full)), "012345");

        let mut raw = RawTable::new();
        for (name, operation) in fundamental_operations().unwrap().entries() {
            if !name.starts_with(['X', 'Y', 'Z']) {
                raw.push(name, operation.clone());
            }
        }
        let faces_only = resolve_all(&raw, &model()).unwrap();

        assert!(faces_only.get("X").is_none());
        assert_eq!(orientate(&state, &faces_only), state);
    }

    #[test]
    fn rotation_without_reverse() {
        let full = full_table();
        let state = full.operate(&CubeState::identity(), "X").unwrap();

        let mut raw = RawTable::new();
        raw.push(
            "X",
            RawOperation::Primitive(full.get("X").unwrap().mutation().clone()),
        );
        let only_x = resolve_all(&raw, &model()).unwrap();

        assert_eq!(only_x.get("X").unwrap().reverse(), None);
        assert_eq!(orientate(&state, &only_x), state);
    }
}
