use std::collections::HashMap;

use internment::ArcIntern;
use log::debug;
use thiserror::Error;

use crate::{
    convert::{ConversionError, CubeModel},
    cubies::CubieError,
    facelets::{Face, Facelets, Notation},
    fundamental::{DiagramError, fundamental_operations},
    operations::{OperationError, OperationTable, ResolvedOperation, resolve_all},
    orientation::{core_permutation, orientate},
    state::CubeState,
    variant::{CubeType, CubeVariant, Direction, Variants},
};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No cube variant is registered for type `{0}`")]
    UnknownVariant(CubeType),
    #[error(transparent)]
    Cubie(#[from] CubieError),
    #[error(transparent)]
    Diagram(#[from] DiagramError),
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("Unknown move `{0}`")]
    UnknownMove(String),
    #[error("The move `{0}` is blocked in this state")]
    Disallowed(String),
}

/// Which outer faces a move turns, and in which direction
enum Turned {
    Faces(Vec<(Face, Option<Direction>)>),
    /// The whole cube turns, so no face turns relative to the rest
    Nothing,
}

fn turned_faces(name: &str) -> Option<Turned> {
    let mut chars = name.chars();
    let base = chars.next()?;

    let direction = match chars.as_str() {
        "" => Some(Direction::Clockwise),
        "'" => Some(Direction::CounterClockwise),
        "2" => None,
        _ => return None,
    };
    let flipped = direction.map(Direction::flipped);

    // A slice turns like its two outer faces turning against each other
    let faces = match base {
        'L' => vec![(Face::Left, direction)],
        'R' => vec![(Face::Right, direction)],
        'U' => vec![(Face::Up, direction)],
        'D' => vec![(Face::Down, direction)],
        'F' => vec![(Face::Front, direction)],
        'B' => vec![(Face::Back, direction)],
        'M' => vec![(Face::Right, direction), (Face::Left, flipped)],
        'E' => vec![(Face::Up, direction), (Face::Down, flipped)],
        'S' => vec![(Face::Front, flipped), (Face::Back, direction)],
        'X' | 'Y' | 'Z' => return Some(Turned::Nothing),
        _ => return None,
    };

    Some(Turned::Faces(faces))
}

/// Everything needed to work with one cube variant: its cubies, its moves and their reverses
#[derive(Debug, Clone)]
pub struct CubeEngine {
    variant: CubeVariant,
    model: CubeModel,
    operations: OperationTable,
}

impl CubeEngine {
    pub fn new(variant: CubeVariant) -> Result<CubeEngine, EngineError> {
        let model = CubeModel::new(variant.solved.clone())?;
        let operations = resolve_all(&fundamental_operations()?, &model)?;

        debug!(
            target: "engine",
            "Built engine: variant={} operations={}",
            variant.name,
            operations.len()
        );

        Ok(CubeEngine {
            variant,
            model,
            operations,
        })
    }

    pub fn for_type(variants: &Variants, cube_type: CubeType) -> Result<CubeEngine, EngineError> {
        let variant = variants
            .get(cube_type)
            .ok_or(EngineError::UnknownVariant(cube_type))?;

        CubeEngine::new(variant.clone())
    }

    #[must_use]
    pub fn variant(&self) -> &CubeVariant {
        &self.variant
    }

    #[must_use]
    pub fn model(&self) -> &CubeModel {
        &self.model
    }

    #[must_use]
    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }

    #[must_use]
    pub fn facelets(&self, state: &CubeState) -> Facelets {
        self.model.to_facelets(state)
    }

    pub fn state(&self, facelets: &Facelets) -> Result<CubeState, EngineError> {
        Ok(self.model.to_state(facelets)?)
    }

    /// The unfolded diagram of `state`, written in the variant's notation
    #[must_use]
    pub fn diagram(&self, state: &CubeState) -> Vec<String> {
        self.facelets(state).to_text(self.variant.notation)
    }

    /// Whether the cube looks solved from some side. Tiled cubes also need every piece of
    /// art upright, centers included.
    #[must_use]
    pub fn is_solved(&self, state: &CubeState) -> bool {
        match self.variant.notation {
            Notation::Colors => self.facelets(state).is_solved(),
            Notation::Tiles => self.orientate(state).is_identity(),
        }
    }

    fn allowed(&self, facelets: &Facelets, name: &str) -> bool {
        let Some(constraint) = self.variant.constraint else {
            return true;
        };

        match turned_faces(name) {
            Some(Turned::Faces(faces)) => faces
                .into_iter()
                .all(|(face, direction)| constraint(&facelets[face], direction)),
            Some(Turned::Nothing) => true,
            None => false,
        }
    }

    /// Whether every operation may be performed on `state`
    #[must_use]
    pub fn allowed_moves(&self, state: &CubeState) -> HashMap<ArcIntern<str>, bool> {
        let facelets = self.facelets(state);

        self.operations
            .iter()
            .map(|operation| {
                let name = operation.name();
                (name.clone(), self.allowed(&facelets, name))
            })
            .collect()
    }

    pub fn is_move_allowed(&self, state: &CubeState, name: &str) -> Result<bool, EngineError> {
        if self.operations.get(name).is_none() {
            return Err(EngineError::UnknownMove(name.to_owned()));
        }

        Ok(self.allowed(&self.facelets(state), name))
    }

    pub fn apply_move(&self, state: &CubeState, name: &str) -> Result<CubeState, EngineError> {
        if !self.is_move_allowed(state, name)? {
            return Err(EngineError::Disallowed(name.to_owned()));
        }

        Ok(self.operations.operate(state, name)?)
    }

    /// Apply space separated moves, checking each against the state it is applied to
    pub fn apply_algorithm(
        &self,
        state: &CubeState,
        algorithm: &str,
    ) -> Result<CubeState, EngineError> {
        algorithm
            .split_whitespace()
            .try_fold(*state, |state, name| self.apply_move(&state, name))
    }

    /// The single move that turns `before` into `after`
    #[must_use]
    pub fn find_transition(
        &self,
        after: &CubeState,
        before: &CubeState,
    ) -> Option<&ResolvedOperation> {
        self.operations
            .find_by_state_difference(after, before, &self.model)
    }

    #[must_use]
    pub fn core_permutation(&self, state: &CubeState) -> String {
        core_permutation(state)
    }

    #[must_use]
    pub fn orientate(&self, state: &CubeState) -> CubeState {
        orientate(state, &self.operations)
    }
}
