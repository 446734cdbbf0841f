#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

// Faces are numbered up, left, front, right, back, down
// X points right, Y points up and Z points towards the front face

pub mod bridge;
pub mod codec;
pub mod convert;
pub mod cubies;
pub mod engine;
pub mod facelets;
pub mod fundamental;
pub mod geometry;
pub mod mutation;
pub mod operations;
pub mod orientation;
pub mod state;
pub mod storage;
pub mod variant;

pub use codec::{Metadata, decode, encode};
pub use convert::{CubeModel, facelets_to_state, state_to_facelets};
pub use engine::{CubeEngine, EngineError};
pub use facelets::{Face, Facelets, Notation, Sticker};
pub use mutation::{Mutation, mutate, mutate_sequence, negate};
pub use operations::{OperationTable, RawOperation, RawTable, ResolvedOperation, resolve_all};
pub use state::CubeState;
pub use variant::{CubeType, CubeVariant, Perspective, Variants};
