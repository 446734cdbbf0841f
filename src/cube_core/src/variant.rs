use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::facelets::{Facelets, Notation, Sticker, constraint_tag};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeType {
    Rubiks = 0,
    Latch = 1,
    Earth = 2,
}

impl CubeType {
    pub const ALL: [Self; 3] = [CubeType::Rubiks, CubeType::Latch, CubeType::Earth];

    /// Read a stored cube type. Values from newer versions fall back to the last known type.
    #[must_use]
    pub fn clamped(value: u8) -> CubeType {
        match value {
            0 => CubeType::Rubiks,
            1 => CubeType::Latch,
            _ => CubeType::Earth,
        }
    }
}

impl FromStr for CubeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rubiks" => Ok(CubeType::Rubiks),
            "latch" => Ok(CubeType::Latch),
            "earth" => Ok(CubeType::Earth),
            other => Err(format!("Unknown cube type `{other}`")),
        }
    }
}

impl Display for CubeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CubeType::Rubiks => "rubiks",
            CubeType::Latch => "latch",
            CubeType::Earth => "earth",
        })
    }
}

/// How the cube is drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Unfolded = 1,
    Isometric = 2,
}

impl Perspective {
    /// Read a stored perspective, clamping into the known range
    #[must_use]
    pub fn clamped(value: u8) -> Perspective {
        if value >= 2 {
            Perspective::Isometric
        } else {
            Perspective::Unfolded
        }
    }
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unfolded" => Ok(Perspective::Unfolded),
            "isometric" => Ok(Perspective::Isometric),
            other => Err(format!("Unknown perspective `{other}`")),
        }
    }
}

impl Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Perspective::Unfolded => "unfolded",
            Perspective::Isometric => "isometric",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[must_use]
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Decides whether a face may turn. Half turns have no direction.
pub type Constraint = fn(&[Sticker; 9], Option<Direction>) -> bool;

const COUNTER_CLOCKWISE_TAG: u8 = 1;
const CLOCKWISE_TAG: u8 = 2;

/// A latch cube face turns only in the direction its arrows point. Arrows pointing both ways
/// lock the face.
#[must_use]
pub fn latch_constraint(face: &[Sticker; 9], direction: Option<Direction>) -> bool {
    let mut tags = face
        .iter()
        .map(|&sticker| constraint_tag(sticker))
        .filter(|&tag| tag != 0);

    let Some(first) = tags.next() else {
        return true;
    };

    if tags.any(|tag| tag == first ^ (COUNTER_CLOCKWISE_TAG | CLOCKWISE_TAG)) {
        return false;
    }

    match direction {
        Some(Direction::Clockwise) => first == CLOCKWISE_TAG,
        Some(Direction::CounterClockwise) => first == COUNTER_CLOCKWISE_TAG,
        None => true,
    }
}

#[derive(Debug, Clone)]
pub struct CubeVariant {
    pub cube_type: CubeType,
    pub name: &'static str,
    /// Left out of listings offered to users
    pub hidden: bool,
    /// Display color of each sticker color, in face order
    pub colors: [&'static str; 6],
    pub solved: Facelets,
    /// How diagrams of this cube are written
    pub notation: Notation,
    pub constraint: Option<Constraint>,
}

impl CubeVariant {
    #[must_use]
    pub fn rubiks() -> CubeVariant {
        CubeVariant {
            cube_type: CubeType::Rubiks,
            name: "Rubik's Cube",
            hidden: false,
            colors: ["white", "green", "red", "blue", "orange", "yellow"],
            solved: Facelets::solved(),
            notation: Notation::Colors,
            constraint: None,
        }
    }

    #[must_use]
    pub fn latch() -> CubeVariant {
        CubeVariant {
            cube_type: CubeType::Latch,
            name: "Latch Cube",
            hidden: false,
            colors: ["white", "blue", "yellow", "green", "red", "grey"],
            solved: Facelets::new([
                [0, 8, 0, 0, 0, 0, 0, 8, 0],
                [1, 17, 1, 1, 1, 1, 1, 17, 1],
                [2, 2, 2, 10, 2, 10, 2, 2, 2],
                [3, 11, 3, 3, 3, 3, 3, 11, 3],
                [4, 4, 4, 20, 4, 20, 4, 4, 4],
                [5, 21, 5, 5, 5, 5, 5, 21, 5],
            ]),
            notation: Notation::Colors,
            constraint: Some(latch_constraint),
        }
    }

    /// Every sticker is a distinct tile of a map texture
    #[must_use]
    pub fn earth() -> CubeVariant {
        // 54 tiles fit in a sticker
        #[allow(clippy::cast_possible_truncation)]
        let solved = Facelets::new(std::array::from_fn(|face| {
            std::array::from_fn(|index| (face * 9 + index) as Sticker)
        }));

        CubeVariant {
            cube_type: CubeType::Earth,
            name: "Earth Cube",
            hidden: true,
            colors: ["white", "green", "red", "blue", "orange", "yellow"],
            solved,
            notation: Notation::Tiles,
            constraint: None,
        }
    }
}

/// The cube variants known to a program, keyed by type
#[derive(Debug, Clone, Default)]
pub struct Variants {
    variants: BTreeMap<CubeType, CubeVariant>,
}

impl Variants {
    #[must_use]
    pub fn builtin() -> Variants {
        let mut variants = Variants::default();
        variants.register(CubeVariant::rubiks());
        variants.register(CubeVariant::latch());
        variants.register(CubeVariant::earth());
        variants
    }

    /// Add a variant, replacing any earlier one of the same type
    pub fn register(&mut self, variant: CubeVariant) {
        self.variants.insert(variant.cube_type, variant);
    }

    #[must_use]
    pub fn get(&self, cube_type: CubeType) -> Option<&CubeVariant> {
        self.variants.get(&cube_type)
    }

    /// The variants users may pick from
    pub fn visible(&self) -> impl Iterator<Item = &CubeVariant> {
        self.variants.values().filter(|variant| !variant.hidden)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CubeVariant> {
        self.variants.values()
    }
}
