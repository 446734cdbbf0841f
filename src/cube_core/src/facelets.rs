use std::{
    fmt::Display,
    ops::{Index, IndexMut},
    str::FromStr,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single sticker. The low bits hold the color (or texture tile), the constraint tag sits
/// above the color and the center art rotation occupies the top two bits.
pub type Sticker = u8;

pub const COLOR_MASK: Sticker = 0b0000_0111;
pub const COLOR_BITS: u32 = COLOR_MASK.count_ones();
pub const CONSTRAINT_MASK: Sticker = 0b11 << COLOR_BITS;
pub const ROTATION_SHIFT: u32 = 6;
pub const ROTATION_MASK: Sticker = 0b11 << ROTATION_SHIFT;
/// Texture tiles use every bit below the rotation
pub const TILE_MASK: Sticker = !ROTATION_MASK;

/// Index of the center sticker on every face
pub const CENTER_INDEX: usize = 4;

#[must_use]
pub fn color(sticker: Sticker) -> u8 {
    sticker & COLOR_MASK
}

/// The constraint tag of a sticker, zero when unconstrained
#[must_use]
pub fn constraint_tag(sticker: Sticker) -> u8 {
    (sticker & CONSTRAINT_MASK) >> COLOR_BITS
}

#[must_use]
pub fn with_constraint_tag(sticker: Sticker, tag: u8) -> Sticker {
    (sticker & !CONSTRAINT_MASK) | ((tag << COLOR_BITS) & CONSTRAINT_MASK)
}

/// Quarter turns of the sticker art, only meaningful for centers
#[must_use]
pub fn rotation(sticker: Sticker) -> u8 {
    (sticker & ROTATION_MASK) >> ROTATION_SHIFT
}

#[must_use]
pub fn with_rotation(sticker: Sticker, quarter_turns: u8) -> Sticker {
    (sticker & !ROTATION_MASK) | ((quarter_turns % 4) << ROTATION_SHIFT)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    Up,
    Left,
    Front,
    Right,
    Back,
    Down,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [Up, Left, Front, Right, Back, Down];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Left => 'L',
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Back => 'B',
            Face::Down => 'D',
        }
    }
}

impl FromStr for Face {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" => Ok(Face::Up),
            "L" => Ok(Face::Left),
            "F" => Ok(Face::Front),
            "R" => Ok(Face::Right),
            "B" => Ok(Face::Back),
            "D" => Ok(Face::Down),
            _ => Err(()),
        }
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The position of one sticker on the cube
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FaceletAddress {
    pub face: Face,
    pub index: usize,
}

/// How a cube diagram writes its stickers
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Notation {
    /// One digit per sticker holding its color
    #[default]
    Colors,
    /// Three digits per sticker: two for the texture tile and one for the quarter turns of its
    /// art
    Tiles,
}

impl Notation {
    fn width(self) -> usize {
        match self {
            Notation::Colors => 1,
            Notation::Tiles => 3,
        }
    }

    fn write(self, sticker: Sticker) -> String {
        match self {
            Notation::Colors => color(sticker).to_string(),
            Notation::Tiles => format!("{:02}{}", sticker & TILE_MASK, rotation(sticker)),
        }
    }

    fn read(self, digits: &[u32]) -> Option<Sticker> {
        match (self, digits) {
            (Notation::Colors, &[value]) => Sticker::try_from(value)
                .ok()
                .filter(|&value| value <= COLOR_MASK),
            (Notation::Tiles, &[tens, ones, turns]) => {
                let tile = Sticker::try_from(tens * 10 + ones)
                    .ok()
                    .filter(|&tile| tile <= TILE_MASK)?;
                let turns = Sticker::try_from(turns).ok().filter(|&turns| turns < 4)?;

                Some(with_rotation(tile, turns))
            }
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FaceletTextError {
    #[error("Expected 9 lines in the cube diagram but got {0}")]
    LineCount(usize),
    #[error("Line {line} of the cube diagram is too short")]
    ShortLine { line: usize },
    #[error("Expected a digit at line {line}, column {column} but found {found:?}")]
    NotADigit {
        line: usize,
        column: usize,
        found: char,
    },
    #[error("The sticker at line {line}, column {column} is out of range")]
    OutOfRange { line: usize, column: usize },
}

/// The sticker arrangement of a cube: six faces of nine stickers in the order up, left,
/// front, right, back, down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facelets([[Sticker; 9]; 6]);

impl Facelets {
    #[must_use]
    pub fn new(faces: [[Sticker; 9]; 6]) -> Facelets {
        Facelets(faces)
    }

    /// Every face filled with its own index as color
    #[must_use]
    pub fn solved() -> Facelets {
        Facelets(std::array::from_fn(|face| [face as Sticker; 9]))
    }

    /// Parse an unfolded cube diagram of nine lines. The up and down faces sit one face to the
    /// right, the middle three lines hold left, front, right and back side by side. In color
    /// notation a solved cube reads
    ///
    /// ```text
    ///    000
    ///    000
    ///    000
    /// 111222333444
    /// 111222333444
    /// 111222333444
    ///    555
    ///    555
    ///    555
    /// ```
    pub fn from_text<S: AsRef<str>>(
        lines: &[S],
        notation: Notation,
    ) -> Result<Facelets, FaceletTextError> {
        if lines.len() != 9 {
            return Err(FaceletTextError::LineCount(lines.len()));
        }

        let width = notation.width();

        let block = |row: usize, column: usize| -> Result<[Sticker; 9], FaceletTextError> {
            let mut face = [0; 9];

            for (i, sticker) in face.iter_mut().enumerate() {
                let line = row + i / 3;
                let column = (column + i % 3) * width;

                let mut digits = Vec::with_capacity(width);
                for (offset, found) in lines[line]
                    .as_ref()
                    .chars()
                    .skip(column)
                    .take(width)
                    .enumerate()
                {
                    digits.push(found.to_digit(10).ok_or(FaceletTextError::NotADigit {
                        line,
                        column: column + offset,
                        found,
                    })?);
                }

                if digits.len() < width {
                    return Err(FaceletTextError::ShortLine { line });
                }

                *sticker = notation
                    .read(&digits)
                    .ok_or(FaceletTextError::OutOfRange { line, column })?;
            }

            Ok(face)
        };

        Ok(Facelets([
            block(0, 3)?,
            block(3, 0)?,
            block(3, 3)?,
            block(3, 6)?,
            block(3, 9)?,
            block(6, 3)?,
        ]))
    }

    /// The inverse of `from_text`
    #[must_use]
    pub fn to_text(&self, notation: Notation) -> Vec<String> {
        let row = |face: Face, row: usize| {
            self[face][row * 3..row * 3 + 3]
                .iter()
                .map(|&sticker| notation.write(sticker))
                .join("")
        };
        let indent = " ".repeat(3 * notation.width());

        let mut lines = Vec::with_capacity(9);

        for r in 0..3 {
            lines.push(format!("{indent}{}", row(Face::Up, r)));
        }

        for r in 0..3 {
            lines.push(
                [Face::Left, Face::Front, Face::Right, Face::Back]
                    .into_iter()
                    .map(|face| row(face, r))
                    .join(""),
            );
        }

        for r in 0..3 {
            lines.push(format!("{indent}{}", row(Face::Down, r)));
        }

        lines
    }

    /// Whether every face shows a single color. Tiled cubes need the engine's check instead.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|face| {
            face.iter()
                .all(|&sticker| color(sticker) == color(face[CENTER_INDEX]))
        })
    }
}

impl Index<Face> for Facelets {
    type Output = [Sticker; 9];

    fn index(&self, index: Face) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<Face> for Facelets {
    fn index_mut(&mut self, index: Face) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

impl Index<FaceletAddress> for Facelets {
    type Output = Sticker;

    fn index(&self, index: FaceletAddress) -> &Self::Output {
        &self.0[index.face as usize][index.index]
    }
}

impl IndexMut<FaceletAddress> for Facelets {
    fn index_mut(&mut self, index: FaceletAddress) -> &mut Self::Output {
        &mut self.0[index.face as usize][index.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED_TEXT: [&str; 9] = [
        "   000      ",
        "   000      ",
        "   000      ",
        "111222333444",
        "111222333444",
        "111222333444",
        "   555      ",
        "   555      ",
        "   555      ",
    ];

    #[test]
    fn parse_solved_diagram() {
        let facelets = Facelets::from_text(&SOLVED_TEXT, Notation::Colors).unwrap();
        assert_eq!(facelets, Facelets::solved());
        assert!(facelets.is_solved());
    }

    #[test]
    fn text_round_trip() {
        let text = [
            "   400", "   400", "   400", "111022333445", "111022333445", "111022333445",
            "   255", "   255", "   255",
        ];
        let facelets = Facelets::from_text(&text, Notation::Colors).unwrap();
        assert!(!facelets.is_solved());
        assert_eq!(
            Facelets::from_text(&facelets.to_text(Notation::Colors), Notation::Colors).unwrap(),
            facelets
        );
    }

    #[test]
    fn malformed_diagrams() {
        assert_eq!(
            Facelets::from_text(&SOLVED_TEXT[..8], Notation::Colors),
            Err(FaceletTextError::LineCount(8))
        );

        let mut short = SOLVED_TEXT;
        short[4] = "11122";
        assert_eq!(
            Facelets::from_text(&short, Notation::Colors),
            Err(FaceletTextError::ShortLine { line: 4 })
        );

        let mut letters = SOLVED_TEXT;
        letters[0] = "   0x0";
        assert_eq!(
            Facelets::from_text(&letters, Notation::Colors),
            Err(FaceletTextError::NotADigit {
                line: 0,
                column: 4,
                found: 'x'
            })
        );

        let mut bright = SOLVED_TEXT;
        bright[8] = "   558";
        assert_eq!(
            Facelets::from_text(&bright, Notation::Colors),
            Err(FaceletTextError::OutOfRange { line: 8, column: 5 })
        );
    }

    fn tiled() -> Facelets {
        let mut facelets = Facelets::new(std::array::from_fn(|face| {
            std::array::from_fn(|index| Sticker::try_from(face * 9 + index).unwrap())
        }));
        facelets[Face::Front][CENTER_INDEX] = with_rotation(22, 3);
        facelets
    }

    #[test]
    fn tile_diagram() {
        let facelets = tiled();
        let text = facelets.to_text(Notation::Tiles);

        assert_eq!(text[0], "         000010020");
        assert_eq!(text[4], "120130140210223230300310320390400410");
        assert_eq!(Facelets::from_text(&text, Notation::Tiles), Ok(facelets));

        let mut turned = text.clone();
        turned[4].replace_range(14..15, "4");
        assert_eq!(
            Facelets::from_text(&turned, Notation::Tiles),
            Err(FaceletTextError::OutOfRange { line: 4, column: 12 })
        );

        let mut large = text;
        large[8].replace_range(9..11, "70");
        assert_eq!(
            Facelets::from_text(&large, Notation::Tiles),
            Err(FaceletTextError::OutOfRange { line: 8, column: 9 })
        );
    }

    #[test]
    fn sticker_bits() {
        let sticker = with_constraint_tag(3, 2);
        assert_eq!(color(sticker), 3);
        assert_eq!(constraint_tag(sticker), 2);

        let rotated = with_rotation(sticker, 5);
        assert_eq!(rotation(rotated), 1);
        assert_eq!(color(rotated), 3);
        assert_eq!(constraint_tag(rotated), 2);
        assert_eq!(with_rotation(rotated, 0), sticker);
    }
}
