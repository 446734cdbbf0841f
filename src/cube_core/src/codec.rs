//! The compact text form of a cube, used in links and storage.
//!
//! A code is a bit stream, most significant bit first:
//!
//! | field        | bits          |
//! |--------------|---------------|
//! | version      | 4             |
//! | each slot    | piece + twist |
//! | cube type    | 4             |
//! | perspective  | 2             |
//!
//! A slot stores the index of its piece within the slot's group (4 bits for edges, 3 for
//! corners and centers) followed by the twist (1 bit for edges, 2 for corners and centers).
//! The 140 bits are padded to 18 bytes and written as unpadded url safe base64.

use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{SLOT_COUNT, SlotKind, modulus},
    state::{CubeState, StateError},
    variant::{CubeType, Perspective},
};

pub const FORMAT_VERSION: u32 = 1;

const VERSION_BITS: u32 = 4;
const CUBE_TYPE_BITS: u32 = 4;
const PERSPECTIVE_BITS: u32 = 2;

/// The bit width of every field in the code, in order
static FIELD_WIDTHS: LazyLock<Vec<u32>> = LazyLock::new(|| {
    let mut widths = vec![VERSION_BITS];

    for slot in 0..SLOT_COUNT {
        widths.extend(match SlotKind::of(slot) {
            SlotKind::Edge => [4, 1],
            SlotKind::Corner | SlotKind::Center => [3, 2],
        });
    }

    widths.extend([CUBE_TYPE_BITS, PERSPECTIVE_BITS]);
    widths
});

/// The number of bytes a code packs into
pub static CODE_BYTES: LazyLock<usize> = LazyLock::new(|| {
    let bits: u32 = FIELD_WIDTHS.iter().sum();
    bits.div_ceil(8) as usize
});

/// A schedule of bit widths for `convert_byte_size`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Widths<'a> {
    /// Every value has the same width
    Fixed(u32),
    /// Value `i` has width `widths[i]`. As an output schedule, conversion stops at its end.
    Each(&'a [u32]),
}

impl Widths<'_> {
    fn at(&self, index: usize) -> Option<u32> {
        match self {
            Widths::Fixed(width) => Some(*width),
            Widths::Each(widths) => widths.get(index).copied(),
        }
    }

    fn assert_valid(&self) {
        let valid = |width: &u32| (1..=32).contains(width);

        match self {
            Widths::Fixed(width) => assert!(valid(width), "Invalid bit width {width}"),
            Widths::Each(widths) => assert!(
                widths.iter().all(valid),
                "Invalid bit width in {widths:?}"
            ),
        }
    }
}

/// Repack a stream of integers from one schedule of bit widths into another. Values are read
/// and written most significant bit first; bits of an input value above its width are ignored.
/// A partial trailing output value is padded with zeros.
///
/// # Panics
///
/// Panics if any width is zero or above 32.
#[must_use]
pub fn convert_byte_size(values: &[u32], from: Widths<'_>, to: Widths<'_>) -> Vec<u32> {
    from.assert_valid();
    to.assert_valid();

    let mut output = Vec::new();
    let mut buffer: u64 = 0;
    let mut buffered: u32 = 0;

    for (index, &value) in values.iter().enumerate() {
        let Some(width) = from.at(index) else {
            break;
        };

        buffer = (buffer << width) | (u64::from(value) & ((1 << width) - 1));
        buffered += width;

        while let Some(out_width) = to.at(output.len()) {
            if buffered < out_width {
                break;
            }

            buffered -= out_width;
            // Masked to at most 32 bits
            #[allow(clippy::cast_possible_truncation)]
            output.push(((buffer >> buffered) & ((1 << out_width) - 1)) as u32);
            buffer &= (1 << buffered) - 1;
        }

        if to.at(output.len()).is_none() {
            return output;
        }
    }

    match to.at(output.len()) {
        Some(out_width) if buffered > 0 => {
            // Masked to at most 32 bits
            #[allow(clippy::cast_possible_truncation)]
            output.push(((buffer << (out_width - buffered)) & ((1 << out_width) - 1)) as u32);
        }
        _ => {}
    }

    output
}

/// How a stored cube should be shown
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    pub cube_type: CubeType,
    pub perspective: Perspective,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            cube_type: CubeType::Rubiks,
            perspective: Perspective::Unfolded,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("The code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("The code holds {actual} bytes but at least {expected} are needed")]
    Truncated { expected: usize, actual: usize },
    #[error("Unsupported code version {0}")]
    UnsupportedVersion(u32),
    #[error("The twist {twist} of slot {slot} is out of range")]
    InvalidTwist { slot: usize, twist: u32 },
    #[error("The code does not describe a cube: {0}")]
    InvalidState(#[from] StateError),
}

/// Pack a state and its metadata into a code
#[must_use]
pub fn encode(state: &CubeState, metadata: Metadata) -> String {
    let mut fields = Vec::with_capacity(FIELD_WIDTHS.len());
    fields.push(FORMAT_VERSION);

    for slot in 0..SLOT_COUNT {
        let first = SlotKind::of(slot).slots().start;
        // Slot indices are below 26
        #[allow(clippy::cast_possible_truncation)]
        fields.push((state.home(slot) - first) as u32);
        fields.push(u32::from(state.orientation(slot)));
    }

    fields.push(metadata.cube_type as u32);
    fields.push(metadata.perspective as u32);

    let bytes = convert_byte_size(&fields, Widths::Each(&FIELD_WIDTHS), Widths::Fixed(8))
        .into_iter()
        // Every value is eight bits wide
        .map(|byte| u8::try_from(byte).unwrap_or(u8::MAX))
        .collect::<Vec<_>>();

    URL_SAFE_NO_PAD.encode(bytes)
}

/// Unpack a code. Unknown cube types and perspectives are clamped to the known ones.
pub fn decode(code: &str) -> Result<(CubeState, Metadata), CodecError> {
    let bytes = URL_SAFE_NO_PAD.decode(code.trim())?;

    if bytes.len() < *CODE_BYTES {
        return Err(CodecError::Truncated {
            expected: *CODE_BYTES,
            actual: bytes.len(),
        });
    }

    let bytes = bytes.into_iter().map(u32::from).collect::<Vec<_>>();
    let fields = convert_byte_size(&bytes, Widths::Fixed(8), Widths::Each(&FIELD_WIDTHS));

    let version = fields[0];
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let mut values = Vec::with_capacity(SLOT_COUNT);

    for (slot, pair) in fields[1..=2 * SLOT_COUNT].chunks(2).enumerate() {
        let (index, twist) = (pair[0], pair[1]);
        let modulus = modulus(slot);

        if twist as usize >= modulus {
            return Err(CodecError::InvalidTwist { slot, twist });
        }

        let home = SlotKind::of(slot).slots().start + index as usize;
        values.push(u8::try_from(modulus * home + twist as usize).unwrap_or(u8::MAX));
    }

    let state = CubeState::try_from(values)?;

    let trailer = &fields[2 * SLOT_COUNT + 1..];
    // Both fields are at most four bits wide
    #[allow(clippy::cast_possible_truncation)]
    let metadata = Metadata {
        cube_type: CubeType::clamped(trailer[0] as u8),
        perspective: Perspective::clamped(trailer[1] as u8),
    };

    Ok((state, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repacking() {
        let packed = convert_byte_size(&[1, 2, 3], Widths::Fixed(4), Widths::Fixed(8));
        assert_eq!(packed, vec![0x12, 0x30]);

        assert_eq!(
            convert_byte_size(&packed, Widths::Fixed(8), Widths::Fixed(4)),
            vec![1, 2, 3, 0]
        );
        assert_eq!(
            convert_byte_size(&packed, Widths::Fixed(8), Widths::Each(&[4, 4, 4])),
            vec![1, 2, 3]
        );
        assert_eq!(
            convert_byte_size(&[0b101, 0b1], Widths::Each(&[3, 1]), Widths::Each(&[2, 2])),
            vec![0b10, 0b11]
        );
    }

    #[test]
    fn wide_values_are_masked() {
        assert_eq!(
            convert_byte_size(&[0xff, 0x1], Widths::Fixed(2), Widths::Fixed(4)),
            vec![0b1101]
        );
    }

    #[test]
    fn full_width_words() {
        let packed = convert_byte_size(&[u32::MAX, 1], Widths::Fixed(32), Widths::Fixed(8));
        assert_eq!(packed, vec![0xff, 0xff, 0xff, 0xff, 0, 0, 0, 1]);
        assert_eq!(
            convert_byte_size(&packed, Widths::Fixed(8), Widths::Fixed(32)),
            vec![u32::MAX, 1]
        );
    }

    #[test]
    #[should_panic(expected = "Invalid bit width 0")]
    fn zero_output_width() {
        let _ = convert_byte_size(&[1], Widths::Fixed(8), Widths::Fixed(0));
    }

    #[test]
    #[should_panic(expected = "Invalid bit width in [4, 33]")]
    fn oversized_input_width() {
        let _ = convert_byte_size(&[1, 2], Widths::Each(&[4, 33]), Widths::Fixed(8));
    }

    #[test]
    fn code_size() {
        assert_eq!(FIELD_WIDTHS.iter().sum::<u32>(), 140);
        assert_eq!(*CODE_BYTES, 18);
        assert_eq!(encode(&CubeState::identity(), Metadata::default()).len(), 24);
    }

    #[test]
    fn identity_code() {
        let metadata = Metadata {
            cube_type: CubeType::Latch,
            perspective: Perspective::Unfolded,
        };

        let code = encode(&CubeState::identity(), metadata);
        assert_eq!(code, "EAiGQpjoSpYBEMhTHAEQyFBQ");
        assert_eq!(decode(&code), Ok((CubeState::identity(), metadata)));
    }

    #[test]
    fn garbled_codes() {
        assert!(matches!(decode("not base64!"), Err(CodecError::Base64(_))));
        assert_eq!(
            decode("EAiGQpjo"),
            Err(CodecError::Truncated {
                expected: 18,
                actual: 6
            })
        );

        // version 2
        assert_eq!(
            decode("IAiGQpjoSpYBEMhTHAEQyFBQ"),
            Err(CodecError::UnsupportedVersion(2))
        );
    }
}
