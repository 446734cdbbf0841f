use cube_core::{
    CubeState, CubeType, Metadata, Perspective,
    codec::{CodecError, decode, encode},
    storage::{parse_link, permalink, scheme_link},
};
use proptest::{collection::vec, prelude::*};

/// Any arrangement of pieces with any twists, reachable or not
fn any_state() -> impl Strategy<Value = CubeState> {
    let shuffled = |range: std::ops::Range<u8>| Just(range.collect::<Vec<_>>()).prop_shuffle();

    (
        shuffled(0..12),
        vec(0..2u8, 12),
        shuffled(12..20),
        vec(0..3u8, 8),
        shuffled(20..26),
        vec(0..4u8, 6),
    )
        .prop_map(
            |(edges, edge_twists, corners, corner_twists, centers, center_twists)| {
                let values = edges
                    .iter()
                    .zip(&edge_twists)
                    .map(|(home, twist)| 2 * home + twist)
                    .chain(
                        corners
                            .iter()
                            .zip(&corner_twists)
                            .map(|(home, twist)| 3 * home + twist),
                    )
                    .chain(
                        centers
                            .iter()
                            .zip(&center_twists)
                            .map(|(home, twist)| 4 * home + twist),
                    )
                    .collect::<Vec<_>>();

                CubeState::try_from(values).unwrap()
            },
        )
}

fn any_metadata() -> impl Strategy<Value = Metadata> {
    (
        prop_oneof![
            Just(CubeType::Rubiks),
            Just(CubeType::Latch),
            Just(CubeType::Earth)
        ],
        prop_oneof![Just(Perspective::Unfolded), Just(Perspective::Isometric)],
    )
        .prop_map(|(cube_type, perspective)| Metadata {
            cube_type,
            perspective,
        })
}

#[test]
fn test_codec_round_trip() {
    proptest!(ProptestConfig::with_cases(1000), |(state in any_state(), metadata in any_metadata())| {
        let code = encode(&state, metadata);
        prop_assert_eq!(code.len(), 24);
        prop_assert_eq!(decode(&code), Ok((state, metadata)));
    });
}

#[test_log::test]
fn test_identity_with_latch_metadata() {
    let metadata = Metadata {
        cube_type: CubeType::Latch,
        perspective: Perspective::Unfolded,
    };

    let (state, decoded) = decode(&encode(&CubeState::identity(), metadata)).unwrap();
    assert!(state.is_identity());
    assert_eq!(decoded, metadata);
}

/// Overwrite the trailing cube type and perspective fields of a code
fn with_trailer(code: &str, cube_type: u8, perspective: u8) -> String {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    let mut bytes = URL_SAFE_NO_PAD.decode(code).unwrap();
    // 140 bits: the cube type takes bits 134..138 and the perspective 138..140
    let trailer = (u16::from(cube_type) << 2 | u16::from(perspective)) << 4;
    bytes[16] = (bytes[16] & 0b1111_1100) | (trailer >> 8) as u8;
    bytes[17] = (trailer & 0xff) as u8;
    URL_SAFE_NO_PAD.encode(bytes)
}

#[test_log::test]
fn test_metadata_is_clamped() {
    let code = encode(&CubeState::identity(), Metadata::default());
    assert_eq!(with_trailer(&code, 0, 1), code);

    let (state, metadata) = decode(&with_trailer(&code, 15, 3)).unwrap();
    assert!(state.is_identity());
    assert_eq!(metadata.cube_type, CubeType::Earth);
    assert_eq!(metadata.perspective, Perspective::Isometric);

    let (_, metadata) = decode(&with_trailer(&code, 1, 0)).unwrap();
    assert_eq!(metadata.cube_type, CubeType::Latch);
    assert_eq!(metadata.perspective, Perspective::Unfolded);
}

#[test_log::test]
fn test_invalid_pieces_are_rejected() {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    let code = encode(&CubeState::identity(), Metadata::default());
    let mut bytes = URL_SAFE_NO_PAD.decode(&code).unwrap();
    // The first edge field becomes 15, which is not an edge
    bytes[0] |= 0b0000_1111;

    assert!(matches!(
        decode(&URL_SAFE_NO_PAD.encode(bytes)),
        Err(CodecError::InvalidState(_))
    ));
}

#[test_log::test]
fn test_links_carry_codes() {
    let code = encode(&CubeState::identity(), Metadata::default());

    assert_eq!(parse_link(&permalink(&code)), Some(code.as_str()));
    assert_eq!(parse_link(&scheme_link(&code)), Some(code.as_str()));
}
