//! The moves every cube variant shares, seeded from diagrams of a solved cube after one
//! clockwise quarter turn.

use thiserror::Error;

use crate::{
    convert::{ConversionError, CubeModel},
    cubies::CubieError,
    facelets::{Face, FaceletTextError, Facelets, Notation},
    geometry::center_slot,
    mutation::Mutation,
    operations::{RawOperation, RawTable},
};

struct Diagram {
    name: &'static str,
    rows: [&'static str; 9],
    /// Face turns carry their center along by one quarter turn
    center: Option<Face>,
}

const DIAGRAMS: [Diagram; 12] = [
    Diagram {
        name: "L",
        rows: [
            "   400",
            "   400",
            "   400",
            "111022333445",
            "111022333445",
            "111022333445",
            "   255",
            "   255",
            "   255",
        ],
        center: Some(Face::Left),
    },
    Diagram {
        name: "M",
        rows: [
            "   040",
            "   040",
            "   040",
            "111202333454",
            "111202333454",
            "111202333454",
            "   525",
            "   525",
            "   525",
        ],
        center: None,
    },
    Diagram {
        name: "R",
        rows: [
            "   002",
            "   002",
            "   002",
            "111225333044",
            "111225333044",
            "111225333044",
            "   554",
            "   554",
            "   554",
        ],
        center: Some(Face::Right),
    },
    Diagram {
        name: "X",
        rows: [
            "   222",
            "   222",
            "   222",
            "111555333000",
            "111555333000",
            "111555333000",
            "   444",
            "   444",
            "   444",
        ],
        center: None,
    },
    Diagram {
        name: "D",
        rows: [
            "   000",
            "   000",
            "   000",
            "111222333444",
            "111222333444",
            "444111222333",
            "   555",
            "   555",
            "   555",
        ],
        center: Some(Face::Down),
    },
    Diagram {
        name: "E",
        rows: [
            "   000",
            "   000",
            "   000",
            "111222333444",
            "444111222333",
            "111222333444",
            "   555",
            "   555",
            "   555",
        ],
        center: None,
    },
    Diagram {
        name: "U",
        rows: [
            "   000",
            "   000",
            "   000",
            "222333444111",
            "111222333444",
            "111222333444",
            "   555",
            "   555",
            "   555",
        ],
        center: Some(Face::Up),
    },
    Diagram {
        name: "Y",
        rows: [
            "   000",
            "   000",
            "   000",
            "222333444111",
            "222333444111",
            "222333444111",
            "   555",
            "   555",
            "   555",
        ],
        center: None,
    },
    Diagram {
        name: "B",
        rows: [
            "   333",
            "   000",
            "   000",
            "011222335444",
            "011222335444",
            "011222335444",
            "   555",
            "   555",
            "   111",
        ],
        center: Some(Face::Back),
    },
    Diagram {
        name: "S",
        rows: [
            "   000",
            "   111",
            "   000",
            "151222303444",
            "151222303444",
            "151222303444",
            "   555",
            "   333",
            "   555",
        ],
        center: None,
    },
    Diagram {
        name: "F",
        rows: [
            "   000",
            "   000",
            "   111",
            "115222033444",
            "115222033444",
            "115222033444",
            "   333",
            "   555",
            "   555",
        ],
        center: Some(Face::Front),
    },
    Diagram {
        name: "Z",
        rows: [
            "   111",
            "   111",
            "   111",
            "555222000444",
            "555222000444",
            "555222000444",
            "   333",
            "   333",
            "   333",
        ],
        center: None,
    },
];

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("The diagram of `{name}` is malformed: {source}")]
    Text {
        name: &'static str,
        source: FaceletTextError,
    },
    #[error("The diagram of `{name}` is not a reachable cube: {source}")]
    Coloring {
        name: &'static str,
        source: ConversionError,
    },
    #[error(transparent)]
    Cubie(#[from] CubieError),
}

/// The names of the primitive moves
pub fn primitive_names() -> impl Iterator<Item = &'static str> {
    DIAGRAMS.iter().map(|diagram| diagram.name)
}

/// Every quarter turn, its half turn and its inverse, 36 operations in all
pub fn fundamental_operations() -> Result<RawTable, DiagramError> {
    let model = CubeModel::new(Facelets::solved())?;
    let mut raw = RawTable::new();

    for diagram in &DIAGRAMS {
        let facelets = Facelets::from_text(&diagram.rows, Notation::Colors).map_err(|source| {
            DiagramError::Text {
                name: diagram.name,
                source,
            }
        })?;

        let state = model
            .to_state(&facelets)
            .map_err(|source| DiagramError::Coloring {
                name: diagram.name,
                source,
            })?;

        let mut mutation = Mutation::from_state(&state);
        if let Some(face) = diagram.center {
            mutation = mutation.with_orientation(center_slot(face), 1);
        }

        let name = diagram.name;
        raw.push(name, RawOperation::Primitive(mutation));
        raw.push(
            &format!("{name}'"),
            RawOperation::Composite(format!("{name}2 {name}")),
        );
        raw.push(
            &format!("{name}2"),
            RawOperation::Composite(format!("{name} {name}")),
        );
    }

    Ok(raw)
}
