use std::{collections::HashMap, fmt::Display};

use internment::ArcIntern;
use itertools::Itertools;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    convert::{CubeModel, facelets_to_state},
    cubies::CubieTable,
    mutation::{Mutation, MutationError, mutate, negate},
    state::CubeState,
};

/// A sequence of operation names, applied left to right
pub type Algorithm = Vec<ArcIntern<str>>;

/// An operation as declared, before any composite is replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOperation {
    Primitive(Mutation),
    /// Space separated names of other operations
    Composite(String),
}

/// Operations in declaration order
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    entries: Vec<(ArcIntern<str>, RawOperation)>,
}

impl RawTable {
    #[must_use]
    pub fn new() -> RawTable {
        RawTable::default()
    }

    pub fn push(&mut self, name: &str, operation: RawOperation) {
        self.entries.push((ArcIntern::from(name), operation));
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ArcIntern<str>, &RawOperation)> {
        self.entries.iter().map(|(name, operation)| (name, operation))
    }
}

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("The operation `{0}` is declared more than once")]
    DuplicateName(ArcIntern<str>),
    #[error("The operation `{operation}` refers to the undeclared operation `{token}`")]
    UnknownToken {
        operation: ArcIntern<str>,
        token: String,
    },
    #[error("The operation `{0}` is defined in terms of itself")]
    Cycle(ArcIntern<str>),
    #[error("Unknown operation `{0}`")]
    UnknownOperation(String),
    #[error("Could not invert the operation `{operation}`: {source}")]
    Negation {
        operation: ArcIntern<str>,
        source: MutationError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperation {
    name: ArcIntern<str>,
    algorithm: Algorithm,
    mutation: Mutation,
    reverse: Option<Algorithm>,
}

impl ResolvedOperation {
    #[must_use]
    pub fn name(&self) -> &ArcIntern<str> {
        &self.name
    }

    /// The names this operation is made of. A primitive consists of itself.
    #[must_use]
    pub fn algorithm(&self) -> &[ArcIntern<str>] {
        &self.algorithm
    }

    #[must_use]
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// An algorithm that undoes this operation, if the table contains one
    #[must_use]
    pub fn reverse(&self) -> Option<&[ArcIntern<str>]> {
        self.reverse.as_deref()
    }
}

impl Display for ResolvedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Visiting,
    Done,
}

struct Resolver<'a> {
    raw: &'a RawTable,
    indices: HashMap<&'a str, usize>,
    progress: Vec<Option<Progress>>,
    mutations: Vec<Option<Mutation>>,
}

impl Resolver<'_> {
    fn resolve(&mut self, index: usize) -> Result<Mutation, OperationError> {
        let raw = self.raw;
        let (name, operation) = &raw.entries[index];

        match self.progress[index] {
            Some(Progress::Done) => {
                if let Some(mutation) = &self.mutations[index] {
                    return Ok(mutation.clone());
                }
            }
            Some(Progress::Visiting) => return Err(OperationError::Cycle(name.clone())),
            None => {}
        }

        self.progress[index] = Some(Progress::Visiting);

        let mutation = match operation {
            RawOperation::Primitive(mutation) => mutation.clone(),
            RawOperation::Composite(algorithm) => {
                let mut state = CubeState::identity();

                for token in algorithm.split_whitespace() {
                    let &dependency = self.indices.get(token).ok_or_else(|| {
                        OperationError::UnknownToken {
                            operation: name.clone(),
                            token: token.to_owned(),
                        }
                    })?;

                    state = mutate(&state, &self.resolve(dependency)?);
                }

                Mutation::from_state(&state)
            }
        };

        debug!(target: "operations", "Resolved operation: name={name}");

        self.progress[index] = Some(Progress::Done);
        self.mutations[index] = Some(mutation.clone());

        Ok(mutation)
    }
}

/// Resolve every operation of the table, then link each operation to its reverse
pub fn resolve_all(raw: &RawTable, model: &CubeModel) -> Result<OperationTable, OperationError> {
    let mut indices = HashMap::with_capacity(raw.entries.len());

    for (index, (name, _)) in raw.entries.iter().enumerate() {
        if indices.insert(&**name, index).is_some() {
            return Err(OperationError::DuplicateName(name.clone()));
        }
    }

    let mut resolver = Resolver {
        raw,
        indices,
        progress: vec![None; raw.entries.len()],
        mutations: vec![None; raw.entries.len()],
    };

    let mut operations = Vec::with_capacity(raw.entries.len());

    for (index, (name, operation)) in raw.entries.iter().enumerate() {
        let mutation = resolver.resolve(index)?;

        let algorithm = match operation {
            RawOperation::Primitive(_) => vec![name.clone()],
            RawOperation::Composite(algorithm) => algorithm
                .split_whitespace()
                .map(ArcIntern::from)
                .collect(),
        };

        operations.push(ResolvedOperation {
            name: name.clone(),
            algorithm,
            mutation,
            reverse: None,
        });
    }

    let mut table = OperationTable { operations };
    table.build_reverse_links(model)?;

    Ok(table)
}

/// The resolved operations of one cube variant, immutable once built
#[derive(Debug, Clone)]
pub struct OperationTable {
    operations: Vec<ResolvedOperation>,
}

impl OperationTable {
    fn build_reverse_links(&mut self, model: &CubeModel) -> Result<(), OperationError> {
        let mut missing = Vec::new();

        for index in 0..self.operations.len() {
            let operation = &self.operations[index];

            let negated = negate(&operation.mutation, model.solved(), model.cubies()).map_err(
                |source| OperationError::Negation {
                    operation: operation.name.clone(),
                    source,
                },
            )?;

            match self.find_by_mutation(&negated) {
                Some(reverse) => {
                    let reverse = vec![reverse.name.clone()];
                    self.operations[index].reverse = Some(reverse);
                }
                None => missing.push(index),
            }
        }

        for index in missing {
            let synthesized = self.operations[index]
                .algorithm
                .iter()
                .rev()
                .map(|token| {
                    self.get(token)
                        .and_then(|operation| operation.reverse.clone())
                })
                .collect::<Option<Vec<_>>>()
                .map(|pieces| pieces.concat());

            let operation = &mut self.operations[index];

            match synthesized {
                Some(reverse) => {
                    debug!(
                        target: "operations",
                        "Synthesized reverse: name={} reverse={}",
                        operation.name,
                        reverse.iter().join(" ")
                    );
                    operation.reverse = Some(reverse);
                }
                None => warn!(
                    target: "operations",
                    "No reverse found: name={}",
                    operation.name
                ),
            }
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedOperation> {
        self.operations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedOperation> {
        self.operations.iter().find(|operation| &*operation.name == name)
    }

    /// The first operation in table order with exactly this mutation
    #[must_use]
    pub fn find_by_mutation(&self, mutation: &Mutation) -> Option<&ResolvedOperation> {
        self.operations
            .iter()
            .find(|operation| operation.mutation == *mutation)
    }

    /// Find the single operation that turns `before` into `after`. The stickers of `before` are
    /// taken as a new solved reference, so reading `after` against them gives the move relative
    /// to `before`.
    #[must_use]
    pub fn find_by_state_difference(
        &self,
        after: &CubeState,
        before: &CubeState,
        model: &CubeModel,
    ) -> Option<&ResolvedOperation> {
        let reference = CubieTable::new(&model.to_facelets(before)).ok()?;
        let relative = facelets_to_state(&model.to_facelets(after), &reference).ok()?;

        self.find_by_mutation(&Mutation::from_state(&relative))
    }

    fn lookup(&self, token: &str) -> Result<&ResolvedOperation, OperationError> {
        self.get(token)
            .ok_or_else(|| OperationError::UnknownOperation(token.to_owned()))
    }

    /// Apply a space separated algorithm
    pub fn operate(&self, state: &CubeState, algorithm: &str) -> Result<CubeState, OperationError> {
        algorithm
            .split_whitespace()
            .try_fold(*state, |state, token| {
                Ok(mutate(&state, &self.lookup(token)?.mutation))
            })
    }

    /// The algorithm undoing `algorithm`, or `None` if some operation in it has no reverse
    pub fn reverse_algorithm(&self, algorithm: &str) -> Result<Option<String>, OperationError> {
        let mut reversed = Vec::new();

        for token in algorithm.split_whitespace().rev() {
            match self.lookup(token)?.reverse() {
                Some(reverse) => reversed.extend(reverse.iter().cloned()),
                None => return Ok(None),
            }
        }

        Ok(Some(reversed.iter().join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelets::Facelets;

    fn names(names: &[&str]) -> Algorithm {
        names.iter().copied().map(ArcIntern::from).collect()
    }

    fn model() -> CubeModel {
        CubeModel::new(Facelets::solved()).unwrap()
    }

    fn swap_edges() -> Mutation {
        let mut values = *CubeState::identity().values();
        values.swap(0, 1);
        Mutation::from_state(&CubeState::try_from(&values[..]).unwrap())
    }

    fn twist_center() -> Mutation {
        Mutation::identity().with_orientation(20, 1)
    }

    #[test]
    fn resolves_out_of_order() {
        let mut raw = RawTable::new();
        raw.push("T2", RawOperation::Composite("T T".to_owned()));
        raw.push("T'", RawOperation::Composite("T2 T".to_owned()));
        raw.push("T", RawOperation::Primitive(twist_center()));

        let table = resolve_all(&raw, &model()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get("T'").unwrap().mutation(),
            &Mutation::identity().with_orientation(20, 3)
        );
        assert_eq!(table.get("T").unwrap().reverse(), Some(&names(&["T'"])[..]));
        assert_eq!(table.get("T2").unwrap().reverse(), Some(&names(&["T2"])[..]));
        assert_eq!(table.get("T'").unwrap().algorithm(), names(&["T2", "T"]));
    }

    #[test]
    fn synthesized_reverse() {
        let mut raw = RawTable::new();
        raw.push("S", RawOperation::Primitive(swap_edges()));
        raw.push("T", RawOperation::Primitive(twist_center()));
        raw.push("T2", RawOperation::Composite("T T".to_owned()));
        raw.push("T'", RawOperation::Composite("T2 T".to_owned()));
        raw.push("ST", RawOperation::Composite("S T".to_owned()));

        let table = resolve_all(&raw, &model()).unwrap();

        assert_eq!(table.get("S").unwrap().reverse(), Some(&names(&["S"])[..]));
        assert_eq!(
            table.get("ST").unwrap().reverse(),
            Some(&names(&["T'", "S"])[..])
        );

        let state = table.operate(&CubeState::identity(), "ST").unwrap();
        let back = table.reverse_algorithm("ST").unwrap().unwrap();
        assert_eq!(back, "T' S");
        assert!(table.operate(&state, &back).unwrap().is_identity());
    }

    #[test]
    fn missing_reverse() {
        let mut raw = RawTable::new();
        raw.push("T", RawOperation::Primitive(twist_center()));

        let table = resolve_all(&raw, &model()).unwrap();

        assert_eq!(table.get("T").unwrap().reverse(), None);
        assert_eq!(table.reverse_algorithm("T T").unwrap(), None);
        assert_eq!(table.reverse_algorithm("").unwrap(), Some(String::new()));
    }

    #[test]
    fn malformed_tables() {
        let mut raw = RawTable::new();
        raw.push("A", RawOperation::Composite("B".to_owned()));
        raw.push("B", RawOperation::Composite("A".to_owned()));
        assert!(matches!(
            resolve_all(&raw, &model()),
            Err(OperationError::Cycle(_))
        ));

        let mut raw = RawTable::new();
        raw.push("A", RawOperation::Composite("A2".to_owned()));
        assert!(matches!(
            resolve_all(&raw, &model()),
            Err(OperationError::UnknownToken { token, .. }) if token == "A2"
        ));

        let mut raw = RawTable::new();
        raw.push("T", RawOperation::Primitive(twist_center()));
        raw.push("T", RawOperation::Primitive(swap_edges()));
        assert!(matches!(
            resolve_all(&raw, &model()),
            Err(OperationError::DuplicateName(name)) if &*name == "T"
        ));
    }

    #[test]
    fn unknown_operation() {
        let table = resolve_all(&RawTable::new(), &model()).unwrap();
        assert!(table.is_empty());
        assert!(matches!(
            table.operate(&CubeState::identity(), "Q"),
            Err(OperationError::UnknownOperation(name)) if name == "Q"
        ));
    }

    #[test]
    fn state_difference() {
        let mut raw = RawTable::new();
        raw.push("S", RawOperation::Primitive(swap_edges()));
        raw.push("T", RawOperation::Primitive(twist_center()));

        let model = model();
        let table = resolve_all(&raw, &model).unwrap();

        let before = table.operate(&CubeState::identity(), "T S").unwrap();
        let after = table.operate(&before, "T").unwrap();

        assert_eq!(
            table
                .find_by_state_difference(&after, &before, &model)
                .map(|operation| operation.name().to_string()),
            Some("T".to_owned())
        );
        assert!(
            table
                .find_by_state_difference(&before, &before, &model)
                .is_none()
        );
    }
}
