use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    codec::{Metadata, decode, encode},
    state::CubeState,
};

const QUERY_KEY: &str = "config=";
const SCHEME: &str = "web+rubik://";
const KEY_PREFIX: &str = "cube-";

/// The query string sharing a cube
#[must_use]
pub fn permalink(code: &str) -> String {
    format!("?{QUERY_KEY}{code}")
}

/// A link opening a cube through the registered protocol handler
#[must_use]
pub fn scheme_link(code: &str) -> String {
    format!("{SCHEME}{code}/")
}

/// Find the code in either kind of link, or in a full url carrying the query string
#[must_use]
pub fn parse_link(text: &str) -> Option<&str> {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix(SCHEME) {
        let code = rest.trim_end_matches('/');
        return (!code.is_empty()).then_some(code);
    }

    let query = &text[text.find('?')? + 1..];

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(QUERY_KEY))
        .filter(|code| !code.is_empty())
}

#[must_use]
pub fn storage_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// A saved cube. It is stored under `storage_key(id)` with its code as the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCube {
    pub id: String,
    pub metadata: Metadata,
    pub state: CubeState,
}

impl StoredCube {
    #[must_use]
    pub fn key(&self) -> String {
        storage_key(&self.id)
    }

    #[must_use]
    pub fn code(&self) -> String {
        encode(&self.state, self.metadata)
    }
}

/// Collect the saved cubes out of a key value store, in key order. Entries of other kinds are
/// passed over and entries that fail to decode are skipped.
pub fn retrieve_items<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<StoredCube>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries = entries
        .into_iter()
        .filter(|(key, _)| key.as_ref().starts_with(KEY_PREFIX))
        .collect::<Vec<_>>();

    entries.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.as_ref();
            let id = &key[KEY_PREFIX.len()..];

            match decode(value.as_ref()) {
                Ok((state, metadata)) => Some(StoredCube {
                    id: id.to_owned(),
                    metadata,
                    state,
                }),
                Err(e) => {
                    warn!(target: "storage", "Skipping stored cube: key={key} error={e}");
                    None
                }
            }
        })
        .collect()
}
