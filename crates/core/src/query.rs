//! Server-side predicates sent with the first catalog request.

use serde::{Deserialize, Serialize};

/// Species and status narrowing applied by the upstream API.
///
/// Only the first request carries these; every `info.next` URL already
/// encodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub species: String,
    pub status: String,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self { species: "Human".into(), status: "Alive".into() }
    }
}

impl CatalogQuery {
    pub fn new(species: impl Into<String>, status: impl Into<String>) -> Self {
        Self { species: species.into(), status: status.into() }
    }

    /// Query parameters in the order the API documents them.
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![("species".to_string(), self.species.clone()), ("status".to_string(), self.status.clone())]
    }
}
