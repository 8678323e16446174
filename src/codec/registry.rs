//! Element-name dispatch for decoding.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{Clause, Query};
use crate::codec::{Decoder, Element, clauses, queries};
use crate::error::WeaveResult;

pub type ClauseDecoder = fn(&mut Decoder<'_>, &Element) -> WeaveResult<Clause>;
pub type QueryDecoder = fn(&mut Decoder<'_>, &Element) -> WeaveResult<Query>;

static STANDARD: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::empty();
    clauses::register(&mut registry);
    queries::register(&mut registry);
    tracing::debug!(
        clauses = registry.clauses.len(),
        queries = registry.queries.len(),
        "codec registry built"
    );
    registry
});

/// Maps element names to decoder functions.
#[derive(Clone, Default)]
pub struct Registry {
    clauses: HashMap<String, ClauseDecoder>,
    queries: HashMap<String, QueryDecoder>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut clauses: Vec<_> = self.clauses.keys().collect();
        clauses.sort();
        let mut queries: Vec<_> = self.queries.keys().collect();
        queries.sort();
        f.debug_struct("Registry")
            .field("clauses", &clauses)
            .field("queries", &queries)
            .finish()
    }
}

impl Registry {
    /// Registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Process-wide registry of every built-in element, built on first use.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// Add or replace the decoder for a clause element.
    pub fn register_clause(&mut self, name: &str, decoder: ClauseDecoder) -> &mut Self {
        self.clauses.insert(name.to_string(), decoder);
        self
    }

    /// Add or replace the decoder for a statement element.
    pub fn register_query(&mut self, name: &str, decoder: QueryDecoder) -> &mut Self {
        self.queries.insert(name.to_string(), decoder);
        self
    }

    pub fn clause_decoder(&self, name: &str) -> Option<ClauseDecoder> {
        self.clauses.get(name).copied()
    }

    pub fn query_decoder(&self, name: &str) -> Option<QueryDecoder> {
        self.queries.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::field;
    use crate::codec::decode_with;

    #[test]
    fn test_standard_covers_all_roots() {
        let registry = Registry::standard();
        for name in [
            "select",
            "insert",
            "update",
            "delete",
            "exec",
            "script",
            "create-table",
            "drop-table",
        ] {
            assert!(registry.query_decoder(name).is_some(), "{}", name);
        }
        assert!(registry.clause_decoder("between").is_some());
        assert!(registry.clause_decoder("fields").is_none());
    }

    #[test]
    fn test_custom_clause_element() {
        fn column(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
            let _ = d;
            Ok(field(e.require("ref")?))
        }

        let mut registry = Registry::standard().clone();
        registry.register_clause("column", column);

        let doc = Element::new("select").with_child(
            Element::new("fields").with_child(Element::new("column").with_attr("ref", "a")),
        );
        let q = decode_with(&doc, &registry).unwrap();
        let Query::Select(s) = q else {
            panic!("expected select")
        };
        assert_eq!(s.fields.items(), &[field("a")]);
        assert!(crate::codec::decode(&doc).is_err());
    }
}
