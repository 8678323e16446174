//! Structured-document codec for the query AST.
//!
//! A query is written as a tree of [`Element`]s (one root element per
//! statement kind, one nested element per clause) and carried as JSON.
//! Decoding dispatches on element names through a [`Registry`], and a
//! decoded tree renders to exactly the text of the original.

mod clauses;
mod queries;
pub mod registry;
mod values;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{Clause, ExpressionSet, Parameter, Query, Select, SetKind};
use crate::error::{WeaveError, WeaveResult};

pub use self::registry::{ClauseDecoder, QueryDecoder, Registry};

/// One node of a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Set `key="true"` only when `flag` holds.
    pub fn with_flag(self, key: &str, flag: bool) -> Self {
        if flag { self.with_attr(key, "true") } else { self }
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Attribute that must be present.
    pub fn require(&self, key: &str) -> WeaveResult<&str> {
        self.attr(key).ok_or_else(|| {
            WeaveError::serialization(&self.name, format!("missing attribute '{}'", key))
        })
    }

    pub fn flag(&self, key: &str) -> WeaveResult<bool> {
        match self.attr(key) {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(self.malformed(key, other)),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Exactly `n` children, or a serialization error.
    pub fn children_exact(&self, n: usize) -> WeaveResult<&[Element]> {
        if self.children.len() == n {
            Ok(&self.children)
        } else {
            Err(WeaveError::serialization(
                &self.name,
                format!("expected {} children, found {}", n, self.children.len()),
            ))
        }
    }

    pub(crate) fn malformed(&self, key: &str, value: &str) -> WeaveError {
        WeaveError::serialization(&self.name, format!("malformed {} '{}'", key, value))
    }
}

/// Encode a query into a document tree.
pub fn encode(query: &Query) -> Element {
    Encoder::default().query(query)
}

/// Decode a document tree with the standard registry.
pub fn decode(element: &Element) -> WeaveResult<Query> {
    decode_with(element, Registry::standard())
}

/// Decode a document tree with a custom registry.
pub fn decode_with(element: &Element, registry: &Registry) -> WeaveResult<Query> {
    tracing::debug!(root = %element.name, "decoding document");
    Decoder::new(registry).query(element)
}

pub fn to_json(query: &Query, pretty: bool) -> WeaveResult<String> {
    let element = encode(query);
    let text = if pretty {
        serde_json::to_string_pretty(&element)?
    } else {
        serde_json::to_string(&element)?
    };
    Ok(text)
}

pub fn from_json(text: &str) -> WeaveResult<Query> {
    let element: Element = serde_json::from_str(text)?;
    decode(&element)
}

/// Writes AST nodes as elements, tracking parameter identity.
#[derive(Debug, Default)]
pub struct Encoder {
    refs: HashMap<usize, String>,
}

impl Encoder {
    pub fn query(&mut self, query: &Query) -> Element {
        queries::encode(self, query)
    }

    pub fn clause(&mut self, clause: &Clause) -> Element {
        clauses::encode(self, clause)
    }

    /// Section container holding every item of `set`.
    pub fn set(&mut self, set: &ExpressionSet) -> Element {
        let mut element = Element::new(set.kind().name());
        for item in set.iter() {
            let child = self.clause(item);
            element.children.push(child);
        }
        element
    }

    /// `(ref, first occurrence)` for a parameter.
    pub(crate) fn param_ref(&mut self, param: &Arc<Parameter>) -> (String, bool) {
        let key = Arc::as_ptr(param) as usize;
        if let Some(existing) = self.refs.get(&key) {
            return (existing.clone(), false);
        }
        let name = (self.refs.len() + 1).to_string();
        self.refs.insert(key, name.clone());
        (name, true)
    }
}

/// Rebuilds AST nodes from elements through a registry.
pub struct Decoder<'r> {
    registry: &'r Registry,
    params: HashMap<String, Arc<Parameter>>,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            params: HashMap::new(),
        }
    }

    pub fn query(&mut self, element: &Element) -> WeaveResult<Query> {
        match self.registry.query_decoder(&element.name) {
            Some(decode) => decode(self, element),
            None => Err(WeaveError::serialization(
                &element.name,
                "unknown statement element",
            )),
        }
    }

    pub fn clause(&mut self, element: &Element) -> WeaveResult<Clause> {
        match self.registry.clause_decoder(&element.name) {
            Some(decode) => decode(self, element),
            None => Err(WeaveError::serialization(
                &element.name,
                "unknown clause element",
            )),
        }
    }

    pub fn clauses(&mut self, elements: &[Element]) -> WeaveResult<Vec<Clause>> {
        elements.iter().map(|e| self.clause(e)).collect()
    }

    pub fn boxed(&mut self, element: &Element) -> WeaveResult<Box<Clause>> {
        self.clause(element).map(Box::new)
    }

    /// A nested SELECT.
    pub fn select(&mut self, element: &Element) -> WeaveResult<Select> {
        match self.query(element)? {
            Query::Select(select) => Ok(select),
            other => Err(WeaveError::serialization(
                &element.name,
                format!("expected a select, found {}", other.kind()),
            )),
        }
    }

    /// Fill `set` from its section container, if present under `parent`.
    pub fn set(&mut self, parent: &Element, kind: SetKind) -> WeaveResult<ExpressionSet> {
        let mut set = ExpressionSet::new(kind);
        if let Some(container) = parent.child(kind.name()) {
            for child in &container.children {
                let clause = self.clause(child)?;
                set.push(clause)
                    .map_err(|e| WeaveError::serialization(&child.name, e.to_string()))?;
            }
        }
        set.finalize();
        Ok(set)
    }

    pub(crate) fn known_param(&self, reference: &str) -> Option<Arc<Parameter>> {
        self.params.get(reference).cloned()
    }

    pub(crate) fn remember_param(&mut self, reference: &str, param: Arc<Parameter>) {
        self.params.insert(reference.to_string(), param);
    }
}
