//! Bound parameters: fixed values or callbacks evaluated on every render pass.
//!
//! A [`Parameter`] is shared through an `Arc`. Every clone of the same `Arc`
//! is the same parameter identity, so a parameter referenced twice in one
//! statement is registered once. Explicitly named parameters are identified
//! by name instead.

use std::sync::Arc;

use crate::ast::{Clause, DataType, Value};

/// Parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
    Return,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
            Direction::Return => "return",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "inout" => Some(Direction::InOut),
            "return" => Some(Direction::Return),
            _ => None,
        }
    }

    /// Whether the routine writes a value back through this parameter.
    pub fn is_output(&self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

/// Callback producing a parameter value at render time.
pub type ValueFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Where a parameter's value comes from.
#[derive(Clone)]
pub enum ParamSource {
    /// Captured once at construction.
    Fixed(Value),
    /// Re-invoked once per render pass.
    Deferred(ValueFn),
}

impl std::fmt::Debug for ParamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamSource::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            ParamSource::Deferred(_) => write!(f, "Deferred(..)"),
        }
    }
}

impl PartialEq for ParamSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamSource::Fixed(a), ParamSource::Fixed(b)) => a == b,
            (ParamSource::Deferred(a), ParamSource::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A named or anonymous value slot attached to an AST leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Explicit name; anonymous parameters get a generated one per render pass
    pub name: Option<String>,
    /// Declared type; inferred from the first produced value when absent
    pub data_type: Option<DataType>,
    pub direction: Direction,
    pub source: ParamSource,
}

impl Parameter {
    /// Parameter holding a fixed value.
    pub fn fixed(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            data_type: None,
            direction: Direction::In,
            source: ParamSource::Fixed(value.into()),
        }
    }

    /// Parameter whose value is read from `f` on every render pass.
    ///
    /// # Example
    /// ```ignore
    /// let counter = Arc::new(AtomicI64::new(0));
    /// let c = counter.clone();
    /// let p = Parameter::deferred(move || Value::Int(c.load(Ordering::SeqCst)));
    /// ```
    pub fn deferred(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self {
            name: None,
            data_type: None,
            direction: Direction::In,
            source: ParamSource::Deferred(Arc::new(f)),
        }
    }

    /// Output parameter of the given type (no input value).
    pub fn output(data_type: DataType) -> Self {
        Self {
            name: None,
            data_type: Some(data_type),
            direction: Direction::Out,
            source: ParamSource::Fixed(Value::Null),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn typed(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.source, ParamSource::Deferred(_))
    }

    /// Produce the value for one render pass.
    pub fn produce(&self) -> Value {
        match &self.source {
            ParamSource::Fixed(v) => v.clone(),
            ParamSource::Deferred(f) => f(),
        }
    }

    /// Share this parameter so it can be referenced from several places.
    pub fn shared(self) -> Arc<Parameter> {
        Arc::new(self)
    }
}

impl From<Parameter> for Clause {
    fn from(p: Parameter) -> Self {
        Clause::Param(Arc::new(p))
    }
}

impl From<Arc<Parameter>> for Clause {
    fn from(p: Arc<Parameter>) -> Self {
        Clause::Param(p)
    }
}
