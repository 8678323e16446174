//! Free functions for building clause nodes.

use std::sync::Arc;

use crate::ast::{AggregateFunc, Builtin, Clause, DataType, Parameter, Select, TableRef, Value};

/// Column reference; `"t.c"` becomes a table-qualified field.
pub fn field(name: &str) -> Clause {
    match name.split_once('.') {
        Some((table, column)) => Clause::Field {
            table: Some(table.to_string()),
            name: column.to_string(),
        },
        None => Clause::Field {
            table: None,
            name: name.to_string(),
        },
    }
}

/// Column of an explicit table, no splitting.
pub fn qualified(table: &str, name: &str) -> Clause {
    Clause::Field {
        table: Some(table.to_string()),
        name: name.to_string(),
    }
}

/// `*`, or `t.*` when a table is given.
pub fn all_fields(table: Option<&str>) -> Clause {
    Clause::AllFields {
        table: table.map(str::to_string),
    }
}

pub fn constant(value: impl Into<Value>) -> Clause {
    Clause::Constant(value.into())
}

/// Anonymous parameter with a fixed value.
pub fn param(value: impl Into<Value>) -> Clause {
    Clause::Param(Arc::new(Parameter::fixed(value)))
}

/// Anonymous parameter re-evaluated on every render.
pub fn deferred(f: impl Fn() -> Value + Send + Sync + 'static) -> Clause {
    Clause::Param(Arc::new(Parameter::deferred(f)))
}

/// Table reference; `"s.t"` is schema-qualified.
pub fn table(name: &str) -> Clause {
    Clause::Table(TableRef::parse(name))
}

fn aggregate(func: AggregateFunc, arg: Clause) -> Clause {
    Clause::Aggregate {
        func,
        arg: Some(Box::new(arg)),
        distinct: false,
    }
}

pub fn count(arg: Clause) -> Clause {
    aggregate(AggregateFunc::Count, arg)
}

/// `COUNT(DISTINCT arg)`
pub fn count_distinct(arg: Clause) -> Clause {
    Clause::Aggregate {
        func: AggregateFunc::Count,
        arg: Some(Box::new(arg)),
        distinct: true,
    }
}

pub fn count_all() -> Clause {
    Clause::Aggregate {
        func: AggregateFunc::Count,
        arg: None,
        distinct: false,
    }
}

pub fn sum(arg: Clause) -> Clause {
    aggregate(AggregateFunc::Sum, arg)
}

pub fn avg(arg: Clause) -> Clause {
    aggregate(AggregateFunc::Avg, arg)
}

pub fn min(arg: Clause) -> Clause {
    aggregate(AggregateFunc::Min, arg)
}

pub fn max(arg: Clause) -> Clause {
    aggregate(AggregateFunc::Max, arg)
}

/// Plain function call, emitted verbatim in every dialect.
pub fn func(name: &str, args: Vec<Clause>) -> Clause {
    Clause::Function {
        name: name.to_string(),
        args,
    }
}

pub fn current_date() -> Clause {
    Clause::Builtin(Builtin::CurrentDate)
}

pub fn current_timestamp() -> Clause {
    Clause::Builtin(Builtin::CurrentTimestamp)
}

/// Last generated identity, optionally of a named sequence.
pub fn last_id(sequence: Option<&str>) -> Clause {
    Clause::Builtin(Builtin::LastId {
        sequence: sequence.map(str::to_string),
    })
}

pub fn next_id(sequence: &str) -> Clause {
    Clause::Builtin(Builtin::NextId {
        sequence: sequence.to_string(),
    })
}

pub fn concat(parts: Vec<Clause>) -> Clause {
    Clause::Concat(parts)
}

pub fn cast(clause: Clause, data_type: DataType) -> Clause {
    clause.cast(data_type)
}

pub fn exists(select: Select) -> Clause {
    Clause::Exists(Box::new(select))
}

pub fn sub_query(select: Select) -> Clause {
    Clause::SubQuery(Box::new(select))
}

pub fn not(pred: Clause) -> Clause {
    Clause::Not(Box::new(pred))
}
