//! Clause elements.

use std::sync::Arc;

use crate::ast::{
    AggregateFunc, Builtin, CalcOp, Clause, CompareOp, DataType, Direction, JoinKind, LogicOp,
    ParamSource, Parameter, SortDirection, TableRef, Value,
};
use crate::codec::{Decoder, Element, Encoder, Registry, values};
use crate::error::{WeaveError, WeaveResult};

pub(crate) fn encode_table(element: Element, table: &TableRef) -> Element {
    let element = element.with_attr("table", table.name.clone());
    match &table.schema {
        Some(schema) => element.with_attr("schema", schema.clone()),
        None => element,
    }
}

pub(crate) fn decode_table(element: &Element) -> WeaveResult<TableRef> {
    Ok(TableRef {
        schema: element.attr("schema").map(str::to_string),
        name: element.require("table")?.to_string(),
    })
}

fn encode_param(enc: &mut Encoder, param: &Arc<Parameter>) -> Element {
    let (reference, first) = enc.param_ref(param);
    let element = Element::new("param").with_attr("ref", reference);
    if !first {
        return element;
    }
    let mut element = element;
    if let Some(name) = &param.name {
        element = element.with_attr("name", name.clone());
    }
    if let Some(dt) = param.data_type {
        element = element.with_attr("type", dt.to_string());
    }
    if param.direction != Direction::In {
        element = element.with_attr("direction", param.direction.name());
    }
    match &param.source {
        // callbacks cannot be written out
        ParamSource::Deferred(_) => element.with_flag("deferred", true),
        ParamSource::Fixed(value) => values::encode(element, value),
    }
}

/// Encode one clause.
pub(crate) fn encode(enc: &mut Encoder, clause: &Clause) -> Element {
    match clause {
        Clause::Field { table, name } => {
            let element = Element::new("field").with_attr("name", name.clone());
            match table {
                Some(table) => element.with_attr("table", table.clone()),
                None => element,
            }
        }
        Clause::AllFields { table } => {
            let element = Element::new("all-fields");
            match table {
                Some(table) => element.with_attr("table", table.clone()),
                None => element,
            }
        }
        Clause::Constant(value) => values::encode(Element::new("const"), value),
        Clause::Param(param) => encode_param(enc, param),
        Clause::Compare { left, op, right } => Element::new("compare")
            .with_attr("op", op.name())
            .with_child(enc.clause(left))
            .with_child(enc.clause(right)),
        Clause::IsNull { clause, negated } => Element::new("is-null")
            .with_flag("negated", *negated)
            .with_child(enc.clause(clause)),
        Clause::InList {
            clause,
            items,
            negated,
        } => {
            let mut element = Element::new("in-list")
                .with_flag("negated", *negated)
                .with_child(enc.clause(clause));
            for item in items {
                let child = enc.clause(item);
                element.children.push(child);
            }
            element
        }
        Clause::Between { clause, low, high } => Element::new("between")
            .with_child(enc.clause(clause))
            .with_child(enc.clause(low))
            .with_child(enc.clause(high)),
        Clause::Exists(select) => {
            let inner = crate::codec::queries::encode_select(enc, select);
            Element::new("exists").with_child(inner)
        }
        Clause::Logic { left, op, right } => Element::new("logic")
            .with_attr("op", op.name())
            .with_child(enc.clause(left))
            .with_child(enc.clause(right)),
        Clause::Not(inner) => Element::new("not").with_child(enc.clause(inner)),
        Clause::Aggregate {
            func,
            arg,
            distinct,
        } => {
            let element = Element::new("aggregate")
                .with_attr("func", func.name())
                .with_flag("distinct", *distinct);
            match arg {
                Some(arg) => element.with_child(enc.clause(arg)),
                None => element,
            }
        }
        Clause::Function { name, args } => {
            let mut element = Element::new("function").with_attr("name", name.clone());
            for arg in args {
                let child = enc.clause(arg);
                element.children.push(child);
            }
            element
        }
        Clause::Builtin(builtin) => {
            let element = Element::new("builtin").with_attr("fn", builtin.name());
            match builtin {
                Builtin::LastId {
                    sequence: Some(seq),
                }
                | Builtin::NextId { sequence: seq } => element.with_attr("sequence", seq.clone()),
                _ => element,
            }
        }
        Clause::Concat(parts) => {
            let mut element = Element::new("concat");
            for part in parts {
                let child = enc.clause(part);
                element.children.push(child);
            }
            element
        }
        Clause::Cast { clause, data_type } => Element::new("cast")
            .with_attr("type", data_type.to_string())
            .with_child(enc.clause(clause)),
        Clause::Calc { left, op, right } => Element::new("calc")
            .with_attr("op", op.name())
            .with_child(enc.clause(left))
            .with_child(enc.clause(right)),
        Clause::Aliased { clause, alias } => Element::new("alias")
            .with_attr("alias", alias.clone())
            .with_child(enc.clause(clause)),
        Clause::Table(table) => encode_table(Element::new("table"), table),
        Clause::Join { kind, table, on } => Element::new("join")
            .with_attr("kind", kind.name())
            .with_child(enc.clause(table))
            .with_child(enc.clause(on)),
        Clause::Order { clause, direction } => {
            let direction = match direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            Element::new("order")
                .with_attr("direction", direction)
                .with_child(enc.clause(clause))
        }
        Clause::Assign { field, value } => Element::new("assign")
            .with_child(enc.clause(field))
            .with_child(enc.clause(value)),
        Clause::SubQuery(select) => {
            let inner = crate::codec::queries::encode_select(enc, select);
            Element::new("sub-query").with_child(inner)
        }
    }
}

fn named<T>(element: &Element, key: &str, lookup: fn(&str) -> Option<T>) -> WeaveResult<T> {
    let raw = element.require(key)?;
    lookup(raw).ok_or_else(|| element.malformed(key, raw))
}

fn pair(d: &mut Decoder<'_>, element: &Element) -> WeaveResult<(Box<Clause>, Box<Clause>)> {
    let children = element.children_exact(2)?;
    Ok((d.boxed(&children[0])?, d.boxed(&children[1])?))
}

fn single(d: &mut Decoder<'_>, element: &Element) -> WeaveResult<Box<Clause>> {
    let children = element.children_exact(1)?;
    d.boxed(&children[0])
}

fn data_type(element: &Element) -> WeaveResult<Option<DataType>> {
    element
        .attr("type")
        .map(|raw| raw.parse().map_err(|_| element.malformed("type", raw)))
        .transpose()
}

fn decode_field(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::Field {
        table: e.attr("table").map(str::to_string),
        name: e.require("name")?.to_string(),
    })
}

fn decode_all_fields(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::AllFields {
        table: e.attr("table").map(str::to_string),
    })
}

fn decode_const(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    values::decode(e).map(Clause::Constant)
}

fn decode_param(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let reference = e.require("ref")?;
    if let Some(known) = d.known_param(reference) {
        return Ok(Clause::Param(known));
    }
    if !e.attrs.contains_key("kind") && !e.attrs.contains_key("deferred") {
        return Err(WeaveError::serialization(
            &e.name,
            format!("reference '{}' used before its definition", reference),
        ));
    }
    let direction = match e.attr("direction") {
        Some(raw) => Direction::from_name(raw).ok_or_else(|| e.malformed("direction", raw))?,
        None => Direction::In,
    };
    let source = if e.flag("deferred")? {
        ParamSource::Fixed(Value::Null)
    } else {
        ParamSource::Fixed(values::decode(e)?)
    };
    let param = Arc::new(Parameter {
        name: e.attr("name").map(str::to_string),
        data_type: data_type(e)?,
        direction,
        source,
    });
    d.remember_param(reference, param.clone());
    Ok(Clause::Param(param))
}

fn decode_compare(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let op = named(e, "op", CompareOp::from_name)?;
    let (left, right) = pair(d, e)?;
    Ok(Clause::Compare { left, op, right })
}

fn decode_is_null(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::IsNull {
        clause: single(d, e)?,
        negated: e.flag("negated")?,
    })
}

fn decode_in_list(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let Some((subject, items)) = e.children.split_first() else {
        return Err(WeaveError::serialization(&e.name, "missing subject"));
    };
    Ok(Clause::InList {
        clause: d.boxed(subject)?,
        items: d.clauses(items)?,
        negated: e.flag("negated")?,
    })
}

fn decode_between(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let children = e.children_exact(3)?;
    Ok(Clause::Between {
        clause: d.boxed(&children[0])?,
        low: d.boxed(&children[1])?,
        high: d.boxed(&children[2])?,
    })
}

fn decode_exists(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let children = e.children_exact(1)?;
    Ok(Clause::Exists(Box::new(d.select(&children[0])?)))
}

fn decode_logic(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let op = named(e, "op", LogicOp::from_name)?;
    let (left, right) = pair(d, e)?;
    for side in [&left, &right] {
        if !side.is_predicate() {
            return Err(WeaveError::serialization(
                &e.name,
                format!("operand is a {} node, not a predicate", side.kind()),
            ));
        }
    }
    Ok(Clause::Logic { left, op, right })
}

fn decode_not(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::Not(single(d, e)?))
}

fn decode_aggregate(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let func = named(e, "func", AggregateFunc::from_name)?;
    let arg = match e.children.as_slice() {
        [] => None,
        [arg] => Some(d.boxed(arg)?),
        _ => return Err(WeaveError::serialization(&e.name, "more than one argument")),
    };
    Ok(Clause::Aggregate {
        func,
        arg,
        distinct: e.flag("distinct")?,
    })
}

fn decode_function(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::Function {
        name: e.require("name")?.to_string(),
        args: d.clauses(&e.children)?,
    })
}

fn decode_builtin(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let sequence = e.attr("sequence").map(str::to_string);
    let builtin = match e.require("fn")? {
        "current-date" => Builtin::CurrentDate,
        "current-timestamp" => Builtin::CurrentTimestamp,
        "last-id" => Builtin::LastId { sequence },
        "next-id" => Builtin::NextId {
            sequence: e.require("sequence")?.to_string(),
        },
        other => return Err(e.malformed("fn", other)),
    };
    Ok(Clause::Builtin(builtin))
}

fn decode_concat(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    Ok(Clause::Concat(d.clauses(&e.children)?))
}

fn decode_cast(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let Some(data_type) = data_type(e)? else {
        return Err(WeaveError::serialization(&e.name, "missing attribute 'type'"));
    };
    Ok(Clause::Cast {
        clause: single(d, e)?,
        data_type,
    })
}

fn decode_calc(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let op = named(e, "op", CalcOp::from_name)?;
    let (left, right) = pair(d, e)?;
    Ok(Clause::Calc { left, op, right })
}

fn decode_alias(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let alias = e.require("alias")?;
    let inner = single(d, e)?;
    (*inner)
        .alias(alias)
        .map_err(|err| WeaveError::serialization(&e.name, err.to_string()))
}

fn decode_table_clause(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    decode_table(e).map(Clause::Table)
}

fn decode_join(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let kind = named(e, "kind", JoinKind::from_name)?;
    let (table, on) = pair(d, e)?;
    Ok(Clause::Join { kind, table, on })
}

fn decode_order(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let direction = match e.attr("direction") {
        None | Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => return Err(e.malformed("direction", other)),
    };
    Ok(Clause::Order {
        clause: single(d, e)?,
        direction,
    })
}

fn decode_assign(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let (field, value) = pair(d, e)?;
    Ok(Clause::Assign { field, value })
}

fn decode_sub_query(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Clause> {
    let children = e.children_exact(1)?;
    Ok(Clause::SubQuery(Box::new(d.select(&children[0])?)))
}

pub(crate) fn register(registry: &mut Registry) {
    registry
        .register_clause("field", decode_field)
        .register_clause("all-fields", decode_all_fields)
        .register_clause("const", decode_const)
        .register_clause("param", decode_param)
        .register_clause("compare", decode_compare)
        .register_clause("is-null", decode_is_null)
        .register_clause("in-list", decode_in_list)
        .register_clause("between", decode_between)
        .register_clause("exists", decode_exists)
        .register_clause("logic", decode_logic)
        .register_clause("not", decode_not)
        .register_clause("aggregate", decode_aggregate)
        .register_clause("function", decode_function)
        .register_clause("builtin", decode_builtin)
        .register_clause("concat", decode_concat)
        .register_clause("cast", decode_cast)
        .register_clause("calc", decode_calc)
        .register_clause("alias", decode_alias)
        .register_clause("table", decode_table_clause)
        .register_clause("join", decode_join)
        .register_clause("order", decode_order)
        .register_clause("assign", decode_assign)
        .register_clause("sub-query", decode_sub_query);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::codec::Encoder;
    use pretty_assertions::assert_eq;

    fn round(clause: Clause) -> Clause {
        let element = Encoder::default().clause(&clause);
        Decoder::new(Registry::standard()).clause(&element).unwrap()
    }

    #[test]
    fn test_clause_round_trip() {
        for clause in [
            field("o.total").between(10, 20),
            field("name").not_in(vec!["a", "b"]),
            not(field("x").is_not_null()),
            count_distinct(field("id")).alias("n").unwrap(),
            cast(field("price"), DataType::Decimal { precision: 10, scale: 2 }),
            last_id(Some("seq")),
            table("sales.orders").alias("o").unwrap(),
            field("qty").set(field("qty").plus(1)),
        ] {
            assert_eq!(round(clause.clone()), clause);
        }
    }

    #[test]
    fn test_param_attrs() {
        let p = Parameter::fixed(9)
            .named("limit")
            .typed(DataType::Int)
            .shared();
        let element = Encoder::default().clause(&Clause::Param(p));
        assert_eq!(element.attr("name"), Some("limit"));
        assert_eq!(element.attr("type"), Some("int"));
        assert_eq!(element.attr("kind"), Some("int"));
        assert_eq!(element.attr("value"), Some("9"));
        assert_eq!(element.attr("direction"), None);
    }

    #[test]
    fn test_deferred_param_is_flagged() {
        let element = Encoder::default().clause(&deferred(|| Value::Int(1)));
        assert_eq!(element.attr("deferred"), Some("true"));
        assert_eq!(element.attr("value"), None);
    }

    #[test]
    fn test_unknown_op() {
        let element = Element::new("compare")
            .with_attr("op", "approx")
            .with_child(Element::new("field").with_attr("name", "a"))
            .with_child(Element::new("field").with_attr("name", "b"));
        let err = Decoder::new(Registry::standard())
            .clause(&element)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Serialization error at <compare>: malformed op 'approx'"
        );
    }
}
