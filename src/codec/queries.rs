//! Statement elements.

use crate::ast::{
    Clause, ColumnDef, CreateTable, Delete, DropTable, Exec, ExpressionSet, Insert, Query, RowLimit,
    Script, Select, SetKind, Update,
};
use crate::codec::clauses::{decode_table, encode_table};
use crate::codec::{Decoder, Element, Encoder, Registry};
use crate::error::{WeaveError, WeaveResult};

fn with_set(element: Element, enc: &mut Encoder, set: &ExpressionSet) -> Element {
    if set.is_empty() {
        element
    } else {
        let container = enc.set(set);
        element.with_child(container)
    }
}

pub(crate) fn encode_select(enc: &mut Encoder, select: &Select) -> Element {
    let mut element = Element::new("select").with_flag("distinct", select.distinct);
    match select.limit {
        Some(RowLimit::Count(n)) => element = element.with_attr("top", n.to_string()),
        Some(RowLimit::Range { offset, count }) => {
            element = element
                .with_attr("offset", offset.to_string())
                .with_attr("count", count.to_string())
        }
        None => {}
    }
    for set in [
        &select.fields,
        &select.from,
        &select.filter,
        &select.group_by,
        &select.having,
        &select.order_by,
    ] {
        element = with_set(element, enc, set);
    }
    element
}

/// Encode one statement.
pub(crate) fn encode(enc: &mut Encoder, query: &Query) -> Element {
    match query {
        Query::Select(select) => encode_select(enc, select),
        Query::Insert(insert) => {
            let element = encode_table(Element::new("insert"), &insert.table);
            let element = with_set(element, enc, &insert.columns);
            let element = with_set(element, enc, &insert.values);
            match &insert.source {
                Some(source) => {
                    let inner = encode_select(enc, source);
                    element.with_child(Element::new("source").with_child(inner))
                }
                None => element,
            }
        }
        Query::Update(update) => {
            let element = encode_table(Element::new("update"), &update.table);
            let element = with_set(element, enc, &update.assignments);
            with_set(element, enc, &update.filter)
        }
        Query::Delete(delete) => {
            let element = encode_table(Element::new("delete"), &delete.table);
            with_set(element, enc, &delete.filter)
        }
        Query::Exec(exec) => {
            let mut element = Element::new("exec").with_attr("routine", exec.routine.clone());
            if let Some(ret) = &exec.returns {
                let param = enc.clause(&Clause::Param(ret.clone()));
                element = element.with_child(Element::new("returns").with_child(param));
            }
            if !exec.args.is_empty() {
                let mut args = Element::new("args");
                for arg in &exec.args {
                    let child = enc.clause(arg);
                    args.children.push(child);
                }
                element = element.with_child(args);
            }
            element
        }
        Query::Script(script) => {
            let mut element = Element::new("script");
            for statement in &script.statements {
                let child = enc.query(statement);
                element.children.push(child);
            }
            element
        }
        Query::CreateTable(create) => {
            let mut element = encode_table(Element::new("create-table"), &create.table)
                .with_flag("if-not-exists", create.if_not_exists);
            for column in &create.columns {
                let child = Element::new("column")
                    .with_attr("name", column.name.clone())
                    .with_attr("type", column.data_type.to_string())
                    .with_attr("nullable", column.nullable.to_string())
                    .with_flag("primary-key", column.primary_key);
                element.children.push(child);
            }
            element
        }
        Query::DropTable(drop) => encode_table(Element::new("drop-table"), &drop.table)
            .with_flag("if-exists", drop.if_exists),
    }
}

fn number(element: &Element, key: &str) -> WeaveResult<Option<u64>> {
    element
        .attr(key)
        .map(|raw| raw.parse().map_err(|_| element.malformed(key, raw)))
        .transpose()
}

/// Statement-level checks of a decoded node, reported against its element.
fn checked(e: &Element, result: WeaveResult<()>) -> WeaveResult<()> {
    result.map_err(|err| match err {
        WeaveError::Construction { message, .. } => WeaveError::serialization(&e.name, message),
        other => other,
    })
}

fn decode_select(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let limit = match (number(e, "top")?, number(e, "offset")?, number(e, "count")?) {
        (None, None, None) => None,
        (Some(n), None, None) => Some(RowLimit::Count(n)),
        (None, Some(offset), Some(count)) => Some(RowLimit::Range { offset, count }),
        _ => {
            return Err(WeaveError::serialization(
                &e.name,
                "row limit needs either 'top' or both 'offset' and 'count'",
            ));
        }
    };
    Ok(Query::Select(Select {
        distinct: e.flag("distinct")?,
        limit,
        fields: d.set(e, SetKind::Select)?,
        from: d.set(e, SetKind::From)?,
        filter: d.set(e, SetKind::Where)?,
        group_by: d.set(e, SetKind::GroupBy)?,
        having: d.set(e, SetKind::Having)?,
        order_by: d.set(e, SetKind::OrderBy)?,
    }))
}

fn decode_insert(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let table = decode_table(e)?;
    let columns = d.set(e, SetKind::Columns)?;
    let values = d.set(e, SetKind::Values)?;
    let source = match e.child("source") {
        Some(source) => {
            let children = source.children_exact(1)?;
            Some(Box::new(d.select(&children[0])?))
        }
        None => None,
    };
    let insert = Insert {
        table,
        columns,
        values,
        source,
    };
    checked(e, insert.validate())?;
    Ok(Query::Insert(insert))
}

fn decode_update(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let update = Update {
        table: decode_table(e)?,
        assignments: d.set(e, SetKind::Assignments)?,
        filter: d.set(e, SetKind::Where)?,
    };
    checked(e, update.validate())?;
    Ok(Query::Update(update))
}

fn decode_delete(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    Ok(Query::Delete(Delete {
        table: decode_table(e)?,
        filter: d.set(e, SetKind::Where)?,
    }))
}

fn decode_exec(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let returns = match e.child("returns") {
        Some(returns) => {
            let children = returns.children_exact(1)?;
            match d.clause(&children[0])? {
                Clause::Param(param) => Some(param),
                other => {
                    return Err(WeaveError::serialization(
                        &returns.name,
                        format!("expected a param, found {}", other.kind()),
                    ));
                }
            }
        }
        None => None,
    };
    let args = match e.child("args") {
        Some(args) => d.clauses(&args.children)?,
        None => Vec::new(),
    };
    Ok(Query::Exec(Exec {
        routine: e.require("routine")?.to_string(),
        args,
        returns,
    }))
}

fn decode_script(d: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let mut script = Script::default();
    for child in &e.children {
        let statement = d.query(child)?;
        script.push(statement);
    }
    Ok(Query::Script(script))
}

fn decode_column(e: &Element) -> WeaveResult<ColumnDef> {
    let raw = e.require("type")?;
    let data_type = raw.parse().map_err(|_| e.malformed("type", raw))?;
    let nullable = match e.attr("nullable") {
        None | Some("true") => true,
        Some("false") => false,
        Some(other) => return Err(e.malformed("nullable", other)),
    };
    Ok(ColumnDef {
        name: e.require("name")?.to_string(),
        data_type,
        nullable,
        primary_key: e.flag("primary-key")?,
    })
}

fn decode_create_table(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    let columns = e
        .children
        .iter()
        .map(|child| match child.name.as_str() {
            "column" => decode_column(child),
            _ => Err(WeaveError::serialization(&child.name, "expected a column")),
        })
        .collect::<WeaveResult<Vec<_>>>()?;
    let create = CreateTable {
        table: decode_table(e)?,
        columns,
        if_not_exists: e.flag("if-not-exists")?,
    };
    checked(e, create.validate())?;
    Ok(Query::CreateTable(create))
}

fn decode_drop_table(_: &mut Decoder<'_>, e: &Element) -> WeaveResult<Query> {
    Ok(Query::DropTable(DropTable {
        table: decode_table(e)?,
        if_exists: e.flag("if-exists")?,
    }))
}

pub(crate) fn register(registry: &mut Registry) {
    registry
        .register_query("select", decode_select)
        .register_query("insert", decode_insert)
        .register_query("update", decode_update)
        .register_query("delete", decode_delete)
        .register_query("exec", decode_exec)
        .register_query("script", decode_script)
        .register_query("create-table", decode_create_table)
        .register_query("drop-table", decode_drop_table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataType;
    use crate::codec::{decode, encode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_table_round_trip() {
        let q = Query::create_table("accounts")
            .primary_key("id", DataType::Guid)
            .not_null("email", DataType::VarChar(320))
            .column("balance", DataType::Decimal { precision: 18, scale: 2 })
            .if_not_exists()
            .build()
            .unwrap();
        assert_eq!(decode(&encode(&q)).unwrap(), q);
    }

    #[test]
    fn test_select_limit_attrs() {
        let q = Query::select().all().from("t").range(5, 10).build();
        let element = encode(&q);
        assert_eq!(element.attr("offset"), Some("5"));
        assert_eq!(element.attr("count"), Some("10"));
        assert_eq!(element.attr("top"), None);

        let bad = Element::new("select").with_attr("offset", "5");
        assert!(decode(&bad).is_err());
    }

    #[test]
    fn test_statement_rules_apply_on_decode() {
        let err = decode(&Element::new("update").with_attr("table", "t")).unwrap_err();
        assert_eq!(err.to_string(), "Serialization error at <update>: no assignments");

        let columns = Element::new("columns")
            .with_child(Element::new("field").with_attr("name", "a"))
            .with_child(Element::new("field").with_attr("name", "b"));
        let insert = Element::new("insert")
            .with_attr("table", "t")
            .with_child(columns);
        assert!(matches!(
            decode(&insert),
            Err(WeaveError::Serialization { element, .. }) if element == "insert"
        ));

        let err = decode(&Element::new("create-table").with_attr("table", "t")).unwrap_err();
        assert_eq!(err.to_string(), "Serialization error at <create-table>: no columns");
    }

    #[test]
    fn test_invalid_operands_rejected_on_decode() {
        let logic = Element::new("logic")
            .with_attr("op", "and")
            .with_child(Element::new("field").with_attr("name", "a"))
            .with_child(Element::new("field").with_attr("name", "b"));
        let calc = Element::new("calc")
            .with_attr("op", "add")
            .with_child(
                Element::new("is-null").with_child(Element::new("field").with_attr("name", "a")),
            )
            .with_child(Element::new("field").with_attr("name", "b"));
        let select = Element::new("select").with_child(Element::new("fields").with_child(calc));
        assert!(matches!(decode(&select), Err(WeaveError::Serialization { .. })));

        let select = Element::new("select").with_child(Element::new("where").with_child(logic));
        assert!(matches!(decode(&select), Err(WeaveError::Serialization { .. })));
    }

    #[test]
    fn test_script_flattens_on_decode() {
        let nested = Element::new("script")
            .with_child(Element::new("script").with_child(Element::new("delete").with_attr("table", "a")))
            .with_child(Element::new("delete").with_attr("table", "b"));
        let Query::Script(script) = decode(&nested).unwrap() else {
            panic!("expected script")
        };
        assert_eq!(script.statements.len(), 2);
    }
}
