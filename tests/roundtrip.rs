//! Document codec: decoded trees render to the same text as the originals.

use anyhow::Result;
use pretty_assertions::assert_eq;
use sqlweave::codec::{self, Element};
use sqlweave::prelude::*;

fn assert_same_text(query: &Query, profiles: &[&Profile]) -> Result<()> {
    let json = codec::to_json(query, true)?;
    let decoded = codec::from_json(&json)?;
    for profile in profiles {
        let before = render(query, profile)?;
        let after = render(&decoded, profile)?;
        assert_eq!(after.sql, before.sql, "{}", profile.name);
        assert_eq!(after.params, before.params, "{}", profile.name);
        assert_eq!(after.slots, before.slots, "{}", profile.name);
    }
    Ok(())
}

#[test]
fn report_query() -> Result<()> {
    let active = Parameter::fixed(true).named("active").shared();
    let recent = Query::select()
        .field("o.id")
        .from("orders")
        .alias("o")?
        .filter(field("o.customer_id").eq(field("c.id")))?
        .into_select();

    let query = Query::select()
        .distinct()
        .field("c.name")
        .expr(concat(vec![field("c.first"), constant(" "), field("c.last")]))?
        .alias("full_name")?
        .sum(field("o.total"))?
        .alias("spent")?
        .from("customers")
        .alias("c")?
        .from_clause(
            table("orders")
                .alias("o")?
                .join(JoinKind::Left, field("o.customer_id").eq(field("c.id"))),
        )?
        .filter(field("c.active").eq(active.clone()))?
        .and(field("c.region").in_list(vec![constant("EU"), constant("US")]))?
        .or(exists(recent))?
        .and(not(field("c.banned").eq(active)))?
        .group_by("c.name")
        .having(sum(field("o.total")).between(100, 5000))?
        .order_by_desc("spent")
        .top(25)
        .build();

    assert_same_text(
        &query,
        &[&sql::POSTGRES, &sql::MYSQL, &sql::SQLSERVER, &sql::ORACLE],
    )
}

#[test]
fn write_statements() -> Result<()> {
    let archive = Query::insert("orders_archive")
        .column("id")
        .column("total")
        .from_select(
            Query::select()
                .field("id")
                .field("total")
                .from("orders")
                .filter(field("placed").lt(current_date()))?
                .into_select(),
        )
        .build()?;

    let reprice = Query::update("products")
        .set("price", field("price"))?
        .times(1.1)?
        .set("updated", current_timestamp())?
        .filter(field("category").eq("tools"))?
        .build()?;

    let purge = Query::delete("sessions")
        .filter(field("expires").is_null())?
        .or(field("revoked").eq(true))?
        .build();

    let script = Query::script().add(archive).add(reprice).add(purge).build();
    assert_same_text(
        &script,
        &[&sql::ANSI, &sql::POSTGRES, &sql::SQLSERVER, &sql::ORACLE],
    )
}

#[test]
fn exec_with_outputs() -> Result<()> {
    let total = Parameter::output(DataType::Decimal {
        precision: 12,
        scale: 2,
    })
    .named("total")
    .shared();
    let rv = Parameter::output(DataType::Int).named("rv").shared();
    let query = Query::exec("billing.order_total")
        .returns(rv)
        .arg(42)?
        .arg(total)?
        .build();
    assert_same_text(&query, &[&sql::POSTGRES, &sql::SQLSERVER, &sql::ORACLE])
}

#[test]
fn deferred_parameter_decodes_to_null() -> Result<()> {
    let query = Query::select()
        .all()
        .from("t")
        .filter(field("a").eq(deferred(|| Value::Int(7))))?
        .build();
    let decoded = codec::decode(&codec::encode(&query))?;

    let before = render(&query, &sql::POSTGRES)?;
    let after = render(&decoded, &sql::POSTGRES)?;
    assert_eq!(after.sql, before.sql);
    assert_eq!(before.params[0].value, Value::Int(7));
    assert_eq!(after.params[0].value, Value::Null);
    Ok(())
}

#[test]
fn documents_are_stable() -> Result<()> {
    let query = Query::select()
        .field("id")
        .from("t")
        .filter(field("n").gt(Parameter::fixed(1).named("min")))?
        .build();
    let element = codec::encode(&query);
    let again = codec::encode(&codec::decode(&element)?);
    assert_eq!(again, element);

    let filter = element.child("where").map(|w| w.children.len());
    assert_eq!(filter, Some(1));
    Ok(())
}

#[test]
fn unknown_root_element() {
    let err = codec::decode(&Element::new("merge")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Serialization error at <merge>: unknown statement element"
    );
}

#[test]
fn malformed_json() {
    assert!(matches!(
        codec::from_json("{\"name\":"),
        Err(WeaveError::Json(_))
    ));
}
