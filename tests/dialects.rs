//! One statement, every dialect.

use anyhow::Result;
use pretty_assertions::assert_eq;
use sqlweave::prelude::*;

fn adults() -> Result<Query> {
    Ok(Query::select()
        .field("id")
        .field("name")
        .from("users")
        .filter(field("age").gte(18))?
        .order_by("name")
        .range(20, 10)
        .build())
}

#[test]
fn paged_select_per_dialect() -> Result<()> {
    let query = adults()?;
    let expected = [
        (
            &sql::POSTGRES,
            r#"SELECT "id", "name" FROM "users" WHERE "age" >= $1 ORDER BY "name" LIMIT 10 OFFSET 20"#,
        ),
        (
            &sql::MYSQL,
            "SELECT `id`, `name` FROM `users` WHERE `age` >= ? ORDER BY `name` LIMIT 10 OFFSET 20",
        ),
        (
            &sql::SQLITE,
            r#"SELECT "id", "name" FROM "users" WHERE "age" >= ? ORDER BY "name" LIMIT 10 OFFSET 20"#,
        ),
        (
            &sql::SQLSERVER,
            "SELECT [id], [name] FROM [users] WHERE [age] >= @p1 ORDER BY [name] OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
        (
            &sql::ORACLE,
            r#"SELECT * FROM (SELECT q_.*, ROWNUM rn_ FROM (SELECT "id", "name" FROM "users" WHERE "age" >= :p1 ORDER BY "name") q_ WHERE ROWNUM <= 30) WHERE rn_ > 20"#,
        ),
    ];
    for (profile, sql) in expected {
        let rendered = render(&query, profile)?;
        assert_eq!(rendered.sql, sql, "{}", profile.name);
        assert_eq!(rendered.bind_values(), vec![&Value::Int(18)]);
    }

    let err = render(&query, &sql::ANSI).unwrap_err();
    assert!(matches!(
        err,
        WeaveError::Capability {
            capability: Capability::RowLimitRange,
            ..
        }
    ));
    Ok(())
}

#[test]
fn capability_matrix() {
    let rows: Vec<(&str, bool, bool, bool)> = dialect::all()
        .iter()
        .map(|p| {
            (
                p.name,
                p.supports(Capability::RowLimitCount),
                p.supports(Capability::Scripts),
                p.supports(Capability::Sequences),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("ansi", false, true, true),
            ("postgres", true, true, true),
            ("mysql", true, true, false),
            ("sqlite", true, false, false),
            ("sqlserver", true, true, true),
            ("oracle", true, true, true),
        ]
    );
}

#[test]
fn capability_by_name() -> Result<()> {
    assert!(sql::POSTGRES.supports_named("existence-check")?);
    assert!(!sql::ORACLE.supports_named("existence-check")?);
    assert!(sql::SQLSERVER.supports_named("type:guid")?);
    assert!(!sql::ANSI.supports_named("type:guid")?);
    assert!(sql::ANSI.supports_named("warp-drive").is_err());
    Ok(())
}

#[test]
fn create_table_native_types() -> Result<()> {
    let query = Query::create_table("notes")
        .primary_key("id", DataType::BigInt)
        .not_null("body", DataType::VarChar(10_000))
        .column("flag", DataType::Bool)
        .build()?;

    assert_eq!(
        render(&query, &sql::SQLSERVER)?.sql,
        "CREATE TABLE [notes] ([id] BIGINT NOT NULL, [body] VARCHAR(MAX) NOT NULL, [flag] BIT, PRIMARY KEY ([id]))"
    );
    assert_eq!(
        render(&query, &sql::ORACLE)?.sql,
        r#"CREATE TABLE "notes" ("id" NUMBER(19) NOT NULL, "body" CLOB NOT NULL, "flag" NUMBER(1), PRIMARY KEY ("id"))"#
    );
    Ok(())
}

#[test]
fn script_rejected_where_unsupported() -> Result<()> {
    let query = Query::script()
        .add(Query::delete("a").build())
        .add(Query::delete("b").build())
        .build();
    let err = render(&query, &sql::SQLITE).unwrap_err();
    assert!(matches!(
        err,
        WeaveError::Capability {
            dialect: "sqlite",
            capability: Capability::Scripts,
            ..
        }
    ));
    assert_eq!(
        render(&query, &sql::POSTGRES)?.sql,
        "DELETE FROM \"a\";\nDELETE FROM \"b\";"
    );
    Ok(())
}

#[test]
fn profile_lookup_by_alias() {
    assert_eq!(dialect::by_name("PostgreSQL").map(|p| p.name), Some("postgres"));
    assert_eq!(dialect::by_name("tsql").map(|p| p.name), Some("sqlserver"));
    assert!(dialect::by_name("db2").is_none());
}
