use crate::ast::{Builtin, DataType, Direction, Exec, Query, RowLimit, Script, Select};
use crate::error::{WeaveError, WeaveResult};
use crate::render::traits::returns_rows;
use crate::render::{Capabilities, ParamStyle, Profile, Renderer, SqlGenerator};

pub static ORACLE: Profile = Profile {
    name: "oracle",
    quote: ('"', '"'),
    params: ParamStyle::Named {
        prefix: ':',
        keep_prefix: false,
    },
    caps: Capabilities {
        row_limit_count: true,
        row_limit_range: true,
        scripts: true,
        existence_check: false,
        sequences: true,
        boolean_expressions: false,
    },
    table_alias_as: false,
    dual: Some("DUAL"),
    generator: &OracleGenerator,
};

/// Longest VARCHAR2 before CLOB.
const MAX_VARCHAR: u32 = 4000;
/// Longest RAW before BLOB.
const MAX_RAW: u32 = 2000;

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool => "NUMBER(1)".to_string(),
            DataType::SmallInt => "NUMBER(5)".to_string(),
            DataType::Int => "NUMBER(10)".to_string(),
            DataType::BigInt => "NUMBER(19)".to_string(),
            DataType::Real => "BINARY_FLOAT".to_string(),
            DataType::Double => "BINARY_DOUBLE".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMBER({}, {})", precision, scale),
            DataType::Char(n) => format!("CHAR({})", n),
            DataType::VarChar(n) if n > MAX_VARCHAR => "CLOB".to_string(),
            DataType::VarChar(n) => format!("VARCHAR2({})", n),
            DataType::Text => "CLOB".to_string(),
            DataType::Binary(n) | DataType::VarBinary(n) if n > MAX_RAW => "BLOB".to_string(),
            DataType::Binary(n) | DataType::VarBinary(n) => format!("RAW({})", n),
            DataType::Blob => "BLOB".to_string(),
            DataType::Date => "DATE".to_string(),
            // no time-of-day type
            DataType::Time => return None,
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Guid => "RAW(16)".to_string(),
        };
        Some(native)
    }

    fn builtin(&self, profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        match builtin {
            Builtin::CurrentDate => Ok("TRUNC(SYSDATE)".to_string()),
            Builtin::CurrentTimestamp => Ok("SYSTIMESTAMP".to_string()),
            Builtin::LastId {
                sequence: Some(seq),
            } => Ok(format!("{}.CURRVAL", profile.quote_ident(seq))),
            Builtin::LastId { sequence: None } => Err(WeaveError::render(
                profile.name,
                "builtin",
                "last-id needs a sequence name",
            )),
            Builtin::NextId { sequence } => {
                Ok(format!("{}.NEXTVAL", profile.quote_ident(sequence)))
            }
        }
    }

    fn open_select(&self, r: &mut Renderer<'_>, select: &Select) -> WeaveResult<()> {
        if select.limit.is_some() {
            r.begin_staging()?;
        }
        Ok(())
    }

    // LIMIT has no inline spelling; the staged text is wrapped in close_select
    fn select_suffix(&self, _r: &mut Renderer<'_>, _select: &Select) -> WeaveResult<()> {
        Ok(())
    }

    fn close_select(&self, r: &mut Renderer<'_>, select: &Select) -> WeaveResult<()> {
        let Some(limit) = select.limit else {
            return Ok(());
        };
        let inner = r.end_staging()?;
        let wrapped = match limit {
            RowLimit::Count(n) => format!("SELECT * FROM ({}) WHERE ROWNUM <= {}", inner, n),
            RowLimit::Range { offset, count } => format!(
                "SELECT * FROM (SELECT q_.*, ROWNUM rn_ FROM ({}) q_ WHERE ROWNUM <= {}) WHERE rn_ > {}",
                inner,
                offset.saturating_add(count),
                offset
            ),
        };
        r.push_str(&wrapped);
        Ok(())
    }

    /// Anonymous PL/SQL block; row-returning statements go through ref cursors.
    fn script(&self, r: &mut Renderer<'_>, script: &Script) -> WeaveResult<()> {
        let cursors = script.statements.iter().filter(|q| returns_rows(q)).count();
        if cursors > 0 {
            r.push_str("DECLARE\n");
            for n in 1..=cursors {
                r.push_str(&format!("c{} SYS_REFCURSOR;\n", n));
            }
        }
        r.push_str("BEGIN\n");
        let mut cursor = 0;
        for statement in &script.statements {
            if returns_rows(statement) {
                cursor += 1;
                r.push_str(&format!("OPEN c{} FOR ", cursor));
                r.statement(statement)?;
                r.push_str(&format!(";\nDBMS_SQL.RETURN_RESULT(c{});\n", cursor));
            } else if matches!(statement, Query::CreateTable(_) | Query::DropTable(_)) {
                // DDL is not a PL/SQL statement
                let mut ddl = Renderer::new(r.profile());
                ddl.statement(statement)?;
                let text = ddl.finish().sql.replace('\'', "''");
                r.push_str(&format!("EXECUTE IMMEDIATE '{}';\n", text));
            } else {
                r.statement(statement)?;
                r.push_str(";\n");
            }
        }
        r.push_str("END;");
        Ok(())
    }

    /// `BEGIN :rv := "proc"(:p1); END;`, unwrapped inside a block.
    fn exec(&self, r: &mut Renderer<'_>, exec: &Exec) -> WeaveResult<()> {
        let standalone = r.script_depth() == 0;
        if standalone {
            r.push_str("BEGIN ");
        }
        if let Some(ret) = &exec.returns {
            let idx = r.register(ret, Direction::Return)?;
            r.placeholder(idx);
            r.push_str(" := ");
        }
        r.routine(&exec.routine);
        r.push_str("(");
        r.list(&exec.args, ", ")?;
        r.push_str(")");
        if standalone {
            r.push_str("; END;");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Parameter;
    use crate::render::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ddl_in_block_is_dynamic() {
        let create = Query::create_table("t")
            .column("a", DataType::Int)
            .build()
            .unwrap();
        let q = Query::script()
            .add(create)
            .add(Query::drop_table("u").build())
            .add(Query::delete("v").build())
            .build();
        assert_eq!(
            render(&q, &ORACLE).unwrap().sql,
            "BEGIN\n\
             EXECUTE IMMEDIATE 'CREATE TABLE \"t\" (\"a\" NUMBER(10))';\n\
             EXECUTE IMMEDIATE 'DROP TABLE \"u\"';\n\
             DELETE FROM \"v\";\n\
             END;"
        );
    }

    #[test]
    fn test_rownum_count_wrap() {
        let q = Query::select()
            .field("id")
            .from("orders")
            .order_by("id")
            .top(5)
            .build();
        assert_eq!(
            render(&q, &ORACLE).unwrap().sql,
            "SELECT * FROM (SELECT \"id\" FROM \"orders\" ORDER BY \"id\") WHERE ROWNUM <= 5"
        );
    }

    #[test]
    fn test_rownum_range_wrap() {
        let q = Query::select().field("id").from("orders").range(10, 5).build();
        assert_eq!(
            render(&q, &ORACLE).unwrap().sql,
            "SELECT * FROM (SELECT q_.*, ROWNUM rn_ FROM (SELECT \"id\" FROM \"orders\") q_ WHERE ROWNUM <= 15) WHERE rn_ > 10"
        );
    }

    #[test]
    fn test_nested_wrap_keeps_outer_text() {
        let inner = Query::select().field("id").from("b").top(1).into_select();
        let q = Query::select()
            .field("a.x")
            .from("a")
            .filter(field("a.id").eq(sub_query(inner)))
            .unwrap()
            .build();
        let r = render(&q, &ORACLE).unwrap();
        assert_eq!(
            r.sql,
            "SELECT \"a\".\"x\" FROM \"a\" WHERE \"a\".\"id\" = (SELECT * FROM (SELECT \"id\" FROM \"b\") WHERE ROWNUM <= 1)"
        );
    }

    #[test]
    fn test_params_inside_staged_select() {
        let q = Query::select()
            .all()
            .from("t")
            .filter(field("a").eq(1))
            .unwrap()
            .top(3)
            .build();
        let r = render(&q, &ORACLE).unwrap();
        assert_eq!(
            r.sql,
            "SELECT * FROM (SELECT * FROM \"t\" WHERE \"a\" = :p1) WHERE ROWNUM <= 3"
        );
        assert_eq!(r.params[0].name, "p1");
    }

    #[test]
    fn test_dual_and_table_alias() {
        let q = Query::select().expr(current_date()).unwrap().build();
        assert_eq!(render(&q, &ORACLE).unwrap().sql, "SELECT TRUNC(SYSDATE) FROM DUAL");

        let q = Query::select()
            .all()
            .from("orders")
            .alias("o")
            .unwrap()
            .build();
        assert_eq!(render(&q, &ORACLE).unwrap().sql, "SELECT * FROM \"orders\" \"o\"");
    }

    #[test]
    fn test_exec_block() {
        let rv = Parameter::output(DataType::Int).named("rv").shared();
        let q = Query::exec("pkg.run").returns(rv).arg(1).unwrap().build();
        let r = render(&q, &ORACLE).unwrap();
        assert_eq!(r.sql, "BEGIN :rv := \"pkg\".\"run\"(:p1); END;");
        assert_eq!(r.params[0].name, "rv");
    }

    #[test]
    fn test_time_unsupported() {
        assert!(!ORACLE.supports_type(DataType::Time));
        assert_eq!(ORACLE.native_type(DataType::VarChar(5000)).unwrap(), "CLOB");
    }
}
