use crate::ast::{Builtin, DataType, Direction, Exec, RowLimit, Select};
use crate::error::WeaveResult;
use crate::render::traits::is_output_arg;
use crate::render::{Capabilities, ParamStyle, Profile, Renderer, SqlGenerator};

pub static SQLSERVER: Profile = Profile {
    name: "sqlserver",
    quote: ('[', ']'),
    params: ParamStyle::Named {
        prefix: '@',
        keep_prefix: true,
    },
    caps: Capabilities {
        row_limit_count: true,
        row_limit_range: true,
        scripts: true,
        existence_check: false,
        sequences: true,
        boolean_expressions: false,
    },
    table_alias_as: true,
    dual: None,
    generator: &SqlServerGenerator,
};

/// Longest inline VARCHAR/VARBINARY before `(MAX)`.
const MAX_INLINE: u32 = 8000;

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool => "BIT".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Int => "INT".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Real => "REAL".to_string(),
            DataType::Double => "FLOAT".to_string(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            DataType::Char(n) => format!("CHAR({})", n),
            DataType::VarChar(n) if n > MAX_INLINE => "VARCHAR(MAX)".to_string(),
            DataType::VarChar(n) => format!("VARCHAR({})", n),
            DataType::Text => "VARCHAR(MAX)".to_string(),
            DataType::Binary(n) => format!("BINARY({})", n),
            DataType::VarBinary(n) if n > MAX_INLINE => "VARBINARY(MAX)".to_string(),
            DataType::VarBinary(n) => format!("VARBINARY({})", n),
            DataType::Blob => "VARBINARY(MAX)".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "DATETIME2".to_string(),
            DataType::Guid => "UNIQUEIDENTIFIER".to_string(),
        };
        Some(native)
    }

    fn builtin(&self, profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        Ok(match builtin {
            Builtin::CurrentDate => "CAST(GETDATE() AS DATE)".to_string(),
            Builtin::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
            Builtin::LastId { .. } => "SCOPE_IDENTITY()".to_string(),
            Builtin::NextId { sequence } => {
                format!("NEXT VALUE FOR {}", profile.quote_ident(sequence))
            }
        })
    }

    fn concat_tokens(&self) -> (&'static str, &'static str, &'static str) {
        ("", " + ", "")
    }

    fn select_prefix(&self, r: &mut Renderer<'_>, select: &Select) -> WeaveResult<()> {
        if let Some(RowLimit::Count(n)) = select.limit {
            r.push_str(&format!("TOP {} ", n));
        }
        Ok(())
    }

    fn select_suffix(&self, r: &mut Renderer<'_>, select: &Select) -> WeaveResult<()> {
        if let Some(RowLimit::Range { offset, count }) = select.limit {
            // OFFSET requires an ORDER BY
            if select.order_by.is_empty() {
                r.push_str(" ORDER BY (SELECT NULL)");
            }
            r.push_str(&format!(
                " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                offset, count
            ));
        }
        Ok(())
    }

    /// `EXEC @rv = [proc] @p1, @p2 OUTPUT`
    fn exec(&self, r: &mut Renderer<'_>, exec: &Exec) -> WeaveResult<()> {
        r.push_str("EXEC ");
        if let Some(ret) = &exec.returns {
            let idx = r.register(ret, Direction::Return)?;
            r.placeholder(idx);
            r.push_str(" = ");
        }
        r.routine(&exec.routine);
        for (i, arg) in exec.args.iter().enumerate() {
            r.push_str(if i == 0 { " " } else { ", " });
            r.clause(arg)?;
            if is_output_arg(arg) {
                r.push_str(" OUTPUT");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::{Parameter, Query};
    use crate::render::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top() {
        let q = Query::select()
            .field("id")
            .from("orders")
            .order_by_desc("placed")
            .top(10)
            .build();
        assert_eq!(
            render(&q, &SQLSERVER).unwrap().sql,
            "SELECT TOP 10 [id] FROM [orders] ORDER BY [placed] DESC"
        );
    }

    #[test]
    fn test_range_without_order_by() {
        let q = Query::select().field("id").from("orders").range(40, 20).build();
        assert_eq!(
            render(&q, &SQLSERVER).unwrap().sql,
            "SELECT [id] FROM [orders] ORDER BY (SELECT NULL) OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY"
        );
    }

    #[test]
    fn test_exec_output_params() {
        let total = Parameter::output(DataType::Decimal {
            precision: 12,
            scale: 2,
        })
        .named("total")
        .shared();
        let rv = Parameter::output(DataType::Int).named("rv").shared();
        let q = Query::exec("dbo.order_total")
            .returns(rv)
            .arg(7)
            .unwrap()
            .arg(total)
            .unwrap()
            .build();

        let r = render(&q, &SQLSERVER).unwrap();
        assert_eq!(r.sql, "EXEC @rv = [dbo].[order_total] @p1, @total OUTPUT");
        let names: Vec<_> = r.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["@rv", "@p1", "@total"]);
        assert_eq!(r.params[0].direction, Direction::Return);
        assert_eq!(r.params[2].direction, Direction::Out);
    }

    #[test]
    fn test_concat_plus() {
        let q = Query::select()
            .expr(concat(vec![field("a"), field("b")]))
            .unwrap()
            .from("t")
            .build();
        assert_eq!(render(&q, &SQLSERVER).unwrap().sql, "SELECT [a] + [b] FROM [t]");
    }
}
