use crate::ast::DataType;
use crate::render::{Capabilities, ParamStyle, Profile, SqlGenerator};

/// Portable SQL with no row limiting and no existence checks.
pub static ANSI: Profile = Profile {
    name: "ansi",
    quote: ('"', '"'),
    params: ParamStyle::Positional,
    caps: Capabilities {
        row_limit_count: false,
        row_limit_range: false,
        scripts: true,
        existence_check: false,
        sequences: true,
        boolean_expressions: true,
    },
    table_alias_as: true,
    dual: None,
    generator: &AnsiGenerator,
};

pub struct AnsiGenerator;

impl SqlGenerator for AnsiGenerator {
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool => "BOOLEAN".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Int => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Real => "REAL".to_string(),
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            DataType::Char(n) => format!("CHAR({})", n),
            DataType::VarChar(n) => format!("VARCHAR({})", n),
            DataType::Text => "CLOB".to_string(),
            DataType::Binary(n) => format!("BINARY({})", n),
            DataType::VarBinary(n) => format!("VARBINARY({})", n),
            DataType::Blob => "BLOB".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Guid => return None,
        };
        Some(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Query;
    use crate::error::WeaveError;
    use crate::render::{Capability, render};

    #[test]
    fn test_row_limit_is_a_capability_error() {
        let q = Query::select().all().from("t").top(5).build();
        let err = render(&q, &ANSI).unwrap_err();
        assert!(matches!(
            err,
            WeaveError::Capability {
                dialect: "ansi",
                capability: Capability::RowLimitCount,
                ..
            }
        ));
    }

    #[test]
    fn test_builtins() {
        let q = Query::select()
            .expr(last_id(None))
            .unwrap()
            .expr(next_id("order_seq"))
            .unwrap()
            .build();
        assert_eq!(
            render(&q, &ANSI).unwrap().sql,
            "SELECT IDENTITY_VAL_LOCAL(), NEXT VALUE FOR \"order_seq\""
        );
    }

    #[test]
    fn test_guid_unsupported() {
        assert!(!ANSI.supports_type(DataType::Guid));
        let q = Query::select().expr(cast(field("id"), DataType::Guid)).unwrap().build();
        assert!(matches!(
            render(&q, &ANSI),
            Err(WeaveError::Capability {
                capability: Capability::DataType(DataType::Guid),
                ..
            })
        ));
    }
}
