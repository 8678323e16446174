use crate::ast::{Builtin, DataType};
use crate::error::WeaveResult;
use crate::render::{Capabilities, Capability, ParamStyle, Profile, SqlGenerator};

pub static MYSQL: Profile = Profile {
    name: "mysql",
    quote: ('`', '`'),
    params: ParamStyle::Positional,
    caps: Capabilities {
        row_limit_count: true,
        row_limit_range: true,
        scripts: true,
        existence_check: true,
        sequences: false,
        boolean_expressions: true,
    },
    table_alias_as: true,
    dual: None,
    generator: &MysqlGenerator,
};

/// Longest VARCHAR/VARBINARY before falling back to LONGTEXT/LONGBLOB.
const MAX_INLINE: u32 = 65535;

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool => "TINYINT(1)".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Int => "INT".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Real => "FLOAT".to_string(),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            DataType::Char(n) => format!("CHAR({})", n),
            DataType::VarChar(n) if n > MAX_INLINE => "LONGTEXT".to_string(),
            DataType::VarChar(n) => format!("VARCHAR({})", n),
            DataType::Text => "LONGTEXT".to_string(),
            DataType::Binary(n) => format!("BINARY({})", n),
            DataType::VarBinary(n) if n > MAX_INLINE => "LONGBLOB".to_string(),
            DataType::VarBinary(n) => format!("VARBINARY({})", n),
            DataType::Blob => "LONGBLOB".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "DATETIME".to_string(),
            DataType::Guid => "CHAR(36)".to_string(),
        };
        Some(native)
    }

    fn builtin(&self, profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        match builtin {
            Builtin::CurrentDate => Ok("CURRENT_DATE".to_string()),
            Builtin::CurrentTimestamp => Ok("CURRENT_TIMESTAMP".to_string()),
            Builtin::LastId { .. } => Ok("LAST_INSERT_ID()".to_string()),
            Builtin::NextId { .. } => Err(profile.unsupported(Capability::Sequences, "next-id")),
        }
    }

    fn concat_tokens(&self) -> (&'static str, &'static str, &'static str) {
        ("CONCAT(", ", ", ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Query;
    use crate::error::WeaveError;
    use crate::render::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_concat_and_quoting() {
        let q = Query::select()
            .expr(concat(vec![field("first"), constant(" "), field("last")]))
            .unwrap()
            .alias("full_name")
            .unwrap()
            .from("people")
            .top(3)
            .build();
        let r = render(&q, &MYSQL).unwrap();
        assert_eq!(
            r.sql,
            "SELECT CONCAT(`first`, ?, `last`) AS `full_name` FROM `people` LIMIT 3"
        );
    }

    #[test]
    fn test_no_sequences() {
        let q = Query::select().expr(next_id("s")).unwrap().build();
        assert!(matches!(
            render(&q, &MYSQL),
            Err(WeaveError::Capability {
                capability: Capability::Sequences,
                ..
            })
        ));
    }

    #[test]
    fn test_large_varchar_becomes_longtext() {
        assert_eq!(MYSQL.native_type(DataType::VarChar(70000)).unwrap(), "LONGTEXT");
        assert_eq!(MYSQL.native_type(DataType::VarChar(255)).unwrap(), "VARCHAR(255)");
    }
}
