use crate::ast::{Builtin, DataType};
use crate::error::WeaveResult;
use crate::render::{Capabilities, Capability, ParamStyle, Profile, SqlGenerator};

pub static SQLITE: Profile = Profile {
    name: "sqlite",
    quote: ('"', '"'),
    params: ParamStyle::Positional,
    caps: Capabilities {
        row_limit_count: true,
        row_limit_range: true,
        scripts: false,
        existence_check: true,
        sequences: false,
        boolean_expressions: true,
    },
    table_alias_as: true,
    dual: None,
    generator: &SqliteGenerator,
};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    // storage classes, not declared widths
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool | DataType::SmallInt | DataType::Int | DataType::BigInt => "INTEGER",
            DataType::Real | DataType::Double => "REAL",
            DataType::Decimal { .. } => "NUMERIC",
            DataType::Char(_) | DataType::VarChar(_) | DataType::Text | DataType::Guid => "TEXT",
            DataType::Binary(_) | DataType::VarBinary(_) | DataType::Blob => "BLOB",
            DataType::Date | DataType::Time | DataType::Timestamp => "TEXT",
        };
        Some(native.to_string())
    }

    fn builtin(&self, profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        match builtin {
            Builtin::CurrentDate => Ok("CURRENT_DATE".to_string()),
            Builtin::CurrentTimestamp => Ok("CURRENT_TIMESTAMP".to_string()),
            Builtin::LastId { .. } => Ok("last_insert_rowid()".to_string()),
            Builtin::NextId { .. } => Err(profile.unsupported(Capability::Sequences, "next-id")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Query;
    use crate::error::WeaveError;
    use crate::render::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripts_unsupported() {
        let q = Query::script()
            .add(Query::delete("a").build())
            .add(Query::delete("b").build())
            .build();
        assert!(matches!(
            render(&q, &SQLITE),
            Err(WeaveError::Capability {
                capability: Capability::Scripts,
                ..
            })
        ));
    }

    #[test]
    fn test_create_table_affinities() {
        let q = Query::create_table("notes")
            .primary_key("id", DataType::BigInt)
            .not_null("body", DataType::VarChar(500))
            .column("created", DataType::Timestamp)
            .if_not_exists()
            .build()
            .unwrap();
        assert_eq!(
            render(&q, &SQLITE).unwrap().sql,
            "CREATE TABLE IF NOT EXISTS \"notes\" (\"id\" INTEGER NOT NULL, \"body\" TEXT NOT NULL, \"created\" TEXT, PRIMARY KEY (\"id\"))"
        );
    }
}
