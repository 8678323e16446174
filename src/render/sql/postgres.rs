use crate::ast::{Builtin, DataType};
use crate::error::WeaveResult;
use crate::render::{Capabilities, ParamStyle, Profile, SqlGenerator};

pub static POSTGRES: Profile = Profile {
    name: "postgres",
    quote: ('"', '"'),
    params: ParamStyle::Numbered('$'),
    caps: Capabilities {
        row_limit_count: true,
        row_limit_range: true,
        scripts: true,
        existence_check: true,
        sequences: true,
        boolean_expressions: true,
    },
    table_alias_as: true,
    dual: None,
    generator: &PostgresGenerator,
};

pub struct PostgresGenerator;

/// Sequence names are passed to NEXTVAL/CURRVAL as string literals.
fn regclass(sequence: &str) -> String {
    format!("'{}'", sequence.replace('\'', "''"))
}

impl SqlGenerator for PostgresGenerator {
    fn column_type(&self, dt: DataType) -> Option<String> {
        let native = match dt {
            DataType::Bool => "BOOLEAN".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Int => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Real => "REAL".to_string(),
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            DataType::Char(n) => format!("CHAR({})", n),
            DataType::VarChar(n) => format!("VARCHAR({})", n),
            DataType::Text => "TEXT".to_string(),
            DataType::Binary(_) | DataType::VarBinary(_) | DataType::Blob => "BYTEA".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Guid => "UUID".to_string(),
        };
        Some(native)
    }

    fn builtin(&self, _profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        Ok(match builtin {
            Builtin::CurrentDate => "CURRENT_DATE".to_string(),
            Builtin::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
            Builtin::LastId { sequence: None } => "LASTVAL()".to_string(),
            Builtin::LastId {
                sequence: Some(seq),
            } => format!("CURRVAL({})", regclass(seq)),
            Builtin::NextId { sequence } => format!("NEXTVAL({})", regclass(sequence)),
        })
    }
}
