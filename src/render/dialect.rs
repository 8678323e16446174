//! Dialect profiles: immutable, process-wide capability descriptors.
//!
//! A [`Profile`] pairs plain data (quoting, parameter style, capability flags)
//! with a [`SqlGenerator`] holding the dialect's rendering overrides.

use std::fmt;
use std::str::FromStr;

use crate::ast::DataType;
use crate::error::{WeaveError, WeaveResult};
use crate::render::sql::{ANSI, MYSQL, ORACLE, POSTGRES, SQLITE, SQLSERVER};
use crate::render::traits::SqlGenerator;

/// A construct a dialect may or may not be able to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// First-n row limiting
    RowLimitCount,
    /// Offset + count row limiting
    RowLimitRange,
    /// Multi-statement scripts
    Scripts,
    /// IF EXISTS / IF NOT EXISTS on schema operations
    ExistenceCheck,
    Sequences,
    /// Predicates usable as select-list values
    BooleanExpressions,
    DataType(DataType),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::RowLimitCount => write!(f, "row-limit-count"),
            Capability::RowLimitRange => write!(f, "row-limit-range"),
            Capability::Scripts => write!(f, "scripts"),
            Capability::ExistenceCheck => write!(f, "existence-check"),
            Capability::Sequences => write!(f, "sequences"),
            Capability::BooleanExpressions => write!(f, "boolean-expressions"),
            Capability::DataType(dt) => write!(f, "type:{}", dt),
        }
    }
}

impl FromStr for Capability {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row-limit-count" => Ok(Capability::RowLimitCount),
            "row-limit-range" => Ok(Capability::RowLimitRange),
            "scripts" => Ok(Capability::Scripts),
            "existence-check" => Ok(Capability::ExistenceCheck),
            "sequences" => Ok(Capability::Sequences),
            "boolean-expressions" => Ok(Capability::BooleanExpressions),
            other => match other.strip_prefix("type:") {
                Some(tag) => tag.parse().map(Capability::DataType),
                None => Err(WeaveError::Config(format!("unknown capability '{}'", other))),
            },
        }
    }
}

/// Capability flags of one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub row_limit_count: bool,
    pub row_limit_range: bool,
    pub scripts: bool,
    pub existence_check: bool,
    pub sequences: bool,
    pub boolean_expressions: bool,
}

/// How parameters appear in statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `?`
    Positional,
    /// `$1`, `$2`, ... numbered by first registration
    Numbered(char),
    /// `@name` / `:name`; `keep_prefix` controls whether the bound
    /// descriptor's name carries the prefix too
    Named { prefix: char, keep_prefix: bool },
}

/// A dialect profile.
pub struct Profile {
    pub name: &'static str,
    /// Opening and closing identifier delimiters
    pub quote: (char, char),
    pub params: ParamStyle,
    pub caps: Capabilities,
    /// Whether table aliases are introduced with `AS`
    pub table_alias_as: bool,
    /// Dummy table for table-less SELECT
    pub dual: Option<&'static str>,
    pub generator: &'static dyn SqlGenerator,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("quote", &self.quote)
            .field("params", &self.params)
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Profile {
    /// Whether this dialect can express `cap`.
    pub fn supports(&self, cap: Capability) -> bool {
        match cap {
            Capability::RowLimitCount => self.caps.row_limit_count,
            Capability::RowLimitRange => self.caps.row_limit_range,
            Capability::Scripts => self.caps.scripts,
            Capability::ExistenceCheck => self.caps.existence_check,
            Capability::Sequences => self.caps.sequences,
            Capability::BooleanExpressions => self.caps.boolean_expressions,
            Capability::DataType(dt) => self.supports_type(dt),
        }
    }

    /// Capability lookup by name (`"row-limit-range"`, `"type:guid"`).
    pub fn supports_named(&self, name: &str) -> WeaveResult<bool> {
        Ok(self.supports(name.parse()?))
    }

    pub fn supports_type(&self, dt: DataType) -> bool {
        self.generator.column_type(dt).is_some()
    }

    /// Native spelling of a data type.
    pub fn native_type(&self, dt: DataType) -> WeaveResult<String> {
        self.generator
            .column_type(dt)
            .ok_or_else(|| self.unsupported(Capability::DataType(dt), "column type"))
    }

    /// Fail with a capability error unless `cap` is supported.
    pub fn require(&self, cap: Capability, context: impl Into<String>) -> WeaveResult<()> {
        if self.supports(cap) {
            Ok(())
        } else {
            Err(self.unsupported(cap, context))
        }
    }

    pub(crate) fn unsupported(&self, cap: Capability, context: impl Into<String>) -> WeaveError {
        let err = WeaveError::capability(self.name, cap, context);
        tracing::debug!(dialect = self.name, %cap, "{}", err);
        err
    }

    /// Quote an identifier, doubling any embedded closing delimiter.
    pub fn quote_ident(&self, name: &str) -> String {
        let (open, close) = self.quote;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(open);
        for c in name.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
        out
    }

    /// Placeholder text for the parameter at `index` named `name`.
    pub fn placeholder(&self, index: usize, name: &str) -> String {
        match self.params {
            ParamStyle::Positional => "?".to_string(),
            ParamStyle::Numbered(prefix) => format!("{}{}", prefix, index + 1),
            ParamStyle::Named { prefix, .. } => {
                if name.starts_with(prefix) {
                    name.to_string()
                } else {
                    format!("{}{}", prefix, name)
                }
            }
        }
    }

    /// Identity of a parameter name on this profile: the native prefix is
    /// dropped so `@x` and `x` name the same parameter.
    pub fn canonical_name<'n>(&self, name: &'n str) -> &'n str {
        match self.params {
            ParamStyle::Named { prefix, .. } => name.strip_prefix(prefix).unwrap_or(name),
            _ => name,
        }
    }

    /// Name recorded in the bound parameter descriptor.
    pub fn descriptor_name(&self, name: &str) -> String {
        match self.params {
            ParamStyle::Named {
                prefix,
                keep_prefix: true,
            } if !name.starts_with(prefix) => format!("{}{}", prefix, name),
            ParamStyle::Named {
                prefix,
                keep_prefix: false,
            } => name.trim_start_matches(prefix).to_string(),
            _ => name.to_string(),
        }
    }
}

/// Every built-in profile.
pub fn all() -> [&'static Profile; 6] {
    [&ANSI, &POSTGRES, &MYSQL, &SQLITE, &SQLSERVER, &ORACLE]
}

/// Look up a built-in profile by name or common alias.
pub fn by_name(name: &str) -> Option<&'static Profile> {
    match name.to_ascii_lowercase().as_str() {
        "ansi" | "sql" => Some(&ANSI),
        "postgres" | "postgresql" | "pg" => Some(&POSTGRES),
        "mysql" | "mariadb" => Some(&MYSQL),
        "sqlite" | "sqlite3" => Some(&SQLITE),
        "sqlserver" | "mssql" | "tsql" => Some(&SQLSERVER),
        "oracle" => Some(&ORACLE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        for cap in [
            Capability::RowLimitCount,
            Capability::RowLimitRange,
            Capability::Scripts,
            Capability::ExistenceCheck,
            Capability::Sequences,
            Capability::BooleanExpressions,
            Capability::DataType(DataType::VarChar(20)),
        ] {
            assert_eq!(cap.to_string().parse::<Capability>().unwrap(), cap);
        }
        assert!("paging".parse::<Capability>().is_err());
    }

    #[test]
    fn test_by_name_aliases() {
        assert_eq!(by_name("pg").map(|p| p.name), Some("postgres"));
        assert_eq!(by_name("MSSQL").map(|p| p.name), Some("sqlserver"));
        assert!(by_name("db2").is_none());
        assert_eq!(all().len(), 6);
    }

    #[test]
    fn test_quote_ident_doubles_closing_delimiter() {
        assert_eq!(SQLSERVER.quote_ident("a]b"), "[a]]b]");
        assert_eq!(ANSI.quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(MYSQL.quote_ident("t"), "`t`");
    }

    #[test]
    fn test_named_descriptors() {
        assert_eq!(SQLSERVER.placeholder(0, "p1"), "@p1");
        assert_eq!(SQLSERVER.descriptor_name("p1"), "@p1");
        assert_eq!(ORACLE.placeholder(0, "p1"), ":p1");
        assert_eq!(ORACLE.descriptor_name("p1"), "p1");
        assert_eq!(POSTGRES.placeholder(2, "p3"), "$3");
    }

    #[test]
    fn test_capability_lookup_by_name() {
        assert!(!ANSI.supports_named("row-limit-count").unwrap());
        assert!(POSTGRES.supports_named("row-limit-range").unwrap());
        assert!(!SQLITE.supports_named("scripts").unwrap());
        assert!(!ORACLE.supports_named("type:time").unwrap());
        assert!(POSTGRES.supports_named("type:guid").unwrap());
        assert!(ANSI.supports_named("bogus").is_err());
    }
}
