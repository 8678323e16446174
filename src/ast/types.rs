//! Declared data types for parameters, casts and column definitions.
//!
//! Types are dialect-neutral; each profile maps them to a native spelling
//! (or reports them unsupported). The canonical tag form (`varchar(255)`,
//! `decimal(10,2)`) is what documents and config files carry.

use std::str::FromStr;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, value},
    sequence::{delimited, preceded, separated_pair},
};

use crate::error::WeaveError;

/// Dialect-neutral data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Real,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char(u32),
    VarChar(u32),
    /// Unbounded character data
    Text,
    Binary(u32),
    VarBinary(u32),
    /// Unbounded binary data
    Blob,
    Date,
    Time,
    Timestamp,
    Guid,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::SmallInt => write!(f, "smallint"),
            DataType::Int => write!(f, "int"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Real => write!(f, "real"),
            DataType::Double => write!(f, "double"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            DataType::Char(n) => write!(f, "char({})", n),
            DataType::VarChar(n) => write!(f, "varchar({})", n),
            DataType::Text => write!(f, "text"),
            DataType::Binary(n) => write!(f, "binary({})", n),
            DataType::VarBinary(n) => write!(f, "varbinary({})", n),
            DataType::Blob => write!(f, "blob"),
            DataType::Date => write!(f, "date"),
            DataType::Time => write!(f, "time"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Guid => write!(f, "guid"),
        }
    }
}

impl FromStr for DataType {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(delimited(multispace0, parse_data_type, multispace0))
            .parse(s)
            .map(|(_, dt)| dt)
            .map_err(|_| WeaveError::serialization("data-type", format!("unknown data type '{}'", s)))
    }
}

/// Parse a size suffix: `(255)`
fn parse_size(input: &str) -> IResult<&str, u32> {
    delimited(
        (multispace0, char('('), multispace0),
        map_res(digit1, str::parse::<u32>),
        (multispace0, char(')')),
    )
    .parse(input)
}

/// Parse precision and scale: `(10,2)`
fn parse_precision(input: &str) -> IResult<&str, (u8, u8)> {
    delimited(
        (multispace0, char('('), multispace0),
        separated_pair(
            map_res(digit1, str::parse::<u8>),
            (multispace0, char(','), multispace0),
            map_res(digit1, str::parse::<u8>),
        ),
        (multispace0, char(')')),
    )
    .parse(input)
}

/// Parse a canonical data type tag.
pub fn parse_data_type(input: &str) -> IResult<&str, DataType> {
    alt((
        map(preceded(tag_no_case("decimal"), parse_precision), |(precision, scale)| {
            DataType::Decimal { precision, scale }
        }),
        map(preceded(tag_no_case("varchar"), parse_size), DataType::VarChar),
        map(preceded(tag_no_case("varbinary"), parse_size), DataType::VarBinary),
        map(preceded(tag_no_case("char"), parse_size), DataType::Char),
        map(preceded(tag_no_case("binary"), parse_size), DataType::Binary),
        value(DataType::SmallInt, tag_no_case("smallint")),
        value(DataType::BigInt, tag_no_case("bigint")),
        value(DataType::Int, tag_no_case("int")),
        value(DataType::Real, tag_no_case("real")),
        value(DataType::Double, tag_no_case("double")),
        value(DataType::Bool, tag_no_case("bool")),
        value(DataType::Text, tag_no_case("text")),
        value(DataType::Blob, tag_no_case("blob")),
        value(DataType::Date, tag_no_case("date")),
        // timestamp before time
        value(DataType::Timestamp, tag_no_case("timestamp")),
        value(DataType::Time, tag_no_case("time")),
        value(DataType::Guid, tag_no_case("guid")),
    ))
    .parse(input)
}
