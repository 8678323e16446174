use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::{DataType, Parameter, Select, Value};
use crate::error::{WeaveError, WeaveResult};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    Like,
    NotLike,
}

impl CompareOp {
    pub fn sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Like => "like",
            CompareOp::NotLike => "not-like",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "gt" => Some(CompareOp::Gt),
            "gte" => Some(CompareOp::Gte),
            "lt" => Some(CompareOp::Lt),
            "lte" => Some(CompareOp::Lte),
            "like" => Some(CompareOp::Like),
            "not-like" => Some(CompareOp::NotLike),
            _ => None,
        }
    }
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn sql(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "and" => Some(LogicOp::And),
            "or" => Some(LogicOp::Or),
            _ => None,
        }
    }
}

/// Arithmetic operators for Calc nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Modulo (%)
    Mod,
}

impl CalcOp {
    pub fn sql(&self) -> &'static str {
        match self {
            CalcOp::Add => "+",
            CalcOp::Sub => "-",
            CalcOp::Mul => "*",
            CalcOp::Div => "/",
            CalcOp::Mod => "%",
        }
    }

    /// Binding strength; multiplicative operators bind tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            CalcOp::Add | CalcOp::Sub => 1,
            CalcOp::Mul | CalcOp::Div | CalcOp::Mod => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CalcOp::Add => "add",
            CalcOp::Sub => "sub",
            CalcOp::Mul => "mul",
            CalcOp::Div => "div",
            CalcOp::Mod => "mod",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(CalcOp::Add),
            "sub" => Some(CalcOp::Sub),
            "mul" => Some(CalcOp::Mul),
            "div" => Some(CalcOp::Div),
            "mod" => Some(CalcOp::Mod),
            _ => None,
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub fn sql(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count" => Some(AggregateFunc::Count),
            "sum" => Some(AggregateFunc::Sum),
            "avg" => Some(AggregateFunc::Avg),
            "min" => Some(AggregateFunc::Min),
            "max" => Some(AggregateFunc::Max),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Full => "full",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inner" => Some(JoinKind::Inner),
            "left" => Some(JoinKind::Left),
            "right" => Some(JoinKind::Right),
            "full" => Some(JoinKind::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Functions whose spelling differs per dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    CurrentDate,
    CurrentTimestamp,
    /// Last generated identity; sequence-based dialects need the sequence name
    LastId { sequence: Option<String> },
    /// Next value of a sequence
    NextId { sequence: String },
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::CurrentDate => "current-date",
            Builtin::CurrentTimestamp => "current-timestamp",
            Builtin::LastId { .. } => "last-id",
            Builtin::NextId { .. } => "next-id",
        }
    }
}

/// A table reference, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    /// `"orders"` or `"sales.orders"`.
    pub fn parse(name: &str) -> Self {
        match name.split_once('.') {
            Some((schema, table)) => Self {
                schema: Some(schema.to_string()),
                name: table.to_string(),
            },
            None => Self {
                schema: None,
                name: name.to_string(),
            },
        }
    }
}

/// One node of the query AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Column reference, optionally table-qualified
    Field { table: Option<String>, name: String },
    /// `*` or `table.*`
    AllFields { table: Option<String> },
    /// Literal bound as an anonymous parameter
    Constant(Value),
    /// Shared parameter
    Param(Arc<Parameter>),
    Compare {
        left: Box<Clause>,
        op: CompareOp,
        right: Box<Clause>,
    },
    IsNull { clause: Box<Clause>, negated: bool },
    InList {
        clause: Box<Clause>,
        items: Vec<Clause>,
        negated: bool,
    },
    Between {
        clause: Box<Clause>,
        low: Box<Clause>,
        high: Box<Clause>,
    },
    Exists(Box<Select>),
    Logic {
        left: Box<Clause>,
        op: LogicOp,
        right: Box<Clause>,
    },
    Not(Box<Clause>),
    Aggregate {
        func: AggregateFunc,
        /// None means `*`
        arg: Option<Box<Clause>>,
        distinct: bool,
    },
    Function { name: String, args: Vec<Clause> },
    Builtin(Builtin),
    Concat(Vec<Clause>),
    Cast {
        clause: Box<Clause>,
        data_type: DataType,
    },
    Calc {
        left: Box<Clause>,
        op: CalcOp,
        right: Box<Clause>,
    },
    Aliased { clause: Box<Clause>, alias: String },
    Table(TableRef),
    Join {
        kind: JoinKind,
        table: Box<Clause>,
        on: Box<Clause>,
    },
    Order {
        clause: Box<Clause>,
        direction: SortDirection,
    },
    /// `field = value` in SET lists
    Assign { field: Box<Clause>, value: Box<Clause> },
    SubQuery(Box<Select>),
}

impl Clause {
    /// Element name of this clause kind, also used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Clause::Field { .. } => "field",
            Clause::AllFields { .. } => "all-fields",
            Clause::Constant(_) => "const",
            Clause::Param(_) => "param",
            Clause::Compare { .. } => "compare",
            Clause::IsNull { .. } => "is-null",
            Clause::InList { .. } => "in-list",
            Clause::Between { .. } => "between",
            Clause::Exists(_) => "exists",
            Clause::Logic { .. } => "logic",
            Clause::Not(_) => "not",
            Clause::Aggregate { .. } => "aggregate",
            Clause::Function { .. } => "function",
            Clause::Builtin(_) => "builtin",
            Clause::Concat(_) => "concat",
            Clause::Cast { .. } => "cast",
            Clause::Calc { .. } => "calc",
            Clause::Aliased { .. } => "alias",
            Clause::Table(_) => "table",
            Clause::Join { .. } => "join",
            Clause::Order { .. } => "order",
            Clause::Assign { .. } => "assign",
            Clause::SubQuery(_) => "sub-query",
        }
    }

    /// Boolean-valued node usable in WHERE/HAVING/ON.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Clause::Compare { .. }
                | Clause::IsNull { .. }
                | Clause::InList { .. }
                | Clause::Between { .. }
                | Clause::Exists(_)
                | Clause::Logic { .. }
                | Clause::Not(_)
        )
    }

    /// Whether `AS alias` may be attached to this node.
    pub fn is_aliasable(&self) -> bool {
        matches!(
            self,
            Clause::Field { .. }
                | Clause::Constant(_)
                | Clause::Param(_)
                | Clause::Aggregate { .. }
                | Clause::Function { .. }
                | Clause::Builtin(_)
                | Clause::Concat(_)
                | Clause::Cast { .. }
                | Clause::Calc { .. }
                | Clause::Table(_)
                | Clause::SubQuery(_)
        )
    }

    /// Whether this node can be the operand of an arithmetic Calc.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Clause::Field { .. }
                | Clause::Constant(_)
                | Clause::Param(_)
                | Clause::Aggregate { .. }
                | Clause::Function { .. }
                | Clause::Builtin(_)
                | Clause::Cast { .. }
                | Clause::Calc { .. }
                | Clause::SubQuery(_)
        )
    }

    /// Scalar-valued node (may appear in a select list, value list or argument).
    pub fn is_expression(&self) -> bool {
        match self {
            Clause::Table(_) | Clause::Join { .. } | Clause::Order { .. } | Clause::Assign { .. } => {
                false
            }
            Clause::Aliased { clause, .. } => clause.is_expression(),
            _ => true,
        }
    }

    /// Table source usable in a FROM list.
    pub fn is_table_source(&self) -> bool {
        match self {
            Clause::Table(_) => true,
            Clause::Aliased { clause, .. } => {
                matches!(clause.as_ref(), Clause::Table(_) | Clause::SubQuery(_))
            }
            _ => false,
        }
    }

    /// Check operand rules through the whole tree: logic and NOT take
    /// predicates, arithmetic takes arithmetic operands, joins need a
    /// predicate condition. Nested SELECTs were checked when they were built.
    pub fn validate(&self) -> WeaveResult<()> {
        let misuse = |node: &Clause, position: &str, expected: &str| {
            WeaveError::construction(
                self.kind(),
                format!(
                    "{} of {} is a {} node, not {}",
                    position,
                    self.kind(),
                    node.kind(),
                    expected
                ),
            )
        };
        match self {
            Clause::Field { .. }
            | Clause::AllFields { .. }
            | Clause::Constant(_)
            | Clause::Param(_)
            | Clause::Builtin(_)
            | Clause::Table(_)
            | Clause::Exists(_)
            | Clause::SubQuery(_) => Ok(()),
            Clause::Compare { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Clause::IsNull { clause, .. } => clause.validate(),
            Clause::InList { clause, items, .. } => {
                clause.validate()?;
                items.iter().try_for_each(Clause::validate)
            }
            Clause::Between { clause, low, high } => {
                clause.validate()?;
                low.validate()?;
                high.validate()
            }
            Clause::Logic { left, right, .. } => {
                for side in [left, right] {
                    if !side.is_predicate() {
                        return Err(misuse(&**side, "operand", "a predicate"));
                    }
                    side.validate()?;
                }
                Ok(())
            }
            Clause::Not(inner) => {
                if !inner.is_predicate() {
                    return Err(misuse(&**inner, "operand", "a predicate"));
                }
                inner.validate()
            }
            Clause::Calc { left, right, .. } => {
                for side in [left, right] {
                    if !side.is_arithmetic() {
                        return Err(misuse(&**side, "operand", "an arithmetic operand"));
                    }
                    side.validate()?;
                }
                Ok(())
            }
            Clause::Join { table, on, .. } => {
                if !on.is_predicate() {
                    return Err(misuse(&**on, "condition", "a predicate"));
                }
                table.validate()?;
                on.validate()
            }
            Clause::Aggregate { arg, .. } => match arg {
                Some(arg) => arg.validate(),
                None => Ok(()),
            },
            Clause::Function { args, .. } | Clause::Concat(args) => {
                args.iter().try_for_each(Clause::validate)
            }
            Clause::Cast { clause, .. }
            | Clause::Aliased { clause, .. }
            | Clause::Order { clause, .. } => clause.validate(),
            Clause::Assign { field, value } => {
                field.validate()?;
                value.validate()
            }
        }
    }

    /// Attach an alias. Fails for nodes that cannot carry one.
    pub fn alias(self, alias: impl Into<String>) -> WeaveResult<Clause> {
        if !self.is_aliasable() {
            return Err(WeaveError::construction(
                self.kind(),
                format!("cannot alias a {} node as '{}'", self.kind(), alias.into()),
            ));
        }
        Ok(Clause::Aliased {
            clause: Box::new(self),
            alias: alias.into(),
        })
    }

    fn compare(self, op: CompareOp, right: impl Into<Clause>) -> Clause {
        Clause::Compare {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn eq(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Eq, right)
    }

    pub fn ne(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Ne, right)
    }

    pub fn gt(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Gt, right)
    }

    pub fn gte(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Gte, right)
    }

    pub fn lt(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Lt, right)
    }

    pub fn lte(self, right: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Lte, right)
    }

    pub fn like(self, pattern: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::Like, pattern)
    }

    pub fn not_like(self, pattern: impl Into<Clause>) -> Clause {
        self.compare(CompareOp::NotLike, pattern)
    }

    pub fn is_null(self) -> Clause {
        Clause::IsNull {
            clause: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Clause {
        Clause::IsNull {
            clause: Box::new(self),
            negated: true,
        }
    }

    pub fn in_list<I, T>(self, items: I) -> Clause
    where
        I: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        Clause::InList {
            clause: Box::new(self),
            items: items.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn not_in<I, T>(self, items: I) -> Clause
    where
        I: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        Clause::InList {
            clause: Box::new(self),
            items: items.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn between(self, low: impl Into<Clause>, high: impl Into<Clause>) -> Clause {
        Clause::Between {
            clause: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
        }
    }

    /// `self AND right`, grouped strictly in call order.
    pub fn and(self, right: Clause) -> Clause {
        Clause::Logic {
            left: Box::new(self),
            op: LogicOp::And,
            right: Box::new(right),
        }
    }

    /// `self OR right`, grouped strictly in call order.
    pub fn or(self, right: Clause) -> Clause {
        Clause::Logic {
            left: Box::new(self),
            op: LogicOp::Or,
            right: Box::new(right),
        }
    }

    fn calc(self, op: CalcOp, right: impl Into<Clause>) -> Clause {
        Clause::Calc {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn plus(self, right: impl Into<Clause>) -> Clause {
        self.calc(CalcOp::Add, right)
    }

    pub fn minus(self, right: impl Into<Clause>) -> Clause {
        self.calc(CalcOp::Sub, right)
    }

    pub fn times(self, right: impl Into<Clause>) -> Clause {
        self.calc(CalcOp::Mul, right)
    }

    pub fn divide(self, right: impl Into<Clause>) -> Clause {
        self.calc(CalcOp::Div, right)
    }

    pub fn modulo(self, right: impl Into<Clause>) -> Clause {
        self.calc(CalcOp::Mod, right)
    }

    /// Combine with `op`, checking that both sides are arithmetic operands.
    pub fn try_calc(self, op: CalcOp, right: impl Into<Clause>) -> WeaveResult<Clause> {
        let right = right.into();
        for operand in [&self, &right] {
            if !operand.is_arithmetic() {
                return Err(WeaveError::construction(
                    operand.kind(),
                    format!("a {} node cannot be an operand of '{}'", operand.kind(), op.sql()),
                ));
            }
        }
        Ok(self.calc(op, right))
    }

    pub fn asc(self) -> Clause {
        Clause::Order {
            clause: Box::new(self),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(self) -> Clause {
        Clause::Order {
            clause: Box::new(self),
            direction: SortDirection::Desc,
        }
    }

    /// `self = value` for UPDATE assignments.
    pub fn set(self, value: impl Into<Clause>) -> Clause {
        Clause::Assign {
            field: Box::new(self),
            value: Box::new(value.into()),
        }
    }

    /// Join this table source on `on`.
    pub fn join(self, kind: JoinKind, on: Clause) -> Clause {
        Clause::Join {
            kind,
            table: Box::new(self),
            on: Box::new(on),
        }
    }

    pub fn inner_join(self, on: Clause) -> Clause {
        self.join(JoinKind::Inner, on)
    }

    pub fn left_join(self, on: Clause) -> Clause {
        self.join(JoinKind::Left, on)
    }

    pub fn cast(self, data_type: DataType) -> Clause {
        Clause::Cast {
            clause: Box::new(self),
            data_type,
        }
    }
}

impl From<Value> for Clause {
    fn from(v: Value) -> Self {
        Clause::Constant(v)
    }
}

impl From<bool> for Clause {
    fn from(b: bool) -> Self {
        Clause::Constant(Value::Bool(b))
    }
}

impl From<i32> for Clause {
    fn from(n: i32) -> Self {
        Clause::Constant(Value::Int(n as i64))
    }
}

impl From<i64> for Clause {
    fn from(n: i64) -> Self {
        Clause::Constant(Value::Int(n))
    }
}

impl From<f64> for Clause {
    fn from(n: f64) -> Self {
        Clause::Constant(Value::Float(n))
    }
}

impl From<&str> for Clause {
    fn from(s: &str) -> Self {
        Clause::Constant(Value::String(s.to_string()))
    }
}

impl From<String> for Clause {
    fn from(s: String) -> Self {
        Clause::Constant(Value::String(s))
    }
}

impl From<NaiveDate> for Clause {
    fn from(d: NaiveDate) -> Self {
        Clause::Constant(Value::Date(d))
    }
}

impl From<NaiveDateTime> for Clause {
    fn from(ts: NaiveDateTime) -> Self {
        Clause::Constant(Value::Timestamp(ts))
    }
}

impl From<Select> for Clause {
    fn from(s: Select) -> Self {
        Clause::SubQuery(Box::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_logic_is_left_leaning() {
        let pred = field("a").eq(1).or(field("b").eq(2)).and(field("c").eq(3));
        match pred {
            Clause::Logic { left, op, .. } => {
                assert_eq!(op, LogicOp::And);
                assert!(matches!(*left, Clause::Logic { op: LogicOp::Or, .. }));
            }
            other => panic!("expected logic, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_rejects_predicates() {
        let err = field("a").eq(1).alias("x").unwrap_err();
        assert!(matches!(err, WeaveError::Construction { clause: "compare", .. }));
        assert!(field("a").alias("x").is_ok());
    }

    #[test]
    fn test_try_calc_rejects_predicates() {
        assert!(field("qty").try_calc(CalcOp::Mul, field("price")).is_ok());
        assert!(field("a").is_null().try_calc(CalcOp::Add, 1).is_err());
    }

    #[test]
    fn test_validate_operand_rules() {
        assert!(field("a").eq(1).and(field("b").is_null()).validate().is_ok());

        let err = field("a").and(field("b")).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Construction error in logic: operand of logic is a field node, not a predicate"
        );
        assert!(not(field("a")).validate().is_err());
        assert!(field("a").eq(1).plus(2).validate().is_err());
        // nested below a valid node
        assert!(count(field("a").times(field("b").eq(1))).validate().is_err());
        assert!(
            table("b")
                .inner_join(field("a.id"))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_table_ref_parse() {
        assert_eq!(
            TableRef::parse("sales.orders"),
            TableRef {
                schema: Some("sales".into()),
                name: "orders".into()
            }
        );
        assert_eq!(TableRef::parse("orders").schema, None);
    }
}
