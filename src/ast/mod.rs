//! Query AST: clauses, expression sets, statements and parameters.

pub mod builders;
pub mod clause;
pub mod param;
pub mod query;
pub mod set;
pub mod types;
pub mod values;

pub use self::clause::{
    AggregateFunc, Builtin, CalcOp, Clause, CompareOp, JoinKind, LogicOp, SortDirection, TableRef,
};
pub use self::param::{Direction, ParamSource, Parameter, ValueFn};
pub use self::query::{
    ColumnDef, CreateTable, CreateTableBuilder, Delete, DeleteBuilder, DropTable, DropTableBuilder,
    Exec, ExecBuilder, Insert, InsertBuilder, Query, RowLimit, Script, ScriptBuilder, Select,
    SelectBuilder, Update, UpdateBuilder,
};
pub use self::set::{ExpressionSet, SetKind};
pub use self::types::DataType;
pub use self::values::Value;
