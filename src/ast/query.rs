//! Top-level statements and their fluent builders.
//!
//! Builders carry the construction cursor: the last section touched is the
//! one `alias`, `and`, `or` and the arithmetic modifiers act on. `build()`
//! finalizes every section and hands back an immutable [`Query`].

use std::sync::Arc;

use crate::ast::builders::{field, table};
use crate::ast::{
    AggregateFunc, CalcOp, Clause, DataType, ExpressionSet, JoinKind, Parameter, SetKind, TableRef,
};
use crate::error::{WeaveError, WeaveResult};
use crate::render::Capability;

/// Requested row limit on a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    /// First `n` rows
    Count(u64),
    /// `count` rows after skipping `offset`
    Range { offset: u64, count: u64 },
}

impl RowLimit {
    /// Capability a dialect needs to express this limit.
    pub fn capability(&self) -> Capability {
        match self {
            RowLimit::Count(_) => Capability::RowLimitCount,
            RowLimit::Range { .. } => Capability::RowLimitRange,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,
    pub limit: Option<RowLimit>,
    pub fields: ExpressionSet,
    pub from: ExpressionSet,
    pub filter: ExpressionSet,
    pub group_by: ExpressionSet,
    pub having: ExpressionSet,
    pub order_by: ExpressionSet,
}

impl Default for Select {
    fn default() -> Self {
        Self {
            distinct: false,
            limit: None,
            fields: ExpressionSet::new(SetKind::Select),
            from: ExpressionSet::new(SetKind::From),
            filter: ExpressionSet::new(SetKind::Where),
            group_by: ExpressionSet::new(SetKind::GroupBy),
            having: ExpressionSet::new(SetKind::Having),
            order_by: ExpressionSet::new(SetKind::OrderBy),
        }
    }
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    fn finalize(&mut self) {
        for set in [
            &mut self.fields,
            &mut self.from,
            &mut self.filter,
            &mut self.group_by,
            &mut self.having,
            &mut self.order_by,
        ] {
            set.finalize();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: ExpressionSet,
    pub values: ExpressionSet,
    /// INSERT ... SELECT source; replaces `values`
    pub source: Option<Box<Select>>,
}

impl Insert {
    /// Statement-level rules that no single section can check.
    pub fn validate(&self) -> WeaveResult<()> {
        if self.source.is_some() {
            if !self.values.is_empty() {
                return Err(WeaveError::construction(
                    "insert",
                    "an insert takes either values or a select source, not both",
                ));
            }
            return Ok(());
        }
        if self.values.is_empty() {
            return Err(WeaveError::construction("insert", "no values"));
        }
        if self.columns.len() != self.values.len() {
            return Err(WeaveError::construction(
                "insert",
                format!(
                    "{} columns but {} values",
                    self.columns.len(),
                    self.values.len()
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableRef,
    pub assignments: ExpressionSet,
    pub filter: ExpressionSet,
}

impl Update {
    pub fn validate(&self) -> WeaveResult<()> {
        if self.assignments.is_empty() {
            return Err(WeaveError::construction("update", "no assignments"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableRef,
    pub filter: ExpressionSet,
}

/// Stored routine call.
#[derive(Debug, Clone, PartialEq)]
pub struct Exec {
    pub routine: String,
    pub args: Vec<Clause>,
    /// Receives the routine's return value
    pub returns: Option<Arc<Parameter>>,
}

/// Ordered batch of statements executed as one unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub statements: Vec<Query>,
}

impl Script {
    /// Append a statement; nested scripts are flattened.
    pub fn push(&mut self, query: Query) {
        match query {
            Query::Script(inner) => self.statements.extend(inner.statements),
            other => self.statements.push(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: TableRef,
    pub columns: Vec<ColumnDef>,
    pub if_not_exists: bool,
}

impl CreateTable {
    pub fn validate(&self) -> WeaveResult<()> {
        if self.columns.is_empty() {
            return Err(WeaveError::construction("create-table", "no columns"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub table: TableRef,
    pub if_exists: bool,
}

/// One complete statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Exec(Exec),
    Script(Script),
    CreateTable(CreateTable),
    DropTable(DropTable),
}

impl Query {
    pub fn select() -> SelectBuilder {
        SelectBuilder::new()
    }

    pub fn insert(table: &str) -> InsertBuilder {
        InsertBuilder {
            insert: Insert {
                table: TableRef::parse(table),
                columns: ExpressionSet::new(SetKind::Columns),
                values: ExpressionSet::new(SetKind::Values),
                source: None,
            },
        }
    }

    pub fn update(table: &str) -> UpdateBuilder {
        UpdateBuilder {
            update: Update {
                table: TableRef::parse(table),
                assignments: ExpressionSet::new(SetKind::Assignments),
                filter: ExpressionSet::new(SetKind::Where),
            },
            current: SetKind::Assignments,
        }
    }

    pub fn delete(table: &str) -> DeleteBuilder {
        DeleteBuilder {
            delete: Delete {
                table: TableRef::parse(table),
                filter: ExpressionSet::new(SetKind::Where),
            },
        }
    }

    pub fn exec(routine: &str) -> ExecBuilder {
        ExecBuilder {
            exec: Exec {
                routine: routine.to_string(),
                args: Vec::new(),
                returns: None,
            },
        }
    }

    pub fn script() -> ScriptBuilder {
        ScriptBuilder {
            script: Script::default(),
        }
    }

    pub fn create_table(table: &str) -> CreateTableBuilder {
        CreateTableBuilder {
            create: CreateTable {
                table: TableRef::parse(table),
                columns: Vec::new(),
                if_not_exists: false,
            },
        }
    }

    pub fn drop_table(table: &str) -> DropTableBuilder {
        DropTableBuilder {
            drop: DropTable {
                table: TableRef::parse(table),
                if_exists: false,
            },
        }
    }

    /// Root element name of this statement kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Select(_) => "select",
            Query::Insert(_) => "insert",
            Query::Update(_) => "update",
            Query::Delete(_) => "delete",
            Query::Exec(_) => "exec",
            Query::Script(_) => "script",
            Query::CreateTable(_) => "create-table",
            Query::DropTable(_) => "drop-table",
        }
    }

    /// Append a join to a SELECT's FROM section.
    pub fn add_join(&mut self, kind: JoinKind, target: Clause, on: Clause) -> WeaveResult<()> {
        match self {
            Query::Select(select) => select.from.push(target.join(kind, on)),
            other => Err(WeaveError::construction(
                "join",
                format!("joins can only be added to a select, not {}", other.kind()),
            )),
        }
    }
}

impl From<Select> for Query {
    fn from(s: Select) -> Self {
        Query::Select(s)
    }
}

/// Fluent SELECT construction.
///
/// # Example
/// ```ignore
/// let q = Query::select()
///     .field("CustomerID")
///     .count(field("OrderID"))?
///     .from("Orders")
///     .filter(field("OrderDate").gt(date))?
///     .group_by("CustomerID")
///     .order_by("CustomerID")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    select: Select,
    current: SetKind,
}

impl Default for SelectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self {
            select: Select::new(),
            current: SetKind::Select,
        }
    }

    fn current_set(&mut self) -> &mut ExpressionSet {
        match self.current {
            SetKind::From => &mut self.select.from,
            SetKind::Where => &mut self.select.filter,
            SetKind::GroupBy => &mut self.select.group_by,
            SetKind::Having => &mut self.select.having,
            SetKind::OrderBy => &mut self.select.order_by,
            _ => &mut self.select.fields,
        }
    }

    fn add(mut self, kind: SetKind, clause: Clause) -> WeaveResult<Self> {
        self.current = kind;
        self.current_set().push(clause)?;
        Ok(self)
    }

    fn add_valid(mut self, kind: SetKind, clause: Clause) -> Self {
        self.current = kind;
        self.current_set().push_valid(clause);
        self
    }

    /// Select a column; `"t.c"` is table-qualified.
    pub fn field(self, name: &str) -> Self {
        self.add_valid(SetKind::Select, field(name))
    }

    pub fn fields(mut self, names: &[&str]) -> Self {
        for name in names {
            self = self.field(name);
        }
        self
    }

    /// `*`
    pub fn all(self) -> Self {
        self.add_valid(SetKind::Select, Clause::AllFields { table: None })
    }

    /// Add any expression to the select list.
    pub fn expr(self, clause: impl Into<Clause>) -> WeaveResult<Self> {
        self.add(SetKind::Select, clause.into())
    }

    fn aggregate(self, func: AggregateFunc, arg: Option<Clause>) -> WeaveResult<Self> {
        let aggregate = Clause::Aggregate {
            func,
            arg: arg.map(Box::new),
            distinct: false,
        };
        self.add(SetKind::Select, aggregate)
    }

    pub fn count(self, arg: Clause) -> WeaveResult<Self> {
        self.aggregate(AggregateFunc::Count, Some(arg))
    }

    /// `COUNT(*)`
    pub fn count_all(self) -> Self {
        self.add_valid(
            SetKind::Select,
            Clause::Aggregate {
                func: AggregateFunc::Count,
                arg: None,
                distinct: false,
            },
        )
    }

    pub fn sum(self, arg: Clause) -> WeaveResult<Self> {
        self.aggregate(AggregateFunc::Sum, Some(arg))
    }

    pub fn avg(self, arg: Clause) -> WeaveResult<Self> {
        self.aggregate(AggregateFunc::Avg, Some(arg))
    }

    pub fn min(self, arg: Clause) -> WeaveResult<Self> {
        self.aggregate(AggregateFunc::Min, Some(arg))
    }

    pub fn max(self, arg: Clause) -> WeaveResult<Self> {
        self.aggregate(AggregateFunc::Max, Some(arg))
    }

    pub fn from(self, name: &str) -> Self {
        self.add_valid(SetKind::From, table(name))
    }

    /// Add a table source (aliased table or sub-query).
    pub fn from_clause(self, source: Clause) -> WeaveResult<Self> {
        self.add(SetKind::From, source)
    }

    pub fn join(self, kind: JoinKind, name: &str, on: Clause) -> WeaveResult<Self> {
        self.add(SetKind::From, table(name).join(kind, on))
    }

    pub fn inner_join(self, name: &str, on: Clause) -> WeaveResult<Self> {
        self.join(JoinKind::Inner, name, on)
    }

    pub fn left_join(self, name: &str, on: Clause) -> WeaveResult<Self> {
        self.join(JoinKind::Left, name, on)
    }

    /// WHERE predicate; repeated calls are ANDed.
    pub fn filter(self, pred: Clause) -> WeaveResult<Self> {
        self.add(SetKind::Where, pred)
    }

    /// AND onto the current section (WHERE or HAVING).
    pub fn and(mut self, pred: Clause) -> WeaveResult<Self> {
        self.current_set().and(pred)?;
        Ok(self)
    }

    /// OR onto the current section (WHERE or HAVING).
    pub fn or(mut self, pred: Clause) -> WeaveResult<Self> {
        self.current_set().or(pred)?;
        Ok(self)
    }

    pub fn group_by(self, name: &str) -> Self {
        self.add_valid(SetKind::GroupBy, field(name))
    }

    pub fn group_by_expr(self, clause: Clause) -> WeaveResult<Self> {
        self.add(SetKind::GroupBy, clause)
    }

    pub fn having(self, pred: Clause) -> WeaveResult<Self> {
        self.add(SetKind::Having, pred)
    }

    pub fn order_by(self, name: &str) -> Self {
        self.add_valid(SetKind::OrderBy, field(name).asc())
    }

    pub fn order_by_desc(self, name: &str) -> Self {
        self.add_valid(SetKind::OrderBy, field(name).desc())
    }

    pub fn order_by_expr(self, clause: Clause) -> WeaveResult<Self> {
        self.add(SetKind::OrderBy, clause)
    }

    pub fn distinct(mut self) -> Self {
        self.select.distinct = true;
        self
    }

    /// Limit to the first `n` rows.
    pub fn top(mut self, n: u64) -> Self {
        self.select.limit = Some(RowLimit::Count(n));
        self
    }

    /// Skip `offset` rows, then take `count`.
    pub fn range(mut self, offset: u64, count: u64) -> Self {
        self.select.limit = Some(RowLimit::Range { offset, count });
        self
    }

    /// Alias the most recently added item.
    pub fn alias(mut self, alias: &str) -> WeaveResult<Self> {
        self.current_set().alias(alias)?;
        Ok(self)
    }

    fn calc(mut self, op: CalcOp, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.current_set().calc(op, operand.into())?;
        Ok(self)
    }

    pub fn plus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Add, operand)
    }

    pub fn minus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Sub, operand)
    }

    pub fn times(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Mul, operand)
    }

    pub fn divide(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Div, operand)
    }

    pub fn modulo(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Mod, operand)
    }

    /// Finish as a bare [`Select`] (for sub-queries and EXISTS).
    pub fn into_select(mut self) -> Select {
        self.select.finalize();
        self.select
    }

    pub fn build(self) -> Query {
        Query::Select(self.into_select())
    }
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    insert: Insert,
}

impl InsertBuilder {
    /// Add a column with its value.
    pub fn value(mut self, column: &str, value: impl Into<Clause>) -> WeaveResult<Self> {
        self.insert.values.push(value.into())?;
        self.insert.columns.push_valid(field(column));
        Ok(self)
    }

    /// Add a target column without a value (INSERT ... SELECT).
    pub fn column(mut self, column: &str) -> Self {
        self.insert.columns.push_valid(field(column));
        self
    }

    /// Insert the rows produced by `source`.
    pub fn from_select(mut self, source: Select) -> Self {
        self.insert.source = Some(Box::new(source));
        self
    }

    fn calc(mut self, op: CalcOp, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.insert.values.calc(op, operand.into())?;
        Ok(self)
    }

    pub fn plus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Add, operand)
    }

    pub fn minus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Sub, operand)
    }

    pub fn times(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Mul, operand)
    }

    pub fn divide(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Div, operand)
    }

    pub fn build(mut self) -> WeaveResult<Query> {
        self.insert.validate()?;
        self.insert.columns.finalize();
        self.insert.values.finalize();
        Ok(Query::Insert(self.insert))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    update: Update,
    current: SetKind,
}

impl UpdateBuilder {
    fn current_set(&mut self) -> &mut ExpressionSet {
        match self.current {
            SetKind::Where => &mut self.update.filter,
            _ => &mut self.update.assignments,
        }
    }

    /// `column = value`
    pub fn set(mut self, column: &str, value: impl Into<Clause>) -> WeaveResult<Self> {
        self.current = SetKind::Assignments;
        self.update.assignments.push(field(column).set(value))?;
        Ok(self)
    }

    pub fn filter(mut self, pred: Clause) -> WeaveResult<Self> {
        self.current = SetKind::Where;
        self.update.filter.push(pred)?;
        Ok(self)
    }

    pub fn and(mut self, pred: Clause) -> WeaveResult<Self> {
        self.current_set().and(pred)?;
        Ok(self)
    }

    pub fn or(mut self, pred: Clause) -> WeaveResult<Self> {
        self.current_set().or(pred)?;
        Ok(self)
    }

    fn calc(mut self, op: CalcOp, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.current_set().calc(op, operand.into())?;
        Ok(self)
    }

    pub fn plus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Add, operand)
    }

    pub fn minus(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Sub, operand)
    }

    pub fn times(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Mul, operand)
    }

    pub fn divide(self, operand: impl Into<Clause>) -> WeaveResult<Self> {
        self.calc(CalcOp::Div, operand)
    }

    pub fn build(mut self) -> WeaveResult<Query> {
        self.update.validate()?;
        self.update.assignments.finalize();
        self.update.filter.finalize();
        Ok(Query::Update(self.update))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    delete: Delete,
}

impl DeleteBuilder {
    pub fn filter(mut self, pred: Clause) -> WeaveResult<Self> {
        self.delete.filter.push(pred)?;
        Ok(self)
    }

    pub fn and(mut self, pred: Clause) -> WeaveResult<Self> {
        self.delete.filter.and(pred)?;
        Ok(self)
    }

    pub fn or(mut self, pred: Clause) -> WeaveResult<Self> {
        self.delete.filter.or(pred)?;
        Ok(self)
    }

    pub fn build(mut self) -> Query {
        self.delete.filter.finalize();
        Query::Delete(self.delete)
    }
}

#[derive(Debug, Clone)]
pub struct ExecBuilder {
    exec: Exec,
}

impl ExecBuilder {
    /// Positional routine argument (parameter or expression).
    pub fn arg(mut self, arg: impl Into<Clause>) -> WeaveResult<Self> {
        let arg = arg.into();
        arg.validate()?;
        if !arg.is_expression() || matches!(arg, Clause::Aliased { .. }) {
            return Err(WeaveError::construction(
                arg.kind(),
                format!("a {} node cannot be a routine argument", arg.kind()),
            ));
        }
        self.exec.args.push(arg);
        Ok(self)
    }

    /// Capture the routine's return value into `param`.
    pub fn returns(mut self, param: Arc<Parameter>) -> Self {
        self.exec.returns = Some(param);
        self
    }

    pub fn build(self) -> Query {
        Query::Exec(self.exec)
    }
}

#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    pub fn add(mut self, query: Query) -> Self {
        self.script.push(query);
        self
    }

    pub fn build(self) -> Query {
        Query::Script(self.script)
    }
}

#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    create: CreateTable,
}

impl CreateTableBuilder {
    fn push(mut self, name: &str, data_type: DataType, nullable: bool, primary_key: bool) -> Self {
        self.create.columns.push(ColumnDef {
            name: name.to_string(),
            data_type,
            nullable,
            primary_key,
        });
        self
    }

    /// Nullable column.
    pub fn column(self, name: &str, data_type: DataType) -> Self {
        self.push(name, data_type, true, false)
    }

    pub fn not_null(self, name: &str, data_type: DataType) -> Self {
        self.push(name, data_type, false, false)
    }

    pub fn primary_key(self, name: &str, data_type: DataType) -> Self {
        self.push(name, data_type, false, true)
    }

    pub fn if_not_exists(mut self) -> Self {
        self.create.if_not_exists = true;
        self
    }

    pub fn build(self) -> WeaveResult<Query> {
        self.create.validate()?;
        Ok(Query::CreateTable(self.create))
    }
}

#[derive(Debug, Clone)]
pub struct DropTableBuilder {
    drop: DropTable,
}

impl DropTableBuilder {
    pub fn if_exists(mut self) -> Self {
        self.drop.if_exists = true;
        self
    }

    pub fn build(self) -> Query {
        Query::DropTable(self.drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_builder_sections() {
        let q = Query::select()
            .field("o.id")
            .count_all()
            .from("orders")
            .filter(field("o.total").gt(100))
            .unwrap()
            .group_by("o.id")
            .order_by_desc("o.id")
            .build();

        let Query::Select(s) = q else {
            panic!("expected select")
        };
        assert_eq!(s.fields.len(), 2);
        assert_eq!(s.from.items(), &[table("orders")]);
        assert_eq!(s.filter.predicate(), Some(&field("o.total").gt(100)));
        assert_eq!(s.order_by.items(), &[field("o.id").desc()]);
        assert!(!s.fields.has_cursor());
    }

    #[test]
    fn test_builder_alias_targets_last_item() {
        let s = Query::select()
            .field("qty")
            .times(field("price"))
            .unwrap()
            .alias("total")
            .unwrap()
            .into_select();
        assert_eq!(
            s.fields.items(),
            &[field("qty").times(field("price")).alias("total").unwrap()]
        );
    }

    #[test]
    fn test_or_after_group_by_is_rejected() {
        let err = Query::select()
            .field("a")
            .from("t")
            .group_by("a")
            .or(field("a").eq(1))
            .unwrap_err();
        assert!(matches!(err, WeaveError::Construction { clause: "group-by", .. }));
    }

    #[test]
    fn test_or_after_order_by_is_rejected() {
        let err = Query::select()
            .field("a")
            .from("t")
            .order_by("a")
            .or(field("a").eq(1))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Construction error in order-by: OR is only valid on a where or having section"
        );
    }

    #[test]
    fn test_invalid_operands_are_rejected() {
        let err = Query::select()
            .all()
            .from("t")
            .filter(field("a").and(field("b")))
            .unwrap_err();
        assert!(matches!(err, WeaveError::Construction { clause: "logic", .. }));

        assert!(Query::select().expr(field("a").eq(1).plus(2)).is_err());
        assert!(Query::select().sum(field("a").is_null().times(2)).is_err());
        assert!(Query::exec("f").arg(not(field("a"))).is_err());
        assert!(
            Query::update("t")
                .set("a", field("a"))
                .unwrap()
                .plus(field("b").eq(1).or(field("c")))
                .is_err()
        );
    }

    #[test]
    fn test_join_without_table_is_rejected() {
        let err = Query::select()
            .all()
            .inner_join("b", field("a.id").eq(field("b.id")))
            .unwrap_err();
        assert!(matches!(err, WeaveError::Construction { clause: "from", .. }));
    }

    #[test]
    fn test_add_join_on_non_select() {
        let mut q = Query::delete("t").build();
        let err = q
            .add_join(JoinKind::Inner, table("u"), field("t.id").eq(field("u.id")))
            .unwrap_err();
        assert!(matches!(err, WeaveError::Construction { clause: "join", .. }));

        let mut q = Query::select().all().from("t").build();
        q.add_join(JoinKind::Left, table("u"), field("t.id").eq(field("u.id")))
            .unwrap();
    }

    #[test]
    fn test_statement_rules() {
        assert!(Query::update("t").build().is_err());
        assert!(Query::insert("t").build().is_err());
        assert!(Query::create_table("t").build().is_err());
    }

    #[test]
    fn test_insert_counts_must_match() {
        assert!(Query::insert("t").value("a", 1).unwrap().build().is_ok());
        assert!(
            Query::insert("t")
                .column("a")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_script_flattens() {
        let inner = Query::script()
            .add(Query::delete("a").build())
            .add(Query::delete("b").build())
            .build();
        let outer = Query::script()
            .add(inner)
            .add(Query::delete("c").build())
            .build();
        let Query::Script(script) = outer else {
            panic!("expected script")
        };
        assert_eq!(script.statements.len(), 3);
    }

    #[test]
    fn test_update_arithmetic_on_assignment() {
        let q = Query::update("stock")
            .set("qty", field("qty"))
            .unwrap()
            .minus(1)
            .unwrap()
            .filter(field("id").eq(7))
            .unwrap()
            .build()
            .unwrap();
        let Query::Update(u) = q else {
            panic!("expected update")
        };
        assert_eq!(u.assignments.items(), &[field("qty").set(field("qty").minus(1))]);
    }

    #[test]
    fn test_row_limit_capability() {
        assert_eq!(RowLimit::Count(3).capability(), Capability::RowLimitCount);
        assert_eq!(
            RowLimit::Range { offset: 1, count: 2 }.capability(),
            Capability::RowLimitRange
        );
    }
}
