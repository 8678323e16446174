//! Statement rendering: one pass over a [`Query`] producing SQL text and
//! the ordered list of bound parameters.
//!
//! Output is appended strictly left to right. The one exception is
//! wrap-style row limiting (Oracle's ROWNUM), where a dialect hook stages a
//! single SELECT into a private buffer and emits the rewritten form when the
//! statement closes.

pub mod dialect;
pub mod sql;
mod state;
pub mod traits;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::ast::{
    Clause, ColumnDef, CreateTable, DataType, Delete, Direction, DropTable, ExpressionSet, Insert,
    LogicOp, Parameter, Query, Select, SortDirection, TableRef, Update, Value,
};
use crate::error::{WeaveError, WeaveResult};

pub use self::dialect::{Capabilities, Capability, ParamStyle, Profile};
pub use self::traits::SqlGenerator;
use self::state::{Frame, RenderState};

/// One bound parameter of a rendered statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Native descriptor name (`p1`, `@p1`)
    pub name: String,
    pub data_type: Option<DataType>,
    pub direction: Direction,
    /// Value produced for this pass; NULL for pure outputs
    pub value: Value,
    /// Whether the value came from a callback
    pub deferred: bool,
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    /// Distinct parameters in first-registration order
    pub params: Vec<BoundParam>,
    /// Index into `params` for every placeholder, in text order
    pub slots: Vec<usize>,
}

impl Rendered {
    /// Values in placeholder order, for positional binding.
    pub fn bind_values(&self) -> Vec<&Value> {
        self.slots.iter().map(|&i| &self.params[i].value).collect()
    }

    pub fn param(&self, name: &str) -> Option<&BoundParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Render `query` for `profile`.
///
/// Text is returned only when the whole pass succeeds.
pub fn render(query: &Query, profile: &Profile) -> WeaveResult<Rendered> {
    let mut renderer = Renderer::new(profile);
    renderer.reserve_names(query);
    renderer.statement(query)?;
    let rendered = renderer.finish();
    tracing::debug!(
        dialect = profile.name,
        statement = query.kind(),
        params = rendered.params.len(),
        "rendered {} bytes",
        rendered.sql.len()
    );
    Ok(rendered)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ParamKey {
    Named(String),
    Shared(usize),
}

/// Single-use renderer for one pass.
pub struct Renderer<'p> {
    profile: &'p Profile,
    state: RenderState,
    out: String,
    params: Vec<BoundParam>,
    keys: HashMap<ParamKey, usize>,
    names: HashSet<String>,
    /// Explicit names anywhere in the statement; never generated
    reserved: HashSet<String>,
    generated: usize,
    slots: Vec<usize>,
}

impl<'p> Renderer<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        Self {
            profile,
            state: RenderState::default(),
            out: String::new(),
            params: Vec::new(),
            keys: HashMap::new(),
            names: HashSet::new(),
            reserved: HashSet::new(),
            generated: 0,
            slots: Vec::new(),
        }
    }

    pub fn profile(&self) -> &'p Profile {
        self.profile
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.out,
            params: self.params,
            slots: self.slots,
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Emit a quoted identifier.
    pub fn ident(&mut self, name: &str) {
        let quoted = self.profile.quote_ident(name);
        self.out.push_str(&quoted);
    }

    pub fn table_ref(&mut self, table: &TableRef) {
        if let Some(schema) = &table.schema {
            self.ident(schema);
            self.out.push('.');
        }
        self.ident(&table.name);
    }

    /// Emit a possibly package-qualified routine name.
    pub fn routine(&mut self, name: &str) {
        self.table_ref(&TableRef::parse(name));
    }

    /// Current script/block nesting.
    pub fn script_depth(&self) -> usize {
        self.state.script_depth
    }

    fn render_error(&self, clause: &'static str, message: impl Into<String>) -> WeaveError {
        WeaveError::render(self.profile.name, clause, message)
    }

    // ------------------------------------------------------------------
    // Buffer splice
    // ------------------------------------------------------------------

    /// Start collecting the current SELECT's text into a private buffer.
    pub fn begin_staging(&mut self) -> WeaveResult<()> {
        match self.state.frames.last().map(|frame| frame.outer.is_some()) {
            None => return Err(self.render_error("select", "staging requires an open select")),
            Some(true) => return Err(self.render_error("select", "select is already staged")),
            Some(false) => {}
        }
        let outer = std::mem::take(&mut self.out);
        if let Some(frame) = self.state.frames.last_mut() {
            frame.outer = Some(outer);
        }
        tracing::trace!(
            dialect = self.profile.name,
            depth = self.state.depth(),
            "staging select"
        );
        Ok(())
    }

    /// Stop staging and hand back the statement's text. The output resumes
    /// where it was when staging began.
    pub fn end_staging(&mut self) -> WeaveResult<String> {
        let outer = self
            .state
            .frames
            .last_mut()
            .and_then(|frame| frame.outer.take());
        match outer {
            Some(outer) => {
                tracing::trace!(dialect = self.profile.name, "flushing staged select");
                Ok(std::mem::replace(&mut self.out, outer))
            }
            None => Err(self.render_error("select", "no staged select to close")),
        }
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Keep every explicit parameter name in `query` away from generated
    /// names, wherever it appears relative to anonymous values.
    pub fn reserve_names(&mut self, query: &Query) {
        let mut names = Vec::new();
        query_param_names(query, &mut names);
        for name in names {
            let canonical = self.profile.canonical_name(name).to_string();
            self.reserved.insert(canonical);
        }
    }

    fn next_generated_name(&mut self) -> String {
        loop {
            self.generated += 1;
            let name = format!("p{}", self.generated);
            if !self.names.contains(&name) && !self.reserved.contains(&name) {
                return name;
            }
        }
    }

    fn push_param(&mut self, name: String, param: BoundParam) -> usize {
        self.names.insert(name);
        self.params.push(param);
        self.params.len() - 1
    }

    /// Register a parameter without emitting a placeholder. A parameter
    /// already seen in this pass returns its existing index.
    pub fn register(&mut self, param: &Arc<Parameter>, direction: Direction) -> WeaveResult<usize> {
        // `@x` and `x` are the same parameter on a dialect whose prefix is `@`
        let canonical = param
            .name
            .as_deref()
            .map(|name| self.profile.canonical_name(name).to_string());
        let key = match &canonical {
            Some(name) => ParamKey::Named(name.clone()),
            None => ParamKey::Shared(Arc::as_ptr(param) as usize),
        };
        if let Some(&idx) = self.keys.get(&key) {
            return Ok(idx);
        }
        let name = match canonical {
            Some(name) => {
                if self.names.contains(&name) {
                    return Err(self.render_error(
                        "param",
                        format!("parameter name '{}' is already in use", name),
                    ));
                }
                name
            }
            None => self.next_generated_name(),
        };
        // one evaluation per pass
        let value = param.produce();
        let bound = BoundParam {
            name: self.profile.descriptor_name(&name),
            data_type: param.data_type.or_else(|| value.data_type()),
            direction,
            value,
            deferred: param.is_deferred(),
        };
        let idx = self.push_param(name, bound);
        self.keys.insert(key, idx);
        Ok(idx)
    }

    /// Emit the placeholder of a registered parameter.
    pub fn placeholder(&mut self, idx: usize) {
        let placeholder = self.profile.placeholder(idx, &self.params[idx].name);
        self.out.push_str(&placeholder);
        self.slots.push(idx);
    }

    /// Register and emit a parameter.
    pub fn bind(&mut self, param: &Arc<Parameter>) -> WeaveResult<()> {
        let idx = self.register(param, param.direction)?;
        self.placeholder(idx);
        Ok(())
    }

    /// Bind a literal as a fresh anonymous parameter. NULL is emitted inline.
    fn bind_value(&mut self, value: &Value) {
        if value.is_null() {
            self.out.push_str("NULL");
            return;
        }
        let name = self.next_generated_name();
        let bound = BoundParam {
            name: self.profile.descriptor_name(&name),
            data_type: value.data_type(),
            direction: Direction::In,
            value: value.clone(),
            deferred: false,
        };
        let idx = self.push_param(name, bound);
        self.placeholder(idx);
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    pub fn statement(&mut self, query: &Query) -> WeaveResult<()> {
        match query {
            Query::Select(s) => self.select(s),
            Query::Insert(i) => self.insert(i),
            Query::Update(u) => self.update(u),
            Query::Delete(d) => self.delete(d),
            Query::Exec(e) => {
                let generator = self.profile.generator;
                generator.exec(self, e)
            }
            Query::Script(s) => {
                self.profile.require(Capability::Scripts, "script")?;
                let generator = self.profile.generator;
                self.state.script_depth += 1;
                let result = generator.script(self, s);
                self.state.script_depth -= 1;
                result
            }
            Query::CreateTable(c) => self.create_table(c),
            Query::DropTable(d) => self.drop_table(d),
        }
    }

    pub fn select(&mut self, select: &Select) -> WeaveResult<()> {
        if let Some(limit) = &select.limit {
            self.profile
                .require(limit.capability(), format!("{:?} on select", limit))?;
        }
        let generator = self.profile.generator;
        self.state.frames.push(Frame::default());
        let result = self.select_body(generator, select);
        let frame = self.state.frames.pop();
        result?;
        if frame.is_some_and(|f| f.outer.is_some()) {
            return Err(self.render_error("select", "staged select was never flushed"));
        }
        Ok(())
    }

    fn select_body(&mut self, generator: &dyn SqlGenerator, select: &Select) -> WeaveResult<()> {
        generator.open_select(self, select)?;
        self.out.push_str("SELECT ");
        if select.distinct {
            self.out.push_str("DISTINCT ");
        }
        generator.select_prefix(self, select)?;

        if select.fields.is_empty() {
            self.out.push('*');
        } else {
            self.list(select.fields.items(), ", ")?;
        }

        if !select.from.is_empty() {
            self.out.push_str(" FROM ");
            self.from_list(select.from.items())?;
        } else if let Some(dual) = self.profile.dual {
            self.out.push_str(" FROM ");
            self.out.push_str(dual);
        }
        if let Some(pred) = select.filter.predicate() {
            self.out.push_str(" WHERE ");
            self.condition(pred)?;
        }
        if !select.group_by.is_empty() {
            self.out.push_str(" GROUP BY ");
            self.list(select.group_by.items(), ", ")?;
        }
        if let Some(pred) = select.having.predicate() {
            self.out.push_str(" HAVING ");
            self.condition(pred)?;
        }
        if !select.order_by.is_empty() {
            self.out.push_str(" ORDER BY ");
            self.list(select.order_by.items(), ", ")?;
        }
        generator.select_suffix(self, select)?;
        generator.close_select(self, select)
    }

    fn from_list(&mut self, items: &[Clause]) -> WeaveResult<()> {
        for (i, item) in items.iter().enumerate() {
            if matches!(item, Clause::Join { .. }) {
                self.out.push(' ');
            } else if i > 0 {
                self.out.push_str(", ");
            }
            self.clause(item)?;
        }
        Ok(())
    }

    fn insert(&mut self, insert: &Insert) -> WeaveResult<()> {
        self.out.push_str("INSERT INTO ");
        self.table_ref(&insert.table);
        if !insert.columns.is_empty() {
            self.out.push_str(" (");
            self.columns(insert.columns.items())?;
            self.out.push(')');
        }
        match &insert.source {
            Some(source) => {
                self.out.push(' ');
                self.select(source)
            }
            None => {
                self.out.push_str(" VALUES (");
                self.list(insert.values.items(), ", ")?;
                self.out.push(')');
                Ok(())
            }
        }
    }

    /// Unqualified column names, as INSERT and SET lists need them.
    fn columns(&mut self, items: &[Clause]) -> WeaveResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.column_name(item)?;
        }
        Ok(())
    }

    fn column_name(&mut self, clause: &Clause) -> WeaveResult<()> {
        match clause {
            Clause::Field { name, .. } => {
                self.ident(name);
                Ok(())
            }
            other => Err(self.render_error(
                other.kind(),
                format!("expected a column, found a {} node", other.kind()),
            )),
        }
    }

    fn update(&mut self, update: &Update) -> WeaveResult<()> {
        self.out.push_str("UPDATE ");
        self.table_ref(&update.table);
        self.out.push_str(" SET ");
        self.list(update.assignments.items(), ", ")?;
        self.filter(update.filter.predicate())
    }

    fn delete(&mut self, delete: &Delete) -> WeaveResult<()> {
        self.out.push_str("DELETE FROM ");
        self.table_ref(&delete.table);
        self.filter(delete.filter.predicate())
    }

    fn filter(&mut self, pred: Option<&Clause>) -> WeaveResult<()> {
        if let Some(pred) = pred {
            self.out.push_str(" WHERE ");
            self.condition(pred)?;
        }
        Ok(())
    }

    fn create_table(&mut self, create: &CreateTable) -> WeaveResult<()> {
        self.out.push_str("CREATE TABLE ");
        if create.if_not_exists {
            self.profile
                .require(Capability::ExistenceCheck, "create table if not exists")?;
            self.out.push_str("IF NOT EXISTS ");
        }
        self.table_ref(&create.table);
        self.out.push_str(" (");
        for (i, column) in create.columns.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.column_def(column)?;
        }
        let keys: Vec<&str> = create
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect();
        if !keys.is_empty() {
            self.out.push_str(", PRIMARY KEY (");
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.ident(key);
            }
            self.out.push(')');
        }
        self.out.push(')');
        Ok(())
    }

    fn column_def(&mut self, column: &ColumnDef) -> WeaveResult<()> {
        self.ident(&column.name);
        self.out.push(' ');
        let native = self.profile.native_type(column.data_type)?;
        self.out.push_str(&native);
        if !column.nullable {
            self.out.push_str(" NOT NULL");
        }
        Ok(())
    }

    fn drop_table(&mut self, drop: &DropTable) -> WeaveResult<()> {
        self.out.push_str("DROP TABLE ");
        if drop.if_exists {
            self.profile
                .require(Capability::ExistenceCheck, "drop table if exists")?;
            self.out.push_str("IF EXISTS ");
        }
        self.table_ref(&drop.table);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clauses
    // ------------------------------------------------------------------

    /// Emit clauses separated by `sep`.
    pub fn list(&mut self, items: &[Clause], sep: &str) -> WeaveResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(sep);
            }
            self.clause(item)?;
        }
        Ok(())
    }

    /// Emit one clause in a value position. Predicates become
    /// `CASE WHEN ... THEN 1 ELSE 0 END` where the dialect has no boolean
    /// expressions.
    pub fn clause(&mut self, clause: &Clause) -> WeaveResult<()> {
        if clause.is_predicate() && !self.profile.caps.boolean_expressions {
            self.out.push_str("CASE WHEN ");
            self.node(clause)?;
            self.out.push_str(" THEN 1 ELSE 0 END");
            return Ok(());
        }
        self.node(clause)
    }

    /// Emit a predicate where the grammar expects a condition
    /// (WHERE, HAVING, ON, logic operands).
    pub fn condition(&mut self, pred: &Clause) -> WeaveResult<()> {
        self.node(pred)
    }

    fn node(&mut self, clause: &Clause) -> WeaveResult<()> {
        match clause {
            Clause::Field { table, name } => {
                if let Some(table) = table {
                    self.ident(table);
                    self.out.push('.');
                }
                self.ident(name);
            }
            Clause::AllFields { table } => {
                if let Some(table) = table {
                    self.ident(table);
                    self.out.push('.');
                }
                self.out.push('*');
            }
            Clause::Constant(value) => self.bind_value(value),
            Clause::Param(param) => self.bind(param)?,
            Clause::Compare { left, op, right } => {
                self.operand(left)?;
                self.out.push(' ');
                self.out.push_str(op.sql());
                self.out.push(' ');
                self.operand(right)?;
            }
            Clause::IsNull { clause, negated } => {
                self.operand(clause)?;
                self.out
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Clause::InList {
                clause,
                items,
                negated,
            } => {
                if items.is_empty() {
                    // nothing is in an empty list
                    self.out.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                } else {
                    self.operand(clause)?;
                    self.out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                    self.list(items, ", ")?;
                    self.out.push(')');
                }
            }
            Clause::Between { clause, low, high } => {
                self.operand(clause)?;
                self.out.push_str(" BETWEEN ");
                self.operand(low)?;
                self.out.push_str(" AND ");
                self.operand(high)?;
            }
            Clause::Exists(select) => {
                self.out.push_str("EXISTS (");
                self.select(select)?;
                self.out.push(')');
            }
            Clause::Logic { left, op, right } => {
                self.logic_side(left, *op)?;
                self.out.push(' ');
                self.out.push_str(op.sql());
                self.out.push(' ');
                self.logic_side(right, *op)?;
            }
            Clause::Not(inner) => {
                self.out.push_str("NOT (");
                self.condition(inner)?;
                self.out.push(')');
            }
            Clause::Aggregate {
                func,
                arg,
                distinct,
            } => {
                self.out.push_str(func.sql());
                self.out.push('(');
                if *distinct {
                    self.out.push_str("DISTINCT ");
                }
                match arg {
                    Some(arg) => self.clause(arg)?,
                    None => self.out.push('*'),
                }
                self.out.push(')');
            }
            Clause::Function { name, args } => {
                self.out.push_str(name);
                self.out.push('(');
                self.list(args, ", ")?;
                self.out.push(')');
            }
            Clause::Builtin(builtin) => {
                let text = self.profile.generator.builtin(self.profile, builtin)?;
                self.out.push_str(&text);
            }
            Clause::Concat(parts) => {
                let (open, sep, close) = self.profile.generator.concat_tokens();
                self.out.push_str(open);
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(sep);
                    }
                    self.operand(part)?;
                }
                self.out.push_str(close);
            }
            Clause::Cast { clause, data_type } => {
                let native = self.profile.native_type(*data_type)?;
                self.out.push_str("CAST(");
                self.clause(clause)?;
                self.out.push_str(" AS ");
                self.out.push_str(&native);
                self.out.push(')');
            }
            Clause::Calc { left, op, right } => {
                let wrap_left =
                    matches!(left.as_ref(), Clause::Calc { op: inner, .. } if inner.precedence() < op.precedence());
                self.wrapped(left, wrap_left)?;
                self.out.push(' ');
                self.out.push_str(op.sql());
                self.out.push(' ');
                self.wrapped(right, matches!(right.as_ref(), Clause::Calc { .. }))?;
            }
            Clause::Aliased { clause, alias } => {
                self.clause(clause)?;
                let is_table = matches!(clause.as_ref(), Clause::Table(_) | Clause::SubQuery(_));
                if is_table && !self.profile.table_alias_as {
                    self.out.push(' ');
                } else {
                    self.out.push_str(" AS ");
                }
                self.ident(alias);
            }
            Clause::Table(table) => self.table_ref(table),
            Clause::Join { kind, table, on } => {
                self.out.push_str(kind.sql());
                self.out.push(' ');
                self.clause(table)?;
                self.out.push_str(" ON ");
                self.condition(on)?;
            }
            Clause::Order { clause, direction } => {
                self.clause(clause)?;
                if *direction == SortDirection::Desc {
                    self.out.push_str(" DESC");
                }
            }
            Clause::Assign { field, value } => {
                self.column_name(field)?;
                self.out.push_str(" = ");
                self.clause(value)?;
            }
            Clause::SubQuery(select) => {
                self.out.push('(');
                self.select(select)?;
                self.out.push(')');
            }
        }
        Ok(())
    }

    /// Operand of a comparison or list; nested predicates are parenthesized.
    fn operand(&mut self, clause: &Clause) -> WeaveResult<()> {
        let wrap = clause.is_predicate() && self.profile.caps.boolean_expressions;
        self.wrapped(clause, wrap)
    }

    fn logic_side(&mut self, side: &Clause, parent: LogicOp) -> WeaveResult<()> {
        if matches!(side, Clause::Logic { op, .. } if *op != parent) {
            self.out.push('(');
            self.condition(side)?;
            self.out.push(')');
            Ok(())
        } else {
            self.condition(side)
        }
    }

    fn wrapped(&mut self, clause: &Clause, wrap: bool) -> WeaveResult<()> {
        if wrap {
            self.out.push('(');
            self.clause(clause)?;
            self.out.push(')');
            Ok(())
        } else {
            self.clause(clause)
        }
    }
}

fn query_param_names<'q>(query: &'q Query, out: &mut Vec<&'q str>) {
    match query {
        Query::Select(select) => select_param_names(select, out),
        Query::Insert(insert) => {
            set_param_names(&[&insert.columns, &insert.values], out);
            if let Some(source) = &insert.source {
                select_param_names(source, out);
            }
        }
        Query::Update(update) => set_param_names(&[&update.assignments, &update.filter], out),
        Query::Delete(delete) => set_param_names(&[&delete.filter], out),
        Query::Exec(exec) => {
            if let Some(name) = exec.returns.as_ref().and_then(|p| p.name.as_deref()) {
                out.push(name);
            }
            for arg in &exec.args {
                clause_param_names(arg, out);
            }
        }
        Query::Script(script) => {
            for statement in &script.statements {
                query_param_names(statement, out);
            }
        }
        Query::CreateTable(_) | Query::DropTable(_) => {}
    }
}

fn select_param_names<'q>(select: &'q Select, out: &mut Vec<&'q str>) {
    let sets = [
        &select.fields,
        &select.from,
        &select.filter,
        &select.group_by,
        &select.having,
        &select.order_by,
    ];
    set_param_names(&sets, out);
}

fn set_param_names<'q>(sets: &[&'q ExpressionSet], out: &mut Vec<&'q str>) {
    for &set in sets {
        for item in set.iter() {
            clause_param_names(item, out);
        }
    }
}

fn clause_param_names<'q>(clause: &'q Clause, out: &mut Vec<&'q str>) {
    match clause {
        Clause::Param(param) => {
            if let Some(name) = param.name.as_deref() {
                out.push(name);
            }
        }
        Clause::Exists(select) | Clause::SubQuery(select) => select_param_names(select, out),
        Clause::Field { .. }
        | Clause::AllFields { .. }
        | Clause::Constant(_)
        | Clause::Builtin(_)
        | Clause::Table(_) => {}
        Clause::Compare { left, right, .. }
        | Clause::Logic { left, right, .. }
        | Clause::Calc { left, right, .. } => {
            clause_param_names(left, out);
            clause_param_names(right, out);
        }
        Clause::Join { table, on, .. } => {
            clause_param_names(table, out);
            clause_param_names(on, out);
        }
        Clause::Assign { field, value } => {
            clause_param_names(field, out);
            clause_param_names(value, out);
        }
        Clause::InList { clause, items, .. } => {
            clause_param_names(clause, out);
            for item in items {
                clause_param_names(item, out);
            }
        }
        Clause::Between { clause, low, high } => {
            clause_param_names(clause, out);
            clause_param_names(low, out);
            clause_param_names(high, out);
        }
        Clause::Function { args, .. } | Clause::Concat(args) => {
            for arg in args {
                clause_param_names(arg, out);
            }
        }
        Clause::Aggregate { arg, .. } => {
            if let Some(arg) = arg {
                clause_param_names(arg, out);
            }
        }
        Clause::IsNull { clause, .. }
        | Clause::Not(clause)
        | Clause::Cast { clause, .. }
        | Clause::Aliased { clause, .. }
        | Clause::Order { clause, .. } => clause_param_names(clause, out),
    }
}
