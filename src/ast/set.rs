//! Expression sets: the ordered clause list behind one statement section.
//!
//! Insertion order is output order. While a statement is being built the set
//! also tracks a cursor (the item postfix modifiers like `alias` or `plus`
//! apply to); `finalize` drops it once the tree is complete.

use crate::ast::{CalcOp, Clause, LogicOp, SortDirection};
use crate::error::{WeaveError, WeaveResult};

/// Which statement section a set represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// SELECT list
    Select,
    /// FROM tables and joins
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    /// UPDATE ... SET
    Assignments,
    /// INSERT column list
    Columns,
    /// INSERT value list
    Values,
}

impl SetKind {
    pub fn name(&self) -> &'static str {
        match self {
            SetKind::Select => "fields",
            SetKind::From => "from",
            SetKind::Where => "where",
            SetKind::GroupBy => "group-by",
            SetKind::Having => "having",
            SetKind::OrderBy => "order-by",
            SetKind::Assignments => "assignments",
            SetKind::Columns => "columns",
            SetKind::Values => "values",
        }
    }

    /// Sections holding a single predicate tree.
    pub fn is_boolean(&self) -> bool {
        matches!(self, SetKind::Where | SetKind::Having)
    }
}

/// Ordered list of clauses forming one statement section.
#[derive(Debug, Clone)]
pub struct ExpressionSet {
    kind: SetKind,
    items: Vec<Clause>,
    cursor: Option<usize>,
}

impl PartialEq for ExpressionSet {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.items == other.items
    }
}

impl ExpressionSet {
    pub fn new(kind: SetKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            cursor: None,
        }
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn items(&self) -> &[Clause] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The predicate tree of a WHERE/HAVING section.
    pub fn predicate(&self) -> Option<&Clause> {
        if self.kind.is_boolean() {
            self.items.first()
        } else {
            None
        }
    }

    /// Whether a construction cursor is still attached.
    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    fn reject(&self, clause: &Clause, why: &str) -> WeaveError {
        WeaveError::construction(
            self.kind.name(),
            format!("cannot add a {} node: {}", clause.kind(), why),
        )
    }

    /// Append a clause, checking it fits this section. Boolean sections
    /// AND the clause onto the existing predicate.
    pub fn push(&mut self, clause: Clause) -> WeaveResult<()> {
        clause.validate()?;
        match self.kind {
            SetKind::Where | SetKind::Having => return self.and(clause),
            SetKind::From => {
                if let Clause::Join { table, on, .. } = &clause {
                    if !table.is_table_source() {
                        return Err(self.reject(&clause, "join target must be a table"));
                    }
                    if !on.is_predicate() {
                        return Err(self.reject(&clause, "join condition must be a predicate"));
                    }
                    if !self.items.iter().any(Clause::is_table_source) {
                        return Err(self.reject(&clause, "join requires a preceding table"));
                    }
                } else if !clause.is_table_source() {
                    return Err(self.reject(&clause, "expected a table or join"));
                }
            }
            SetKind::OrderBy => {
                let clause = match clause {
                    Clause::Order { .. } => clause,
                    other if other.is_expression() => Clause::Order {
                        clause: Box::new(other),
                        direction: SortDirection::Asc,
                    },
                    other => return Err(self.reject(&other, "expected a sort expression")),
                };
                self.items.push(clause);
                self.cursor = Some(self.items.len() - 1);
                return Ok(());
            }
            SetKind::Assignments => {
                if !matches!(&clause, Clause::Assign { field, value }
                    if matches!(**field, Clause::Field { .. }) && value.is_expression())
                {
                    return Err(self.reject(&clause, "expected field = value"));
                }
            }
            SetKind::Columns => {
                if !matches!(clause, Clause::Field { .. }) {
                    return Err(self.reject(&clause, "expected a column"));
                }
            }
            SetKind::Select | SetKind::GroupBy | SetKind::Values => {
                if !clause.is_expression() {
                    return Err(self.reject(&clause, "expected an expression"));
                }
                if self.kind != SetKind::Select && matches!(clause, Clause::Aliased { .. }) {
                    return Err(self.reject(&clause, "aliases are only allowed in a select list"));
                }
            }
        }
        self.items.push(clause);
        self.cursor = Some(self.items.len() - 1);
        Ok(())
    }

    /// Append without checks, for builder paths that only produce valid nodes.
    pub(crate) fn push_valid(&mut self, clause: Clause) {
        self.items.push(clause);
        self.cursor = Some(self.items.len() - 1);
    }

    fn combine(&mut self, op: LogicOp, pred: Clause) -> WeaveResult<()> {
        if !self.kind.is_boolean() {
            return Err(WeaveError::construction(
                self.kind.name(),
                format!("{} is only valid on a where or having section", op.sql()),
            ));
        }
        if !pred.is_predicate() {
            return Err(self.reject(&pred, "expected a predicate"));
        }
        pred.validate()?;
        let root = match self.items.pop() {
            Some(prev) => Clause::Logic {
                left: Box::new(prev),
                op,
                right: Box::new(pred),
            },
            None => pred,
        };
        self.items.push(root);
        self.cursor = Some(0);
        Ok(())
    }

    /// AND a predicate onto the section's tree.
    pub fn and(&mut self, pred: Clause) -> WeaveResult<()> {
        self.combine(LogicOp::And, pred)
    }

    /// OR a predicate onto the section's tree. Only WHERE and HAVING accept this.
    pub fn or(&mut self, pred: Clause) -> WeaveResult<()> {
        self.combine(LogicOp::Or, pred)
    }

    fn current(&mut self, action: &str) -> WeaveResult<&mut Clause> {
        let kind = self.kind;
        match self.cursor {
            Some(idx) => Ok(&mut self.items[idx]),
            None => Err(WeaveError::construction(
                kind.name(),
                format!("{} needs a current item", action),
            )),
        }
    }

    /// Alias the current item.
    pub fn alias(&mut self, alias: &str) -> WeaveResult<()> {
        let kind = self.kind;
        let current = self.current("alias")?;
        let allowed = if kind == SetKind::Select {
            current.is_aliasable()
        } else {
            matches!(current, Clause::Table(_) | Clause::SubQuery(_))
        };
        if !allowed {
            return Err(WeaveError::construction(
                kind.name(),
                format!("cannot alias a {} node as '{}'", current.kind(), alias),
            ));
        }
        let taken = std::mem::replace(current, Clause::AllFields { table: None });
        *current = taken.alias(alias)?;
        Ok(())
    }

    /// Extend the current item into `current <op> operand`.
    pub fn calc(&mut self, op: CalcOp, operand: Clause) -> WeaveResult<()> {
        operand.validate()?;
        let current = self.current(op.sql())?;
        let target = match current {
            Clause::Assign { value, .. } => value.as_mut(),
            Clause::Order { clause, .. } => clause.as_mut(),
            Clause::Aliased { clause, .. } => clause.as_mut(),
            other => other,
        };
        for candidate in [&*target, &operand] {
            if !candidate.is_arithmetic() {
                return Err(WeaveError::construction(
                    candidate.kind(),
                    format!("a {} node cannot be an operand of '{}'", candidate.kind(), op.sql()),
                ));
            }
        }
        let left = std::mem::replace(target, Clause::AllFields { table: None });
        *target = left.try_calc(op, operand)?;
        Ok(())
    }

    /// Drop the construction cursor.
    pub fn finalize(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_where_push_ands_predicates() {
        let mut set = ExpressionSet::new(SetKind::Where);
        set.push(field("a").eq(1)).unwrap();
        set.push(field("b").eq(2)).unwrap();
        set.or(field("c").eq(3)).unwrap();

        assert_eq!(set.len(), 1);
        let expected = field("a").eq(1).and(field("b").eq(2)).or(field("c").eq(3));
        assert_eq!(set.predicate(), Some(&expected));
    }

    #[test]
    fn test_or_on_group_by_fails() {
        let mut set = ExpressionSet::new(SetKind::GroupBy);
        set.push(field("a")).unwrap();
        let err = set.or(field("a").eq(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Construction error in group-by: OR is only valid on a where or having section"
        );
    }

    #[test]
    fn test_or_on_order_by_fails() {
        let mut set = ExpressionSet::new(SetKind::OrderBy);
        set.push(field("a")).unwrap();
        assert!(matches!(
            set.or(field("a").eq(1)),
            Err(WeaveError::Construction { clause: "order-by", .. })
        ));
        assert!(set.and(field("a").eq(1)).is_err());
    }

    #[test]
    fn test_nested_operands_are_checked() {
        let mut set = ExpressionSet::new(SetKind::Where);
        assert!(set.push(field("a").and(field("b"))).is_err());
        assert!(set.push(field("a").eq(1).or(field("b"))).is_err());
        assert!(set.is_empty());

        let mut set = ExpressionSet::new(SetKind::Select);
        assert!(set.push(field("a").eq(1).plus(2)).is_err());
        set.push(field("a")).unwrap();
        assert!(set.calc(CalcOp::Add, field("b").minus(field("c").is_null())).is_err());
    }

    #[test]
    fn test_where_rejects_non_predicate() {
        let mut set = ExpressionSet::new(SetKind::Where);
        assert!(set.push(field("a")).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_join_needs_table_first() {
        let mut set = ExpressionSet::new(SetKind::From);
        let join = table("b").inner_join(field("a.id").eq(field("b.id")));
        assert!(set.push(join.clone()).is_err());
        set.push(table("a")).unwrap();
        set.push(join).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_order_by_wraps_bare_expressions() {
        let mut set = ExpressionSet::new(SetKind::OrderBy);
        set.push(field("a")).unwrap();
        set.push(field("b").desc()).unwrap();
        assert_eq!(set.items(), &[field("a").asc(), field("b").desc()]);
    }

    #[test]
    fn test_cursor_modifiers() {
        let mut set = ExpressionSet::new(SetKind::Select);
        assert!(matches!(set.alias("x"), Err(WeaveError::Construction { .. })));

        set.push(field("qty")).unwrap();
        set.calc(CalcOp::Mul, field("price")).unwrap();
        set.alias("total").unwrap();
        assert_eq!(
            set.items(),
            &[field("qty").times(field("price")).alias("total").unwrap()]
        );

        set.finalize();
        assert!(!set.has_cursor());
        assert!(set.calc(CalcOp::Add, constant(1)).is_err());
    }

    #[test]
    fn test_assignment_arithmetic_applies_to_value() {
        let mut set = ExpressionSet::new(SetKind::Assignments);
        set.push(field("stock").set(field("stock"))).unwrap();
        set.calc(CalcOp::Sub, constant(1)).unwrap();
        assert_eq!(
            set.items(),
            &[field("stock").set(field("stock").minus(1))]
        );
    }

    #[test]
    fn test_columns_only_take_fields() {
        let mut set = ExpressionSet::new(SetKind::Columns);
        set.push(field("a")).unwrap();
        assert!(set.push(constant(1)).is_err());
    }

    #[test]
    fn test_equality_ignores_cursor() {
        let mut a = ExpressionSet::new(SetKind::Select);
        let mut b = ExpressionSet::new(SetKind::Select);
        a.push(field("x")).unwrap();
        b.push(field("x")).unwrap();
        b.finalize();
        assert_eq!(a, b);
    }
}
