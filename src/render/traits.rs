//! Rendering hooks a dialect can override.

use crate::ast::{Builtin, Clause, DataType, Direction, Exec, Query, RowLimit, Script, Select};
use crate::error::WeaveResult;
use crate::render::{Capability, Profile, Renderer};

/// Dialect-specific pieces of statement generation.
///
/// Every hook except [`column_type`](SqlGenerator::column_type) has a
/// default that produces portable SQL; a dialect overrides only where its
/// spelling differs.
pub trait SqlGenerator: Send + Sync {
    /// Native spelling of a data type, `None` when the dialect has no equivalent.
    fn column_type(&self, dt: DataType) -> Option<String>;

    /// Spelling of a cross-dialect builtin.
    fn builtin(&self, profile: &Profile, builtin: &Builtin) -> WeaveResult<String> {
        match builtin {
            Builtin::CurrentDate => Ok("CURRENT_DATE".to_string()),
            Builtin::CurrentTimestamp => Ok("CURRENT_TIMESTAMP".to_string()),
            Builtin::LastId { .. } => Ok("IDENTITY_VAL_LOCAL()".to_string()),
            Builtin::NextId { sequence } => {
                profile.require(Capability::Sequences, "next-id")?;
                Ok(format!("NEXT VALUE FOR {}", profile.quote_ident(sequence)))
            }
        }
    }

    /// Opening token, separator and closing token of string concatenation.
    fn concat_tokens(&self) -> (&'static str, &'static str, &'static str) {
        ("", " || ", "")
    }

    /// Called before any text of a SELECT is emitted.
    fn open_select(&self, _r: &mut Renderer<'_>, _select: &Select) -> WeaveResult<()> {
        Ok(())
    }

    /// Called right after `SELECT [DISTINCT ]`.
    fn select_prefix(&self, _r: &mut Renderer<'_>, _select: &Select) -> WeaveResult<()> {
        Ok(())
    }

    /// Called after ORDER BY; emits `LIMIT`/`OFFSET` by default.
    fn select_suffix(&self, r: &mut Renderer<'_>, select: &Select) -> WeaveResult<()> {
        match select.limit {
            Some(RowLimit::Count(n)) => r.push_str(&format!(" LIMIT {}", n)),
            Some(RowLimit::Range { offset, count }) => {
                r.push_str(&format!(" LIMIT {} OFFSET {}", count, offset))
            }
            None => {}
        }
        Ok(())
    }

    /// Called once the whole SELECT has been emitted.
    fn close_select(&self, _r: &mut Renderer<'_>, _select: &Select) -> WeaveResult<()> {
        Ok(())
    }

    /// Emit a script; statements are terminated by `;` and separated by newlines.
    fn script(&self, r: &mut Renderer<'_>, script: &Script) -> WeaveResult<()> {
        for (i, statement) in script.statements.iter().enumerate() {
            if i > 0 {
                r.push_str("\n");
            }
            r.statement(statement)?;
            r.push_str(";");
        }
        Ok(())
    }

    /// `CALL routine(args)`, or `SELECT routine(args)` when a return value is
    /// captured. The return parameter gets no placeholder and is registered
    /// after the arguments.
    fn exec(&self, r: &mut Renderer<'_>, exec: &Exec) -> WeaveResult<()> {
        r.push_str(if exec.returns.is_some() { "SELECT " } else { "CALL " });
        r.routine(&exec.routine);
        r.push_str("(");
        r.list(&exec.args, ", ")?;
        r.push_str(")");
        if let Some(ret) = &exec.returns {
            r.register(ret, Direction::Return)?;
        }
        Ok(())
    }
}

/// Whether a statement yields a result set.
pub(crate) fn returns_rows(query: &Query) -> bool {
    matches!(query, Query::Select(_))
}

/// Whether an argument is an output parameter.
pub(crate) fn is_output_arg(arg: &Clause) -> bool {
    matches!(arg, Clause::Param(p) if p.direction.is_output())
}
