//! Rendering of compiled statements into driver-ready SQL and bind lists.
//!
//! Binding walks the compiled fragment list once, in order: literal
//! fragments are emitted verbatim, and each parameter substitution is
//! replaced by a `?` marker while its resolved value is appended to the bind
//! list. The nth marker in the rendered SQL therefore always corresponds to
//! the nth entry of the bind list.

use crate::error::Result;
use crate::resolver::{resolve, InvocationContext};
use crate::types::value::Value;
use crate::types::{Sql, SqlStatement, SqlType};

const SUBSTITUTE_MARK: &str = "?";

/// One positional bind value and its declared SQL type.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub value:    Value,
    pub sql_type: SqlType,
}

impl Binding {
    pub fn new(value: Value, sql_type: SqlType) -> Self {
        Self { value, sql_type }
    }
}

/// A statement rendered for one invocation: marker-form SQL plus its
/// ordered bind list.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundStatement {
    pub sql:      String,
    pub bindings: Vec<Binding>,
}

impl BoundStatement {
    pub fn binding_values(&self) -> impl Iterator<Item = &Value> {
        self.bindings.iter().map(|b| &b.value)
    }
}

/// Binds a compiled statement against per-call arguments.
///
/// The compiled statement is borrowed, never consumed; one binder can render
/// any number of invocations against different contexts.
pub struct StatementBinder<'a> {
    statement: &'a SqlStatement,
}

impl<'a> StatementBinder<'a> {
    pub fn new(statement: &'a SqlStatement) -> Self {
        Self { statement }
    }

    /// Render marker-form SQL and resolve every substitution against the
    /// context, in statement order.
    ///
    /// Resolution failure of any substitution fails the whole call; there is
    /// no partially bound statement.
    pub fn bind(&self, context: &InvocationContext) -> Result<BoundStatement> {
        let mut sql = String::with_capacity(self.statement.raw.len());
        let mut bindings = Vec::with_capacity(self.statement.binding_count());

        for fragment in &self.statement.sql {
            match fragment {
                Sql::Literal(t) => sql.push_str(&t.item.value),
                Sql::Binding(b) => {
                    let value = resolve(&b.item, context)?;

                    sql.push_str(SUBSTITUTE_MARK);
                    bindings.push(Binding::new(value, b.item.sql_type));
                }
            }
        }

        Ok(BoundStatement { sql, bindings })
    }
}
