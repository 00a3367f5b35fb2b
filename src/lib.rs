//! `sql-binder` compiles annotated SQL statements and resolves their bind
//! values automatically.
//!
//! Statements declare parameter substitutions inline with `{name}` markers,
//! where `name` is a dotted path rooted at a named argument: `{id}` binds an
//! argument directly, `{customer.addr.city}` walks into the `customer`
//! argument property by property. Compiling a statement splits it into
//! literal fragments and substitution fragments once; binding renders the
//! statement with `?` placeholders and an ordered bind list for the database
//! driver, resolving every substitution against that call's arguments.
//!
//! A compiled statement can be bound any number of times with different
//! argument sets:
//!
//! ```
//! use sql_binder::binder::StatementBinder;
//! use sql_binder::resolver::InvocationContext;
//! use sql_binder::types::SqlStatement;
//!
//! # fn main() -> sql_binder::error::Result<()> {
//! let statement = SqlStatement::parse("SELECT * FROM {tableName}")?;
//!
//! let mut context = InvocationContext::new();
//! context.insert_value("tableName", &"Employees");
//!
//! let bound = StatementBinder::new(&statement).bind(&context)?;
//!
//! assert_eq!(bound.sql, "SELECT * FROM ?");
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod cache;
pub mod error;
pub mod parser;
pub mod resolver;
#[cfg(test)]
mod tests;
pub mod types;
