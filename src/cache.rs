//! Process-wide cache of compiled statement templates.
//!
//! Compilation is pure and deterministic, so a raw template string only ever
//! needs compiling once per process. Compiled statements are shared behind
//! `Arc`; callers on different threads bind against the same compiled
//! fragments.

use crate::error::Result;
use crate::types::SqlStatement;

use once_cell::sync::Lazy;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

static STATEMENTS: Lazy<RwLock<HashMap<String, Arc<SqlStatement>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Compile a raw template, reusing a previously compiled statement when the
/// exact raw string has been seen before.
///
/// Failed compilations are not cached; a malformed template fails afresh on
/// every call.
pub fn compile(raw: &str) -> Result<Arc<SqlStatement>> {
    {
        let statements = STATEMENTS.read().expect("statement cache lock poisoned");

        if let Some(statement) = statements.get(raw) {
            return Ok(statement.clone());
        }
    }

    // parse outside the lock; a racing caller may compile the same template
    // concurrently, but the first insert wins and both see one shared copy
    let parsed = Arc::new(SqlStatement::parse(raw)?);

    let mut statements = STATEMENTS.write().expect("statement cache lock poisoned");

    let statement = statements
        .entry(raw.to_string())
        .or_insert(parsed)
        .clone();

    Ok(statement)
}

/// The number of distinct templates compiled so far.
pub fn len() -> usize {
    STATEMENTS
        .read()
        .expect("statement cache lock poisoned")
        .len()
}
