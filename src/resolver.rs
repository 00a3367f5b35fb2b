//! Per-invocation resolution of binding paths against argument objects.
//!
//! A compiled [`SqlBinding`] carries a dotted qualifier path such as
//! `customer.addr.city`. At call time the root qualifier selects a named
//! argument from the [`InvocationContext`], and each subsequent qualifier is
//! resolved against the object produced by the previous one. Resolution of a
//! single qualifier tries a fixed chain of strategies in priority order:
//!
//! 1. a boolean accessor, accepted only when it actually yields a boolean
//! 2. a general accessor
//! 3. a directly named public field
//! 4. a keyed lookup, when the object is a mapping
//!
//! The first strategy that locates the qualifier ends the chain, for better
//! or worse: a located accessor that fails or is barred by visibility is an
//! error, never a fallthrough to the next strategy.

use crate::error::{new_access_denied_error, new_accessor_invocation_error,
                   new_unknown_parameter_error, new_unresolvable_property_error, Result};

use crate::types::value::{Access, Resolve, Resolved, ToValue, Value};
use crate::types::SqlBinding;

use std::collections::BTreeMap;
use std::fmt;

/// The named arguments of one statement invocation.
///
/// Arguments are registered under the formal parameter names the statement's
/// binding paths are rooted at. A leaf argument goes in via
/// [`insert_value`](InvocationContext::insert_value); a structural argument
/// that dotted paths walk into goes in via
/// [`insert_object`](InvocationContext::insert_object).
#[derive(Default)]
pub struct InvocationContext {
    parameters: BTreeMap<String, Resolved>,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf argument under a parameter name.
    pub fn insert_value<T: ToValue + ?Sized>(&mut self, name: &str, value: &T) {
        self.parameters
            .insert(name.to_string(), Resolved::Value(value.to_value()));
    }

    /// Register a structural argument under a parameter name.
    pub fn insert_object<R: Resolve + 'static>(&mut self, name: &str, object: R) {
        self.parameters
            .insert(name.to_string(), Resolved::Object(Box::new(object)));
    }

    /// Look up a registered argument by parameter name.
    pub fn parameter(&self, name: &str) -> Option<&Resolved> {
        self.parameters.get(name)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(|k| k.as_str())
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Resolve one binding path to its bind value for this invocation.
///
/// Fails with `UnknownParameterError` when the root qualifier names no
/// registered argument, and with the resolution error of whichever qualifier
/// breaks the walk otherwise.
pub fn resolve(binding: &SqlBinding, context: &InvocationContext) -> Result<Value> {
    let path = binding.to_string();
    let name = binding.name();

    let root = match context.parameter(name) {
        Some(r) => r,
        None => return Err(new_unknown_parameter_error(name, &path).into()),
    };

    if binding.path.len() == 1 {
        return terminal_value(root, name, &path);
    }

    let mut current = {
        let object = require_object(root, name, &binding.path[1], &path)?;

        extract_value(object, name, &binding.path[1], &path)?
    };

    for i in 2..binding.path.len() {
        let a_name = &binding.path[i - 1];
        let b_name = &binding.path[i];

        let next = match &current {
            Resolved::Object(o) => extract_value(o.as_ref(), a_name, b_name, &path)?,
            Resolved::Value(_) => {
                return Err(new_unresolvable_property_error(b_name, a_name, &path).into())
            }
        };

        current = next;
    }

    terminal_value(&current, &binding.path[binding.path.len() - 1], &path)
}

fn require_object<'a>(
    resolved: &'a Resolved,
    name: &str,
    qualifier: &str,
    path: &str,
) -> Result<&'a dyn Resolve> {
    match resolved {
        Resolved::Object(o) => Ok(o.as_ref()),
        Resolved::Value(_) => Err(new_unresolvable_property_error(qualifier, name, path).into()),
    }
}

/// Resolve qualifier `b_name` against the object produced by `a_name`,
/// trying each strategy in priority order.
fn extract_value(object: &dyn Resolve, a_name: &str, b_name: &str, path: &str) -> Result<Resolved> {
    match object.is_accessor(b_name) {
        Access::Found(Resolved::Value(v)) if v.is_boolean() => {
            return Ok(Resolved::Value(v));
        }
        // a boolean-style accessor with a non-boolean result does not count
        Access::Found(_) => {}
        Access::NotFound => {}
        Access::Denied(detail) => {
            return Err(
                new_access_denied_error(&format!("is_{}", b_name), path, &detail).into(),
            );
        }
        Access::Failed(cause) => {
            return Err(
                new_accessor_invocation_error(&format!("is_{}", b_name), path, cause).into(),
            );
        }
    }

    match object.get_accessor(b_name) {
        Access::Found(r) => return Ok(r),
        Access::NotFound => {}
        Access::Denied(detail) => {
            return Err(
                new_access_denied_error(&format!("get_{}", b_name), path, &detail).into(),
            );
        }
        Access::Failed(cause) => {
            return Err(
                new_accessor_invocation_error(&format!("get_{}", b_name), path, cause).into(),
            );
        }
    }

    match object.field(b_name) {
        Access::Found(r) => return Ok(r),
        Access::NotFound => {}
        Access::Denied(detail) => {
            return Err(new_access_denied_error(b_name, path, &detail).into());
        }
        Access::Failed(cause) => {
            return Err(new_accessor_invocation_error(b_name, path, cause).into());
        }
    }

    if object.is_mapping() {
        match object.key(b_name) {
            Access::Found(r) => return Ok(r),
            // an absent key binds NULL rather than failing resolution
            Access::NotFound => return Ok(Resolved::Value(Value::Null)),
            Access::Denied(detail) => {
                return Err(new_access_denied_error(b_name, path, &detail).into());
            }
            Access::Failed(cause) => {
                return Err(new_accessor_invocation_error(b_name, path, cause).into());
            }
        }
    }

    Err(new_unresolvable_property_error(b_name, a_name, path).into())
}

/// Turn the final resolved step into a bind value.
///
/// Paths are allowed to terminate on an object only when the object can
/// render itself as a leaf value.
fn terminal_value(resolved: &Resolved, qualifier: &str, path: &str) -> Result<Value> {
    match resolved {
        Resolved::Value(v) => Ok(v.clone()),
        Resolved::Object(o) => match o.as_sql_value() {
            Some(v) => Ok(v),
            None => Err(new_unresolvable_property_error(qualifier, qualifier, path).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, InvocationContext};

    use crate::error::ErrorKind;
    use crate::types::value::Value;
    use crate::types::SqlBinding;

    use crate::tests::{build_customer, build_ledger, build_person, build_vault};

    use std::collections::HashMap;
    use std::error::Error as StdError;

    fn binding(path: &[&str]) -> SqlBinding {
        SqlBinding::new(path.iter().map(|q| q.to_string()).collect())
    }

    #[test]
    fn resolves_root_parameter_value() {
        let mut context = InvocationContext::new();
        context.insert_value("tableName", &"Employees");

        let value = resolve(&binding(&["tableName"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Text("Employees".into()), "values match");
    }

    #[test]
    fn unknown_root_parameter_fails() {
        let context = InvocationContext::new();

        let err = resolve(&binding(&["missing", "id"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::UnknownParameter { err } => {
                assert_eq!(err.parameter(), "missing", "offending parameter reported");
                assert_eq!(err.path(), "missing.id", "full path reported");
            }
            other => panic!("expected UnknownParameter error, got {:?}", other),
        }
    }

    #[test]
    fn boolean_accessor_wins_when_it_yields_a_boolean() {
        let mut context = InvocationContext::new();
        context.insert_object("customer", build_customer());

        let value = resolve(&binding(&["customer", "active"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(
            value,
            Value::Boolean(true),
            "boolean accessor shadows the general accessor"
        );
    }

    #[test]
    fn non_boolean_result_falls_through_to_general_accessor() {
        let mut context = InvocationContext::new();
        context.insert_object("customer", build_customer());

        let value = resolve(&binding(&["customer", "name"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(
            value,
            Value::Text("Ada".into()),
            "a boolean-style accessor yielding text does not count"
        );
    }

    #[test]
    fn field_strategy_follows_accessors() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let value = resolve(&binding(&["person", "id"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Integer(7), "public field resolved");
    }

    #[test]
    fn multi_level_path_walks_nested_objects() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let value = resolve(&binding(&["person", "addr", "city"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Text("Basin City".into()), "nested walk resolves");
    }

    #[test]
    fn nested_public_field_resolves() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let value = resolve(&binding(&["person", "addr", "zip"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Text("00001".into()), "nested field resolved");
    }

    #[test]
    fn map_parameter_answers_keyed_lookup() {
        let mut m = HashMap::new();
        m.insert("country".to_string(), Value::Text("US".into()));

        let mut context = InvocationContext::new();
        context.insert_object("filters", m);

        let value = resolve(&binding(&["filters", "country"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Text("US".into()), "present key binds its value");
    }

    #[test]
    fn absent_map_key_binds_null() {
        let m: HashMap<String, Value> = HashMap::new();

        let mut context = InvocationContext::new();
        context.insert_object("filters", m);

        let value = resolve(&binding(&["filters", "region"]), &context)
            .expect("expected Ok from resolve");

        assert_eq!(value, Value::Null, "an absent key binds NULL, not an error");
    }

    #[test]
    fn no_strategy_match_is_unresolvable() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let err = resolve(&binding(&["person", "salary"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::UnresolvableProperty { err } => {
                assert_eq!(err.qualifier(), "salary", "offending qualifier reported");
                assert_eq!(err.object(), "person", "enclosing object reported");
                assert_eq!(err.path(), "person.salary", "full path reported");
            }
            other => panic!("expected UnresolvableProperty error, got {:?}", other),
        }
    }

    #[test]
    fn walking_through_a_leaf_value_is_unresolvable() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let err = resolve(&binding(&["person", "id", "digits"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::UnresolvableProperty { err } => {
                assert_eq!(err.qualifier(), "digits", "offending qualifier reported");
            }
            other => panic!("expected UnresolvableProperty error, got {:?}", other),
        }
    }

    #[test]
    fn denied_accessor_is_an_error_not_a_fallthrough() {
        let mut context = InvocationContext::new();
        context.insert_object("vault", build_vault());

        let err = resolve(&binding(&["vault", "combination"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::AccessDenied { err } => {
                assert_eq!(err.accessor(), "get_combination", "barred accessor named");
                assert_eq!(err.path(), "vault.combination", "full path reported");
            }
            other => panic!("expected AccessDenied error, got {:?}", other),
        }
    }

    #[test]
    fn failing_accessor_preserves_its_cause() {
        let mut context = InvocationContext::new();
        context.insert_object("ledger", build_ledger());

        let err = resolve(&binding(&["ledger", "balance"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::AccessorInvocation { err } => {
                assert_eq!(err.accessor(), "get_balance", "failing accessor named");

                let cause = err.source().expect("expected a preserved cause");
                assert_eq!(
                    cause.to_string(),
                    "ledger backend offline",
                    "original cause preserved"
                );
            }
            other => panic!("expected AccessorInvocation error, got {:?}", other),
        }
    }

    #[test]
    fn terminal_object_without_leaf_rendition_is_unresolvable() {
        let mut context = InvocationContext::new();
        context.insert_object("person", build_person());

        let err = resolve(&binding(&["person", "addr"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::UnresolvableProperty { .. } => {}
            other => panic!("expected UnresolvableProperty error, got {:?}", other),
        }
    }

    #[test]
    fn root_value_with_trailing_qualifiers_is_unresolvable() {
        let mut context = InvocationContext::new();
        context.insert_value("id", &7i64);

        let err = resolve(&binding(&["id", "value"]), &context)
            .expect_err("expected Err from resolve");

        match err.kind() {
            ErrorKind::UnresolvableProperty { .. } => {}
            other => panic!("expected UnresolvableProperty error, got {:?}", other),
        }
    }
}
