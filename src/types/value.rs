use super::Null;

use chrono::prelude::*;

use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use std::fmt;

//borrowed from rusqlite's Value type, with a Boolean variant so the
//boolean-accessor resolution strategy can recognize its results
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The value is a `NULL` value.
    Null,
    /// The value is a boolean.
    Boolean(bool),
    /// The value is a signed integer.
    Integer(i64),
    /// The value is a floating point number.
    Real(f64),
    /// The value is a text string.
    Text(String),
    /// The value is a blob of data
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_boolean(&self) -> bool {
        match self {
            Value::Boolean(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(t) => write!(f, "{}", t),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Conversion of argument leaves into bind values.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Null {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

macro_rules! from_i64(
    ($t:ty) => (
        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Integer(i64::from(*self))
            }
        }
    )
);

from_i64!(i8);
from_i64!(i16);
from_i64!(i32);
from_i64!(u8);
from_i64!(u16);
from_i64!(u32);

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl<Tz: TimeZone> ToValue for DateTime<Tz> {
    fn to_value(&self) -> Value {
        let utc = self.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%S%.f");

        Value::Text(utc.to_string())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

macro_rules! from_nullable(
    ($t: ty) => (
        impl ToValue for Option<$t> {
            fn to_value(&self) -> Value {
                match self {
                    Some(v) => v.to_value(),
                    None => Value::Null,
                }
            }
        }
    )
);

from_nullable!(i8);
from_nullable!(i16);
from_nullable!(i32);
from_nullable!(u8);
from_nullable!(u16);
from_nullable!(u32);
from_nullable!(bool);
from_nullable!(isize);
from_nullable!(i64);
from_nullable!(f64);
from_nullable!(String);
from_nullable!(Vec<u8>);

/// One step of path resolution: either a leaf bind value or a structural
/// object that later qualifiers resolve against.
pub enum Resolved {
    Value(Value),
    Object(Box<dyn Resolve>),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolved::Value(v) => write!(f, "Resolved::Value({:?})", v),
            Resolved::Object(_) => write!(f, "Resolved::Object(..)"),
        }
    }
}

/// Outcome of one resolution strategy against one qualifier.
///
/// `NotFound` moves resolution on to the next strategy; the other outcomes
/// end it. A strategy that locates an accessor but cannot run it reports
/// `Denied` or `Failed` rather than `NotFound`, so "try the next strategy"
/// stays distinguishable from "the located accessor broke".
#[derive(Debug)]
pub enum Access {
    NotFound,
    Found(Resolved),
    Denied(String),
    Failed(Box<dyn StdError + Send + Sync>),
}

impl Access {
    /// A strategy hit yielding a leaf bind value.
    pub fn value<T: ToValue + ?Sized>(v: &T) -> Self {
        Access::Found(Resolved::Value(v.to_value()))
    }

    /// A strategy hit yielding a structural object for further walking.
    pub fn object<R: Resolve + 'static>(object: R) -> Self {
        Access::Found(Resolved::Object(Box::new(object)))
    }

    /// A located accessor barred by visibility.
    pub fn denied(detail: &str) -> Self {
        Access::Denied(detail.to_string())
    }

    /// A located accessor that raised while being invoked.
    pub fn failed<E: Into<Box<dyn StdError + Send + Sync>>>(cause: E) -> Self {
        Access::Failed(cause.into())
    }
}

/// Structural introspection over heterogeneous argument objects.
///
/// Resolution strategies are tried in fixed priority order: boolean
/// accessor, general accessor, public field, then keyed lookup for mapping
/// values. Every method defaults to `NotFound`, so an implementor only
/// answers for the shapes it actually has.
pub trait Resolve {
    /// Boolean-returning accessor named for the qualifier. Results other
    /// than `Value::Boolean` are rejected by the resolver and the next
    /// strategy is tried.
    fn is_accessor(&self, _name: &str) -> Access {
        Access::NotFound
    }

    /// General accessor named for the qualifier; any result is accepted.
    fn get_accessor(&self, _name: &str) -> Access {
        Access::NotFound
    }

    /// Directly named public field.
    fn field(&self, _name: &str) -> Access {
        Access::NotFound
    }

    /// Keyed lookup using the qualifier as key. Consulted only when
    /// `is_mapping()` reports true.
    fn key(&self, _name: &str) -> Access {
        Access::NotFound
    }

    /// Whether this value is a key/value mapping structure.
    fn is_mapping(&self) -> bool {
        false
    }

    /// A leaf rendition of this object, used when a qualifier path
    /// terminates on the object itself.
    fn as_sql_value(&self) -> Option<Value> {
        None
    }
}

impl Resolve for HashMap<String, Value> {
    fn key(&self, name: &str) -> Access {
        match self.get(name) {
            Some(v) => Access::Found(Resolved::Value(v.clone())),
            None => Access::NotFound,
        }
    }

    fn is_mapping(&self) -> bool {
        true
    }
}

impl Resolve for BTreeMap<String, Value> {
    fn key(&self, name: &str) -> Access {
        match self.get(name) {
            Some(v) => Access::Found(Resolved::Value(v.clone())),
            None => Access::NotFound,
        }
    }

    fn is_mapping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, Resolve, Resolved, ToValue, Value};

    use crate::types::Null;

    use chrono::prelude::*;

    use std::collections::HashMap;

    #[test]
    fn integer_conversions() {
        assert_eq!(3i8.to_value(), Value::Integer(3), "i8 converts");
        assert_eq!(3u32.to_value(), Value::Integer(3), "u32 converts");
        assert_eq!(3i64.to_value(), Value::Integer(3), "i64 converts");
    }

    #[test]
    fn boolean_conversion_is_distinct_from_integer() {
        assert_eq!(true.to_value(), Value::Boolean(true), "bool converts");
        assert!(true.to_value().is_boolean(), "boolean variant recognized");
        assert!(!1i64.to_value().is_boolean(), "integers are not booleans");
    }

    #[test]
    fn nullable_conversions() {
        let absent: Option<String> = None;

        assert_eq!(absent.to_value(), Value::Null, "None converts to NULL");
        assert_eq!(Null().to_value(), Value::Null, "Null marker converts");
        assert_eq!(
            Some("x".to_string()).to_value(),
            Value::Text("x".into()),
            "Some converts to the inner value"
        );
    }

    #[test]
    fn datetime_converts_to_utc_text() {
        let dt = Utc.ymd(2004, 7, 1).and_hms_milli(10, 30, 0, 250);

        assert_eq!(
            dt.to_value(),
            Value::Text("2004-07-01T10:30:00.250".into()),
            "timestamps render as UTC text"
        );
    }

    #[test]
    fn map_answers_keyed_lookup() {
        let mut m = HashMap::new();
        m.insert("country".to_string(), Value::Text("US".into()));

        assert!(m.is_mapping(), "maps report as mappings");

        match m.key("country") {
            Access::Found(Resolved::Value(v)) => {
                assert_eq!(v, Value::Text("US".into()), "present key found")
            }
            other => panic!("expected Found, got {:?}", other),
        }

        match m.key("region") {
            Access::NotFound => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
