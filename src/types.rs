//! Types for compiled SQL statement templates.
//!
//! A raw template such as `"SELECT * FROM {tableName}"` compiles into a
//! [`SqlStatement`]: an ordered list of fragments, each either literal text
//! or a parameter substitution identified by a dotted qualifier path. The
//! compiled statement is immutable and reused for every invocation.
pub mod value;

use crate::error::{new_template_syntax_error, new_unknown_type_error, Result, UnknownTypeError};

use crate::parser::template;

use std::convert::TryFrom;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

pub use nom_locate::LocatedSpan;

pub type Span<'a> = LocatedSpan<&'a str>;

/// Marker for a SQL NULL argument value.
pub struct Null();

/// Location of a parsed fragment within its source template.
#[derive(Debug, Hash, Eq, PartialEq, Default, Clone)]
pub struct ParsedSpan {
    pub line:     u32,
    pub offset:   usize,
    pub fragment: String,
}

impl ParsedSpan {
    pub fn new(line: u32, offset: usize, fragment: &str) -> Self {
        Self {
            line,
            offset,
            fragment: fragment.to_string(),
        }
    }
}

// explicit lifetime for Span is required: Span<'a>
// because "implicit elided lifetime is not allowed here"
impl<'a> From<Span<'a>> for ParsedSpan {
    fn from(span: Span) -> Self {
        Self {
            line:     span.line,
            offset:   span.offset,
            fragment: span.fragment.to_string(),
        }
    }
}

impl fmt::Display for ParsedSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "character {} line {}", self.offset, self.line)
    }
}

/// A parsed item and the position it was parsed at.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ParsedItem<T>
where
    T: Debug + Default + PartialEq + Clone,
{
    pub item:     T,
    pub position: ParsedSpan,
}

impl<T> ParsedItem<T>
where
    T: Debug + Default + PartialEq + Clone,
{
    pub fn new(item: T, position: ParsedSpan) -> Self {
        Self { item, position }
    }

    pub fn from_span(item: T, span: Span) -> Self {
        Self {
            item,
            position: ParsedSpan::from(span),
        }
    }

    pub fn item(&self) -> T {
        self.item.clone()
    }
}

impl<T: fmt::Display + Debug + Default + PartialEq + Clone> fmt::Display for ParsedItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.item)
    }
}

/// SQL type codes attached to bind values.
///
/// The names mirror the portable SQL type names a statement annotation may
/// declare; `code()` exposes the corresponding numeric driver code. Type
/// coercion itself is the driver's concern, not handled here.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum SqlType {
    /// Sentinel for fragments with no declared type.
    Unknown,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Blob,
    Clob,
    Boolean,
}

impl SqlType {
    /// The numeric driver type code for this type.
    pub fn code(self) -> i32 {
        match self {
            SqlType::Unknown => i32::min_value(),
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::LongVarchar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Null => 0,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Boolean => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SqlType::Unknown => "UNKNOWN",
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Boolean => "BOOLEAN",
        }
    }
}

impl Default for SqlType {
    fn default() -> Self {
        SqlType::Unknown
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `string -> SqlType` lookup, the surface consumed when a statement
/// annotation declares a parameter's SQL type by name.
impl FromStr for SqlType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, UnknownTypeError> {
        match s.to_uppercase().as_str() {
            "BIT" => Ok(SqlType::Bit),
            "TINYINT" => Ok(SqlType::TinyInt),
            "SMALLINT" => Ok(SqlType::SmallInt),
            "INTEGER" | "INT" => Ok(SqlType::Integer),
            "BIGINT" => Ok(SqlType::BigInt),
            "FLOAT" => Ok(SqlType::Float),
            "REAL" => Ok(SqlType::Real),
            "DOUBLE" => Ok(SqlType::Double),
            "NUMERIC" => Ok(SqlType::Numeric),
            "DECIMAL" => Ok(SqlType::Decimal),
            "CHAR" => Ok(SqlType::Char),
            "VARCHAR" => Ok(SqlType::Varchar),
            "LONGVARCHAR" => Ok(SqlType::LongVarchar),
            "DATE" => Ok(SqlType::Date),
            "TIME" => Ok(SqlType::Time),
            "TIMESTAMP" => Ok(SqlType::Timestamp),
            "BINARY" => Ok(SqlType::Binary),
            "VARBINARY" => Ok(SqlType::VarBinary),
            "LONGVARBINARY" => Ok(SqlType::LongVarBinary),
            "NULL" => Ok(SqlType::Null),
            "BLOB" => Ok(SqlType::Blob),
            "CLOB" => Ok(SqlType::Clob),
            "BOOLEAN" => Ok(SqlType::Boolean),
            _ => Err(new_unknown_type_error(s)),
        }
    }
}

/// One compiled fragment of a statement template.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Sql {
    Literal(ParsedItem<SqlLiteral>),
    Binding(ParsedItem<SqlBinding>),
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sql::Literal(t) => write!(f, "{}", t),
            Sql::Binding(b) => write!(f, "{{{}}}", b),
        }
    }
}

/// A run of literal statement text, preserved verbatim.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct SqlLiteral {
    pub value: String,
}

impl SqlLiteral {
    pub fn new(v: String) -> Self {
        Self { value: v }
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A parameter substitution fragment: a dotted qualifier path rooted at a
/// method parameter name, plus the declared SQL type of the bound value.
///
/// The path always has at least one qualifier; the first must name a formal
/// parameter of the invoking method.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct SqlBinding {
    pub path:     Vec<String>,
    pub sql_type: SqlType,
}

impl SqlBinding {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            sql_type: SqlType::Unknown,
        }
    }

    /// The root qualifier, naming the method parameter this path starts at.
    pub fn name(&self) -> &str {
        &self.path[0]
    }
}

impl fmt::Display for SqlBinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path.join("."))
    }
}

/// A compiled statement template: the raw source and its ordered fragments.
///
/// Built once per distinct template and reused for every invocation; nothing
/// in it is call-specific, so sharing across concurrent callers is safe.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct SqlStatement {
    pub raw: String,
    pub sql: Vec<Sql>,
}

impl SqlStatement {
    /// Compile a raw annotated statement into its fragment list.
    ///
    /// Fails with a syntax error on unbalanced or malformed `{`/`}`
    /// delimiters; there is no partial result.
    pub fn parse(raw: &str) -> Result<Self> {
        template(Span::new(raw))
    }

    pub fn new(raw: String) -> Self {
        Self { raw, sql: vec![] }
    }

    pub fn push_sql(&mut self, c: Sql) {
        self.sql.push(c);
    }

    /// The binding fragments in statement order.
    pub fn bindings(&self) -> impl Iterator<Item = &ParsedItem<SqlBinding>> {
        self.sql.iter().filter_map(|s| match s {
            Sql::Binding(b) => Some(b),
            _ => None,
        })
    }

    pub fn binding_count(&self) -> usize {
        self.bindings().count()
    }

    /// Attach declared SQL types to the binding fragments, one optional type
    /// name per binding in statement order.
    ///
    /// Declared types arrive out of band from the statement annotation's
    /// metadata, so this runs at compile time, never per call. Fails with
    /// `UnknownTypeError` for an unrecognized name and with a syntax error
    /// when the count does not match the number of bindings.
    pub fn with_declared_types(&self, declared: &[Option<&str>]) -> Result<Self> {
        if declared.len() != self.binding_count() {
            return Err(new_template_syntax_error(&format!(
                "declared {} parameter types for {} parameter substitutions",
                declared.len(),
                self.binding_count()
            ))
            .into());
        }

        let mut out = self.clone();
        let mut i = 0;

        for sql in out.sql.iter_mut() {
            if let Sql::Binding(b) = sql {
                if let Some(name) = declared[i] {
                    b.item.sql_type = name.parse()?;
                }

                i += 1;
            }
        }

        Ok(out)
    }
}

impl TryFrom<&str> for SqlStatement {
    type Error = crate::error::Error;

    fn try_from(raw: &str) -> Result<Self> {
        SqlStatement::parse(raw)
    }
}

impl FromStr for SqlStatement {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        SqlStatement::parse(s)
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for s in &self.sql {
            write!(f, "{}", s)?;
        }

        write!(f, "")
    }
}
