use std::error::Error as StdError;
use std::fmt;
use std::result;

use crate::types::ParsedSpan;

//NOTE: this mod borrowed heavily from rust-csv's csv::error:Error to get started

/// A crate private constructor for `Error`.
pub fn new_error(kind: ErrorKind) -> Error {
    // use `pub(crate)` when it stabilizes.
    Error(Box::new(kind))
}

/// A type alias for `Result<T, sql-binder::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error can occur when compiling a statement template or resolving its
/// bind values against an invocation context.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    /// Return the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwrap this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns true if this is a template syntax error.
    ///
    /// If this is true, the underlying `ErrorKind` is guaranteed to be
    /// `ErrorKind::Syntax`.
    pub fn is_syntax_error(&self) -> bool {
        match *self.0 {
            ErrorKind::Syntax { .. } => true,
            _ => false,
        }
    }
}

/// The specific type of an error.
#[derive(Debug)]
pub enum ErrorKind {
    /// Malformed placeholder delimiters detected while compiling a template.
    Syntax {
        position: Option<ParsedSpan>,
        /// The corresponding syntax error.
        err: TemplateSyntaxError,
    },
    /// A placeholder's root identifier does not name a declared parameter.
    UnknownParameter { err: UnknownParameterError },
    /// No accessor, field or key strategy succeeded for a path segment.
    UnresolvableProperty { err: UnresolvablePropertyError },
    /// A located accessor raised an error during invocation.
    AccessorInvocation { err: AccessorInvocationError },
    /// A located accessor or field is not invocable due to visibility.
    AccessDenied { err: AccessDeniedError },
    /// A declared type string was not recognized by the type mapping.
    UnknownType { err: UnknownTypeError },
    /// Hints that destructuring should not be exhaustive.
    ///
    /// This enum may grow additional variants, so this makes sure clients
    /// don't count on exhaustive matching. (Otherwise, adding a new variant
    /// could break existing code.)
    #[doc(hidden)]
    __Nonexhaustive,
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self.0 {
            ErrorKind::Syntax { ref err, .. } => Some(err),
            ErrorKind::UnknownParameter { ref err } => Some(err),
            ErrorKind::UnresolvableProperty { ref err } => Some(err),
            ErrorKind::AccessorInvocation { ref err } => Some(err),
            ErrorKind::AccessDenied { ref err } => Some(err),
            ErrorKind::UnknownType { ref err } => Some(err),
            _ => unreachable!(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Syntax {
                position: Some(ref position),
                ref err,
            } => write!(f, "template syntax error: {}: {}", position, err),
            ErrorKind::Syntax {
                position: None,
                ref err,
            } => write!(f, "template syntax error: {}", err),
            ErrorKind::UnknownParameter { ref err } => err.fmt(f),
            ErrorKind::UnresolvableProperty { ref err } => err.fmt(f),
            ErrorKind::AccessorInvocation { ref err } => err.fmt(f),
            ErrorKind::AccessDenied { ref err } => err.fmt(f),
            ErrorKind::UnknownType { ref err } => err.fmt(f),
            _ => unreachable!(),
        }
    }
}

/// A malformed placeholder delimiter in a statement template.
///
/// Compilation of the template fails as a whole; there is no partial
/// fragment list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TemplateSyntaxError {
    detail: String,
}

/// Create a new TemplateSyntaxError.
pub fn new_template_syntax_error(detail: &str) -> TemplateSyntaxError {
    TemplateSyntaxError {
        detail: detail.to_string(),
    }
}

impl TemplateSyntaxError {
    /// A short description of the offending delimiter.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl StdError for TemplateSyntaxError {}

impl fmt::Display for TemplateSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl From<TemplateSyntaxError> for Error {
    fn from(err: TemplateSyntaxError) -> Error {
        new_error(ErrorKind::Syntax { position: None, err })
    }
}

/// A placeholder whose root qualifier does not match any formal parameter of
/// the invoked method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownParameterError {
    parameter: String,
    path:      String,
}

/// Create a new UnknownParameterError.
pub fn new_unknown_parameter_error(parameter: &str, path: &str) -> UnknownParameterError {
    UnknownParameterError {
        parameter: parameter.to_string(),
        path:      path.to_string(),
    }
}

impl UnknownParameterError {
    /// The offending root qualifier.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The full original path of the placeholder.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl StdError for UnknownParameterError {}

impl fmt::Display for UnknownParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid argument name in SQL statement: {} (resolving {})",
            self.parameter, self.path
        )
    }
}

impl From<UnknownParameterError> for Error {
    fn from(err: UnknownParameterError) -> Error {
        new_error(ErrorKind::UnknownParameter { err })
    }
}

/// No accessor, field or keyed-lookup strategy produced a value for a path
/// segment. Terminal and non-retryable for the call that raised it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnresolvablePropertyError {
    qualifier: String,
    object:    String,
    path:      String,
}

/// Create a new UnresolvablePropertyError.
pub fn new_unresolvable_property_error(
    qualifier: &str,
    object: &str,
    path: &str,
) -> UnresolvablePropertyError {
    UnresolvablePropertyError {
        qualifier: qualifier.to_string(),
        object:    object.to_string(),
        path:      path.to_string(),
    }
}

impl UnresolvablePropertyError {
    /// The path segment that could not be resolved.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The enclosing object the segment was resolved against.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// The full original path of the placeholder.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl StdError for UnresolvablePropertyError {}

impl fmt::Display for UnresolvablePropertyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unable to find a suitable way of retrieving property {} out of object {} (resolving {})",
            self.qualifier, self.object, self.path
        )
    }
}

impl From<UnresolvablePropertyError> for Error {
    fn from(err: UnresolvablePropertyError) -> Error {
        new_error(ErrorKind::UnresolvableProperty { err })
    }
}

/// A located accessor raised an error while being invoked. Distinct from
/// "accessor not found"; the original cause is preserved.
#[derive(Debug)]
pub struct AccessorInvocationError {
    accessor: String,
    path:     String,
    cause:    Box<dyn StdError + Send + Sync>,
}

/// Create a new AccessorInvocationError.
pub fn new_accessor_invocation_error(
    accessor: &str,
    path: &str,
    cause: Box<dyn StdError + Send + Sync>,
) -> AccessorInvocationError {
    AccessorInvocationError {
        accessor: accessor.to_string(),
        path:     path.to_string(),
        cause,
    }
}

impl AccessorInvocationError {
    /// The accessor that raised.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// The full original path of the placeholder.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl StdError for AccessorInvocationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

impl fmt::Display for AccessorInvocationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "error raised when executing {} to use as parameter (resolving {}): {}",
            self.accessor, self.path, self.cause
        )
    }
}

impl From<AccessorInvocationError> for Error {
    fn from(err: AccessorInvocationError) -> Error {
        new_error(ErrorKind::AccessorInvocation { err })
    }
}

/// A located accessor or field that is not invocable due to visibility.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessDeniedError {
    accessor: String,
    path:     String,
    detail:   String,
}

/// Create a new AccessDeniedError.
pub fn new_access_denied_error(accessor: &str, path: &str, detail: &str) -> AccessDeniedError {
    AccessDeniedError {
        accessor: accessor.to_string(),
        path:     path.to_string(),
        detail:   detail.to_string(),
    }
}

impl AccessDeniedError {
    /// The accessor or field that was barred.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// The full original path of the placeholder.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl StdError for AccessDeniedError {}

impl fmt::Display for AccessDeniedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unable to access {} (resolving {}): {}",
            self.accessor, self.path, self.detail
        )
    }
}

impl From<AccessDeniedError> for Error {
    fn from(err: AccessDeniedError) -> Error {
        new_error(ErrorKind::AccessDenied { err })
    }
}

/// A declared SQL type string that the type mapping does not recognize.
/// Fatal at compile time for the fragment that declared it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownTypeError {
    name: String,
}

/// Create a new UnknownTypeError.
pub fn new_unknown_type_error(name: &str) -> UnknownTypeError {
    UnknownTypeError {
        name: name.to_string(),
    }
}

impl UnknownTypeError {
    /// The unrecognized type name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl StdError for UnknownTypeError {}

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized SQL type name: {}", self.name)
    }
}

impl From<UnknownTypeError> for Error {
    fn from(err: UnknownTypeError) -> Error {
        new_error(ErrorKind::UnknownType { err })
    }
}
