use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::panic::Location;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ErrorKind

/// The category of a failure raised while registering, encoding or decoding.
///
/// Every [`Error`] carries exactly one kind. The kind is stable and meant to
/// be matched on; the message is meant for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The attribute table of a type is inconsistent, or refers to a name
    /// (attribute or type) that was never registered.
    Configuration,
    /// A required attribute was read while it holds no value.
    UnsetAttribute,
    /// A value does not have the shape an attribute expects, or the
    /// attribute's validator rejected it.
    TypeMismatch,
    /// A decoded name or ordinal does not match any variant of the enum.
    InvalidEnum,
    /// A specialized attribute lacks the encode or decode function needed.
    MissingHandler,
    /// Nested traversal went deeper than the configured limit.
    DepthLimit,
    /// A type tag does not name any registered type.
    UnknownType,
    /// Input text is not a well-formed JSON object.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => f.pad("configuration"),
            Self::UnsetAttribute => f.pad("unset attribute"),
            Self::TypeMismatch => f.pad("type mismatch"),
            Self::InvalidEnum => f.pad("invalid enum"),
            Self::MissingHandler => f.pad("missing handler"),
            Self::DepthLimit => f.pad("depth limit"),
            Self::UnknownType => f.pad("unknown type"),
            Self::Syntax => f.pad("syntax"),
        }
    }
}

// -----------------------------------------------------------------------------
// PathSegment

/// One step from an object into one of its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Attribute(&'static str),
    Index(usize),
    Key(String),
}

fn render_path<'a>(segments: impl Iterator<Item = &'a PathSegment>) -> String {
    let mut out = String::new();
    for segment in segments {
        // Writing into a `String` never fails.
        let _ = match segment {
            PathSegment::Attribute(name) if out.is_empty() => write!(out, "{name}"),
            PathSegment::Attribute(name) => write!(out, ".{name}"),
            PathSegment::Index(index) => write!(out, "[{index}]"),
            PathSegment::Key(key) => write!(out, "[{key:?}]"),
        };
    }
    out
}

fn path_suffix(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::from(" at `");
    out.push_str(&render_path(path.iter().rev()));
    out.push('`');
    out
}

// -----------------------------------------------------------------------------
// Error

/// A typed, located failure.
///
/// Created through [`report`]. While an error propagates out of nested
/// handlers, each level prepends the attribute it was working on, so the
/// final error names the full path into the object graph:
///
/// ```text
/// type mismatch error at `shapes[2].origin.x`: expected integer, found string
/// ```
#[derive(Debug, Error)]
#[error("{kind} error{}: {message}", path_suffix(.path))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    // Innermost segment first.
    path: Vec<PathSegment>,
    location: Option<&'static Location<'static>>,
}

impl Error {
    /// Returns the [`ErrorKind`].
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message without kind or path.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location that reported the error, if recorded.
    #[inline]
    pub const fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    /// Returns the path from the outermost object to the failing attribute,
    /// e.g. `shapes[2].origin`. Empty when the failure is not attribute-bound.
    pub fn path(&self) -> String {
        render_path(self.path.iter().rev())
    }

    /// Returns the path segments, outermost first.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    #[inline]
    pub(crate) fn within_attribute(mut self, name: &'static str) -> Self {
        self.path.push(PathSegment::Attribute(name));
        self
    }

    #[inline]
    pub(crate) fn within_index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    #[inline]
    pub(crate) fn within_key(mut self, key: String) -> Self {
        self.path.push(PathSegment::Key(key));
        self
    }
}

/// A specialized [`Result`](core::result::Result) whose error defaults to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Raises a typed failure.
///
/// This is the single entry point for creating an [`Error`]: it records the
/// caller's source location and logs the report at `debug` level. Custom
/// encode/decode functions of specialized attributes should use it too, so
/// their failures look like every other failure of the framework.
///
/// # Examples
///
/// ```
/// use vc_parsable::{ErrorKind, report};
///
/// let err = report(ErrorKind::TypeMismatch, "expected a string");
/// assert_eq!(err.kind(), ErrorKind::TypeMismatch);
/// assert!(err.location().is_some());
/// assert_eq!(err.to_string(), "type mismatch error: expected a string");
/// ```
#[track_caller]
pub fn report(kind: ErrorKind, message: impl Into<String>) -> Error {
    let location = Location::caller();
    let message = message.into();
    log::debug!("{kind} error reported at {location}: {message}");
    Error {
        kind,
        message,
        path: Vec::new(),
        location: Some(location),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::{ErrorKind, PathSegment, report};

    #[test]
    fn display_without_path() {
        let err = report(ErrorKind::InvalidEnum, "no variant named `Purple`");
        assert_eq!(
            err.to_string(),
            "invalid enum error: no variant named `Purple`"
        );
        assert_eq!(err.path(), "");
    }

    #[test]
    fn path_accumulates_outward() {
        let err = report(ErrorKind::TypeMismatch, "expected integer")
            .within_attribute("x")
            .within_attribute("origin")
            .within_index(2)
            .within_attribute("shapes");

        assert_eq!(err.path(), "shapes[2].origin.x");
        assert_eq!(
            err.to_string(),
            "type mismatch error at `shapes[2].origin.x`: expected integer"
        );
        assert_eq!(
            err.segments().next(),
            Some(&PathSegment::Attribute("shapes"))
        );
    }

    #[test]
    fn dictionary_keys_are_quoted() {
        let err = report(ErrorKind::UnsetAttribute, "missing")
            .within_attribute("y")
            .within_key(String::from("north"))
            .within_attribute("anchors");
        assert_eq!(err.path(), "anchors[\"north\"].y");
    }

    #[test]
    fn location_points_at_caller() {
        let line = line!() + 1;
        let err = report(ErrorKind::Configuration, "bad table");
        let location = err.location().unwrap();
        assert_eq!(location.line(), line);
        assert!(location.file().ends_with("error.rs"));
        assert_eq!(err.message(), "bad table");
    }
}
