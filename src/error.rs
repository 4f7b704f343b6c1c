use std::sync::Arc;

/// An error that can occur in this crate.
///
/// This crate follows the "one error type" pattern: every fallible operation
/// returns this type. Finer grained error types proved difficult in the face
/// of composition, so instead, a small number of predicates are provided for
/// callers that need to distinguish the broad classes of failure:
///
/// * [`Error::is_range`] is true when a well-formed value fell outside its
/// valid domain. For example, a civil date beyond the representable range,
/// or a rounding increment that doesn't divide its maximum.
/// * [`Error::is_unimplemented`] is true when an operation was attempted on
/// a calendar whose date algorithms are declared but deliberately not
/// implemented. This is a scope boundary, not a bug, and it is kept
/// distinguishable so callers (and tests) can assert on scope.
/// * Everything else is a validation failure: malformed input strings,
/// unsupported identifiers, invalid era names or month codes, disallowed
/// unit combinations. [`Error::is_invalid`] reports this class.
///
/// Errors form a causal chain. The `Display` impl writes the chain from the
/// highest level context down to the root cause, separated by `: `.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cloneable and cheap to pass
    /// around. It also keeps the size of `Error` to one word, which matters
    /// because nearly every routine in this crate returns a `Result`.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    /// An ad hoc validation error with a rendered message.
    Adhoc(Box<str>),
    /// An input value that is out of its allowed range.
    Range { what: &'static str, given: i128, min: i128, max: i128 },
    /// An operation on a calendar whose algorithms are declared but not
    /// implemented.
    Unimplemented { calendar: &'static str },
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// It is expected to use [`format_args!`](format_args) to create the
    /// `core::fmt::Arguments`. The `err!` macro in this crate does exactly
    /// that.
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        let message = message.to_string().into_boxed_str();
        Error::from(ErrorKind::Adhoc(message))
    }

    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is out
    /// of range. (e.g., "days")
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range {
            what,
            given: given.into(),
            min: min.into(),
            max: max.into(),
        })
    }

    /// Creates a new error indicating that the date algorithms for the
    /// calendar with the given identifier are not implemented.
    #[inline(never)]
    #[cold]
    pub(crate) fn unimplemented(calendar: &'static str) -> Error {
        Error::from(ErrorKind::Unimplemented { calendar })
    }

    /// Returns true when this error originated from a well-formed value that
    /// is outside its valid domain.
    pub fn is_range(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Range { .. })
    }

    /// Returns true when this error originated from an operation on a
    /// calendar whose algorithms are declared but not implemented.
    pub fn is_unimplemented(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Unimplemented { .. })
    }

    /// Returns true when this error originated from malformed or otherwise
    /// invalid input. This is the catch-all class: any error that is neither
    /// a range failure nor an "unimplemented calendar" failure.
    pub fn is_invalid(&self) -> bool {
        !self.is_range() && !self.is_unimplemented()
    }

    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        let inner = Arc::get_mut(&mut err.inner)
            .expect("consequent error must have one reference");
        assert!(inner.cause.is_none(), "cause of consequent must be `None`");
        inner.cause = Some(self);
        err
    }

    /// Returns the root error in this chain.
    fn root(&self) -> &Error {
        // OK because `Error::chain` is guaranteed to return a non-empty
        // iterator.
        self.chain().last().unwrap()
    }

    /// Returns a chain of error values, starting with the most recent
    /// context and ending with the root cause.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Adhoc(ref msg) => f.write_str(msg),
            ErrorKind::Range { what, given, min, max } => {
                write!(
                    f,
                    "parameter '{what}' with value {given} \
                     is not in the required range of {min}..={max}",
                )
            }
            ErrorKind::Unimplemented { calendar } => {
                write!(
                    f,
                    "date algorithms for the '{calendar}' calendar \
                     are not implemented",
                )
            }
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This exists to make `Error::context` and `ErrorContext` work over both
/// `Error` values and things that can be turned into them, without making
/// any `From` impls part of the public API.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// A trait for contextualizing error values.
///
/// This makes it easy to contextualize either `Error` or `Result<T, Error>`.
/// Specifically, in the latter case, it absolves one of the need to call
/// `map_err` everywhere one wants to add context to an error.
///
/// This trick was borrowed from `anyhow`.
pub(crate) trait ErrorContext<T> {
    /// Contextualize the given consequent error with this (`self`) error as
    /// the cause.
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but hides error construction within a closure.
    ///
    /// This is useful when error construction is potentially "costly" (i.e.,
    /// it allocates). The closure avoids paying the cost of contextual error
    /// creation in the happy path.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T> ErrorContext<T> for Result<T, Error> {
    #[inline(always)]
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| err.context_impl(consequent.into_error()))
    }

    #[inline(always)]
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| err.context_impl(consequent().into_error()))
    }
}

/// A convenience macro for constructing an ad hoc validation error.
macro_rules! err {
    ($($tt:tt)*) => {
        crate::error::Error::from_args(format_args!($($tt)*))
    }
}

pub(crate) use err;
