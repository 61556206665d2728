//! Error values that carry their own failure chain.

use crate::trace::{Frame, Trace};
use std::fmt;
use std::panic::Location;

/// An error annotated with the chain of source locations it passed through.
///
/// The root (deepest) frame is captured where the error is created; each
/// propagation site adds an outer frame via [`TraceExt::frame`]. This is the
/// value lower layers return so that the portal error can report where a
/// failure actually originated.
///
/// # Example
///
/// ```rust
/// use docportal_error::{TraceExt, TracedError};
///
/// fn load_key() -> Result<String, TracedError> {
///     Err(TracedError::new("OPENAI_API_KEY is not set"))
/// }
///
/// fn load_provider() -> Result<String, TracedError> {
///     load_key().frame("load_provider")
/// }
///
/// let err = load_provider().unwrap_err();
/// assert_eq!(err.trace().len(), 2);
/// ```
pub struct TracedError {
    message: String,
    trace: Trace,
    source: Option<anyhow::Error>,
}

impl TracedError {
    /// Create a traced error; the root frame is captured at the caller
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Trace::capture(""),
            source: None,
        }
    }

    /// Wrap a foreign error, keeping it as the source.
    ///
    /// The message is derived from the wrapped error's own text; the root
    /// frame is captured at the caller (the catch site).
    #[track_caller]
    pub fn wrap(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source = source.into();
        Self {
            message: source.to_string(),
            trace: Trace::capture(context),
            source: Some(source),
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the recorded chain
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Get the wrapped source error (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    /// Prepend an outer frame; the root frame stays deepest
    pub fn push_outer(mut self, frame: Frame) -> Self {
        self.trace.push_outer(frame);
        self
    }

    /// Decompose into message, trace, and source
    pub fn into_parts(self) -> (String, Trace, Option<anyhow::Error>) {
        (self.message, self.trace, self.source)
    }

    /// Render the full chain: every frame, then the failing value itself
    pub fn render_chain(&self) -> String {
        let mut out = self.trace.render();
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("error: ");
        out.push_str(&self.message);
        out
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        write!(f, "{}", self.trace.render())
    }
}

impl std::error::Error for TracedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Extension for annotating a propagating `Result` with the caller's frame.
pub trait TraceExt<T> {
    /// Add the caller's source location as an outer frame on the error
    fn frame(self, context: &str) -> Result<T, TracedError>;
}

impl<T> TraceExt<T> for Result<T, TracedError> {
    #[track_caller]
    fn frame(self, context: &str) -> Result<T, TracedError> {
        // Location must be taken here, in the track_caller body; a closure
        // would report its own definition site instead.
        let location = Location::caller();
        self.map_err(|e| e.push_outer(Frame::new(location.file(), location.line(), context)))
    }
}
