//! The portal's structured error type

use crate::context::Context;
use crate::traced::TracedError;
use std::fmt;

/// The enriched error record for all document-portal operations.
///
/// Built exactly once, at the point a lower-level failure is caught, from a
/// message plus a [`Context`] describing where cause information comes from.
/// Every field is always populated: resolution failures degrade to the
/// `"<unknown>"` / `-1` / `""` sentinels instead of producing a secondary
/// failure. Immutable after construction.
///
/// # Example
///
/// ```rust
/// use docportal_error::{Context, PortalError, TracedError};
///
/// let cause = TracedError::new("model returned empty response");
/// let err = PortalError::new("error comparing documents", Context::Error(cause));
///
/// assert!(err.compact().starts_with("Error in ["));
/// assert!(err.verbose().contains("Traceback:"));
/// ```
pub struct PortalError {
    message: String,
    origin_file: String,
    origin_line: i64,
    trace_text: String,
    source: Option<anyhow::Error>,
}

impl PortalError {
    /// Build an error record from a message and a cause context.
    ///
    /// The message is always derived by converting the input to text, so
    /// both plain strings and caught error values are accepted. This never
    /// fails: a context with no usable chain yields the sentinels.
    pub fn new(message: impl fmt::Display, context: Context) -> Self {
        let resolved = context.resolve();
        Self {
            message: message.to_string(),
            origin_file: resolved.file,
            origin_line: resolved.line,
            trace_text: resolved.trace_text,
            source: resolved.source,
        }
    }

    /// Build an error record with no cause information
    pub fn without_cause(message: impl fmt::Display) -> Self {
        Self::new(message, Context::None)
    }

    /// Wrap a traced cause under a higher-level message
    pub fn wrap(message: impl fmt::Display, cause: TracedError) -> Self {
        Self::new(message, Context::Error(cause))
    }

    /// Build an error record whose message is the cause's own text
    pub fn from_cause(cause: TracedError) -> Self {
        let message = cause.message().to_string();
        Self::new(message, Context::Error(cause))
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the normalized message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source path of the deepest frame, or `"<unknown>"`
    pub fn origin_file(&self) -> &str {
        &self.origin_file
    }

    /// Get the line at the deepest frame, or `-1`
    pub fn origin_line(&self) -> i64 {
        self.origin_line
    }

    /// Get the rendered failure chain; empty when none was available
    pub fn trace_text(&self) -> &str {
        &self.trace_text
    }

    /// Whether any chain information was resolved
    pub fn has_trace(&self) -> bool {
        !self.trace_text.is_empty()
    }

    // =========================================================================
    // Renderings
    // =========================================================================

    /// Compact, logger-friendly single-line form (same as `Display`)
    pub fn compact(&self) -> String {
        self.to_string()
    }

    /// Compact form plus the full traceback block, when one is available
    pub fn verbose(&self) -> String {
        if self.trace_text.is_empty() {
            return self.compact();
        }
        format!("{}\nTraceback:\n{}", self.compact(), self.trace_text)
    }
}

// =============================================================================
// Display - the compact, single-line form for logs
// =============================================================================

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error in [{}] at line [{}] | Message: {}",
            self.origin_file, self.origin_line, self.message
        )
    }
}

// =============================================================================
// Debug - fixed key=value layout for diagnostics
// =============================================================================

impl fmt::Debug for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PortalError(file={}, line={}, message={})",
            self.origin_file, self.origin_line, self.message
        )
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<TracedError> for PortalError {
    fn from(cause: TracedError) -> Self {
        Self::from_cause(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{TraceProvider, UNKNOWN_FILE, UNKNOWN_LINE};
    use crate::trace::{Frame, Trace};

    fn depth_three_cause() -> TracedError {
        let err = TracedError::new("division by zero");
        err.push_outer(Frame::new("src/comparer.rs", 88, "compare_documents"))
            .push_outer(Frame::new("src/main.rs", 12, "main"))
    }

    #[test]
    fn test_message_is_text_form_of_input() {
        let err = PortalError::without_cause("error comparing documents");
        assert_eq!(err.message(), "error comparing documents");

        // a caught error value works as a message too
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = parse.to_string();
        let err = PortalError::without_cause(parse);
        assert_eq!(err.message(), expected);
    }

    #[test]
    fn test_no_context_yields_sentinels() {
        let err = PortalError::without_cause("boom");
        assert_eq!(err.origin_file(), UNKNOWN_FILE);
        assert_eq!(err.origin_line(), UNKNOWN_LINE);
        assert_eq!(err.trace_text(), "");
        assert!(!err.has_trace());
    }

    #[test]
    fn test_origin_is_deepest_frame_not_first() {
        let err = PortalError::wrap("error comparing documents", depth_three_cause());

        // root frame (captured in depth_three_cause) is deepest
        assert_eq!(err.origin_file(), file!());
        assert_ne!(err.origin_file(), "src/main.rs");
        assert!(err.origin_line() > 0);
    }

    #[test]
    fn test_compact_rendering_layout() {
        let err = PortalError::without_cause("bad payload");
        assert_eq!(
            err.compact(),
            "Error in [<unknown>] at line [-1] | Message: bad payload"
        );
        assert_eq!(err.to_string(), err.compact());
    }

    #[test]
    fn test_verbose_equals_compact_without_trace() {
        let err = PortalError::without_cause("bad payload");
        assert_eq!(err.verbose(), err.compact());
        assert!(!err.verbose().contains("Traceback:"));
    }

    #[test]
    fn test_verbose_appends_traceback_block() {
        let err = PortalError::wrap("error comparing documents", depth_three_cause());
        let expected = format!("{}\nTraceback:\n{}", err.compact(), err.trace_text());
        assert_eq!(err.verbose(), expected);
        assert!(err.trace_text().contains("src/comparer.rs:88"));
        assert!(err.trace_text().ends_with("error: division by zero"));
    }

    #[test]
    fn test_debug_is_parseable_key_value_layout() {
        let err = PortalError::without_cause("bad payload");
        assert_eq!(
            format!("{:?}", err),
            "PortalError(file=<unknown>, line=-1, message=bad payload)"
        );
    }

    #[test]
    fn test_construction_never_fails_for_any_context() {
        struct SilentReport;
        impl TraceProvider for SilentReport {
            fn failure_trace(&self) -> Option<&Trace> {
                None
            }
        }

        let from_none = PortalError::new("a", Context::None);
        let from_error = PortalError::new("b", Context::Error(TracedError::new("x")));
        let from_provider = PortalError::new("c", Context::Provider(Box::new(SilentReport)));

        assert_eq!(from_none.message(), "a");
        assert_eq!(from_error.message(), "b");
        assert_eq!(from_provider.origin_file(), UNKNOWN_FILE);
    }

    #[test]
    fn test_traced_error_converts_via_question_mark() {
        fn run() -> crate::Result<()> {
            let failed: Result<(), TracedError> = Err(TracedError::new("no provider configured"));
            Ok(failed?)
        }

        let err = run().unwrap_err();
        assert_eq!(err.message(), "no provider configured");
        assert_eq!(err.origin_file(), file!());
    }

    #[test]
    fn test_source_chain_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "prompt.txt not found");
        let err = PortalError::from_cause(TracedError::wrap("load_prompt", io));

        assert_eq!(err.message(), "prompt.txt not found");
        let source = std::error::Error::source(&err).expect("source kept");
        assert!(source.to_string().contains("prompt.txt"));
    }

    #[test]
    fn test_division_failure_end_to_end() {
        fn div(a: i64, b: i64) -> Result<i64, TracedError> {
            if b == 0 {
                return Err(TracedError::new("division by zero"));
            }
            Ok(a / b)
        }

        let err = match div(1, 0) {
            Ok(_) => panic!("expected failure"),
            Err(cause) => PortalError::from_cause(cause),
        };

        assert_eq!(err.message(), "division by zero");
        assert_eq!(err.origin_file(), file!());
        assert!(err.origin_line() > 0);
        assert!(err.trace_text().contains("division by zero"));
        assert!(err.verbose().contains("Traceback:"));
    }
}
