//! Cause-context resolution for portal errors.
//!
//! A [`PortalError`](crate::PortalError) is built from a message plus a
//! [`Context`] describing where cause information comes from. Resolution is
//! an exhaustive match over the three shapes; every branch that cannot
//! produce real values degrades to the unknown sentinels, never to a
//! failure.

use crate::trace::Trace;
use crate::traced::TracedError;

/// File sentinel used when no failure chain is available
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Line sentinel used when no failure chain is available
pub const UNKNOWN_LINE: i64 = -1;

/// Capability to report a recorded failure chain.
///
/// Anything that keeps hold of a [`Trace`] can hand it to a portal error by
/// implementing this. [`TracedError`] is the canonical implementor.
pub trait TraceProvider {
    /// Human-readable description of the recorded failure, if known
    fn failure_message(&self) -> Option<String> {
        None
    }

    /// The recorded chain, if one is available
    fn failure_trace(&self) -> Option<&Trace>;
}

impl TraceProvider for TracedError {
    fn failure_message(&self) -> Option<String> {
        Some(self.message().to_string())
    }

    fn failure_trace(&self) -> Option<&Trace> {
        Some(self.trace())
    }
}

/// Where a portal error's cause information comes from.
///
/// There is no ambient "currently handled exception" channel to fall back
/// on; a caller with nothing to attach states that with [`Context::None`].
pub enum Context {
    /// No cause information is available
    None,
    /// An object that can report a recorded failure chain
    Provider(Box<dyn TraceProvider>),
    /// An error value carrying its own chain
    Error(TracedError),
}

/// Outcome of resolving a [`Context`]: always fully populated.
pub(crate) struct Resolved {
    pub file: String,
    pub line: i64,
    pub trace_text: String,
    pub source: Option<anyhow::Error>,
}

impl Resolved {
    fn unknown() -> Self {
        Self {
            file: UNKNOWN_FILE.to_string(),
            line: UNKNOWN_LINE,
            trace_text: String::new(),
            source: None,
        }
    }

    fn from_trace(trace: &Trace, message: Option<&str>) -> Option<Self> {
        let deepest = trace.deepest()?;
        let mut text = trace.render();
        if let Some(message) = message {
            text.push_str("\nerror: ");
            text.push_str(message);
        }
        Some(Self {
            file: deepest.file.clone(),
            line: i64::from(deepest.line),
            trace_text: text,
            source: None,
        })
    }
}

impl Context {
    pub(crate) fn resolve(self) -> Resolved {
        match self {
            Context::None => Resolved::unknown(),
            Context::Provider(provider) => match provider.failure_trace() {
                Some(trace) => {
                    Resolved::from_trace(trace, provider.failure_message().as_deref())
                        .unwrap_or_else(Resolved::unknown)
                }
                None => Resolved::unknown(),
            },
            Context::Error(error) => {
                let (message, trace, source) = error.into_parts();
                match Resolved::from_trace(&trace, Some(&message)) {
                    Some(mut resolved) => {
                        resolved.source = source;
                        resolved
                    }
                    None => Resolved {
                        source,
                        ..Resolved::unknown()
                    },
                }
            }
        }
    }
}
