//! Failure-chain records: individual frames and the ordered trace.

use std::fmt;
use std::panic::Location;

/// A single stack-frame record in a failure chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source file path of the frame
    pub file: String,
    /// Line number within that file
    pub line: u32,
    /// Operation label at this frame (function or step name); may be empty
    pub context: String,
}

impl Frame {
    /// Create a frame from an explicit location
    pub fn new(file: impl Into<String>, line: u32, context: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            context: context.into(),
        }
    }

    /// Create a frame at the caller's source location
    #[track_caller]
    pub fn here(context: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), context)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  at {}:{}", self.file, self.line)?;
        if !self.context.is_empty() {
            write!(f, ": {}", self.context)?;
        }
        Ok(())
    }
}

/// An ordered failure chain.
///
/// Frames run from the outermost catch point down to the innermost failing
/// call: the deepest frame is LAST. The deepest frame is the one reported
/// as an error's origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    frames: Vec<Frame>,
}

impl Trace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a single-frame trace at the caller's source location
    #[track_caller]
    pub fn capture(context: impl Into<String>) -> Self {
        Self {
            frames: vec![Frame::here(context)],
        }
    }

    /// Append a deeper frame; it becomes the new innermost (last) frame
    pub fn push_inner(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Prepend an outer frame, keeping the deepest frame last.
    ///
    /// Propagation sites call this as an error bubbles up: each annotation
    /// is further out than everything recorded so far.
    pub fn push_outer(&mut self, frame: Frame) {
        self.frames.insert(0, frame);
    }

    /// The innermost (deepest) frame, if any
    pub fn deepest(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// All frames, outermost first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render all frames, one per line, outermost first
    pub fn render(&self) -> String {
        self.frames
            .iter()
            .map(|frame| frame.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
