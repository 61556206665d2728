//! # docportal-error
//!
//! Structured error enrichment for the document portal.
//!
//! ## Design Philosophy
//!
//! - **PortalError**: one enriched record per caught failure - message,
//!   origin file, origin line, rendered failure chain
//! - **Context**: an explicit sum type saying where cause information comes
//!   from (nothing, a chain provider, or an error value) - no ambient state
//! - **Trace/Frame**: the failure chain as an explicit ordered sequence,
//!   outermost catch point first, deepest call last
//! - **TracedError**: the error value lower layers return, accumulating
//!   frames as it propagates
//!
//! ## Usage
//!
//! ```rust
//! use docportal_error::{PortalError, TraceExt, TracedError};
//!
//! fn parse_payload(raw: &str) -> Result<i64, TracedError> {
//!     raw.trim()
//!         .parse::<i64>()
//!         .map_err(|e| TracedError::wrap("parse_payload", e))
//! }
//!
//! fn handle(raw: &str) -> Result<i64, PortalError> {
//!     parse_payload(raw)
//!         .frame("handle")
//!         .map_err(|e| PortalError::wrap("error handling payload", e))
//! }
//!
//! let err = handle("not a number").unwrap_err();
//! println!("{}", err);           // compact, single line
//! println!("{}", err.verbose()); // compact + traceback block
//! ```
//!
//! ## Principles
//!
//! - Constructing a `PortalError` never fails; missing chain information
//!   degrades to the `"<unknown>"` / `-1` / `""` sentinels
//! - The origin is the DEEPEST frame of the chain, not the catch point
//! - The original failure is never suppressed: its message, chain, and
//!   boxed source all survive the wrap

mod context;
mod error;
mod trace;
mod traced;

pub use context::{Context, TraceProvider, UNKNOWN_FILE, UNKNOWN_LINE};
pub use error::PortalError;
pub use trace::{Frame, Trace};
pub use traced::{TraceExt, TracedError};

/// Result type alias using the portal error
pub type Result<T> = std::result::Result<T, PortalError>;
