//! # docportal-compare
//!
//! LLM-backed document comparison:
//! 1. The two documents are combined into one marked-up input
//! 2. The document-comparison prompt is rendered with format instructions
//! 3. The provider is invoked once
//! 4. The JSON answer is parsed (with one LLM-assisted repair round)
//! 5. Rows land in a `ComparisonTable`
//!
//! Chain failures come back as `PortalError` values with the failing
//! layer's frame chain attached.

mod comparer;
mod table;

pub use comparer::{combine, DocumentComparer};
pub use table::{ComparisonRow, ComparisonTable};
