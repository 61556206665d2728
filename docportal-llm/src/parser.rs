//! Structured-output parsing for model responses.
//!
//! Models are asked to answer with a JSON payload; they frequently wrap it
//! in markdown code fences or prose anyway. `JsonOutputParser` strips the
//! fences and deserializes; `FixingParser` adds one LLM-assisted repair
//! round when the payload still does not parse.

use crate::provider::{ChatMessage, CompletionRequest, LlmProvider};
use docportal_error::{TraceExt, TracedError};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::warn;

/// Parses a model response into a typed value via serde_json.
pub struct JsonOutputParser<T> {
    schema_hint: String,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonOutputParser<T> {
    /// `schema_hint` is a short description of the expected JSON shape,
    /// shown to the model in the format instructions
    pub fn new(schema_hint: impl Into<String>) -> Self {
        Self {
            schema_hint: schema_hint.into(),
            _marker: PhantomData,
        }
    }

    /// Instructions appended to the prompt so the model answers in shape
    pub fn format_instructions(&self) -> String {
        format!(
            "Respond with valid JSON only, no prose before or after. \
             The JSON must match this shape:\n{}",
            self.schema_hint
        )
    }

    /// Strip fences and deserialize
    pub fn parse(&self, raw: &str) -> Result<T, TracedError> {
        let payload = strip_code_fences(raw);
        serde_json::from_str(payload).map_err(|e| TracedError::wrap("parse_model_output", e))
    }
}

/// Wraps a [`JsonOutputParser`] with one LLM-assisted repair round.
pub struct FixingParser<T> {
    inner: JsonOutputParser<T>,
}

impl<T: DeserializeOwned> FixingParser<T> {
    pub fn new(inner: JsonOutputParser<T>) -> Self {
        Self { inner }
    }

    /// Format instructions of the wrapped parser
    pub fn format_instructions(&self) -> String {
        self.inner.format_instructions()
    }

    /// Parse; on failure, ask the model once to repair the payload.
    ///
    /// If the repair round fails too, the error reported is the ORIGINAL
    /// parse failure - the repair is best-effort and must not mask what the
    /// model actually produced.
    pub async fn parse_with<P: LlmProvider>(
        &self,
        provider: &P,
        raw: &str,
    ) -> Result<T, TracedError> {
        let original = match self.inner.parse(raw) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        warn!(error = %original, "model output failed to parse, attempting repair");

        let repair_prompt = format!(
            "The following model output was supposed to be valid JSON but is not:\n\n\
             {}\n\n{}\n\nOutput the corrected JSON and nothing else.",
            raw,
            self.inner.format_instructions()
        );

        let request = CompletionRequest::new(vec![ChatMessage::user(repair_prompt)]);
        let repaired = match provider.complete(request).await {
            Ok(response) => response.content,
            Err(_) => return Err(original).frame("fixing_parser"),
        };

        match self.inner.parse(&repaired) {
            Ok(value) => Ok(value),
            Err(_) => Err(original).frame("fixing_parser"),
        }
    }
}

/// Drop a leading/trailing markdown code fence, if present
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // skip the optional language tag on the opening fence
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionResponse, ProviderError, Usage};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        page: String,
        changes: String,
    }

    /// Test double answering every completion with a canned string
    struct CannedProvider {
        reply: String,
    }

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn default_model(&self) -> &str {
            "canned-1"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                model: "canned-1".into(),
                content: self.reply.clone(),
                usage: Usage::default(),
            })
        }
    }

    fn row_parser() -> JsonOutputParser<Vec<Row>> {
        JsonOutputParser::new(r#"[{"page": "...", "changes": "..."}]"#)
    }

    #[test]
    fn test_parse_plain_json() {
        let rows = row_parser()
            .parse(r#"[{"page": "1", "changes": "NO CHANGE"}]"#)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].page, "1");
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let raw = "```json\n[{\"page\": \"2\", \"changes\": \"title reworded\"}]\n```";
        let rows = row_parser().parse(raw).unwrap();
        assert_eq!(rows[0].changes, "title reworded");
    }

    #[test]
    fn test_parse_failure_carries_frame() {
        let err = row_parser().parse("not json").unwrap_err();
        assert_eq!(err.trace().deepest().unwrap().context, "parse_model_output");
        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_format_instructions_include_shape() {
        let instructions = row_parser().format_instructions();
        assert!(instructions.contains("valid JSON only"));
        assert!(instructions.contains(r#"[{"page""#));
    }

    #[tokio::test]
    async fn test_fixing_parser_repairs_with_model_help() {
        let provider = CannedProvider {
            reply: r#"[{"page": "1", "changes": "footer added"}]"#.into(),
        };
        let parser = FixingParser::new(row_parser());

        let rows = parser
            .parse_with(&provider, "here you go: page 1 footer added")
            .await
            .unwrap();
        assert_eq!(rows[0].changes, "footer added");
    }

    #[tokio::test]
    async fn test_fixing_parser_reports_original_failure() {
        let provider = CannedProvider {
            reply: "still not json".into(),
        };
        let parser = FixingParser::new(row_parser());

        let err = parser
            .parse_with(&provider, "garbage")
            .await
            .unwrap_err();
        // original failure plus the fixing frame on top
        assert_eq!(err.trace().frames()[0].context, "fixing_parser");
        assert_eq!(err.trace().deepest().unwrap().context, "parse_model_output");
    }

    #[tokio::test]
    async fn test_fixing_parser_passthrough_on_valid_input() {
        let provider = CannedProvider {
            reply: "unused".into(),
        };
        let parser = FixingParser::new(row_parser());

        let rows = parser
            .parse_with(&provider, r#"[{"page": "3", "changes": "NO CHANGE"}]"#)
            .await
            .unwrap();
        assert_eq!(rows[0].page, "3");
    }
}
