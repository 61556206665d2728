//! The LLM-backed document comparer.

use crate::table::{ComparisonRow, ComparisonTable};
use docportal_error::{PortalError, TraceExt, TracedError};
use docportal_llm::{
    ChatMessage, CompletionRequest, FixingParser, JsonOutputParser, LlmProvider, ModelLoader,
    PromptRegistry, PromptTemplate, DOCUMENT_COMPARISON,
};
use tracing::info;

const ROW_SCHEMA_HINT: &str = r#"[
  {"page": "<page identifier>", "changes": "<what changed, or NO CHANGE>"}
]"#;

/// Compares two documents through a prompt -> model -> parser chain.
///
/// Every failure along the chain is wrapped into a [`PortalError`] carrying
/// the recorded frame chain of the failing layer.
pub struct DocumentComparer<P> {
    provider: P,
    prompt: PromptTemplate,
    parser: FixingParser<Vec<ComparisonRow>>,
    model: Option<String>,
    temperature: f32,
}

impl<P: LlmProvider> DocumentComparer<P> {
    /// Build the chain around an existing provider
    pub fn new(provider: P) -> Result<Self, PortalError> {
        let registry = PromptRegistry::new();
        let prompt = registry
            .get(DOCUMENT_COMPARISON)
            .cloned()
            .ok_or_else(|| {
                PortalError::without_cause("document_comparison prompt missing from registry")
            })?;

        info!(provider = provider.name(), "document comparer initialized");

        Ok(Self {
            provider,
            prompt,
            parser: FixingParser::new(JsonOutputParser::new(ROW_SCHEMA_HINT)),
            model: None,
            temperature: 0.0,
        })
    }

    /// Override the provider's default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the sampling temperature (default 0.0)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Compare the combined documents and return the structured table
    pub async fn compare_documents(
        &self,
        combined_docs: &str,
    ) -> Result<ComparisonTable, PortalError> {
        self.run_chain(combined_docs)
            .await
            .map_err(|e| PortalError::wrap("error comparing documents", e))
    }

    async fn run_chain(&self, combined_docs: &str) -> Result<ComparisonTable, TracedError> {
        let rendered = self
            .prompt
            .render(&[
                ("combined_docs", combined_docs),
                ("format_instruction", &self.parser.format_instructions()),
            ])
            .frame("compare_documents")?;

        let mut request = CompletionRequest::new(vec![
            ChatMessage::system(self.prompt.system()),
            ChatMessage::user(rendered),
        ])
        .with_temperature(self.temperature);
        if let Some(model) = &self.model {
            request = request.with_model(model.as_str());
        }

        info!(provider = self.provider.name(), "invoking document comparison chain");
        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => return Err(TracedError::wrap("invoke_chain", e)),
        };
        info!(
            model = %response.model,
            tokens = response.usage.total_tokens,
            "chain invoked successfully"
        );

        let rows = self
            .parser
            .parse_with(&self.provider, &response.content)
            .await
            .frame("compare_documents")?;

        Ok(ComparisonTable::from_rows(rows))
    }
}

/// Join two documents into the combined input the chain expects
pub fn combine(reference: &str, candidate: &str) -> String {
    format!(
        "--- DOCUMENT 1 (reference) ---\n{}\n\n--- DOCUMENT 2 (candidate) ---\n{}",
        reference, candidate
    )
}

impl DocumentComparer<docportal_llm::AnyProvider> {
    /// Build the default chain from the environment (provider, model, keys)
    pub fn from_env() -> Result<Self, PortalError> {
        let provider = ModelLoader::from_env()
            .load()
            .map_err(|e| PortalError::wrap("error loading model provider", e))?;
        Self::new(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docportal_llm::{CompletionResponse, ProviderError, Usage};

    /// Test double: either answers with a canned payload or fails
    struct StubProvider {
        reply: Result<String, ()>,
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn default_model(&self) -> &str {
            "stub-1"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    model: "stub-1".into(),
                    content: content.clone(),
                    usage: Usage::default(),
                }),
                Err(()) => Err(ProviderError::Api {
                    status: 500,
                    message: "backend unavailable".into(),
                }),
            }
        }
    }

    fn canned(reply: &str) -> DocumentComparer<StubProvider> {
        DocumentComparer::new(StubProvider {
            reply: Ok(reply.into()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_compare_documents_happy_path() {
        let comparer = canned(
            r#"```json
[{"page": "1", "changes": "NO CHANGE"}, {"page": "2", "changes": "new clause 4.2"}]
```"#,
        );

        let combined = combine("old text", "new text");
        let table = comparer.compare_documents(&combined).await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].changes, "new clause 4.2");
    }

    #[tokio::test]
    async fn test_provider_failure_is_wrapped_with_chain() {
        let comparer = DocumentComparer::new(StubProvider { reply: Err(()) }).unwrap();

        let err = comparer.compare_documents("docs").await.unwrap_err();
        assert_eq!(err.message(), "error comparing documents");
        assert!(err.trace_text().contains("invoke_chain"));
        assert!(err.trace_text().contains("backend unavailable"));
        assert_ne!(err.origin_line(), -1);
    }

    #[tokio::test]
    async fn test_unparseable_output_reports_parse_failure() {
        // stub returns the same junk for the repair round, so the original
        // parse failure must surface
        let comparer = canned("I could not find any differences.");

        let err = comparer.compare_documents("docs").await.unwrap_err();
        assert_eq!(err.message(), "error comparing documents");
        assert!(err.trace_text().contains("parse_model_output"));
    }

    #[test]
    fn test_combine_marks_both_documents() {
        let combined = combine("alpha", "beta");
        assert!(combined.contains("DOCUMENT 1 (reference)"));
        assert!(combined.contains("DOCUMENT 2 (candidate)"));
        assert!(combined.contains("alpha"));
        assert!(combined.contains("beta"));
    }
}
