//! Prompt templates and the portal's template registry.

use docportal_error::TracedError;
use std::collections::HashMap;

/// Registry key for the document-comparison template
pub const DOCUMENT_COMPARISON: &str = "document_comparison";

/// A named prompt template with `{placeholder}` variables.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    system: String,
    template: String,
    required: Vec<&'static str>,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        system: impl Into<String>,
        template: impl Into<String>,
        required: Vec<&'static str>,
    ) -> Self {
        Self {
            name: name.into(),
            system: system.into(),
            template: template.into(),
            required,
        }
    }

    /// The built-in document-comparison template
    pub fn document_comparison() -> Self {
        Self::new(
            DOCUMENT_COMPARISON,
            "You are a meticulous document analyst. You compare two versions of a \
             document and report every meaningful change, page by page.",
            "Compare the two documents below. For each page that differs, describe \
             what changed; report pages with no differences as \"NO CHANGE\".\n\n\
             {combined_docs}\n\n{format_instruction}",
            vec!["combined_docs", "format_instruction"],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The system message for this template
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Substitute every declared variable; missing bindings are an error
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, TracedError> {
        let bound: HashMap<&str, &str> = vars.iter().copied().collect();

        let mut out = self.template.clone();
        for key in &self.required {
            let value = bound.get(key).ok_or_else(|| {
                TracedError::new(format!(
                    "prompt '{}' is missing variable '{}'",
                    self.name, key
                ))
            })?;
            out = out.replace(&format!("{{{}}}", key), value);
        }
        Ok(out)
    }
}

/// Named lookup of the portal's prompt templates.
pub struct PromptRegistry {
    templates: HashMap<String, PromptTemplate>,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRegistry {
    /// Create a registry holding the built-in templates
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        let comparison = PromptTemplate::document_comparison();
        templates.insert(comparison.name().to_string(), comparison);
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    /// Add or replace a template under its own name
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.name().to_string(), template);
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(|k| k.as_str()).collect()
    }
}
