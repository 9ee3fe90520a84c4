//! Prompt rendering with Handlebars variables.

use crate::templates::PromptTemplate;
use handlebars::Handlebars;
use mixmentor_core::{AppError, AppResult};
use std::collections::HashMap;

/// A fully rendered prompt ready for a chat-completion call.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// Rendered user message
    pub user: String,
}

/// Render a template's user message with the given variables.
///
/// Missing variables render as empty strings, matching how nodes pass state
/// fields that may not be populated yet (e.g., no generated answer on the
/// first rephrase attempt).
pub fn build_prompt(
    template: &PromptTemplate,
    variables: &HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(prompt = template.id, "Rendering prompt template");

    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string(template.id, template.human)
        .map_err(|e| {
            AppError::Prompt(format!(
                "Failed to register template '{}': {}",
                template.id, e
            ))
        })?;

    let user = handlebars.render(template.id, variables).map_err(|e| {
        AppError::Prompt(format!("Failed to render template '{}': {}", template.id, e))
    })?;

    Ok(BuiltPrompt {
        system: template.system.to_string(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    #[test]
    fn test_build_prompt_substitutes_variables() {
        let mut vars = HashMap::new();
        vars.insert("user_query".to_string(), "How do I EQ a kick?".to_string());
        vars.insert("documents".to_string(), "Cut the low mids.".to_string());

        let built = build_prompt(&templates::GRADE_DOCUMENTS, &vars).unwrap();

        assert!(built.user.contains("How do I EQ a kick?"));
        assert!(built.user.contains("Cut the low mids."));
        assert!(built.system.contains("relevance assessor"));
    }

    #[test]
    fn test_build_prompt_missing_variable_renders_empty() {
        let vars = HashMap::new();
        let built = build_prompt(&templates::REPHRASE_QUERY, &vars).unwrap();

        assert!(built.user.contains("ORIGINAL QUESTION:"));
        assert!(!built.user.contains("{{user_query}}"));
    }

    #[test]
    fn test_no_html_escaping() {
        let mut vars = HashMap::new();
        vars.insert(
            "user_query".to_string(),
            "What's \"sidechain\" & <ducking>?".to_string(),
        );

        let built = build_prompt(&templates::GRADE_USEFULNESS, &vars).unwrap();
        assert!(built.user.contains("What's \"sidechain\" & <ducking>?"));
    }
}
