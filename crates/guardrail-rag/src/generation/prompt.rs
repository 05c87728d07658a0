//! Prompt templates for RAG generation

use crate::providers::vector_store::VectorMatch;

/// Separator placed between context fragments
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from matches, in the order the store returned them.
    ///
    /// Each fragment is trimmed; fragments that are blank after trimming are skipped.
    pub fn build_context(matches: &[VectorMatch]) -> String {
        matches
            .iter()
            .map(|m| m.metadata.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Build the full RAG prompt with strict grounding
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Eres un asistente que SOLO responde basándose en el contexto proporcionado.

REGLAS ESTRICTAS:
1. SOLO usa información del contexto
2. Si no está en el contexto, di "No tengo esa información"
3. NO inventes ni uses conocimiento externo
4. Sé específico y cita el contexto relevante

CONTEXTO:
{context}

PREGUNTA: {question}

RESPUESTA:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FragmentMetadata;

    fn with_text(id: &str, text: &str) -> VectorMatch {
        VectorMatch {
            id: id.into(),
            score: 0.9,
            metadata: FragmentMetadata {
                text: text.into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_context_trims_and_skips_blank() {
        let matches = vec![
            with_text("a", "  primero \n"),
            with_text("b", "   \n\t"),
            with_text("c", "segundo"),
        ];

        assert_eq!(PromptBuilder::build_context(&matches), "primero\n\nsegundo");
    }

    #[test]
    fn test_context_keeps_store_order() {
        let matches = vec![with_text("z", "zeta"), with_text("a", "alfa")];
        assert_eq!(PromptBuilder::build_context(&matches), "zeta\n\nalfa");
    }

    #[test]
    fn test_prompt_contains_rules_context_and_question() {
        let prompt = PromptBuilder::build_grounded_prompt("¿Qué es ML?", "ML es aprendizaje");

        assert!(prompt.contains("SOLO usa información del contexto"));
        assert!(prompt.contains("No tengo esa información"));
        assert!(prompt.contains("CONTEXTO:\nML es aprendizaje"));
        assert!(prompt.contains("PREGUNTA: ¿Qué es ML?"));
        assert!(prompt.ends_with("RESPUESTA:"));
    }
}
