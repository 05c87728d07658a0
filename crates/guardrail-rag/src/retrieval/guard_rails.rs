//! Answer screening

use crate::config::GuardRailConfig;

/// True when the answer hedges or is too short to be useful.
///
/// Phrase matching is case-insensitive; the length check counts characters
/// of the trimmed answer.
pub fn is_too_generic(answer: &str, rails: &GuardRailConfig) -> bool {
    let lowered = answer.to_lowercase();
    let hedges = rails
        .generic_phrases
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()));

    hedges || answer.trim().chars().count() < rails.min_answer_chars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hedge_phrase_any_case() {
        let rails = GuardRailConfig::default();
        assert!(is_too_generic(
            "Lo siento, NO TENGO INFORMACIÓN ESPECÍFICA sobre ese tema en particular.",
            &rails
        ));
        assert!(is_too_generic(
            "Para más detalles consulta los documentos originales del proyecto.",
            &rails
        ));
    }

    #[test]
    fn test_short_answer() {
        let rails = GuardRailConfig::default();
        assert!(is_too_generic("   No sé.   ", &rails));
        assert!(is_too_generic("", &rails));
        // 19 characters
        assert!(is_too_generic("abcdefghijklmnopqrs", &rails));
        assert!(!is_too_generic("abcdefghijklmnopqrst", &rails));
    }

    #[test]
    fn test_specific_answer_passes() {
        let rails = GuardRailConfig::default();
        assert!(!is_too_generic(
            "Machine learning es una rama de la inteligencia artificial que aprende de datos.",
            &rails
        ));
    }

    #[test]
    fn test_configured_phrases() {
        let rails = GuardRailConfig {
            generic_phrases: vec!["I cannot say".into()],
            ..Default::default()
        };
        assert!(is_too_generic("Honestly, i cannot say much about this topic.", &rails));
        assert!(!is_too_generic(
            "consulta los documentos, aunque esta frase ya no cuenta",
            &rails
        ));
    }
}
