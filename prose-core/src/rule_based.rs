//! # Motor de Regras: Gazetteers e Padrões
//!
//! Classificação de entidades por conhecimento explícito: listas de entidades
//! conhecidas (gazetteers), títulos que precedem nomes ("Dr. Watson"),
//! sufixos de organização ("Acme Inc.") e sequências de nomes próprios.
//!
//! As regras leem o texto e a etiqueta POS de cada token, por isso o motor
//! só é aplicado depois da etiquetagem.

use std::collections::HashSet;

use crate::extracter::{BioTag, EntityCategory};
use crate::tagger::SENTENCE_END;
use crate::tokenizer::{tokenize, Token};

/// Motor de regras com gazetteers e padrões
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    /// Nomes de pessoas conhecidas (lowercase, token único)
    person_names: HashSet<String>,
    /// Locais, organizações e miscelânea já tokenizados (lowercase)
    phrases: Vec<(Vec<String>, EntityCategory)>,
    /// Títulos que precedem nomes de pessoas (sem ponto)
    person_titles: HashSet<String>,
    /// Palavras que fecham o nome de uma organização (sem ponto)
    org_suffixes: HashSet<String>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, name: &str) {
        self.person_names.insert(name.to_lowercase());
    }

    pub fn add_location(&mut self, name: &str) {
        self.add_phrase(name, EntityCategory::Loc);
    }

    pub fn add_org(&mut self, name: &str) {
        self.add_phrase(name, EntityCategory::Org);
    }

    pub fn add_misc(&mut self, name: &str) {
        self.add_phrase(name, EntityCategory::Misc);
    }

    pub fn add_person_title(&mut self, title: &str) {
        self.person_titles.insert(normalize(title));
    }

    pub fn add_org_suffix(&mut self, suffix: &str) {
        self.org_suffixes.insert(normalize(suffix));
    }

    /// Nomes multipalavra passam pelo mesmo tokenizador do texto, para que
    /// "Washington D.C." case com a sequência de tokens real.
    fn add_phrase(&mut self, name: &str, category: EntityCategory) {
        let parts: Vec<String> = tokenize(name)
            .into_iter()
            .map(|t| t.text.to_lowercase())
            .collect();
        if parts.is_empty() {
            return;
        }
        self.phrases.push((parts, category));
        // Mais longo primeiro: "Scotland Yard" vence "Scotland"
        self.phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Aplica todas as regras à sequência de tokens
    ///
    /// Retorna, para cada posição, a tag BIO da primeira regra que a marcou
    /// (ou `None`).
    pub fn apply(&self, tokens: &[Token]) -> Vec<Option<BioTag>> {
        let mut result: Vec<Option<BioTag>> = vec![None; tokens.len()];
        let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();

        // 1. Gazetteers multipalavra
        let mut i = 0;
        while i < tokens.len() {
            let hit = self.phrases.iter().find(|(parts, _)| {
                i + parts.len() <= tokens.len()
                    && parts.iter().zip(&lowered[i..]).all(|(p, w)| p == w)
            });
            match hit {
                Some((parts, category)) => {
                    mark_span(&mut result, i, parts.len(), *category);
                    i += parts.len();
                }
                None => i += 1,
            }
        }

        // 2. Gazetteer de pessoas: nomes consecutivos formam uma entidade
        for i in 0..tokens.len() {
            if result[i].is_some() || !self.person_names.contains(&lowered[i]) {
                continue;
            }
            let tag = if i > 0 && is_category(&result[i - 1], EntityCategory::Per) {
                BioTag::Inside(EntityCategory::Per)
            } else {
                BioTag::Begin(EntityCategory::Per)
            };
            result[i] = Some(tag);
        }

        // 3. Título: "Dr. X" → X é PER
        for i in 0..tokens.len().saturating_sub(1) {
            if result[i + 1].is_some() || !is_capitalized(&tokens[i + 1].text) {
                continue;
            }
            if self.person_titles.contains(&normalize(&lowered[i])) {
                result[i + 1] = Some(BioTag::Begin(EntityCategory::Per));
            }
        }

        // 4. Sufixo de organização: "Acme Widgets Inc." → ORG
        for i in 1..tokens.len() {
            if result[i].is_some() || !self.org_suffixes.contains(&normalize(&lowered[i])) {
                continue;
            }
            let mut first = i;
            while first > 0 && result[first - 1].is_none() && is_capitalized(&tokens[first - 1].text) {
                first -= 1;
            }
            if first < i {
                mark_span(&mut result, first, i - first + 1, EntityCategory::Org);
            }
        }

        // 5. Nome próprio colado a uma entidade continua a entidade
        for i in 1..tokens.len() {
            if result[i].is_some() || tokens[i].tag != "NNP" {
                continue;
            }
            if let Some(category) = result[i - 1].and_then(|tag| tag.category()) {
                result[i] = Some(BioTag::Inside(category));
            }
        }

        // 6. Sequências de NNP sem rótulo → MISC (títulos ficam de fora)
        let free_proper_noun = |result: &[Option<BioTag>], k: usize| {
            result[k].is_none()
                && tokens[k].tag == "NNP"
                && !self.person_titles.contains(&normalize(&lowered[k]))
        };
        let mut i = 0;
        while i < tokens.len() {
            if !free_proper_noun(&result, i) {
                i += 1;
                continue;
            }
            let mut end = i + 1;
            while end < tokens.len() && free_proper_noun(&result, end) {
                end += 1;
            }
            let sentence_start = i == 0 || tokens[i - 1].tag == SENTENCE_END;
            // Palavra solta no início da frase é capitalizada por posição
            if !(sentence_start && end - i == 1) {
                mark_span(&mut result, i, end - i, EntityCategory::Misc);
            }
            i = end;
        }

        result
    }
}

fn mark_span(result: &mut [Option<BioTag>], start: usize, len: usize, category: EntityCategory) {
    for (j, slot) in result[start..start + len].iter_mut().enumerate() {
        *slot = Some(if j == 0 {
            BioTag::Begin(category)
        } else {
            BioTag::Inside(category)
        });
    }
}

fn is_category(tag: &Option<BioTag>, category: EntityCategory) -> bool {
    tag.and_then(|t| t.category()) == Some(category)
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Lowercase e sem ponto final ("Dr." → "dr")
fn normalize(word: &str) -> String {
    word.trim_end_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{LexiconTagger, PosTagger};

    fn tagged(text: &str) -> Vec<Token> {
        let mut tokens = tokenize(text);
        LexiconTagger::new().unwrap().tag(&mut tokens).unwrap();
        tokens
    }

    fn labels(engine: &RuleEngine, tokens: &[Token]) -> Vec<String> {
        engine
            .apply(tokens)
            .iter()
            .map(|tag| tag.map_or("O".to_string(), |t| t.label()))
            .collect()
    }

    #[test]
    fn test_person_gazetteer() {
        let mut engine = RuleEngine::new();
        engine.add_person("Sherlock");
        engine.add_person("Holmes");

        let tokens = tagged("Sherlock Holmes smiled");
        assert_eq!(labels(&engine, &tokens), ["B-PER", "I-PER", "O"]);
    }

    #[test]
    fn test_title_pattern() {
        let mut engine = RuleEngine::new();
        engine.add_person_title("Dr");

        let tokens = tagged("Then Dr. Moreau arrived");
        let matches = engine.apply(&tokens);

        assert_eq!(matches[2], Some(BioTag::Begin(EntityCategory::Per)));
        // O título não entra na entidade
        assert!(matches[1].is_none());
    }

    #[test]
    fn test_multiword_prefers_longest() {
        let mut engine = RuleEngine::new();
        engine.add_location("Scotland");
        engine.add_org("Scotland Yard");

        let tokens = tagged("He called Scotland Yard");
        assert_eq!(labels(&engine, &tokens), ["O", "O", "B-ORG", "I-ORG"]);
    }

    #[test]
    fn test_org_suffix_walks_back() {
        let mut engine = RuleEngine::new();
        engine.add_org_suffix("Inc");

        let tokens = tagged("We hired Acme Widgets Inc. today");
        assert_eq!(labels(&engine, &tokens), ["O", "O", "B-ORG", "I-ORG", "I-ORG", "O"]);
    }

    #[test]
    fn test_sentence_initial_word_is_not_misc() {
        let engine = RuleEngine::new();
        let tokens = tagged("Yesterday Quux visited Zorblat Prime.");
        let labels = labels(&engine, &tokens);
        assert_eq!(labels[0], "O");
        assert_eq!(labels[1], "B-MISC");
        assert_eq!(&labels[3..5], ["B-MISC", "I-MISC"]);
    }
}
