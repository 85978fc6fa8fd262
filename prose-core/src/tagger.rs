//! # Etiquetagem Morfossintática (POS)
//!
//! Atribui a cada token uma etiqueta do conjunto Penn Treebank
//! (`NN`, `VBD`, `DT`, `NNP`, ...).
//!
//! O [`LexiconTagger`] trabalha em duas passadas:
//!
//! 1. **Etiqueta inicial**: léxico de palavras frequentes, forma (números,
//!    pontuação), capitalização e sufixos. Depende só do próprio token.
//! 2. **Regras de contexto**: corrigem a etiqueta inicial olhando os vizinhos
//!    (ex: "he **runs**" → `VBZ` em vez de `NNS`).
//!
//! A segunda passada só vê os tokens que recebeu juntos. Quando o pipeline
//! etiqueta token a token em paralelo, as regras de contexto não disparam e o
//! resultado pode divergir da etiquetagem sequencial. Lotes por sentença
//! ([`TagUnit::Sentence`](crate::config::TagUnit)) preservam esse contexto.

use std::collections::HashMap;

use regex::Regex;

use crate::corpus::LEXICON;
use crate::error::{Result, StageResult};
use crate::tokenizer::Token;

/// Etiqueta usada para pontuação de fim de sentença.
pub const SENTENCE_END: &str = ".";

/// Colaborador do estágio de etiquetagem.
///
/// Recebe uma fatia de tokens e preenche `tag` em cada um. A fatia pode ser o
/// documento inteiro (modo sequencial), uma sentença ou um único token
/// (modo concorrente).
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &mut [Token]) -> StageResult<()>;
}

/// Etiquetador baseado em léxico, forma e regras de contexto.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<&'static str, &'static str>,
    number: Regex,
    ordinal: Regex,
}

impl LexiconTagger {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lexicon: LEXICON.iter().copied().collect(),
            number: Regex::new(r"^[+-]?(\d+([.,]\d+)*|\.\d+)%?$")?,
            ordinal: Regex::new(r"^\d+(st|nd|rd|th)$")?,
        })
    }

    /// Etiqueta de um token isolado, sem olhar vizinhos.
    ///
    /// `sentence_start` evita que toda palavra capitalizada no início de frase
    /// vire nome próprio.
    pub fn initial_tag(&self, word: &str, sentence_start: bool) -> &'static str {
        let lower = word.to_lowercase();

        if let Some(&tag) = self.lexicon.get(lower.as_str()) {
            return tag;
        }
        if self.number.is_match(word) {
            return "CD";
        }
        if self.ordinal.is_match(&lower) {
            return "JJ";
        }
        if let Some(tag) = punctuation_tag(word) {
            return tag;
        }

        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        let by_suffix = suffix_tag(&lower);
        match (capitalized, sentence_start, by_suffix) {
            (true, false, _) => "NNP",
            (true, true, Some(tag)) => tag,
            (true, true, None) => "NNP",
            (false, _, Some(tag)) => tag,
            (false, _, None) => "NN",
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &mut [Token]) -> StageResult<()> {
        for i in 0..tokens.len() {
            let sentence_start = i == 0 || tokens[i - 1].tag == SENTENCE_END;
            let tag = self.initial_tag(&tokens[i].text, sentence_start);
            tokens[i].tag = tag.to_string();
        }
        apply_context_rules(tokens);
        Ok(())
    }
}

/// Etiqueta de pontuação e símbolos de um caractere.
fn punctuation_tag(word: &str) -> Option<&'static str> {
    let mut chars = word.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || ch.is_alphanumeric() {
        return None;
    }
    Some(match ch {
        '.' | '!' | '?' => SENTENCE_END,
        ',' => ",",
        ':' | ';' | '-' | '\u{2013}' | '\u{2014}' => ":",
        '(' | '[' | '{' => "-LRB-",
        ')' | ']' | '}' => "-RRB-",
        '"' | '\u{201c}' => "``",
        '\u{201d}' | '\'' => "''",
        '$' => "$",
        '#' => "#",
        _ => "SYM",
    })
}

/// Heurística de sufixo para palavras fora do léxico.
fn suffix_tag(lower: &str) -> Option<&'static str> {
    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ing") {
        return Some("VBG");
    }
    if len > 3 && lower.ends_with("ed") {
        return Some("VBD");
    }
    if len > 3 && lower.ends_with("ly") {
        return Some("RB");
    }
    const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ment", "ness", "ity", "ship", "ism"];
    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Some("NN");
    }
    const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ic", "al"];
    if len > 4 && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Some("JJ");
    }
    if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return Some("NNS");
    }
    None
}

/// Regras de transformação que dependem do token anterior.
fn apply_context_rules(tokens: &mut [Token]) {
    for i in 1..tokens.len() {
        let prev_tag = tokens[i - 1].tag.as_str();
        let prev_word = tokens[i - 1].text.to_lowercase();
        let current = tokens[i].tag.as_str();

        let corrected = match (prev_tag, current) {
            // "he runs", "Mary likes" → verbo na 3ª pessoa
            ("PRP" | "NNP", "NNS") => Some("VBZ"),
            // "can run", "will go" → forma base
            ("MD", "NN" | "VBP" | "VBD") => Some("VB"),
            ("TO", "VBP") => Some("VB"),
            // "the run" → substantivo
            ("DT" | "PRP$", "VB" | "VBP") => Some("NN"),
            // "has walked", "was painted" → particípio
            (_, "VBD") if is_auxiliary(&prev_word) => Some("VBN"),
            _ => None,
        };

        if let Some(tag) = corrected {
            tokens[i].tag = tag.to_string();
        }
    }
}

fn is_auxiliary(word: &str) -> bool {
    matches!(
        word,
        "has" | "have" | "had" | "having" | "is" | "are" | "was" | "were" | "be" | "been"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn tags_of(text: &str) -> Vec<String> {
        let tagger = LexiconTagger::new().unwrap();
        let mut tokens = tokenize(text);
        tagger.tag(&mut tokens).unwrap();
        tokens.into_iter().map(|t| t.tag).collect()
    }

    #[test]
    fn test_tag_nursery_rhyme() {
        assert_eq!(tags_of("Mary had a little lamb"), ["NNP", "VBD", "DT", "JJ", "NN"]);
    }

    #[test]
    fn test_tag_numbers_and_punctuation() {
        assert_eq!(tags_of("It cost 42 dollars, 3.5%!"), ["PRP", "NN", "CD", "NNS", ",", "CD", "SYM", "."]);
    }

    #[test]
    fn test_context_rule_third_person() {
        assert_eq!(tags_of("He runs quickly."), ["PRP", "VBZ", "RB", "."]);
    }

    #[test]
    fn test_context_rule_participle() {
        assert_eq!(tags_of("She has walked"), ["PRP", "VBZ", "VBN"]);
    }

    #[test]
    fn test_single_token_has_no_context() {
        // Sem vizinhos, "runs" fica com a etiqueta de sufixo
        assert_eq!(tags_of("runs"), ["NNS"]);
    }

    #[test]
    fn test_every_token_gets_a_tag() {
        let text = "Dr. Watson (a doctor) met #1 fan @ Baker Street — twice.";
        assert!(tags_of(text).iter().all(|t| !t.is_empty()));
    }
}
