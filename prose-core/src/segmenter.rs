//! # Segmentação de Sentenças
//!
//! Usa as fronteiras de sentença do Unicode (UAX #29, via `unicode-segmentation`)
//! e corrige o caso mais comum em que elas erram: um ponto de abreviação seguido
//! de maiúscula ("Dr. Smith") não encerra a sentença.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::StageResult;
use crate::tokenizer::ABBREVIATIONS;

/// Um trecho contíguo do texto correspondente a uma sentença.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Texto da sentença, sem espaços nas bordas.
    pub text: String,
    /// Índice de byte inicial no texto original (inclusivo).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
}

/// Colaborador do estágio de segmentação.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> StageResult<Vec<Sentence>>;
}

/// Segmentador padrão baseado em UAX #29.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> StageResult<Vec<Sentence>> {
        Ok(segment(text))
    }
}

/// Divide o texto em sentenças.
pub fn segment(text: &str) -> Vec<Sentence> {
    let mut sentences: Vec<Sentence> = Vec::new();

    for (offset, raw) in text.split_sentence_bound_indices() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let start = offset + (raw.len() - raw.trim_start().len());
        let end = start + trimmed.len();

        // Abreviação no fim da sentença anterior: a fronteira era falsa
        if let Some(prev) = sentences.last_mut() {
            if ends_with_abbreviation(&prev.text) {
                prev.end = end;
                prev.text = text[prev.start..end].to_string();
                continue;
            }
        }

        sentences.push(Sentence {
            text: trimmed.to_string(),
            start,
            end,
        });
    }

    sentences
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    let Some(stripped) = sentence.strip_suffix('.') else {
        return false;
    };
    let last_word = stripped
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("");
    ABBREVIATIONS.contains(&last_word)
}
