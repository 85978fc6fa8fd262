//! # Documento
//!
//! Resultado imutável de um build: o texto, as sentenças, os tokens (com
//! etiquetas e rótulos) e as entidades. Só existe depois que todos os
//! estágios do plano terminaram; não há documento parcial.

use std::sync::Arc;

use serde::Serialize;

use crate::config::StagePlan;
use crate::extracter::Entity;
use crate::model::Model;
use crate::segmenter::Sentence;
use crate::tokenizer::Token;

/// Um texto processado pelo pipeline.
///
/// Sequências de estágios que não executaram ficam vazias: sem segmentação
/// não há sentenças, sem extração não há entidades.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    text: String,
    #[serde(skip)]
    model: Arc<Model>,
    plan: StagePlan,
    sentences: Vec<Sentence>,
    tokens: Vec<Token>,
    entities: Vec<Entity>,
}

impl Document {
    pub(crate) fn new(
        text: String,
        model: Arc<Model>,
        plan: StagePlan,
        sentences: Vec<Sentence>,
        tokens: Vec<Token>,
        entities: Vec<Entity>,
    ) -> Self {
        Self {
            text,
            model,
            plan,
            sentences,
            tokens,
            entities,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Estágios que executaram e número de workers usados.
    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}
