//! # Pipeline: Orquestrador de Estágios
//!
//! Coordena os quatro estágios, sempre nesta ordem e no máximo uma vez cada:
//!
//! 1. **Segmentação** ([`Segmenter`]): texto → sentenças
//! 2. **Tokenização** ([`Tokenizer`]): texto → tokens
//! 3. **Etiquetagem** ([`PosTagger`](crate::tagger::PosTagger)): etiqueta POS em cada token,
//!    na thread chamadora ou através do [`WorkerPool`](crate::workers::WorkerPool)
//! 4. **Extração** ([`EntityExtracter`](crate::extracter::EntityExtracter)): `classify` e depois `chunk`
//!
//! Quais estágios executam é decidido pelo [`StagePlan`] resolvido a partir
//! das diretivas. O [`Document`] só é montado depois que todos os estágios do
//! plano terminaram: qualquer falha aborta o build inteiro.
//!
//! Segmentação e tokenização consomem o texto bruto e são independentes entre
//! si. Etiquetagem depende dos tokens e extração depende das etiquetas.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::config::{Directive, DocOpts, StagePlan};
use crate::document::Document;
use crate::error::{Error, Result, Stage};
use crate::model::Model;
use crate::segmenter::{Segmenter, UnicodeSegmenter};
use crate::tokenizer::{StandardTokenizer, Tokenizer};
use crate::workers::tag_concurrently;

/// O orquestrador. Guarda apenas os colaboradores que não dependem do modelo.
///
/// É `Send + Sync`: um único pipeline pode atender builds simultâneos.
pub struct Pipeline {
    segmenter: Box<dyn Segmenter>,
    tokenizer: Box<dyn Tokenizer>,
}

impl Pipeline {
    /// Pipeline com o segmentador e o tokenizador padrão.
    pub fn new() -> Self {
        Self {
            segmenter: Box::new(UnicodeSegmenter),
            tokenizer: Box::new(StandardTokenizer),
        }
    }

    pub fn with_segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Constrói um documento a partir do texto e das diretivas.
    ///
    /// Sem diretiva de modelo, um modelo padrão é montado só com as
    /// capacidades que o plano usa.
    pub fn build(&self, text: &str, directives: &[Directive]) -> Result<Document> {
        let opts = DocOpts::resolve(directives);
        let plan = opts.plan();
        let model = resolve_model(&opts, &plan)?;
        self.run(text, &opts, plan, model)
    }

    /// Constrói vários documentos em paralelo com as mesmas diretivas.
    ///
    /// O modelo é resolvido uma vez e compartilhado por todos os documentos.
    /// O primeiro erro aborta o lote.
    pub fn build_batch<S>(&self, texts: &[S], directives: &[Directive]) -> Result<Vec<Document>>
    where
        S: AsRef<str> + Sync,
    {
        let opts = DocOpts::resolve(directives);
        let plan = opts.plan();
        let model = resolve_model(&opts, &plan)?;
        debug!(documents = texts.len(), "build em lote");

        texts
            .par_iter()
            .map(|text| self.run(text.as_ref(), &opts, plan, Arc::clone(&model)))
            .collect()
    }

    fn run(&self, text: &str, opts: &DocOpts, plan: StagePlan, model: Arc<Model>) -> Result<Document> {
        let span = debug_span!(
            "build_document",
            bytes = text.len(),
            segment = plan.segment,
            tokenize = plan.tokenize,
            tag = plan.tag,
            extract = plan.extract,
            workers = plan.workers,
        );
        let _enter = span.enter();

        // Capacidades conferidas antes de qualquer trabalho
        let tagger = if plan.tag { Some(model.tagger()?) } else { None };
        let extracter = if plan.extract { Some(model.extracter()?) } else { None };

        let sentences = if plan.segment {
            let sentences = self
                .segmenter
                .segment(text)
                .map_err(|e| Error::stage(Stage::Segmentation, e))?;
            debug!(sentences = sentences.len(), "segmentação concluída");
            sentences
        } else {
            Vec::new()
        };

        let mut tokens = if plan.tokenize {
            let tokens = self
                .tokenizer
                .tokenize(text)
                .map_err(|e| Error::stage(Stage::Tokenization, e))?;
            debug!(tokens = tokens.len(), "tokenização concluída");
            tokens
        } else {
            Vec::new()
        };

        if let Some(tagger) = tagger {
            if plan.concurrent {
                tokens = tag_concurrently(tokens, tagger, plan.workers, plan.tag_unit, opts.timeout)?;
            } else {
                tagger
                    .tag(&mut tokens)
                    .map_err(|e| Error::stage(Stage::Tagging, e))?;
            }
            debug!(tokens = tokens.len(), concurrent = plan.concurrent, "etiquetagem concluída");
        }

        let entities = match extracter {
            Some(extracter) => {
                extracter
                    .classify(&mut tokens)
                    .map_err(|e| Error::stage(Stage::Extraction, e))?;
                let entities = extracter
                    .chunk(&tokens)
                    .map_err(|e| Error::stage(Stage::Extraction, e))?;
                debug!(entities = entities.len(), "extração concluída");
                entities
            }
            None => Vec::new(),
        };

        Ok(Document::new(text.to_string(), model, plan, sentences, tokens, entities))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_model(opts: &DocOpts, plan: &StagePlan) -> Result<Arc<Model>> {
    match &opts.model {
        Some(model) => Ok(Arc::clone(model)),
        None => Ok(Arc::new(Model::default_for(plan.tag, plan.extract)?)),
    }
}

/// Constrói um documento com o pipeline padrão.
pub fn build(text: &str, directives: &[Directive]) -> Result<Document> {
    Pipeline::new().build(text, directives)
}
