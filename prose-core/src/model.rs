//! # Modelo
//!
//! O modelo agrega as duas capacidades que o pipeline consome:
//! - **Etiquetagem** ([`PosTagger`]): etiquetas POS por token
//! - **Extração** ([`EntityExtracter`]): rótulos BIO e agrupamento em entidades
//!
//! Um `Model` é somente leitura depois de construído e é compartilhado via
//! `Arc` entre documentos, threads do pool e builds em lote. Nenhum estágio
//! guarda estado mutável dentro dele.
//!
//! ## Carregamento sob demanda
//!
//! [`Model::default_for`] só monta as capacidades que o plano vai usar: um
//! pipeline que não etiqueta nem extrai não paga pelo léxico nem pelos
//! gazetteers.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result, Stage};
use crate::extracter::{EntityExtracter, RuleExtracter};
use crate::tagger::{LexiconTagger, PosTagger};

/// Conjunto compartilhado de capacidades de etiquetagem e extração.
#[derive(Clone, Default)]
pub struct Model {
    tagger: Option<Arc<dyn PosTagger>>,
    extracter: Option<Arc<dyn EntityExtracter>>,
}

impl Model {
    /// Constrói o modelo padrão completo (etiquetador de léxico + extrator por regras).
    pub fn build() -> Result<Self> {
        Self::default_for(true, true)
    }

    /// Modelo padrão com apenas as capacidades pedidas.
    pub fn default_for(tag: bool, extract: bool) -> Result<Self> {
        let mut builder = Self::builder();
        if tag || extract {
            builder = builder.tagger(LexiconTagger::new()?);
        }
        if extract {
            builder = builder.extracter(RuleExtracter::with_builtin_gazetteers());
        }
        let model = builder.build();
        debug!(tag, extract, "modelo padrão carregado");
        Ok(model)
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    pub fn has_tagger(&self) -> bool {
        self.tagger.is_some()
    }

    pub fn has_extracter(&self) -> bool {
        self.extracter.is_some()
    }

    /// Etiquetador como `Arc`, para entregar às threads do pool.
    pub fn tagger(&self) -> Result<Arc<dyn PosTagger>> {
        self.tagger
            .clone()
            .ok_or(Error::MissingCapability(Stage::Tagging))
    }

    pub fn extracter(&self) -> Result<&dyn EntityExtracter> {
        self.extracter
            .as_deref()
            .ok_or(Error::MissingCapability(Stage::Extraction))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("tagger", &self.has_tagger())
            .field("extracter", &self.has_extracter())
            .finish()
    }
}

/// Montagem de um [`Model`] com colaboradores próprios.
#[derive(Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn tagger(mut self, tagger: impl PosTagger + 'static) -> Self {
        self.model.tagger = Some(Arc::new(tagger));
        self
    }

    pub fn extracter(mut self, extracter: impl EntityExtracter + 'static) -> Self {
        self.model.extracter = Some(Arc::new(extracter));
        self
    }

    pub fn build(self) -> Model {
        self.model
    }
}
