//! # Diretivas e Plano de Estágios
//!
//! O chamador descreve o que quer com uma lista ordenada de [`Directive`].
//! A resolução parte sempre de um [`DocOpts::default()`] novo (todos os
//! estágios ligados, concorrência desligada) e aplica as diretivas da esquerda
//! para a direita: para cada flag, vale a última escrita.
//!
//! ## Dependências entre estágios
//!
//! As flags nunca são reescritas pela resolução. As dependências são
//! calculadas por um OU explícito na hora de montar o [`StagePlan`]:
//!
//! | Estágio      | Executa se                        |
//! |--------------|-----------------------------------|
//! | segmentação  | `segment`                         |
//! | tokenização  | `tokenize ∨ tag ∨ extract`        |
//! | etiquetagem  | `tag ∨ extract`                   |
//! | extração     | `extract`                         |
//!
//! Assim `[with_tagging(false), with_extraction(true)]` ainda etiqueta: a
//! extração precisa das etiquetas. Combinações contraditórias não são erro.
//!
//! ## Diretivas em JSON
//!
//! ```rust
//! use prose_core::config::{Directive, DocOpts};
//!
//! let directives = Directive::parse_list(r#"[{"extraction": false}, {"concurrency": true}]"#).unwrap();
//! let plan = DocOpts::resolve(&directives).plan();
//! assert!(plan.tag && !plan.extract && plan.concurrent);
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, Stage};
use crate::model::Model;
use crate::workers::{available_workers, effective_workers};

/// Granularidade dos jobs enviados ao pool de etiquetagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagUnit {
    /// Um job por token. Máximo paralelismo, sem contexto entre tokens.
    #[default]
    Token,
    /// Um job por sentença. Preserva o contexto dentro da sentença.
    Sentence,
}

/// Uma intenção do chamador sobre o processo de construção.
///
/// Em JSON cada diretiva é um objeto de uma chave: `{"tagging": false}`,
/// `{"workers": 4}`, `{"tag_unit": "sentence"}`, `{"timeout_ms": 500}`.
/// O modelo só pode ser fornecido por código.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Tokenization(bool),
    Tagging(bool),
    Segmentation(bool),
    Extraction(bool),
    /// Ligada: pool com o paralelismo disponível. Desligada: um worker.
    Concurrency(bool),
    /// Tamanho explícito do pool (0 vira 1).
    Workers(usize),
    TagUnit(TagUnit),
    TimeoutMs(u64),
    #[serde(skip)]
    Model(Arc<Model>),
}

impl Directive {
    /// Lê uma lista de diretivas de um array JSON.
    pub fn parse_list(json: &str) -> Result<Vec<Directive>> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn with_tokenization(include: bool) -> Directive {
    Directive::Tokenization(include)
}

pub fn with_tagging(include: bool) -> Directive {
    Directive::Tagging(include)
}

pub fn with_segmentation(include: bool) -> Directive {
    Directive::Segmentation(include)
}

pub fn with_extraction(include: bool) -> Directive {
    Directive::Extraction(include)
}

pub fn with_concurrency(include: bool) -> Directive {
    Directive::Concurrency(include)
}

pub fn with_workers(workers: usize) -> Directive {
    Directive::Workers(workers)
}

pub fn with_tag_unit(unit: TagUnit) -> Directive {
    Directive::TagUnit(unit)
}

/// Prazo para a barreira de conclusão do pool.
pub fn with_timeout(timeout: Duration) -> Directive {
    Directive::TimeoutMs(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
}

pub fn using_model(model: Arc<Model>) -> Directive {
    Directive::Model(model)
}

/// Flags cruas, exatamente como as diretivas as deixaram.
#[derive(Debug, Clone)]
pub struct DocOpts {
    pub segment: bool,
    pub tokenize: bool,
    pub tag: bool,
    pub extract: bool,
    pub concurrent: bool,
    /// Tamanho pedido do pool, antes do limite de paralelismo.
    pub workers: usize,
    pub tag_unit: TagUnit,
    pub timeout: Option<Duration>,
    pub model: Option<Arc<Model>>,
}

impl Default for DocOpts {
    fn default() -> Self {
        Self {
            segment: true,
            tokenize: true,
            tag: true,
            extract: true,
            concurrent: false,
            workers: 1,
            tag_unit: TagUnit::Token,
            timeout: None,
            model: None,
        }
    }
}

impl DocOpts {
    /// Aplica as diretivas, em ordem, sobre os padrões.
    pub fn resolve(directives: &[Directive]) -> Self {
        directives.iter().fold(Self::default(), |mut opts, directive| {
            opts.apply(directive);
            opts
        })
    }

    pub fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::Tokenization(on) => self.tokenize = *on,
            Directive::Tagging(on) => self.tag = *on,
            Directive::Segmentation(on) => self.segment = *on,
            Directive::Extraction(on) => self.extract = *on,
            Directive::Concurrency(on) => {
                self.concurrent = *on;
                self.workers = if *on { available_workers() } else { 1 };
            }
            Directive::Workers(n) => self.workers = *n,
            Directive::TagUnit(unit) => self.tag_unit = *unit,
            Directive::TimeoutMs(ms) => self.timeout = Some(Duration::from_millis(*ms)),
            Directive::Model(model) => self.model = Some(Arc::clone(model)),
        }
    }

    /// Plano efetivo, com as dependências entre estágios aplicadas.
    pub fn plan(&self) -> StagePlan {
        let extract = self.extract;
        let tag = self.tag || extract;
        let tokenize = self.tokenize || tag;
        let concurrent = self.concurrent && tag;
        StagePlan {
            segment: self.segment,
            tokenize,
            tag,
            extract,
            concurrent,
            workers: if concurrent { effective_workers(self.workers) } else { 1 },
            tag_unit: self.tag_unit,
        }
    }
}

/// Quais estágios executam de fato e com quantos workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    pub segment: bool,
    pub tokenize: bool,
    pub tag: bool,
    pub extract: bool,
    pub concurrent: bool,
    pub workers: usize,
    pub tag_unit: TagUnit,
}

impl StagePlan {
    pub fn runs(&self, stage: Stage) -> bool {
        match stage {
            Stage::Segmentation => self.segment,
            Stage::Tokenization => self.tokenize,
            Stage::Tagging => self.tag,
            Stage::Extraction => self.extract,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_of(directives: &[Directive]) -> StagePlan {
        DocOpts::resolve(directives).plan()
    }

    #[test]
    fn test_defaults_run_everything_sequentially() {
        let plan = plan_of(&[]);
        assert!(plan.segment && plan.tokenize && plan.tag && plan.extract);
        assert!(!plan.concurrent);
        assert_eq!(plan.workers, 1);
        assert_eq!(plan.tag_unit, TagUnit::Token);
    }

    #[test]
    fn test_last_write_wins() {
        let plan = plan_of(&[with_segmentation(false), with_segmentation(true)]);
        assert!(plan.segment);
        let plan = plan_of(&[with_segmentation(true), with_segmentation(false)]);
        assert!(!plan.segment);
    }

    #[test]
    fn test_extraction_forces_tagging_and_tokenization() {
        let opts = DocOpts::resolve(&[
            with_tokenization(false),
            with_tagging(false),
            with_extraction(true),
        ]);
        // As flags cruas ficam como o chamador pediu
        assert!(!opts.tag && !opts.tokenize);
        let plan = opts.plan();
        assert!(plan.tag && plan.tokenize && plan.extract);
    }

    #[test]
    fn test_disable_tagging_then_enable_extraction() {
        let plan = plan_of(&[with_tagging(false), with_extraction(true)]);
        assert!(plan.tag);
    }

    #[test]
    fn test_everything_disabled_runs_nothing() {
        let plan = plan_of(&[
            with_segmentation(false),
            with_tokenization(false),
            with_tagging(false),
            with_extraction(false),
        ]);
        for stage in [Stage::Segmentation, Stage::Tokenization, Stage::Tagging, Stage::Extraction] {
            assert!(!plan.runs(stage));
        }
    }

    #[test]
    fn test_concurrency_sizes_pool() {
        let plan = plan_of(&[with_concurrency(true)]);
        assert!(plan.concurrent);
        assert_eq!(plan.workers, available_workers());

        let plan = plan_of(&[with_concurrency(true), with_concurrency(false)]);
        assert!(!plan.concurrent);
        assert_eq!(plan.workers, 1);
    }

    #[test]
    fn test_zero_workers_falls_back_to_one() {
        let plan = plan_of(&[with_concurrency(true), with_workers(0)]);
        assert_eq!(plan.workers, 1);
    }

    #[test]
    fn test_workers_bounded_by_parallelism() {
        let plan = plan_of(&[with_concurrency(true), with_workers(usize::MAX)]);
        assert_eq!(plan.workers, available_workers());
    }

    #[test]
    fn test_concurrency_without_tagging_is_inert() {
        let plan = plan_of(&[with_concurrency(true), with_tagging(false), with_extraction(false)]);
        assert!(!plan.concurrent);
        assert_eq!(plan.workers, 1);
    }

    #[test]
    fn test_parse_directives_from_json() {
        let directives = Directive::parse_list(
            r#"[{"tagging": false}, {"workers": 3}, {"tag_unit": "sentence"}, {"timeout_ms": 250}]"#,
        )
        .unwrap();
        let opts = DocOpts::resolve(&directives);
        assert!(!opts.tag);
        assert_eq!(opts.workers, 3);
        assert_eq!(opts.tag_unit, TagUnit::Sentence);
        assert_eq!(opts.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_rejects_unknown_directive() {
        assert!(Directive::parse_list(r#"[{"translate": true}]"#).is_err());
    }

    #[test]
    fn test_model_directive_is_kept() {
        let model = Arc::new(Model::builder().build());
        let opts = DocOpts::resolve(&[using_model(Arc::clone(&model))]);
        assert!(Arc::ptr_eq(opts.model.as_ref().unwrap(), &model));
    }
}
