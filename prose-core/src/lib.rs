//! # prose-core: Pipeline de Processamento de Texto em Estágios
//!
//! Transforma texto bruto em um [`Document`] estruturado: sentenças, tokens com
//! etiquetas morfossintáticas e entidades nomeadas. Um único ponto de entrada
//! configurável executa apenas os estágios que o chamador pede, com a
//! etiquetagem opcionalmente distribuída entre threads.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Diretivas** ([`config`]): a lista ordenada de intenções do chamador vira um [`StagePlan`].
//! 2.  **Segmentação** ([`segmenter`]): texto → sentenças.
//! 3.  **Tokenização** ([`tokenizer`]): texto → tokens com offsets.
//! 4.  **Etiquetagem** ([`tagger`]): etiqueta POS por token, sequencial ou via [`workers`].
//! 5.  **Extração** ([`extracter`], [`rule_based`]): rótulos BIO e agrupamento em entidades.
//! 6.  **Saída**: [`Document`] imutável.
//!
//! O [`Model`] agrega as capacidades de etiquetagem e extração e é
//! compartilhado (somente leitura) entre documentos e threads.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use prose_core::{build, with_extraction};
//!
//! let doc = build("Mary had a little lamb", &[with_extraction(false)]).unwrap();
//!
//! assert_eq!(doc.tokens().len(), 5);
//! assert!(doc.tokens().iter().all(|t| !t.tag.is_empty()));
//! assert!(doc.entities().is_empty());
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador que conecta todos os estágios.
//! - [`workers`]: pool de threads para a etiquetagem concorrente.
//! - [`corpus`]: léxico, gazetteers e textos de demonstração embutidos.

pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod extracter;
pub mod model;
pub mod pipeline;
pub mod rule_based;
pub mod segmenter;
pub mod tagger;
pub mod tokenizer;
pub mod workers;

pub use config::{
    using_model, with_concurrency, with_extraction, with_segmentation, with_tag_unit,
    with_tagging, with_timeout, with_tokenization, with_workers, Directive, DocOpts, StagePlan,
    TagUnit,
};
pub use document::Document;
pub use error::{Error, Result, Stage, StageError, StageResult};
pub use extracter::{Entity, EntityCategory, EntityExtracter, RuleExtracter};
pub use model::{Model, ModelBuilder};
pub use pipeline::{build, Pipeline};
pub use segmenter::{Segmenter, Sentence, UnicodeSegmenter};
pub use tagger::{LexiconTagger, PosTagger};
pub use tokenizer::{StandardTokenizer, Token, Tokenizer};
pub use workers::WorkerPool;
