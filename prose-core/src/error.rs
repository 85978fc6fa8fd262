//! # Erros do Pipeline
//!
//! Um build de documento falha por inteiro ou devolve um [`Document`](crate::Document)
//! completo. Não existe documento parcial: qualquer erro abaixo aborta a construção.
//!
//! - Falhas de colaboradores (segmentador, tokenizador, etiquetador, extrator)
//!   chegam como [`StageError`] e são embrulhadas em [`Error::Stage`] com o estágio.
//! - Falhas do pool de workers (pânico, resultados faltando, tempo esgotado)
//!   têm variantes próprias.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resultado das operações do crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Resultado devolvido pelos colaboradores de cada estágio.
pub type StageResult<T> = std::result::Result<T, StageError>;

/// Os quatro estágios do pipeline, na ordem em que executam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Segmentation,
    Tokenization,
    Tagging,
    Extraction,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Segmentation => "segmentation",
            Stage::Tokenization => "tokenization",
            Stage::Tagging => "tagging",
            Stage::Extraction => "extraction",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Erro reportado por um colaborador (segmentador, tokenizador, modelo).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StageError {
    message: String,
}

impl StageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Erro de construção de documento.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Um colaborador falhou durante o estágio indicado.
    #[error("falha no estágio {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: StageError,
    },

    /// Um worker de etiquetagem entrou em pânico no meio de um job.
    #[error("worker de etiquetagem {worker} entrou em pânico: {message}")]
    WorkerPanicked { worker: usize, message: String },

    /// O pool encerrou antes de devolver um resultado por job submetido.
    #[error("pool de etiquetagem devolveu {received} de {expected} resultados")]
    IncompleteResults { expected: usize, received: usize },

    /// A barreira de conclusão não foi atingida dentro do prazo.
    #[error("etiquetagem não terminou dentro de {0:?}")]
    Timeout(Duration),

    /// Todos os workers saíram antes de a submissão terminar.
    #[error("pool de etiquetagem fechado antes do fim da submissão")]
    PoolClosed,

    /// Não foi possível criar a thread de um worker.
    #[error("falha ao iniciar worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// O modelo fornecido não tem a capacidade exigida pelo plano.
    #[error("o modelo não possui capacidade de {0}")]
    MissingCapability(Stage),

    /// Diretivas em JSON inválidas.
    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),

    /// Padrão regex inválido ao montar os colaboradores padrão.
    #[error("padrão inválido: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Associa uma falha de colaborador ao estágio em que ocorreu.
    pub fn stage(stage: Stage, source: StageError) -> Self {
        Error::Stage { stage, source }
    }

    /// Estágio que falhou, quando o erro vem de um colaborador ou do pool.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            Error::WorkerPanicked { .. }
            | Error::IncompleteResults { .. }
            | Error::Timeout(_)
            | Error::PoolClosed
            | Error::Spawn(_) => Some(Stage::Tagging),
            Error::MissingCapability(stage) => Some(*stage),
            Error::Config(_) | Error::Pattern(_) => None,
        }
    }
}
