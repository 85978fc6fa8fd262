//! # Pool de Workers de Etiquetagem
//!
//! Etiquetagem concorrente com um número fixo de threads:
//!
//! ```text
//! orquestrador ──(índice, lote)──► fila limitada ──► workers (N) ──(índice, resultado)──► orquestrador
//! ```
//!
//! ## Protocolo
//!
//! 1. [`WorkerPool::new`] abre os dois canais e inicia exatamente `workers` threads.
//! 2. [`WorkerPool::submit`] envia cada lote com o seu índice. A fila de jobs é
//!    limitada ([`MAX_QUEUE`]): se os workers atrasam, a submissão bloqueia.
//! 3. [`WorkerPool::wait`] fecha a submissão, recebe exatamente um resultado por
//!    job submetido e só então junta as threads (barreira de conclusão).
//!
//! Os resultados chegam em qualquer ordem. O índice que viaja com cada lote é
//! o que permite devolver cada token à sua posição.
//!
//! ## Falhas
//!
//! Um worker que entra em pânico não derruba a thread: o pânico vira um
//! resultado de erro para aquele job. Se mesmo assim todos os workers sumirem,
//! o canal de resultados desconecta (o pool não guarda nenhum `Sender` de
//! resultado) e a espera termina com [`Error::IncompleteResults`] em vez de
//! travar.
//!
//! O primeiro job que falha cancela o pool: os workers descartam os lotes
//! ainda na fila, a submissão para e [`WorkerPool::wait`] devolve esse erro
//! sem esperar o resto. Timeout e descarte do pool também cancelam.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{
    bounded, unbounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender,
};
use tracing::{debug, error, warn};

use crate::config::TagUnit;
use crate::error::{Error, Result, Stage};
use crate::tagger::PosTagger;
use crate::tokenizer::Token;

/// Capacidade da fila de jobs.
pub const MAX_QUEUE: usize = 20;

/// Lote enviado aos workers (índice + tokens).
type Job = (usize, Vec<Token>);

/// Resultado devolvido pelos workers (índice + lote etiquetado).
type JobResult = (usize, Result<Vec<Token>>);

/// Paralelismo disponível na máquina (1 se não for possível descobrir).
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Número de workers efetivo para um pedido: zero vira um, e nunca passa do
/// paralelismo disponível.
pub fn effective_workers(requested: usize) -> usize {
    if requested == 0 {
        warn!("pool pedido com zero workers, usando um");
        return 1;
    }
    requested.min(available_workers())
}

/// Pool fixo de threads que aplicam um [`PosTagger`] a lotes de tokens.
pub struct WorkerPool {
    jobs: Option<Sender<Job>>,
    results: Receiver<JobResult>,
    handles: Vec<JoinHandle<()>>,
    submitted: usize,
    cancelled: Arc<AtomicBool>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl WorkerPool {
    /// Inicia o pool. O `timeout`, se houver, conta a partir daqui e vale para
    /// a submissão e a espera juntas.
    pub fn new(
        workers: usize,
        tagger: Arc<dyn PosTagger>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let workers = effective_workers(workers);
        let (job_tx, job_rx) = bounded::<Job>(MAX_QUEUE);
        let (result_tx, result_rx) = unbounded::<JobResult>();
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let tagger = Arc::clone(&tagger);
            let cancelled = Arc::clone(&cancelled);
            let handle = thread::Builder::new()
                .name(format!("prose-tagger-{id}"))
                .spawn(move || run_worker(id, jobs, results, tagger, cancelled))?;
            handles.push(handle);
        }

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handles,
            submitted: 0,
            cancelled,
            timeout,
            deadline: timeout.map(|t| Instant::now() + t),
        })
    }

    pub fn workers(&self) -> usize {
        self.handles.len()
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Algum job já falhou (ou o prazo estourou): não adianta submeter mais.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Envia um lote. Bloqueia enquanto a fila estiver cheia.
    pub fn submit(&mut self, index: usize, batch: Vec<Token>) -> Result<()> {
        let jobs = self.jobs.as_ref().ok_or(Error::PoolClosed)?;
        match self.deadline {
            Some(deadline) => jobs.send_deadline((index, batch), deadline).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => {
                    self.cancel();
                    Error::Timeout(self.timeout.unwrap_or_default())
                }
                SendTimeoutError::Disconnected(_) => Error::PoolClosed,
            })?,
            None => jobs.send((index, batch)).map_err(|_| Error::PoolClosed)?,
        }
        self.submitted += 1;
        Ok(())
    }

    /// Fecha a submissão. Os workers terminam quando a fila esvaziar.
    pub fn close(&mut self) {
        self.jobs.take();
    }

    /// Barreira de conclusão: um resultado por job submetido, depois join.
    ///
    /// Devolve os lotes etiquetados com seus índices, na ordem de chegada. O
    /// primeiro erro encerra a espera na hora; o join então só aguarda o job
    /// que cada worker já tinha em mãos.
    pub fn wait(mut self) -> Result<Vec<(usize, Vec<Token>)>> {
        self.close();

        let expected = self.submitted;
        let mut received = 0;
        let mut tagged = Vec::with_capacity(expected);
        let mut first_error = None;

        while received < expected {
            let (index, outcome) = self.recv_next().map_err(|e| {
                self.cancel();
                match e {
                    RecvTimeoutError::Timeout => Error::Timeout(self.timeout.unwrap_or_default()),
                    RecvTimeoutError::Disconnected => Error::IncompleteResults { expected, received },
                }
            })?;
            received += 1;
            match outcome {
                Ok(batch) => tagged.push((index, batch)),
                Err(e) => {
                    self.cancel();
                    first_error = Some(e);
                    break;
                }
            }
        }

        // Fila fechada: cada worker termina o job atual, descarta o resto e sai
        for (id, handle) in self.handles.drain(..).enumerate() {
            if let Err(payload) = handle.join() {
                first_error.get_or_insert(Error::WorkerPanicked {
                    worker: id,
                    message: panic_message(payload.as_ref()),
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                debug!(jobs = expected, "pool de etiquetagem concluído");
                Ok(tagged)
            }
        }
    }

    fn recv_next(&self) -> std::result::Result<JobResult, RecvTimeoutError> {
        match self.deadline {
            Some(deadline) => self.results.recv_deadline(deadline),
            None => self
                .results
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        }
    }
}

impl Drop for WorkerPool {
    // Pool abandonado (timeout, `?` na submissão): workers destacados não
    // etiquetam o que sobrou na fila
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_worker(
    id: usize,
    jobs: Receiver<Job>,
    results: Sender<JobResult>,
    tagger: Arc<dyn PosTagger>,
    cancelled: Arc<AtomicBool>,
) {
    for (index, mut batch) in jobs.iter() {
        if cancelled.load(Ordering::Acquire) {
            continue;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| tagger.tag(&mut batch)));
        let result = match outcome {
            Ok(Ok(())) => Ok(batch),
            Ok(Err(e)) => Err(Error::stage(Stage::Tagging, e)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(worker = id, job = index, %message, "worker de etiquetagem entrou em pânico");
                Err(Error::WorkerPanicked { worker: id, message })
            }
        };
        if result.is_err() {
            cancelled.store(true, Ordering::Release);
        }
        // Receptor fechado: o orquestrador desistiu (timeout)
        if results.send((index, result)).is_err() {
            return;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "pânico sem mensagem".to_string()
    }
}

/// Divide os tokens em lotes conforme a unidade de etiquetagem.
pub fn split_batches(tokens: Vec<Token>, unit: TagUnit) -> Vec<Vec<Token>> {
    match unit {
        TagUnit::Token => tokens.into_iter().map(|t| vec![t]).collect(),
        TagUnit::Sentence => {
            let mut batches = Vec::new();
            let mut current = Vec::new();
            for token in tokens {
                let ends_sentence = matches!(token.text.as_str(), "." | "!" | "?");
                current.push(token);
                if ends_sentence {
                    batches.push(std::mem::take(&mut current));
                }
            }
            if !current.is_empty() {
                batches.push(current);
            }
            batches
        }
    }
}

/// Reordena os lotes pelo índice e confere que nenhum falta ou se repete.
///
/// `IncompleteResults` conta lotes distintos: quantos foram submetidos e
/// quantos índices diferentes voltaram.
fn reassemble(
    mut tagged: Vec<(usize, Vec<Token>)>,
    submitted: usize,
    expected_tokens: usize,
) -> Result<Vec<Token>> {
    tagged.sort_unstable_by_key(|(index, _)| *index);
    tagged.dedup_by_key(|(index, _)| *index);

    if tagged.len() != submitted || tagged.iter().enumerate().any(|(pos, (index, _))| pos != *index) {
        let received = tagged.iter().filter(|(index, _)| *index < submitted).count();
        return Err(Error::IncompleteResults {
            expected: submitted,
            received,
        });
    }

    let mut tokens = Vec::with_capacity(expected_tokens);
    for (_, batch) in tagged {
        tokens.extend(batch);
    }
    Ok(tokens)
}

/// Etiqueta a sequência inteira através de um pool novo.
///
/// A ordem original dos tokens é preservada. O orquestrador é dono exclusivo
/// da sequência durante toda a chamada.
pub fn tag_concurrently(
    tokens: Vec<Token>,
    tagger: Arc<dyn PosTagger>,
    workers: usize,
    unit: TagUnit,
    timeout: Option<Duration>,
) -> Result<Vec<Token>> {
    let total = tokens.len();
    if total == 0 {
        return Ok(tokens);
    }

    let mut pool = WorkerPool::new(workers, tagger, timeout)?;
    for (index, batch) in split_batches(tokens, unit).into_iter().enumerate() {
        // Um job já falhou: `wait` devolve o erro
        if pool.is_cancelled() {
            break;
        }
        pool.submit(index, batch)?;
    }
    debug!(
        jobs = pool.submitted(),
        workers = pool.workers(),
        ?unit,
        "lotes submetidos ao pool"
    );

    let submitted = pool.submitted();
    reassemble(pool.wait()?, submitted, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StageError, StageResult};
    use crate::tagger::LexiconTagger;
    use crate::tokenizer::tokenize;
    use std::sync::atomic::AtomicUsize;

    struct FixedTagger;

    impl PosTagger for FixedTagger {
        fn tag(&self, tokens: &mut [Token]) -> StageResult<()> {
            for token in tokens {
                token.tag = "X".to_string();
            }
            Ok(())
        }
    }

    struct PanickingTagger;

    impl PosTagger for PanickingTagger {
        fn tag(&self, tokens: &mut [Token]) -> StageResult<()> {
            if tokens.iter().any(|t| t.text == "boom") {
                panic!("token proibido");
            }
            FixedTagger.tag(tokens)
        }
    }

    struct FailingTagger;

    impl PosTagger for FailingTagger {
        fn tag(&self, _tokens: &mut [Token]) -> StageResult<()> {
            Err(StageError::new("léxico indisponível"))
        }
    }

    struct SlowTagger(Duration);

    impl PosTagger for SlowTagger {
        fn tag(&self, tokens: &mut [Token]) -> StageResult<()> {
            thread::sleep(self.0);
            FixedTagger.tag(tokens)
        }
    }

    /// Falha em "boom"; os demais tokens custam `delay` cada.
    struct FailOnBoom {
        delay: Duration,
        calls: AtomicUsize,
    }

    impl PosTagger for FailOnBoom {
        fn tag(&self, tokens: &mut [Token]) -> StageResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if tokens.iter().any(|t| t.text == "boom") {
                return Err(StageError::new("token proibido"));
            }
            thread::sleep(self.delay);
            FixedTagger.tag(tokens)
        }
    }

    fn many_tokens(n: usize) -> Vec<Token> {
        let text: Vec<String> = (0..n).map(|i| format!("w{}", i % 7)).collect();
        tokenize(&text.join(" "))
    }

    #[test]
    fn test_effective_workers() {
        assert_eq!(effective_workers(0), 1);
        assert_eq!(effective_workers(1), 1);
        assert_eq!(effective_workers(usize::MAX), available_workers());
    }

    #[test]
    fn test_pool_starts_exact_worker_count() {
        let pool = WorkerPool::new(0, Arc::new(FixedTagger), None).unwrap();
        assert_eq!(pool.workers(), 1);
        let pool = WorkerPool::new(available_workers(), Arc::new(FixedTagger), None).unwrap();
        assert_eq!(pool.workers(), available_workers());
    }

    #[test]
    fn test_one_result_per_job() {
        let mut pool = WorkerPool::new(4, Arc::new(FixedTagger), None).unwrap();
        let tokens = many_tokens(150);
        for (index, token) in tokens.into_iter().enumerate() {
            pool.submit(index, vec![token]).unwrap();
        }
        let mut results = pool.wait().unwrap();
        assert_eq!(results.len(), 150);
        results.sort_by_key(|(index, _)| *index);
        let indices: Vec<usize> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, (0..150).collect::<Vec<_>>());
    }

    #[test]
    fn test_tag_concurrently_preserves_tokens() {
        let tokens = many_tokens(500);
        let mut expected: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        let original_order = expected.clone();

        let tagged = tag_concurrently(tokens, Arc::new(FixedTagger), 4, TagUnit::Token, None).unwrap();
        assert_eq!(tagged.len(), 500);
        assert!(tagged.iter().all(|t| t.tag == "X"));

        let in_order: Vec<String> = tagged.iter().map(|t| t.text.clone()).collect();
        assert_eq!(in_order, original_order);

        let mut got = in_order;
        got.sort();
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_empty_sequence_skips_pool() {
        let tagged = tag_concurrently(Vec::new(), Arc::new(FailingTagger), 4, TagUnit::Token, None).unwrap();
        assert!(tagged.is_empty());
    }

    #[test]
    fn test_worker_panic_fails_without_hanging() {
        let tokens = tokenize("one two boom three four");
        let err = tag_concurrently(tokens, Arc::new(PanickingTagger), 2, TagUnit::Token, None).unwrap_err();
        match err {
            Error::WorkerPanicked { message, .. } => assert_eq!(message, "token proibido"),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_tagger_error_names_tagging_stage() {
        let tokens = tokenize("a b c");
        let err = tag_concurrently(tokens, Arc::new(FailingTagger), 2, TagUnit::Token, None).unwrap_err();
        assert_eq!(err.failed_stage(), Some(Stage::Tagging));
        assert!(matches!(err, Error::Stage { stage: Stage::Tagging, .. }));
    }

    #[test]
    fn test_timeout_abandons_wait() {
        let tokens = tokenize("slow slow slow");
        let tagger = Arc::new(SlowTagger(Duration::from_millis(500)));
        let started = Instant::now();
        let err = tag_concurrently(tokens, tagger, 1, TagUnit::Token, Some(Duration::from_millis(20))).unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_first_failure_stops_remaining_jobs() {
        let mut words = vec!["boom"];
        words.extend(std::iter::repeat("w").take(100));
        let tokens = tokenize(&words.join(" "));
        let tagger = Arc::new(FailOnBoom {
            delay: Duration::from_millis(10),
            calls: AtomicUsize::new(0),
        });

        let started = Instant::now();
        let err = tag_concurrently(tokens, Arc::clone(&tagger) as Arc<dyn PosTagger>, 1, TagUnit::Token, None)
            .unwrap_err();

        assert!(matches!(err, Error::Stage { stage: Stage::Tagging, .. }));
        // Etiquetar os 100 restantes levaria ~1s
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_timeout_during_submission() {
        let tagger = Arc::new(SlowTagger(Duration::from_millis(300)));
        let mut pool = WorkerPool::new(1, tagger, Some(Duration::from_millis(50))).unwrap();

        // Um job em execução + fila cheia: o próximo envio espera até o prazo
        let started = Instant::now();
        let err = many_tokens(MAX_QUEUE + 10)
            .into_iter()
            .enumerate()
            .find_map(|(index, token)| pool.submit(index, vec![token]).err())
            .unwrap();

        assert!(matches!(err, Error::Timeout(_)));
        assert!(pool.is_cancelled());
        assert!(pool.submitted() <= MAX_QUEUE + 1);
        assert!(started.elapsed() < Duration::from_millis(300));
    }

    #[test]
    fn test_split_batches_by_sentence() {
        let tokens = tokenize("He runs. She walks! And then");
        let batches = split_batches(tokens, TagUnit::Sentence);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, [3, 3, 2]);
    }

    #[test]
    fn test_reassemble_detects_missing_batch() {
        let batches = vec![(0, tokenize("a")), (2, tokenize("c"))];
        assert!(matches!(
            reassemble(batches, 3, 3),
            Err(Error::IncompleteResults { expected: 3, received: 2 })
        ));

        let duplicated = vec![(0, tokenize("a")), (0, tokenize("a")), (1, tokenize("b"))];
        assert!(matches!(
            reassemble(duplicated, 3, 3),
            Err(Error::IncompleteResults { expected: 3, received: 2 })
        ));

        let ordered = vec![(1, tokenize("b")), (0, tokenize("a"))];
        let tokens = reassemble(ordered, 2, 2).unwrap();
        assert_eq!(tokens[0].text, "a");
    }

    /// Sem contexto entre jobs, "runs" isolado vira NNS. Em lotes por
    /// sentença o etiquetador vê "He" e corrige para VBZ, como no modo
    /// sequencial.
    #[test]
    fn test_context_asymmetry_between_units() {
        let tagger: Arc<dyn PosTagger> = Arc::new(LexiconTagger::new().unwrap());
        let text = "He runs. She walks.";

        let mut sequential = tokenize(text);
        tagger.tag(&mut sequential).unwrap();

        let per_token = tag_concurrently(tokenize(text), Arc::clone(&tagger), 4, TagUnit::Token, None).unwrap();
        let per_sentence = tag_concurrently(tokenize(text), Arc::clone(&tagger), 4, TagUnit::Sentence, None).unwrap();

        assert!(per_token.iter().all(Token::is_tagged));
        assert_eq!(sequential[1].tag, "VBZ");
        assert_eq!(per_token[1].tag, "NNS");
        assert_eq!(per_sentence[1].tag, "VBZ");
        assert_eq!(per_sentence, sequential);
    }
}
