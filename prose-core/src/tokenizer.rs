//! # Tokenizador
//!
//! Divide o texto bruto em tokens (palavras e pontuações). Cada token guarda
//! seus offsets de byte no texto original, o que permite reconstruir o texto
//! de uma entidade sem depender de espaços.
//!
//! O [`StandardTokenizer`] é o colaborador padrão do estágio de tokenização:
//!
//! - Palavras são sequências alfanuméricas, com hífen interno e apóstrofo
//!   (`"don't"`, `"well-known"`).
//! - Abreviações conhecidas mantêm o ponto (`"Dr."`, `"Inc."`).
//! - Números decimais não são quebrados (`"3.50"`).
//! - Qualquer outro símbolo vira um token de um caractere.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use prose_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Dr. Smith arrived.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr.", "Smith", "arrived", "."]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StageResult;

/// Um token extraído do texto original.
///
/// O token não tem identidade própria: dentro de um documento ele é
/// identificado apenas pela sua posição na sequência. `tag` e `label`
/// começam vazios e são preenchidos pelos estágios de etiquetagem e extração.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// O texto do token (ex: "Mary", ",", "lamb").
    pub text: String,
    /// Etiqueta morfossintática (Penn Treebank). Vazia até a etiquetagem.
    pub tag: String,
    /// Rótulo BIO de entidade (ex: "B-PER"). Vazio até a classificação.
    pub label: String,
    /// Índice de byte inicial no texto original (inclusivo).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            tag: String::new(),
            label: String::new(),
            start,
            end,
        }
    }

    pub fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// Colaborador do estágio de tokenização.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> StageResult<Vec<Token>>;
}

/// Tokenizador padrão baseado em regras de caracteres.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> StageResult<Vec<Token>> {
        Ok(tokenize(text))
    }
}

/// Abreviações que não devem ter o ponto separado.
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Mr", "Mrs", "Ms", "Prof", "Sr", "Sra", "Jr", "St", "Gen", "Gov", "Sen",
    "Rep", "Capt", "Col", "Lt", "Inc", "Ltd", "Co", "Corp", "vs", "etc", "approx", "Jan",
    "Feb", "Mar", "Apr", "Aug", "Sept", "Oct", "Nov", "Dec", "No", "Vol", "Fig",
];

/// Tokeniza um texto com as regras do [`StandardTokenizer`].
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if ch.is_alphanumeric() {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if (ch == '-' || ch == '\'' || ch == '\u{2019}')
            && !current_text.is_empty()
            && next.is_some_and(char::is_alphanumeric)
        {
            // Hífen e apóstrofo só ficam no token quando ligam duas partes
            current_text.push(ch);
        } else if ch == '.' && !current_text.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current_text.as_str());
            let is_decimal = current_text.chars().all(|c| c.is_ascii_digit())
                && next.is_some_and(|c| c.is_ascii_digit());

            if is_abbrev || is_decimal {
                current_text.push('.');
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ".".to_string(), byte_pos, byte_pos + 1);
            }
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
    }

    flush_token(&mut tokens, &mut current_text, current_start, text.len());
    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token::new(std::mem::take(text), start, end));
    }
}

/// Adiciona um token de pontuação diretamente
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token::new(text, start, end));
}
